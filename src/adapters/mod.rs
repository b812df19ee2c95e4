// Adapters layer: concrete implementations for external systems (telemetry feed, clock, http).

pub mod clock;
pub mod http;
pub mod thingspeak;

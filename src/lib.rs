pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, SourceArgs};

pub use adapters::clock::{FixedClock, SystemClock};
pub use adapters::http::create_router;
pub use adapters::thingspeak::ThingSpeakSource;
pub use config::toml_config::{TelemetryConfig, TomlConfig};
pub use core::advisory::AdvisoryService;
pub use utils::error::{AdvisorError, Result};

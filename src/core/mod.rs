pub mod advisory;
pub mod classifier;
pub mod ranges;
pub mod season;

pub use crate::domain::model::{
    MeasurementKind, Phase, PhaseInfo, Reading, ReferenceRange, Status, TransitionInfo,
};
pub use crate::domain::ports::{Clock, ConfigProvider, TelemetrySource};
pub use crate::utils::error::Result;

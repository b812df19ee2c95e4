use crate::domain::model::{MeasurementKind, Reading};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;
use url::Url;

/// Where the latest soil reading comes from.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn latest_reading(&self) -> Result<Reading>;
}

/// Supplies "today" to the season calculator.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

pub trait ConfigProvider: Send + Sync {
    fn feed_endpoint(&self) -> Result<Url>;
    /// Feed field carrying the given measurement, e.g. `field1`.
    fn field_for(&self, kind: MeasurementKind) -> Option<&str>;
    fn request_timeout(&self) -> Option<Duration>;
}

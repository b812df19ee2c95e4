use crate::core::{ConfigProvider, MeasurementKind, Reading, TelemetrySource};
use crate::utils::error::{AdvisorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Reads the most recent entry of a ThingSpeak channel feed.
pub struct ThingSpeakSource<C: ConfigProvider> {
    config: C,
    client: Client,
}

impl<C: ConfigProvider> ThingSpeakSource<C> {
    pub fn new(config: C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| AdvisorError::ConfigError {
            message: format!("failed to build HTTP client: {}", e),
        })?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl<C: ConfigProvider> TelemetrySource for ThingSpeakSource<C> {
    async fn latest_reading(&self) -> Result<Reading> {
        let endpoint = self.config.feed_endpoint()?;
        tracing::debug!("Requesting channel feed from: {}", endpoint.path());

        let response = self.client.get(endpoint).send().await?;
        let status = response.status();
        tracing::debug!("Channel feed response status: {}", status);

        if !status.is_success() {
            return Err(AdvisorError::TelemetrySourceUnavailable {
                message: format!("channel feed returned HTTP {}", status),
            });
        }

        let body: Value = response.json().await?;
        parse_feed(&body, &self.config)
    }
}

/// Maps `feeds[0]` of a channel payload onto a [`Reading`].
pub fn parse_feed(body: &Value, config: &impl ConfigProvider) -> Result<Reading> {
    let entry = body
        .get("feeds")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("payload has no 'feeds' list"))?
        .first()
        .ok_or_else(|| malformed("channel has no entries"))?;

    let field = |kind: MeasurementKind| -> Result<i64> {
        let name = config
            .field_for(kind)
            .ok_or_else(|| malformed(format!("no feed field mapped for {}", kind)))?;
        coerce_integer(entry.get(name), name)
    };

    Ok(Reading {
        nitrogen: field(MeasurementKind::Nitrogen)?,
        phosphorus: field(MeasurementKind::Phosphorus)?,
        potassium: field(MeasurementKind::Potassium)?,
        soil_moisture: field(MeasurementKind::SoilMoisture)?,
    })
}

// ThingSpeak delivers field values as strings; plain numbers are accepted too.
fn coerce_integer(value: Option<&Value>, name: &str) -> Result<i64> {
    match value {
        Some(Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| malformed(format!("field '{}' is not an integer: {:?}", name, text))),
        Some(Value::Number(number)) => number
            .as_i64()
            .ok_or_else(|| malformed(format!("field '{}' is not an integer: {}", name, number))),
        Some(Value::Null) | None => Err(malformed(format!("field '{}' is missing", name))),
        Some(other) => Err(malformed(format!(
            "field '{}' has unexpected type: {}",
            name, other
        ))),
    }
}

fn malformed(message: impl Into<String>) -> AdvisorError {
    AdvisorError::MalformedFeedData {
        message: message.into(),
    }
}

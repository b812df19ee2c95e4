use crate::core::{ConfigProvider, MeasurementKind};
use crate::utils::error::{AdvisorError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.thingspeak.com";
pub const DEFAULT_PORT: u16 = 9000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub base_url: String,
    pub channel_id: String,
    /// Empty for public channels.
    pub read_api_key: String,
    /// No timeout when unset.
    pub timeout_seconds: Option<u64>,
    pub fields: FieldMapping,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            channel_id: String::new(),
            read_api_key: String::new(),
            timeout_seconds: None,
            fields: FieldMapping::default(),
        }
    }
}

/// Which channel field carries each soil measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub nitrogen: String,
    pub phosphorus: String,
    pub potassium: String,
    pub soil_moisture: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            nitrogen: "field1".to_string(),
            phosphorus: "field2".to_string(),
            potassium: "field3".to_string(),
            soil_moisture: "field4".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub json: bool,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AdvisorError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AdvisorError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .bind
            .parse()
            .map_err(|e| AdvisorError::InvalidConfigValueError {
                field: "server.bind".to_string(),
                value: self.bind.clone(),
                reason: format!("{}", e),
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl TelemetryConfig {
    pub fn feed_url(&self) -> Result<Url> {
        let raw = format!(
            "{}/channels/{}/feeds.json",
            self.base_url.trim_end_matches('/'),
            self.channel_id
        );
        let mut url = Url::parse(&raw).map_err(|e| AdvisorError::InvalidConfigValueError {
            field: "telemetry.base_url".to_string(),
            value: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        {
            let mut query = url.query_pairs_mut();
            if !self.read_api_key.is_empty() {
                query.append_pair("api_key", &self.read_api_key);
            }
            query.append_pair("results", "1");
        }

        Ok(url)
    }
}

impl ConfigProvider for TelemetryConfig {
    fn feed_endpoint(&self) -> Result<Url> {
        self.feed_url()
    }

    fn field_for(&self, kind: MeasurementKind) -> Option<&str> {
        let name = match kind {
            MeasurementKind::Nitrogen => &self.fields.nitrogen,
            MeasurementKind::Phosphorus => &self.fields.phosphorus,
            MeasurementKind::Potassium => &self.fields.potassium,
            MeasurementKind::SoilMoisture => &self.fields.soil_moisture,
            MeasurementKind::Temperature
            | MeasurementKind::Humidity
            | MeasurementKind::ElectricalConductivity => return None,
        };
        Some(name.as_str())
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for TelemetryConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("telemetry.base_url", &self.base_url)?;
        validation::validate_channel_id("telemetry.channel_id", &self.channel_id)?;

        if self.read_api_key.contains("${") {
            return Err(AdvisorError::InvalidConfigValueError {
                field: "telemetry.read_api_key".to_string(),
                value: self.read_api_key.clone(),
                reason: "environment variable is not set".to_string(),
            });
        }

        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("telemetry.timeout_seconds", timeout, 1)?;
        }

        for (field, name) in [
            ("telemetry.fields.nitrogen", &self.fields.nitrogen),
            ("telemetry.fields.phosphorus", &self.fields.phosphorus),
            ("telemetry.fields.potassium", &self.fields.potassium),
            ("telemetry.fields.soil_moisture", &self.fields.soil_moisture),
        ] {
            validation::validate_non_empty_string(field, name)?;
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.server.socket_addr()?;
        self.telemetry.validate()
    }
}

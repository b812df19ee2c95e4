use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Telemetry source unavailable: {message}")]
    TelemetrySourceUnavailable { message: String },

    #[error("Malformed feed data: {message}")]
    MalformedFeedData { message: String },

    #[error("Invalid date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

// The request URL carries the read API key, so it is stripped from the message.
impl From<reqwest::Error> for AdvisorError {
    fn from(err: reqwest::Error) -> Self {
        AdvisorError::TelemetrySourceUnavailable {
            message: err.without_url().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Upstream,
    Data,
    Input,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AdvisorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AdvisorError::TelemetrySourceUnavailable { .. } => ErrorCategory::Upstream,
            AdvisorError::MalformedFeedData { .. } => ErrorCategory::Data,
            AdvisorError::InvalidDate { .. } => ErrorCategory::Input,
            AdvisorError::ConfigError { .. } | AdvisorError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            AdvisorError::IoError(_) | AdvisorError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AdvisorError::TelemetrySourceUnavailable { .. } => {
                "Check network connectivity and the telemetry base_url, then retry the request"
            }
            AdvisorError::MalformedFeedData { .. } => {
                "Verify the channel publishes numeric values in the configured fields"
            }
            AdvisorError::InvalidDate { .. } => "Use the YYYY-MM-DD format, e.g. 2025-10-15",
            AdvisorError::ConfigError { .. } | AdvisorError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command-line overrides"
            }
            AdvisorError::IoError(_) => "Check that the file exists and is readable",
            AdvisorError::SerializationError(_) => "Report this as a bug",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AdvisorError::TelemetrySourceUnavailable { .. } => {
                "Could not reach the soil sensor channel".to_string()
            }
            AdvisorError::MalformedFeedData { message } => {
                format!("The soil sensor channel sent unusable data: {}", message)
            }
            AdvisorError::InvalidDate { input, .. } => format!("'{}' is not a valid date", input),
            AdvisorError::ConfigError { message } => format!("Configuration problem: {}", message),
            AdvisorError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

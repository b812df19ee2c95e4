pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Args, Parser};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

/// Flags that locate the telemetry channel. Shared by the server and the CLI.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "SAFFRON_CONFIG")]
    pub config: Option<PathBuf>,

    /// ThingSpeak channel id (overrides the config file)
    #[arg(long, env = "THINGSPEAK_CHANNEL_ID")]
    pub channel_id: Option<String>,

    /// ThingSpeak read API key (overrides the config file)
    #[arg(long, env = "THINGSPEAK_READ_API_KEY", hide_env_values = true)]
    pub read_api_key: Option<String>,

    /// Telemetry API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,
}

#[cfg(feature = "cli")]
impl SourceArgs {
    /// Loads the config file (or defaults) and applies the overrides.
    pub fn load(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(channel_id) = &self.channel_id {
            config.telemetry.channel_id = channel_id.clone();
        }
        if let Some(key) = &self.read_api_key {
            config.telemetry.read_api_key = key.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.telemetry.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.telemetry.timeout_seconds = Some(timeout);
        }

        Ok(config)
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "saffron-advisor")]
#[command(about = "Soil telemetry and seasonal care API for saffron cultivation")]
pub struct CliConfig {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Address to bind the HTTP server to
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = self.source.load()?;

        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        config.logging.verbose |= self.verbose;
        config.logging.json |= self.log_json;

        Ok(config)
    }
}

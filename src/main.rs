use clap::Parser;
use saffron_advisor::utils::{logger, validation::Validate};
use saffron_advisor::{
    create_router, AdvisoryService, CliConfig, SystemClock, ThingSpeakSource, TomlConfig,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if config.logging.json {
        logger::init_json_logger(config.logging.verbose);
    } else {
        logger::init_cli_logger(config.logging.verbose);
    }

    tracing::info!("Starting saffron-advisor");
    if let Some(path) = &cli.source.config {
        tracing::info!("📁 Configuration loaded from: {}", path.display());
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    let source = ThingSpeakSource::new(config.telemetry.clone())?;
    let service = AdvisoryService::new(Arc::new(source), Arc::new(SystemClock));
    let app = create_router(service);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("Configuration:");
    tracing::info!("  bind: {}:{}", config.server.bind, config.server.port);
    tracing::info!("  telemetry: {}", config.telemetry.base_url);
    tracing::info!("  channel: {}", config.telemetry.channel_id);
    tracing::info!(
        "  read key: {}",
        if config.telemetry.read_api_key.is_empty() {
            "none"
        } else {
            "set"
        }
    );
    match config.telemetry.timeout_seconds {
        Some(seconds) => tracing::info!("  upstream timeout: {}s", seconds),
        None => tracing::info!("  upstream timeout: none"),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

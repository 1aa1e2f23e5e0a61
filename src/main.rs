use anyhow::Context;
use clap::Parser;
use icon_deck::utils::error::{DeckError, ErrorSeverity};
use icon_deck::utils::{logger, validation::Validate};
use icon_deck::{router, AppState, CliConfig, ServiceSettings, TomlConfig};

fn load_settings(config: &CliConfig) -> Result<ServiceSettings, DeckError> {
    // 指定設定檔時以檔案為準，否則使用命令列參數
    match &config.config {
        Some(path) => {
            tracing::info!("📄 Loading configuration from {}", path.display());
            let toml_config = TomlConfig::from_file(path)?;
            toml_config.validate()?;
            Ok(ServiceSettings::from_provider(&toml_config))
        }
        None => {
            config.validate()?;
            Ok(ServiceSettings::from_provider(config))
        }
    }
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting icon-deck");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let settings = match load_settings(&config) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(exit_code(e.severity()));
        }
    };

    let state = AppState::from_settings(&settings).context("failed to build application state")?;
    let app = router(state);

    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;

    tracing::info!("🚀 Listening on http://{}", listener.local_addr()?);
    tracing::info!("🔎 Icon search: {}", settings.search_endpoint);
    tracing::info!("🖼️ Placeholders: {}", settings.placeholder_endpoint);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("👋 icon-deck stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

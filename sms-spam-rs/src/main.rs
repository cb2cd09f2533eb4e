//! sms-spam-rs: SMS Spam Classification Server
//!
//! Loads the lexicon, encoder and SVM once, then serves `POST /predict`.

use clap::Parser;
use sms_spam_rs::api::ApiServer;
use sms_spam_rs::config::LoggingConfig;
use sms_spam_rs::{ServiceConfig, ServiceContext};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Parser)]
#[command(name = "sms-spam-rs")]
#[command(about = "SMS spam classification service", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address (e.g., 127.0.0.1:8000)
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()));

    let mut config = ServiceConfig::load(config_path.as_deref())?;
    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen;
    }

    init_logging(&config.logging);

    info!("Starting sms-spam-rs v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    config.validate()?;
    log_config(&config, config_path.as_deref());

    // Model loading is blocking IO plus heavy allocation
    let init_config = config.clone();
    let context = tokio::task::spawn_blocking(move || ServiceContext::initialize(&init_config))
        .await??;

    let server = ApiServer::new(Arc::new(context), config.server.listen_addr.clone());
    server.run().await?;

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("sms_spam_rs={level},tower_http={level}", level = logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

fn log_config(config: &ServiceConfig, path: Option<&Path>) {
    info!("  Config file: {}", path.map(|p| p.display().to_string()).unwrap_or_else(|| "-".into()));
    info!("  Listening on: {}", config.server.listen_addr);
    info!("  Lexicon: {}", config.normalizer.lexicon_path.display());
    info!("  Encoder: {:?} (max {} tokens)", config.encoder.backend, config.encoder.max_length);
    info!("  Classifier: {}", config.classifier.model_path.display());
}

//! Meetup API server
//!
//! # Configuration
//!
//! Loaded from multiple sources, later ones winning:
//!
//! 1. Built-in defaults
//! 2. YAML file (`--config`, default `config/meetup.yaml`; skipped when absent)
//! 3. Environment variables `MEETUP__<SECTION>__<KEY>` (e.g. `MEETUP__DATABASE__URL`)
//!
//! `RUST_LOG` overrides `logging.level`.

use anyhow::Result;
use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use meetup_service::{Config, MeetupModule};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Meetup API server
#[derive(Parser, Debug)]
#[command(name = "meetup-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config/meetup.yaml")]
    config: PathBuf,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct ServerConfig {
    bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct LoggingConfig {
    level: String,
    json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct AppConfig {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(flatten)]
    meetup: Config,
}

fn load_config(path: &Path) -> Result<AppConfig, figment::Error> {
    Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Yaml::file(path))
        .merge(Env::prefixed("MEETUP__").split("__"))
        .extract()
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    init_tracing(&config.logging);
    info!(config = %args.config.display(), "Starting Meetup API server");

    let module = Arc::new(MeetupModule::init(config.meetup).await?);
    let listener = TcpListener::bind(config.server.bind_addr).await?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested");
                shutdown.cancel();
            }
            Err(e) => warn!(error = %e, "Unable to listen for shutdown signal"),
        }
    });

    module.serve(listener, cancel).await
}

//! WebServer entry point
//!
//! Serves the tester API for the documentation page.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use shared::{Component, logging};
use tester::{LiveController, RunnerConfig, Scenario, SnapshotPresenter};
use webserver::WebServer;

#[derive(Parser, Debug)]
#[command(name = "webserver")]
#[command(about = "HTTP bridge for the guided API tester")]
struct Args {
    /// Port for HTTP server
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Base URL of the service under test (overrides TESTER_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// File holding the persisted token and email (overrides TESTER_STORAGE_PATH)
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let component = Component::init_webserver();

    let mut config = RunnerConfig::from_env().context("Failed to load configuration")?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(storage) = args.storage {
        config.storage_path = storage;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    logging::init_tracing_with_level(Some(&config.log_level));
    logging::log_startup(component, &format!("webserver on port {} against {}", args.port, config.base_url));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", args.host, args.port))?;

    let controller = LiveController::from_config(&config, Scenario::library_flow(), SnapshotPresenter::new())?;
    controller.restore().await?;

    WebServer::new(controller).run(addr).await?;

    logging::log_success(component, "WebServer stopped gracefully");
    Ok(())
}

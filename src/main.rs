//! HTTP server for the roster compliance engine.
//!
//! Loads one organisation's configuration directory and serves the
//! validation, rule listing and worker hours endpoints.

use std::net::SocketAddr;

use clap::Parser;
use tracing::info;

use roster_compliance::api::{AppState, create_router};
use roster_compliance::config::ConfigLoader;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Organisation configuration directory
    #[arg(short, long, env = "ROSTER_CONFIG", default_value = "./config/demo_org")]
    config: String,

    /// Address to listen on
    #[arg(short, long, env = "ROSTER_BIND", default_value = "0.0.0.0:3000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ConfigLoader::load(&args.config)?;
    info!(
        organisation_id = %config.organisation().id,
        rules = config.rules().len(),
        path = %args.config,
        "Configuration loaded"
    );

    let app = create_router(AppState::new(config));

    info!("Server listening on {}", args.bind);
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use astrochart::{api, config::AppConfig, engine::DeterministicEngine};

#[derive(Parser)]
#[command(name = "astrochart")]
#[command(about = "Natal-chart HTTP service over a pluggable astrology engine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the astrochart server
    Serve {
        /// Port for the HTTP API (overrides ASTROCHART_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Interface to bind (overrides ASTROCHART_HOST)
        #[arg(long)]
        host: Option<String>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "astrochart=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = AppConfig::from_env();
    if let Some(Commands::Serve { port, host }) = cli.command {
        if let Some(port) = port {
            config.port = port;
        }
        if let Some(host) = host {
            config.host = host;
        }
    }

    let engine = Arc::new(DeterministicEngine::new());
    let app = api::create_router(engine);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("astrochart listening on http://{}", config.bind_addr());

    axum::serve(listener, app).await?;

    Ok(())
}

pub mod api;
pub mod cache;
pub mod clients;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub use config::Config;
use services::PokedexService;
use state::SharedState;

/// Dexarr - Read-through species catalog
/// Serves species lookups from cache, SQLite, or PokeAPI, in that order
#[derive(Parser)]
#[command(name = "dexarr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API daemon
    #[command(alias = "-d", alias = "--daemon")]
    Daemon,

    /// Resolve a single species by name and print the response JSON
    #[command(alias = "g")]
    Get {
        /// Species name, e.g. "pikachu"
        name: String,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Daemon) {
        Commands::Daemon => run_daemon(config).await,
        Commands::Get { name } => cmd_get(config, &name).await,
    }
}

async fn run_daemon(config: Config) -> anyhow::Result<()> {
    info!(
        "Dexarr v{} starting in daemon mode...",
        env!("CARGO_PKG_VERSION")
    );

    let sweep_interval = Duration::from_secs(config.cache.sweep_interval_seconds);
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = Arc::new(SharedState::new(config).await?);

    let sweeper_handle = Arc::clone(&state.cache).spawn_sweeper(sweep_interval);

    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let server_handle = tokio::spawn(async move {
        info!("API listening at http://{}", addr);
        if let Err(e) = axum::serve(listener, app).await {
            error!("Web server error: {}", e);
        }
    });

    info!("Daemon running. Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    sweeper_handle.abort();
    server_handle.abort();
    info!("Daemon stopped");

    Ok(())
}

async fn cmd_get(config: Config, name: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;

    match state.pokedex.get_by_name(name.trim()).await {
        Ok(Some(found)) => {
            println!("{}", serde_json::to_string_pretty(&found)?);
            Ok(())
        }
        Ok(None) => {
            println!("No species named '{}' in any tier", name);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

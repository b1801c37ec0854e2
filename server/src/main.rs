//! userbase server
//!
//! Serves the user REST API and the static front-end, and carries the two
//! maintenance commands for the database schema.
//!
//! Usage:
//!   userbase --port 5000 serve
//!   userbase --database users.sqlite3 create-db
//!   userbase drop-db

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use userbase_server::{build_router, ServerConfig};
use userbase_store::UserStore;

#[derive(Parser, Debug)]
#[command(name = "userbase")]
#[command(about = "User REST API with a static front-end")]
struct Args {
    /// SQLite database file
    #[arg(long, env = "USERBASE_DATABASE", default_value = "database.sqlite3", global = true)]
    database: PathBuf,

    /// Directory served at the site root
    #[arg(long, env = "USERBASE_STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,

    /// Host to bind the HTTP server to
    #[arg(long, env = "USERBASE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the HTTP server to
    #[arg(short, long, env = "USERBASE_PORT", default_value = "5000")]
    port: u16,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Create the schema if needed and serve HTTP (default)
    Serve,
    /// Create the users table
    CreateDb,
    /// Drop the users table and all its rows
    DropDb,
}

impl Args {
    fn config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            static_dir: self.static_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let config = args.config();
    let store = UserStore::open(&config.database)
        .with_context(|| format!("Failed to open database {}", config.database.display()))?;

    match args.command.unwrap_or(Command::Serve) {
        Command::CreateDb => {
            store.create_schema().context("Failed to create schema")?;
        }
        Command::DropDb => {
            store.drop_schema().context("Failed to drop schema")?;
        }
        Command::Serve => serve(config, store).await?,
    }
    Ok(())
}

async fn serve(config: ServerConfig, store: UserStore) -> Result<()> {
    store.create_schema().context("Failed to create schema")?;

    if !config.static_dir.is_dir() {
        warn!(
            "static directory {} does not exist, front-end will 404",
            config.static_dir.display()
        );
    }

    let app = build_router(store, &config.static_dir);
    let listener = TcpListener::bind(config.socket_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.socket_addr()))?;
    info!("listening on http://{}", listener.local_addr()?);
    info!("database: {}", config.database.display());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

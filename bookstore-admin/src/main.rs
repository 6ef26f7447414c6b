//! Bookstore Admin Console - Main entry point
//!
//! Serves the administrative web console in front of the bookstore backend.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Level, debug, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use bookstore_admin::admin::AdminState;
use bookstore_admin::backend::BookstoreBackend;
use bookstore_admin::config::{self, Config};
use bookstore_admin::server::run_server;
use bookstore_api::BookstoreApi;

/// Bookstore Admin Console - manage inventory, orders and reviews
#[derive(Parser)]
#[command(name = "bookstore-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value_os_t = Config::default_path())]
    config: PathBuf,

    /// Data directory for logs
    #[arg(short, long, default_value_os_t = Config::default_data_dir())]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the admin console
    Serve {
        /// Address to listen on (overrides config)
        #[arg(long)]
        listen: Option<SocketAddr>,
    },

    /// Generate a default configuration file
    InitConfig {
        /// Output path (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    match cli.command {
        Commands::Serve { listen } => {
            init_daemon_logging(&cli.data_dir, filter)?;
            serve(&cli.config, listen).await
        }
        Commands::InitConfig { output } => {
            init_cli_logging(filter);
            generate_config(output)
        }
    }
}

/// Initialize logging for CLI commands (stdout only).
fn init_cli_logging(filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

/// Initialize logging for the server (stdout + rotating file).
fn init_daemon_logging(data_dir: &Path, filter: EnvFilter) -> Result<()> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    // e.g. bookstore-admin.2026-01-15.log
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("bookstore-admin")
        .filename_suffix("log")
        .build(&log_dir)
        .context("Failed to create log file appender")?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The writer must outlive every log call; the server runs until exit.
    std::mem::forget(guard);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_target(true).with_ansi(false).with_writer(non_blocking))
        .init();

    info!("Logging to: {}", log_dir.display());
    Ok(())
}

/// Run the admin console
async fn serve(config_path: &Path, listen_override: Option<SocketAddr>) -> Result<()> {
    let config = Config::load(config_path)?;
    debug!(?config, "Loaded configuration");

    let listen_addr: SocketAddr = match listen_override {
        Some(addr) => addr,
        None => config
            .server
            .listen_addr
            .parse()
            .with_context(|| {
                format!("Invalid listen address in config: {}", config.server.listen_addr)
            })?,
    };

    let api = BookstoreApi::with_timeout(
        config.backend.base_url.as_str(),
        config.backend.allow_invalid_tls,
        config.backend.request_timeout(),
    )
    .with_context(|| format!("Failed to create API client for {}", config.backend.base_url))?;
    info!(backend = %api.base_url(), "Using bookstore backend");

    let backend: Arc<dyn BookstoreBackend> = Arc::new(api);
    let state = Arc::new(AdminState::new(backend, config.server.secure_cookies));

    run_server(listen_addr, state).await
}

fn generate_config(output: Option<PathBuf>) -> Result<()> {
    let template = config::default_config_template();

    match output {
        Some(path) => {
            std::fs::write(&path, &template)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Configuration written to: {}", path.display());
        }
        None => print!("{template}"),
    }

    Ok(())
}

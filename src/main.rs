//! snjv-api entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use utoipa::OpenApi;

use snjv_api::api::{create_router, ApiDoc, AppState};
use snjv_api::config::Config;
use snjv_api::meta::BuildMetadata;
use snjv_api::metrics;
use snjv_api::probe::PgProbe;
use snjv_api::registry::ItemRegistry;
use snjv_api::utils::shutdown_signal;

/// Health, build metadata, and in-memory item API.
#[derive(Parser, Debug)]
#[command(name = "snjv-api")]
#[command(about = "Minimal HTTP service with an in-memory item registry")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Print the OpenAPI document.
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load .env before logging so RUST_LOG set there takes effect
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("snjv_api=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let subscriber = tracing_subscriber::registry().with(filter);
    if args.json {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber.with(fmt::layer()).init();
    }

    match args.command {
        Some(Command::Serve { port }) => cmd_serve(port.or(args.port)).await,
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Openapi) => cmd_openapi(),
        None => cmd_serve(args.port).await,
    }
}

/// Load and validate configuration, failing fast on any problem.
fn load_config() -> anyhow::Result<Config> {
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        snjv_api::Error::from(e)
    })?;

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(snjv_api::Error::InvalidConfig(e).into());
    }

    Ok(config)
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("SNJV API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    let origins = config.allowed_origins();
    let meta = BuildMetadata::from_config(&config);

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Service: {}", config.service_name);
    println!("  Port: {}", config.port);
    println!("  Database: {}", config.redacted_database_url());
    println!("  Pool Size: {}", config.db_max_connections);
    println!("  Probe Timeout: {}s", config.db_acquire_timeout_secs);
    if origins.is_empty() {
        println!("  CORS Origins: * (any)");
    } else {
        println!("  CORS Origins: {}", origins.join(", "));
    }
    println!("  Metrics: {}", if config.metrics_enabled { "Enabled" } else { "Disabled" });
    println!("  Commit: {}", meta.get("commit").unwrap_or_default());
    println!("  Branch: {}", meta.get("branch").unwrap_or_default());
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print the OpenAPI document as JSON.
fn cmd_openapi() -> anyhow::Result<()> {
    let doc = ApiDoc::openapi().to_pretty_json()?;
    println!("{}", doc);
    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = load_config()?;
    let port = port_override.unwrap_or(config.port);

    info!("Configuration loaded successfully");
    info!("Service: {}", config.service_name);
    info!("Database: {}", config.redacted_database_url());

    let probe = PgProbe::connect_lazy(&config).map_err(|e| {
        error!("Failed to configure database pool: {}", e);
        snjv_api::Error::from(e)
    })?;

    let mut app_state = AppState::new(
        config.service_name.clone(),
        BuildMetadata::from_config(&config),
        ItemRegistry::new(),
        Arc::new(probe.clone()),
    );

    if config.metrics_enabled {
        match metrics::install_prometheus() {
            Ok(handle) => app_state = app_state.with_metrics(handle),
            Err(e) => warn!("Metrics recorder not installed: {}", e),
        }
    }

    let router = create_router(app_state, &config.allowed_origins());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    probe.close().await;
    info!("Server stopped");

    Ok(())
}

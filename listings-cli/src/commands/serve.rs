//! HTTP server command
//!
//! Loads the database configuration from the environment, picks the filter
//! source and runs the server until shutdown.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use listings_server::filters::file::DEFAULT_FILTER_FILE;
use listings_server::{
    run_server, AppState, DatabaseConfig, JsonFileSource, MySqlConnector, QueryStringSource,
    ServerConfig,
};

/// Where request filters come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterSourceKind {
    /// `?year=..&city=..&state=..` on each request
    Query,
    /// A JSON document read on each request
    File,
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "LISTEN_ADDR", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Filter source used for every request
    #[arg(long, env = "FILTER_SOURCE", value_enum, default_value_t = FilterSourceKind::Query)]
    pub filter_source: FilterSourceKind,

    /// Filter document path (with --filter-source file)
    #[arg(long, env = "FILTER_FILE", default_value = DEFAULT_FILTER_FILE)]
    pub filter_file: PathBuf,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db_config = DatabaseConfig::from_env()
        .context("Database configuration incomplete. Set HOST, PORT, USER, PASSWORD and DATABASE (environment or ./.env)")?;
    tracing::info!(database = %db_config.target(), "database configuration loaded");

    let connector = MySqlConnector::new(&db_config);
    let state = match args.filter_source {
        FilterSourceKind::Query => AppState::new(connector, QueryStringSource),
        FilterSourceKind::File => AppState::new(connector, JsonFileSource::new(&args.filter_file)),
    };

    let config = ServerConfig {
        bind_addr: args.bind,
    };

    // Run server (blocks until shutdown)
    run_server(state, config).await.context("Server error")?;

    Ok(())
}

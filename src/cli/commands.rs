//! CLI command implementations
//!
//! Boot order for `serve`: tracing, configuration, runtime, store, server.

use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::http_server::{shutdown_signal, HttpServer};
use crate::observability::init_tracing;
use crate::rest_api::LessonService;
use crate::storage::DocumentStore;

use super::args::{Command, ServeArgs};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command.unwrap_or_default())
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve(args) => serve(args),
    }
}

/// Layer flag overrides on top of the environment configuration
pub fn resolve_config(base: AppConfig, args: ServeArgs) -> AppConfig {
    AppConfig {
        host: args.host.unwrap_or(base.host),
        port: args.port.unwrap_or(base.port),
        database_url: args.database_url.unwrap_or(base.database_url),
        storage_timeout_ms: args.storage_timeout_ms.unwrap_or(base.storage_timeout_ms),
    }
}

/// Start the HTTP server and block until shutdown
pub fn serve(args: ServeArgs) -> CliResult<()> {
    init_tracing();

    let config = resolve_config(AppConfig::from_env()?, args);
    let location = config.validate()?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let store = DocumentStore::open(&location).await?;
        info!(%location, "Document store opened");

        let service = Arc::new(LessonService::new(
            Arc::new(store),
            config.storage_timeout(),
        ));

        HttpServer::new(config, service)
            .start(shutdown_signal())
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

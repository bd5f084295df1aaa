//! CLI argument definitions using clap
//!
//! Commands:
//! - lessonhub serve [--host <host>] [--port <port>] [--database-url <url>]
//!   [--storage-timeout-ms <ms>]
//!
//! With no subcommand the server starts as if `serve` had been given.

use clap::{Args, Parser, Subcommand};

/// lessonhub - lesson catalogue and order service
#[derive(Parser, Debug)]
#[command(name = "lessonhub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Serve(ServeArgs::default())
    }
}

/// Overrides for values otherwise read from the environment
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct ServeArgs {
    /// Address to bind to (env: HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (env: PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Store connection string, memory:// or file://<path> (env: DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Bound on each storage call in milliseconds (env: STORAGE_TIMEOUT_MS)
    #[arg(long)]
    pub storage_timeout_ms: Option<u64>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["lessonhub"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from([
            "lessonhub",
            "serve",
            "--port",
            "8080",
            "--database-url",
            "file://./data/lessons.db",
        ])
        .unwrap();

        let Some(Command::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.database_url.as_deref(), Some("file://./data/lessons.db"));
        assert_eq!(args.host, None);
    }

    #[test]
    fn test_bad_port_rejected() {
        assert!(Cli::try_parse_from(["lessonhub", "serve", "--port", "http"]).is_err());
    }
}

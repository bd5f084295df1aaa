//! lessonhub entry point
//!
//! This is a minimal entrypoint that:
//! 1. Dispatches to the CLI (via cli::run)
//! 2. Prints errors to stderr
//! 3. Exits with non-zero on failure
//!
//! Configuration, runtime construction and server startup all live in the
//! CLI module.

use lessonhub::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

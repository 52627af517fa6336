//! Envault - a GitHub-native secrets manager.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use envault::cli::{execute, output, Cli};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("ENVAULT_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("envault=debug")
        } else {
            EnvFilter::new("envault=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            envault::error::Error::Config(_) => {
                Some("set ENVAULT_ENCRYPTION_KEYS to \"version:hexkey[,version:hexkey]\"")
            }
            envault::error::Error::Io(_) => Some("pass --store <path> to an existing snapshot"),
            envault::error::Error::RotationFailed(_) => {
                Some("re-run with ENVAULT_LOG=envault=debug to see failing record ids")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

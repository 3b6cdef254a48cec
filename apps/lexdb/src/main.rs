//! # lexdb - Lexicon Dataset Builder
//!
//! ## Usage
//!
//! ```bash
//! # Build datasets next to the config
//! lexdb --config lexica.toml build CSW19 NWL18 --output-dir out
//!
//! # Maintenance and migration
//! lexdb migrate CSW19 --db out/CSW19.db
//! lexdb fix-symbols CSW19 --db out/CSW19.db
//! lexdb status
//! ```

use clap::Parser;
use lexdb::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // LEXDB_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("LEXDB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let default_filter = if cli.verbose {
        "lexdb=debug,lexdb_core=debug"
    } else {
        "lexdb=info,lexdb_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

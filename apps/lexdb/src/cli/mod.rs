//! # lexdb CLI Module
//!
//! ## Available Commands
//!
//! - `build` - Build the dataset of one or more lexica
//! - `migrate` - Advance a dataset one schema version
//! - `fix-definitions` - Rewrite definitions from the word list
//! - `fix-symbols` - Recompute provenance symbols and flags
//! - `status` - Show schema version and row counts
//! - `lexica` - List the configured lexica

mod commands;

use crate::config;
use clap::{Parser, Subcommand};
use lexdb_core::LexdbError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// lexdb - word-game lexicon dataset builder
///
/// Compiles word lists into alphagram datasets and keeps existing datasets
/// current with the schema.
#[derive(Parser, Debug)]
#[command(name = "lexdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the lexicon registry
    #[arg(short, long, global = true, default_value = config::DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the dataset of each lexicon
    Build {
        /// Lexicon names
        #[arg(required = true)]
        lexicons: Vec<String>,

        /// Directory the datasets are written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Overwrite existing datasets
        #[arg(short, long)]
        force: bool,
    },

    /// Advance a dataset by one schema version
    Migrate {
        lexicon: String,

        /// Dataset path (default ./<LEXICON>.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Rewrite definitions from the lexicon's word list
    FixDefinitions {
        lexicon: String,

        /// Dataset path (default ./<LEXICON>.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Recompute provenance symbols and alphagram flags
    FixSymbols {
        lexicon: String,

        /// Dataset path (default ./<LEXICON>.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Show schema version and row counts
    Status {
        /// Dataset path; without it, every configured lexicon's
        /// ./<LEXICON>.db is reported
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// List the configured lexica
    Lexica,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), LexdbError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Build {
            lexicons,
            output_dir,
            force,
        } => cmd_build(&cli.config, &lexicons, &output_dir, force, json_mode),
        Commands::Migrate { lexicon, db } => {
            let db = db.unwrap_or_else(|| default_db_path(&lexicon));
            cmd_migrate(&cli.config, &lexicon, &db, json_mode)
        }
        Commands::FixDefinitions { lexicon, db } => {
            let db = db.unwrap_or_else(|| default_db_path(&lexicon));
            cmd_fix_definitions(&cli.config, &lexicon, &db, json_mode)
        }
        Commands::FixSymbols { lexicon, db } => {
            let db = db.unwrap_or_else(|| default_db_path(&lexicon));
            cmd_fix_symbols(&cli.config, &lexicon, &db, json_mode)
        }
        Commands::Status { db } => cmd_status(&cli.config, db.as_deref(), json_mode),
        Commands::Lexica => cmd_lexica(&cli.config, json_mode),
    }
}

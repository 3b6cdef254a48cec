//! # CLI Command Implementations
//!
//! Each command loads the registry (when it needs one), calls into
//! lexdb-core and prints either plain text or, with `--json-mode`, one JSON
//! document on stdout.

use crate::config::load_registry;
use lexdb_core::{
    BuildOptions, BuildReport, Dataset, DatasetCounts, LexdbError, LexiconRegistry,
    MigrationContext, MigrationOutcome, Migrator, StoredVersion, build_dataset, dataset_path,
    fix_definitions, fix_lexicon_symbols,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Dataset location used when `--db` is not given.
pub fn default_db_path(lexicon: &str) -> PathBuf {
    dataset_path(Path::new("."), lexicon)
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// BUILD COMMAND
// =============================================================================

/// Build one dataset per lexicon, stopping at the first failure.
pub fn cmd_build(
    config: &Path,
    lexicons: &[String],
    output_dir: &Path,
    force: bool,
    json_mode: bool,
) -> Result<(), LexdbError> {
    let registry = load_registry(config)?;
    let options = BuildOptions {
        output_dir: output_dir.to_path_buf(),
        overwrite: force,
    };

    let mut reports: Vec<BuildReport> = Vec::with_capacity(lexicons.len());
    for lexicon in lexicons {
        let report = build_dataset(&registry, lexicon, &options)?;
        let lengths = serde_json::to_string(&report.length_counts)
            .map_err(|e| LexdbError::SerializationError(e.to_string()))?;
        tracing::info!("Word lengths: '{}'", lengths);
        reports.push(report);
    }

    if json_mode {
        print_json(&reports);
        return Ok(());
    }

    for report in &reports {
        println!("Built {}", report.lexicon);
        println!("  Dataset:       {}", report.dataset.display());
        println!("  Alphagrams:    {}", report.alphagrams);
        println!("  Words:         {}", report.words);
        println!("  Deleted words: {}", report.deleted_words);
    }
    Ok(())
}

// =============================================================================
// MIGRATE COMMAND
// =============================================================================

/// Advance the dataset by at most one schema version.
pub fn cmd_migrate(
    config: &Path,
    lexicon: &str,
    db: &Path,
    json_mode: bool,
) -> Result<(), LexdbError> {
    let outcome = migrate_dataset(config, lexicon, db)?;

    if json_mode {
        let output = match outcome {
            MigrationOutcome::UpToDate { version } => serde_json::json!({
                "database": db.to_string_lossy(),
                "status": "up_to_date",
                "version": version
            }),
            MigrationOutcome::Advanced {
                from,
                to,
                bootstrapped,
            } => serde_json::json!({
                "database": db.to_string_lossy(),
                "status": "advanced",
                "from": from,
                "to": to,
                "bootstrapped": bootstrapped
            }),
        };
        print_json(&output);
        return Ok(());
    }

    match outcome {
        MigrationOutcome::UpToDate { version } => {
            println!("{} is up to date (version {})", db.display(), version);
        }
        MigrationOutcome::Advanced { from, to, .. } => {
            println!("{} migrated from version {} to {}", db.display(), from, to);
        }
    }
    Ok(())
}

/// Run one migration step against `db`.
pub fn migrate_dataset(
    config: &Path,
    lexicon: &str,
    db: &Path,
) -> Result<MigrationOutcome, LexdbError> {
    let registry = load_registry(config)?;
    let context = MigrationContext::resolve(&registry, lexicon)?;
    let dataset = Dataset::open(db)?;
    Migrator::new(&dataset, context).step()
}

// =============================================================================
// MAINTENANCE COMMANDS
// =============================================================================

/// Rewrite definitions from the lexicon's word list.
pub fn cmd_fix_definitions(
    config: &Path,
    lexicon: &str,
    db: &Path,
    json_mode: bool,
) -> Result<(), LexdbError> {
    let registry = load_registry(config)?;
    let changed = fix_definitions(&registry, lexicon, db)?;
    report_fix(db, "definitions_updated", changed, json_mode);
    Ok(())
}

/// Recompute provenance symbols and alphagram flags.
pub fn cmd_fix_symbols(
    config: &Path,
    lexicon: &str,
    db: &Path,
    json_mode: bool,
) -> Result<(), LexdbError> {
    let registry = load_registry(config)?;
    let changed = fix_lexicon_symbols(&registry, lexicon, db)?;
    report_fix(db, "symbols_updated", changed, json_mode);
    Ok(())
}

fn report_fix(db: &Path, key: &str, changed: usize, json_mode: bool) {
    if json_mode {
        let mut output = serde_json::Map::new();
        output.insert("database".into(), db.to_string_lossy().into());
        output.insert(key.into(), changed.into());
        print_json(&output);
    } else {
        println!("{}: {} {}", db.display(), changed, key.replace('_', " "));
    }
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Schema version and row counts of one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetStatus {
    pub database: PathBuf,
    /// `None` when the version table is missing or empty.
    pub version: Option<u32>,
    pub counts: DatasetCounts,
}

/// Read the status of the dataset at `path`.
pub fn dataset_status(path: &Path) -> Result<DatasetStatus, LexdbError> {
    let dataset = Dataset::open(path)?;
    let version = match dataset.stored_version()? {
        StoredVersion::Present(version) => Some(version),
        StoredVersion::Missing | StoredVersion::Empty => None,
    };
    Ok(DatasetStatus {
        database: path.to_path_buf(),
        version,
        counts: dataset.counts()?,
    })
}

/// Print the status of `db`, or of every configured lexicon's default
/// dataset that exists.
pub fn cmd_status(config: &Path, db: Option<&Path>, json_mode: bool) -> Result<(), LexdbError> {
    let statuses = match db {
        Some(path) => vec![dataset_status(path)?],
        None => {
            let registry = load_registry(config)?;
            let mut statuses = Vec::new();
            for lexicon in &registry.lexicons {
                let path = default_db_path(&lexicon.name);
                if path.is_file() {
                    statuses.push(dataset_status(&path)?);
                }
            }
            statuses
        }
    };

    if json_mode {
        print_json(&statuses);
        return Ok(());
    }

    if statuses.is_empty() {
        println!("No datasets found");
        return Ok(());
    }
    for status in &statuses {
        println!("Dataset {}", status.database.display());
        match status.version {
            Some(version) => println!("  Version:       {}", version),
            None => println!("  Version:       unversioned"),
        }
        println!("  Alphagrams:    {}", status.counts.alphagrams);
        println!("  Words:         {}", status.counts.words);
        println!("  Deleted words: {}", status.counts.deleted_words);
    }
    Ok(())
}

// =============================================================================
// LEXICA COMMAND
// =============================================================================

/// One configured lexicon as listed by `lexica`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LexiconSummary {
    pub name: String,
    pub family: String,
    pub edition: u32,
    pub prior_edition: Option<String>,
    pub latest: bool,
}

/// Summaries of every configured lexicon, in registry order.
pub fn lexica_rows(registry: &LexiconRegistry) -> Result<Vec<LexiconSummary>, LexdbError> {
    registry
        .lexicons
        .iter()
        .map(|spec| {
            let prior_edition = registry
                .prior_edition(&spec.family, &spec.name)?
                .map(|prior| prior.name.clone());
            let latest = registry
                .latest_in_family(&spec.family)
                .is_some_and(|latest| latest.name == spec.name);
            Ok(LexiconSummary {
                name: spec.name.clone(),
                family: spec.family.clone(),
                edition: spec.edition,
                prior_edition,
                latest,
            })
        })
        .collect()
}

/// List the configured lexica.
pub fn cmd_lexica(config: &Path, json_mode: bool) -> Result<(), LexdbError> {
    let registry = load_registry(config)?;
    let rows = lexica_rows(&registry)?;

    if json_mode {
        print_json(&rows);
        return Ok(());
    }

    println!(
        "{:<12} {:<8} {:>8}  {:<12} LATEST",
        "LEXICON", "FAMILY", "EDITION", "PRIOR"
    );
    for row in &rows {
        println!(
            "{:<12} {:<8} {:>8}  {:<12} {}",
            row.name,
            row.family,
            row.edition,
            row.prior_edition.as_deref().unwrap_or("-"),
            if row.latest { "yes" } else { "" }
        );
    }
    Ok(())
}

//! # Lexicon Registry Configuration
//!
//! Loads the [`LexiconRegistry`] from TOML.
//!
//! ```toml
//! [families.CSW]
//! marker = "#"
//! siblings = ["TWL"]
//!
//! [families.TWL]
//! marker = "$"
//! siblings = ["CSW"]
//!
//! [[lexicons]]
//! name = "CSW19"
//! family = "CSW"
//! edition = 2019
//! word_list = "lists/CSW19.txt"
//! difficulties = "lists/CSW19.difficulty"
//! ```
//!
//! Relative paths resolve against the directory of the config file.

use lexdb_core::{LexdbError, LexiconRegistry};
use std::path::Path;

/// Config file used when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "lexica.toml";

/// Parse and validate registry TOML; relative paths resolve against `base`.
pub fn parse_registry(text: &str, base: &Path) -> Result<LexiconRegistry, LexdbError> {
    let mut registry: LexiconRegistry =
        toml::from_str(text).map_err(|e| LexdbError::InvalidConfig(e.to_string()))?;
    registry.resolve_paths(base);
    registry.validate()?;
    Ok(registry)
}

/// Load the registry from a config file.
pub fn load_registry(path: &Path) -> Result<LexiconRegistry, LexdbError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        LexdbError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
    })?;
    let base = path.parent().unwrap_or(Path::new("."));
    let registry = parse_registry(&text, base)?;
    tracing::debug!(
        "Loaded {} lexicons in {} families from {}",
        registry.lexicons.len(),
        registry.families.len(),
        path.display()
    );
    Ok(registry)
}

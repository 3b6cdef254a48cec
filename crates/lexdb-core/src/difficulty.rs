//! # Difficulty Table
//!
//! Per-lexicon difficulty scores keyed by alphagram, loaded from a text file
//! with one `ALPHAGRAM <score>` entry per line. Alphagrams without an entry
//! have no difficulty.

use crate::LexdbError;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DifficultyTable {
    scores: BTreeMap<String, u32>,
}

impl DifficultyTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, alphagram: impl Into<String>, score: u32) {
        self.scores.insert(alphagram.into(), score);
    }

    /// Difficulty of `alphagram`, if scored.
    #[must_use]
    pub fn get(&self, alphagram: &str) -> Option<u32> {
        self.scores.get(alphagram).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Parse `ALPHAGRAM <score>` lines. Alphagrams are folded to uppercase.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, LexdbError> {
        let mut table = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| LexdbError::IoError(e.to_string()))?;
            let mut tokens = line.split_whitespace();
            let Some(alphagram) = tokens.next() else {
                continue;
            };
            let score = tokens
                .next()
                .and_then(|token| token.parse::<u32>().ok())
                .ok_or_else(|| {
                    LexdbError::InvalidConfig(format!(
                        "difficulty line {}: expected '<alphagram> <score>'",
                        idx + 1
                    ))
                })?;
            table.insert(alphagram.to_uppercase(), score);
        }
        Ok(table)
    }

    /// Load a difficulty file.
    pub fn load(path: &Path) -> Result<Self, LexdbError> {
        let file = File::open(path).map_err(|e| {
            LexdbError::IoError(format!(
                "Cannot open difficulty file '{}': {}",
                path.display(),
                e
            ))
        })?;
        tracing::info!("Loading difficulties from {:?}", path);
        Self::from_reader(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scores() {
        let table = DifficultyTable::from_reader("aeinrst 12\n\nQZ 97\n".as_bytes())
            .expect("parse");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("AEINRST"), Some(12));
        assert_eq!(table.get("QZ"), Some(97));
        assert_eq!(table.get("AB"), None);
    }

    #[test]
    fn malformed_line_is_rejected() {
        let result = DifficultyTable::from_reader("AB\n".as_bytes());
        assert!(matches!(result, Err(LexdbError::InvalidConfig(_))));
        let result = DifficultyTable::from_reader("AB high\n".as_bytes());
        assert!(matches!(result, Err(LexdbError::InvalidConfig(_))));
    }
}

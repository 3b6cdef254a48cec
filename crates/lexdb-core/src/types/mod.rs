//! # Core Type Definitions
//!
//! This module contains the persisted row types of the lexicon dataset and
//! the crate-wide error type:
//! - `AlphagramRow` - one anagram class with its statistics
//! - `WordRow` - one word with hooks, definition and provenance symbols
//! - `DeletedWord` - a word dropped since the prior edition
//! - `LexdbError` - every failure the core can report
//!
//! ## Schema Evolution
//!
//! Columns that were added by later schema versions are `Option`. A dataset
//! migrated from an older version holds `None` until the transition that
//! creates the column has backfilled it. Fresh builds fill every column.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// ALPHAGRAM ROW
// =============================================================================

/// A persisted anagram class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphagramRow {
    /// Rank within the length cohort, 1 = most likely. 0 = unranked.
    pub probability: u32,
    /// Canonical sorted-letter string, the row identity.
    pub alphagram: String,
    /// Number of characters in the alphagram.
    pub length: u32,
    /// Letter-arrangement combinations drawn from the bag.
    pub combinations: u64,
    /// Number of member words. Added in version 2.
    pub num_anagrams: Option<u32>,
    /// Sum of letter point values. Added in version 2.
    pub point_value: Option<u32>,
    /// Number of vowels. Added in version 2.
    pub num_vowels: Option<u32>,
    /// Any member word is exclusive to one lexicon family. Added in version 4.
    pub contains_word_uniq_to_lex_split: Option<bool>,
    /// Any member word is new in this edition. Added in version 4.
    pub contains_update_to_lex: Option<bool>,
    /// Difficulty score, when the lexicon ships a difficulty table. Added in version 5.
    pub difficulty: Option<u32>,
}

impl AlphagramRow {
    /// Create a row holding only the version-1 columns.
    #[must_use]
    pub fn legacy(alphagram: impl Into<String>, probability: u32, combinations: u64) -> Self {
        let alphagram = alphagram.into();
        let length = alphagram.chars().count() as u32;
        Self {
            probability,
            alphagram,
            length,
            combinations,
            num_anagrams: None,
            point_value: None,
            num_vowels: None,
            contains_word_uniq_to_lex_split: None,
            contains_update_to_lex: None,
            difficulty: None,
        }
    }
}

// =============================================================================
// WORD ROW
// =============================================================================

/// A persisted word. The alphagram is referenced by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRow {
    pub word: String,
    pub alphagram: String,
    /// Provenance markers, e.g. `"+#"`. Empty when the word has none.
    pub lexicon_symbols: String,
    pub definition: String,
    /// Letters that can be prepended, in canonical order.
    pub front_hooks: String,
    /// Letters that can be appended, in canonical order.
    pub back_hooks: String,
    /// The word minus its first letter is also a word.
    pub inner_front_hook: bool,
    /// The word minus its last letter is also a word.
    pub inner_back_hook: bool,
}

// =============================================================================
// DELETED WORD
// =============================================================================

/// A word present in the prior edition but absent from this one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeletedWord {
    pub word: String,
    pub length: u32,
}

impl DeletedWord {
    /// Create a deleted-word record; the length is counted in characters.
    #[must_use]
    pub fn new(word: impl Into<String>) -> Self {
        let word = word.into();
        let length = word.chars().count() as u32;
        Self { word, length }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while building, maintaining or migrating a dataset.
///
/// - No silent failures
/// - Use `Result<T, LexdbError>` for fallible operations
/// - The core never aborts the process; the binary decides
#[derive(Debug, Error)]
pub enum LexdbError {
    /// Reading an input file failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// The embedded database reported a failure.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// A row could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The lexicon name is not in the registry.
    #[error("Unknown lexicon: {0}")]
    UnknownLexicon(String),

    /// The family identifier is not in the registry.
    #[error("Unknown lexicon family: {0}")]
    UnknownFamily(String),

    /// The letter distribution is neither configured nor built in.
    #[error("Unknown letter distribution: {0}")]
    UnknownDistribution(String),

    /// The registry or an auxiliary input file is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A dataset already exists and overwriting was not requested.
    #[error("Dataset {0:?} already exists; use --force to overwrite it")]
    DatasetExists(PathBuf),

    /// The dataset to maintain or migrate does not exist.
    #[error("Dataset {0:?} does not exist")]
    DatasetMissing(PathBuf),

    /// A row with the same key was inserted twice in one build.
    #[error("Duplicate row key: {0}")]
    DuplicateKey(String),

    /// A table, column or index was created a second time.
    #[error("Schema object already exists: {0}")]
    SchemaConflict(String),

    /// The version table exists but holds no row.
    #[error("There is a version table but it has no values in it")]
    EmptyVersionTable,

    /// The stored version is neither a transition start nor the current version.
    #[error("Unrecognized dataset version: {0}")]
    UnknownVersion(u32),
}

// =============================================================================
// TESTS
// =============================================================================

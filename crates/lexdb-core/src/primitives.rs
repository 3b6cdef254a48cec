//! # Fixed Constants
//!
//! Values compiled into the binary that every dataset produced by this tool
//! depends on. Changing any of them changes the datasets.

/// Schema version written by a fresh build and reached by the last migration.
pub const CURRENT_VERSION: u32 = 6;

/// Version assigned to a dataset that predates the version table.
pub const FIRST_VERSION: u32 = 1;

/// Longest word length that receives a probability rank.
///
/// Alphagrams longer than this are stored with probability 0.
pub const MAX_RANKED_LENGTH: usize = 15;

/// Marker appended to a word that is new relative to the prior edition.
pub const UPDATE_MARKER: &str = "+";

/// Number of records between two progress log lines.
pub const PROGRESS_INTERVAL: usize = 10_000;

/// File extension of dataset files (`<lexicon>.db`).
pub const DATASET_EXTENSION: &str = "db";

/// Name of the distribution every registry provides without configuration.
pub const DEFAULT_DISTRIBUTION: &str = "english";

//! # lexdb-core
//!
//! The deterministic lexicon dataset compiler - THE LOGIC.
//!
//! This crate turns a flat word list into the dataset consumed by the word
//! search service: one row per word, one aggregated row per alphagram
//! (anagram class), plus the words deleted since the prior edition.
//!
//! ## Pipeline
//!
//! ```text
//! word list ─► Aggregator ─► rank ─► provenance ─► Dataset (txn 1)
//!                                                     │
//!                 prior edition ─► detect_deletions ─►│ (txn 2)
//!                                                     ▼
//!                                               version stamp
//! ```
//!
//! The [`Migrator`] is a separate entry point that advances an existing
//! dataset one schema version per invocation.
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no network
//! - Deterministic: `BTreeMap`/`BTreeSet` only, explicit sort before ranking
//! - Never terminates the process; every failure is a [`LexdbError`]

// =============================================================================
// MODULES
// =============================================================================

pub mod aggregator;
pub mod deletions;
pub mod difficulty;
pub mod distribution;
pub mod engine;
pub mod maintenance;
pub mod migrate;
pub mod pipeline;
pub mod primitives;
pub mod provenance;
pub mod ranker;
pub mod registry;
pub mod storage;
pub mod types;
pub mod wordlist;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{AlphagramRow, DeletedWord, LexdbError, WordRow};

// =============================================================================
// RE-EXPORTS: Pipeline Components
// =============================================================================

pub use aggregator::{Aggregation, Aggregator, AlphagramClass, parse_line};
pub use deletions::detect_deletions;
pub use difficulty::DifficultyTable;
pub use distribution::{LetterDistribution, LetterSpec};
pub use engine::{Dictionary, HookSide, LexicalEngine, sorted_hooks};
pub use provenance::{AlphagramFlags, ExclusivityCheck, ProvenanceContext, ProvenanceSources};
pub use ranker::{ProbabilityCounters, RankedAlphagram, Ranking, compare_by_probability, rank};
pub use registry::{FamilySpec, Lexicon, LexiconRegistry, LexiconSpec};
pub use wordlist::WordList;

// =============================================================================
// RE-EXPORTS: Storage, Build, Migration
// =============================================================================

pub use maintenance::{fix_definitions, fix_lexicon_symbols};
pub use migrate::{MigrationContext, MigrationOutcome, Migrator, Transition};
pub use pipeline::{BuildOptions, BuildReport, build_dataset, dataset_path};
pub use storage::{AlphagramIndex, Dataset, DatasetCounts, StoredVersion};

//! # Dataset Schema
//!
//! Table definitions of the lexicon dataset and the DDL that creates them.
//!
//! ## Layout
//!
//! | object            | redb table                              |
//! |-------------------|-----------------------------------------|
//! | `alphagrams`      | alphagram -> postcard `AlphagramRow`    |
//! | `words`           | word -> postcard `WordRow`              |
//! | `deletedwords`    | word -> length                          |
//! | `db_version`      | `"version"` -> version                  |
//! | `prob_index`      | (probability, length) ->> alphagram     |
//! | `alphagram_index` | alphagram ->> word                      |
//! | `*_index`         | column value ->> alphagram              |
//!
//! `alpha_index` and `word_index` are the primary keys of `alphagrams` and
//! `words` and exist only as catalog entries.
//!
//! ## Catalog
//!
//! Every table, column and index is recorded in `schema_catalog`. Creating
//! an object that is already recorded fails with `SchemaConflict`; each DDL
//! step is valid exactly once per dataset.

use super::{decode, storage_err};
use crate::{AlphagramRow, LexdbError};
use redb::{MultimapTableDefinition, ReadableTable, TableDefinition, WriteTransaction};

// =============================================================================
// TABLE DEFINITIONS
// =============================================================================

/// Alphagram rows: alphagram -> serialized `AlphagramRow`.
pub(crate) const ALPHAGRAMS: TableDefinition<&str, &[u8]> = TableDefinition::new("alphagrams");

/// Word rows: word -> serialized `WordRow`.
pub(crate) const WORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("words");

/// Deleted words: word -> length in characters.
pub(crate) const DELETED_WORDS: TableDefinition<&str, u32> = TableDefinition::new("deletedwords");

/// Single-row version table.
pub(crate) const DB_VERSION: TableDefinition<&str, u32> = TableDefinition::new("db_version");

/// Key of the only row of `db_version`.
pub(crate) const VERSION_KEY: &str = "version";

/// Every schema object: name -> kind.
pub(crate) const SCHEMA_CATALOG: TableDefinition<&str, &str> =
    TableDefinition::new("schema_catalog");

/// (probability, length) ->> alphagram.
pub(crate) const PROB_INDEX: MultimapTableDefinition<(u32, u32), &str> =
    MultimapTableDefinition::new("prob_index");

/// alphagram ->> word.
pub(crate) const ALPHAGRAM_INDEX: MultimapTableDefinition<&str, &str> =
    MultimapTableDefinition::new("alphagram_index");

const ALPHA_INDEX_NAME: &str = "alpha_index";
const WORD_INDEX_NAME: &str = "word_index";

const BASE_ALPHAGRAM_COLUMNS: [&str; 4] = ["probability", "alphagram", "length", "combinations"];
const BASE_WORD_COLUMNS: [&str; 8] = [
    "word",
    "alphagram",
    "lexicon_symbols",
    "definition",
    "front_hooks",
    "back_hooks",
    "inner_front_hook",
    "inner_back_hook",
];

// =============================================================================
// SECONDARY INDICES
// =============================================================================

/// Secondary indices over alphagram columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlphagramIndex {
    Length,
    Difficulty,
    NumAnagrams,
    PointValue,
    NumVowels,
    UniqToLexSplit,
    UpdateToLex,
}

impl AlphagramIndex {
    pub const ALL: [Self; 7] = [
        Self::Length,
        Self::Difficulty,
        Self::NumAnagrams,
        Self::PointValue,
        Self::NumVowels,
        Self::UniqToLexSplit,
        Self::UpdateToLex,
    ];

    /// Schema name of the index.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Length => "length_index",
            Self::Difficulty => "difficulty_index",
            Self::NumAnagrams => "num_anagrams_index",
            Self::PointValue => "point_value_index",
            Self::NumVowels => "num_vowels_index",
            Self::UniqToLexSplit => "uniq_word_index",
            Self::UpdateToLex => "update_word_index",
        }
    }

    pub(crate) const fn definition(self) -> MultimapTableDefinition<'static, u64, &'static str> {
        MultimapTableDefinition::new(self.name())
    }

    /// Index key of a row; `None` while the column is unset.
    #[must_use]
    pub fn key(self, row: &AlphagramRow) -> Option<u64> {
        match self {
            Self::Length => Some(u64::from(row.length)),
            Self::Difficulty => row.difficulty.map(u64::from),
            Self::NumAnagrams => row.num_anagrams.map(u64::from),
            Self::PointValue => row.point_value.map(u64::from),
            Self::NumVowels => row.num_vowels.map(u64::from),
            Self::UniqToLexSplit => row.contains_word_uniq_to_lex_split.map(u64::from),
            Self::UpdateToLex => row.contains_update_to_lex.map(u64::from),
        }
    }
}

// =============================================================================
// CATALOG
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectKind {
    Table,
    Column,
    Index,
}

impl ObjectKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Column => "column",
            Self::Index => "index",
        }
    }
}

fn column_name(table: &str, column: &str) -> String {
    format!("{}.{}", table, column)
}

/// Record a new schema object; fails if it is already recorded.
fn register(txn: &WriteTransaction, name: &str, kind: ObjectKind) -> Result<(), LexdbError> {
    let mut catalog = txn.open_table(SCHEMA_CATALOG).map_err(storage_err)?;
    if catalog.get(name).map_err(storage_err)?.is_some() {
        return Err(LexdbError::SchemaConflict(name.to_string()));
    }
    catalog.insert(name, kind.as_str()).map_err(storage_err)?;
    Ok(())
}

/// Check whether a schema object is recorded.
pub(crate) fn object_exists(txn: &WriteTransaction, name: &str) -> Result<bool, LexdbError> {
    let catalog = txn.open_table(SCHEMA_CATALOG).map_err(storage_err)?;
    Ok(catalog.get(name).map_err(storage_err)?.is_some())
}

/// The secondary indices this dataset currently has.
pub(crate) fn live_indices(txn: &WriteTransaction) -> Result<Vec<AlphagramIndex>, LexdbError> {
    let mut live = Vec::new();
    for index in AlphagramIndex::ALL {
        if object_exists(txn, index.name())? {
            live.push(index);
        }
    }
    Ok(live)
}

// =============================================================================
// DDL
// =============================================================================

fn add_column(txn: &WriteTransaction, table: &str, column: &str) -> Result<(), LexdbError> {
    register(txn, &column_name(table, column), ObjectKind::Column)
}

/// Create a secondary index and fill it from the existing rows.
fn create_alphagram_index(txn: &WriteTransaction, index: AlphagramIndex) -> Result<(), LexdbError> {
    register(txn, index.name(), ObjectKind::Index)?;

    let rows: Vec<AlphagramRow> = {
        let table = txn.open_table(ALPHAGRAMS).map_err(storage_err)?;
        let mut rows = Vec::new();
        for entry in table.iter().map_err(storage_err)? {
            let (_, value) = entry.map_err(storage_err)?;
            rows.push(decode(value.value())?);
        }
        rows
    };

    let mut multimap = txn
        .open_multimap_table(index.definition())
        .map_err(storage_err)?;
    for row in &rows {
        if let Some(key) = index.key(row) {
            multimap
                .insert(key, row.alphagram.as_str())
                .map_err(storage_err)?;
        }
    }
    Ok(())
}

/// Version 1: alphagram and word tables with their lookup indices.
pub(crate) fn create_base_schema(txn: &WriteTransaction) -> Result<(), LexdbError> {
    register(txn, "alphagrams", ObjectKind::Table)?;
    for column in BASE_ALPHAGRAM_COLUMNS {
        add_column(txn, "alphagrams", column)?;
    }
    register(txn, "words", ObjectKind::Table)?;
    for column in BASE_WORD_COLUMNS {
        add_column(txn, "words", column)?;
    }
    let _ = txn.open_table(ALPHAGRAMS).map_err(storage_err)?;
    let _ = txn.open_table(WORDS).map_err(storage_err)?;

    register(txn, ALPHA_INDEX_NAME, ObjectKind::Index)?;
    register(txn, "prob_index", ObjectKind::Index)?;
    let _ = txn.open_multimap_table(PROB_INDEX).map_err(storage_err)?;
    register(txn, WORD_INDEX_NAME, ObjectKind::Index)?;
    register(txn, "alphagram_index", ObjectKind::Index)?;
    let _ = txn.open_multimap_table(ALPHAGRAM_INDEX).map_err(storage_err)?;
    Ok(())
}

/// Version 2: anagram count, point value and vowel count.
pub(crate) fn add_anagram_stat_columns(txn: &WriteTransaction) -> Result<(), LexdbError> {
    for column in ["num_anagrams", "point_value", "num_vowels"] {
        add_column(txn, "alphagrams", column)?;
    }
    for index in [
        AlphagramIndex::NumAnagrams,
        AlphagramIndex::PointValue,
        AlphagramIndex::NumVowels,
    ] {
        create_alphagram_index(txn, index)?;
    }
    Ok(())
}

/// Version 3: index on length.
pub(crate) fn add_length_index(txn: &WriteTransaction) -> Result<(), LexdbError> {
    create_alphagram_index(txn, AlphagramIndex::Length)
}

/// Version 4: provenance flags.
pub(crate) fn add_provenance_columns(txn: &WriteTransaction) -> Result<(), LexdbError> {
    add_column(txn, "alphagrams", "contains_word_uniq_to_lex_split")?;
    add_column(txn, "alphagrams", "contains_update_to_lex")?;
    create_alphagram_index(txn, AlphagramIndex::UniqToLexSplit)?;
    create_alphagram_index(txn, AlphagramIndex::UpdateToLex)
}

/// Version 5: difficulty.
pub(crate) fn add_difficulty_column(txn: &WriteTransaction) -> Result<(), LexdbError> {
    add_column(txn, "alphagrams", "difficulty")?;
    create_alphagram_index(txn, AlphagramIndex::Difficulty)
}

/// Version 6: deleted words.
pub(crate) fn add_deleted_words_table(txn: &WriteTransaction) -> Result<(), LexdbError> {
    register(txn, "deletedwords", ObjectKind::Table)?;
    let _ = txn.open_table(DELETED_WORDS).map_err(storage_err)?;
    Ok(())
}

/// The single-row version table, created empty.
pub(crate) fn create_version_table(txn: &WriteTransaction) -> Result<(), LexdbError> {
    register(txn, "db_version", ObjectKind::Table)?;
    let _ = txn.open_table(DB_VERSION).map_err(storage_err)?;
    Ok(())
}

/// Every DDL step up to the current version, without the version table.
pub(crate) fn create_current_schema(txn: &WriteTransaction) -> Result<(), LexdbError> {
    create_base_schema(txn)?;
    add_anagram_stat_columns(txn)?;
    add_length_index(txn)?;
    add_provenance_columns(txn)?;
    add_difficulty_column(txn)?;
    add_deleted_words_table(txn)
}

//! # Dataset Storage
//!
//! A lexicon dataset is a single redb file. Rows are postcard-encoded;
//! secondary indices are multimap tables maintained alongside the rows.

mod dataset;
mod schema;
mod tables;

pub use dataset::{Dataset, DatasetCounts, StoredVersion};
pub use schema::AlphagramIndex;

pub(crate) use schema::{
    add_anagram_stat_columns, add_deleted_words_table, add_difficulty_column, add_length_index,
    add_provenance_columns,
};
pub(crate) use tables::{AlphagramTables, WordTables};

use crate::LexdbError;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub(crate) fn storage_err<E: std::fmt::Display>(e: E) -> LexdbError {
    LexdbError::StorageError(e.to_string())
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, LexdbError> {
    postcard::to_allocvec(value).map_err(|e| LexdbError::SerializationError(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, LexdbError> {
    postcard::from_bytes(bytes).map_err(|e| LexdbError::SerializationError(e.to_string()))
}

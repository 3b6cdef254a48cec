//! # Lexicon Dataset
//!
//! `Dataset` wraps one redb file. Writes go through short-lived write
//! transactions; a failed write leaves the file as it was before the call.

use super::schema::{
    ALPHAGRAM_INDEX, ALPHAGRAMS, AlphagramIndex, DB_VERSION, DELETED_WORDS, PROB_INDEX,
    SCHEMA_CATALOG, VERSION_KEY, WORDS, create_base_schema, create_current_schema,
    create_version_table, object_exists,
};
use super::tables::{AlphagramTables, WordTables};
use super::{decode, storage_err};
use crate::{AlphagramRow, DeletedWord, LexdbError, WordRow, primitives};
use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableError,
    WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// What the version table says about a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredVersion {
    /// The dataset predates the version table.
    Missing,
    /// The version table exists but holds no row.
    Empty,
    Present(u32),
}

/// Row counts of a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatasetCounts {
    pub alphagrams: u64,
    pub words: u64,
    pub deleted_words: u64,
}

/// An open lexicon dataset.
pub struct Dataset {
    db: Database,
    path: PathBuf,
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Dataset {
    /// Create a dataset with the current schema and an empty version table.
    ///
    /// An existing file is replaced only when `overwrite` is set.
    pub fn create(path: impl AsRef<Path>, overwrite: bool) -> Result<Self, LexdbError> {
        let path = path.as_ref();
        if path.exists() {
            if !overwrite {
                return Err(LexdbError::DatasetExists(path.to_path_buf()));
            }
            tracing::warn!("Replacing existing dataset {}", path.display());
            std::fs::remove_file(path).map_err(|e| LexdbError::IoError(e.to_string()))?;
        }

        let dataset = Self::create_file(path)?;
        dataset.transaction(|txn| {
            create_current_schema(txn)?;
            create_version_table(txn)
        })?;
        Ok(dataset)
    }

    /// Create a dataset with the version-1 layout and no version table.
    ///
    /// This is the shape of datasets produced before versioning existed.
    pub fn create_legacy(path: impl AsRef<Path>) -> Result<Self, LexdbError> {
        let path = path.as_ref();
        if path.exists() {
            return Err(LexdbError::DatasetExists(path.to_path_buf()));
        }
        let dataset = Self::create_file(path)?;
        dataset.transaction(create_base_schema)?;
        Ok(dataset)
    }

    /// Open an existing dataset.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LexdbError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LexdbError::DatasetMissing(path.to_path_buf()));
        }
        let db = Database::open(path).map_err(|e| LexdbError::IoError(e.to_string()))?;
        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    fn create_file(path: &Path) -> Result<Self, LexdbError> {
        let db = Database::create(path).map_err(|e| LexdbError::IoError(e.to_string()))?;
        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    /// Location of the dataset file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` in one write transaction. Commits only if `f` succeeds.
    pub(crate) fn transaction<T, F>(&self, f: F) -> Result<T, LexdbError>
    where
        F: FnOnce(&WriteTransaction) -> Result<T, LexdbError>,
    {
        let txn = self.db.begin_write().map_err(storage_err)?;
        match f(&txn) {
            Ok(value) => {
                txn.commit().map_err(storage_err)?;
                Ok(value)
            }
            Err(e) => {
                txn.abort().map_err(storage_err)?;
                Err(e)
            }
        }
    }

    fn read(&self) -> Result<ReadTransaction, LexdbError> {
        self.db.begin_read().map_err(storage_err)
    }

    // =========================================================================
    // WRITES
    // =========================================================================

    /// Insert every alphagram and word row in a single transaction.
    pub fn write_lexicon(
        &self,
        alphagrams: &[AlphagramRow],
        words: &[WordRow],
    ) -> Result<(), LexdbError> {
        self.transaction(|txn| {
            let mut alphagram_tables = AlphagramTables::open(txn)?;
            for (i, row) in alphagrams.iter().enumerate() {
                alphagram_tables.insert(row)?;
                if (i + 1) % primitives::PROGRESS_INTERVAL == 0 {
                    tracing::debug!("Inserted {} alphagrams", i + 1);
                }
            }

            let mut word_tables = WordTables::open(txn)?;
            for (i, row) in words.iter().enumerate() {
                word_tables.insert(row)?;
                if (i + 1) % primitives::PROGRESS_INTERVAL == 0 {
                    tracing::debug!("Inserted {} words", i + 1);
                }
            }
            Ok(())
        })?;
        tracing::info!(
            "Committed {} alphagrams and {} words",
            alphagrams.len(),
            words.len()
        );
        Ok(())
    }

    /// Insert the deleted-word rows in their own transaction.
    pub fn write_deleted_words(&self, deleted: &[DeletedWord]) -> Result<(), LexdbError> {
        self.transaction(|txn| {
            let mut table = txn.open_table(DELETED_WORDS).map_err(storage_err)?;
            for entry in deleted {
                if table
                    .insert(entry.word.as_str(), entry.length)
                    .map_err(storage_err)?
                    .is_some()
                {
                    return Err(LexdbError::DuplicateKey(entry.word.clone()));
                }
            }
            Ok(())
        })
    }

    /// Set the version row, creating the version table if needed.
    pub fn stamp_version(&self, version: u32) -> Result<(), LexdbError> {
        self.transaction(|txn| stamp(txn, version))?;
        tracing::debug!("Stamped {} with version {}", self.path.display(), version);
        Ok(())
    }

    /// Create the version table of an unversioned dataset and record the
    /// first version in it.
    pub(crate) fn bootstrap_version_table(&self) -> Result<(), LexdbError> {
        self.transaction(|txn| {
            create_version_table(txn)?;
            stamp(txn, primitives::FIRST_VERSION)
        })
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Read the version table.
    pub fn stored_version(&self) -> Result<StoredVersion, LexdbError> {
        let txn = self.read()?;
        let table = match txn.open_table(DB_VERSION) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(StoredVersion::Missing),
            Err(e) => return Err(storage_err(e)),
        };
        Ok(match table.get(VERSION_KEY).map_err(storage_err)? {
            Some(version) => StoredVersion::Present(version.value()),
            None => StoredVersion::Empty,
        })
    }

    /// Check whether a table, column (`table.column`) or index is recorded.
    pub fn has_object(&self, name: &str) -> Result<bool, LexdbError> {
        let txn = self.read()?;
        let catalog = match txn.open_table(SCHEMA_CATALOG) {
            Ok(catalog) => catalog,
            Err(TableError::TableDoesNotExist(_)) => return Ok(false),
            Err(e) => return Err(storage_err(e)),
        };
        Ok(catalog.get(name).map_err(storage_err)?.is_some())
    }

    pub fn alphagram(&self, alphagram: &str) -> Result<Option<AlphagramRow>, LexdbError> {
        let txn = self.read()?;
        let table = txn.open_table(ALPHAGRAMS).map_err(storage_err)?;
        table
            .get(alphagram)
            .map_err(storage_err)?
            .map(|data| decode(data.value()))
            .transpose()
    }

    pub fn word(&self, word: &str) -> Result<Option<WordRow>, LexdbError> {
        let txn = self.read()?;
        let table = txn.open_table(WORDS).map_err(storage_err)?;
        table
            .get(word)
            .map_err(storage_err)?
            .map(|data| decode(data.value()))
            .transpose()
    }

    /// Every alphagram row, ordered by alphagram.
    pub fn alphagrams(&self) -> Result<Vec<AlphagramRow>, LexdbError> {
        let txn = self.read()?;
        let table = txn.open_table(ALPHAGRAMS).map_err(storage_err)?;
        decode_all(&table)
    }

    /// Every word row, ordered by word.
    pub fn words(&self) -> Result<Vec<WordRow>, LexdbError> {
        let txn = self.read()?;
        let table = txn.open_table(WORDS).map_err(storage_err)?;
        decode_all(&table)
    }

    /// Deleted words, ordered by word. Empty before version 6.
    pub fn deleted_words(&self) -> Result<Vec<DeletedWord>, LexdbError> {
        let txn = self.read()?;
        let table = match txn.open_table(DELETED_WORDS) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(storage_err(e)),
        };
        let mut deleted = Vec::new();
        for entry in table.iter().map_err(storage_err)? {
            let (word, length) = entry.map_err(storage_err)?;
            deleted.push(DeletedWord {
                word: word.value().to_string(),
                length: length.value(),
            });
        }
        Ok(deleted)
    }

    /// The words of one alphagram, ordered by word.
    pub fn words_for_alphagram(&self, alphagram: &str) -> Result<Vec<WordRow>, LexdbError> {
        let txn = self.read()?;
        let index = txn
            .open_multimap_table(ALPHAGRAM_INDEX)
            .map_err(storage_err)?;
        let table = txn.open_table(WORDS).map_err(storage_err)?;

        let mut rows = Vec::new();
        for word in index.get(alphagram).map_err(storage_err)? {
            let word = word.map_err(storage_err)?;
            if let Some(data) = table.get(word.value()).map_err(storage_err)? {
                rows.push(decode(data.value())?);
            }
        }
        Ok(rows)
    }

    /// Alphagrams of `length` holding rank `probability`.
    ///
    /// Distinct classes only share a rank when they are unranked (0).
    pub fn alphagrams_at_probability(
        &self,
        length: u32,
        probability: u32,
    ) -> Result<Vec<AlphagramRow>, LexdbError> {
        let txn = self.read()?;
        let index = txn.open_multimap_table(PROB_INDEX).map_err(storage_err)?;
        let table = txn.open_table(ALPHAGRAMS).map_err(storage_err)?;

        let mut rows = Vec::new();
        for alphagram in index.get((probability, length)).map_err(storage_err)? {
            let alphagram = alphagram.map_err(storage_err)?;
            if let Some(data) = table.get(alphagram.value()).map_err(storage_err)? {
                rows.push(decode(data.value())?);
            }
        }
        Ok(rows)
    }

    /// Alphagrams whose indexed column equals `key`. Booleans key as 0/1.
    ///
    /// Empty when the dataset's version predates the index.
    pub fn alphagrams_by_index(
        &self,
        index: AlphagramIndex,
        key: u64,
    ) -> Result<Vec<AlphagramRow>, LexdbError> {
        let txn = self.read()?;
        let multimap = match txn.open_multimap_table(index.definition()) {
            Ok(multimap) => multimap,
            Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(storage_err(e)),
        };
        let table = txn.open_table(ALPHAGRAMS).map_err(storage_err)?;

        let mut rows = Vec::new();
        for alphagram in multimap.get(key).map_err(storage_err)? {
            let alphagram = alphagram.map_err(storage_err)?;
            if let Some(data) = table.get(alphagram.value()).map_err(storage_err)? {
                rows.push(decode(data.value())?);
            }
        }
        Ok(rows)
    }

    /// Row counts of the three data tables.
    pub fn counts(&self) -> Result<DatasetCounts, LexdbError> {
        let txn = self.read()?;
        let alphagrams = txn
            .open_table(ALPHAGRAMS)
            .map_err(storage_err)?
            .len()
            .map_err(storage_err)?;
        let words = txn
            .open_table(WORDS)
            .map_err(storage_err)?
            .len()
            .map_err(storage_err)?;
        let deleted_words = match txn.open_table(DELETED_WORDS) {
            Ok(table) => table.len().map_err(storage_err)?,
            Err(TableError::TableDoesNotExist(_)) => 0,
            Err(e) => return Err(storage_err(e)),
        };
        Ok(DatasetCounts {
            alphagrams,
            words,
            deleted_words,
        })
    }
}

fn stamp(txn: &WriteTransaction, version: u32) -> Result<(), LexdbError> {
    if !object_exists(txn, "db_version")? {
        create_version_table(txn)?;
    }
    let mut table = txn.open_table(DB_VERSION).map_err(storage_err)?;
    table.insert(VERSION_KEY, version).map_err(storage_err)?;
    Ok(())
}

fn decode_all<T, R>(table: &R) -> Result<Vec<T>, LexdbError>
where
    T: DeserializeOwned,
    R: ReadableTable<&'static str, &'static [u8]>,
{
    let mut rows = Vec::new();
    for entry in table.iter().map_err(storage_err)? {
        let (_, value) = entry.map_err(storage_err)?;
        rows.push(decode(value.value())?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn word_row(word: &str, alphagram: &str) -> WordRow {
        WordRow {
            word: word.to_string(),
            alphagram: alphagram.to_string(),
            lexicon_symbols: String::new(),
            definition: String::new(),
            front_hooks: String::new(),
            back_hooks: String::new(),
            inner_front_hook: false,
            inner_back_hook: false,
        }
    }

    fn full_row(alphagram: &str, probability: u32) -> AlphagramRow {
        let mut row = AlphagramRow::legacy(alphagram, probability, 1);
        row.num_anagrams = Some(1);
        row.point_value = Some(4);
        row.num_vowels = Some(1);
        row.contains_word_uniq_to_lex_split = Some(true);
        row.contains_update_to_lex = Some(false);
        row.difficulty = None;
        row
    }

    #[test]
    fn fresh_dataset_has_empty_version_table() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let dataset = Dataset::create(temp_dir.path().join("T.db"), false).expect("create");
        assert_eq!(dataset.stored_version().expect("version"), StoredVersion::Empty);
        assert!(dataset.has_object("deletedwords").expect("catalog"));
        assert!(dataset.has_object("alphagrams.difficulty").expect("catalog"));
    }

    #[test]
    fn legacy_dataset_has_no_version_table() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let dataset = Dataset::create_legacy(temp_dir.path().join("T.db")).expect("create");
        assert_eq!(
            dataset.stored_version().expect("version"),
            StoredVersion::Missing
        );
        assert!(!dataset.has_object("alphagrams.num_anagrams").expect("catalog"));
        assert!(dataset.deleted_words().expect("read").is_empty());
    }

    #[test]
    fn existing_file_requires_overwrite() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("T.db");
        drop(Dataset::create(&path, false).expect("create"));

        assert!(matches!(
            Dataset::create(&path, false),
            Err(LexdbError::DatasetExists(_))
        ));
        Dataset::create(&path, true).expect("overwrite");
    }

    #[test]
    fn open_missing_dataset_fails() {
        let temp_dir = TempDir::new().expect("create temp dir");
        assert!(matches!(
            Dataset::open(temp_dir.path().join("nope.db")),
            Err(LexdbError::DatasetMissing(_))
        ));
    }

    #[test]
    fn rows_and_indices_are_readable() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let dataset = Dataset::create(temp_dir.path().join("T.db"), false).expect("create");
        dataset
            .write_lexicon(
                &[full_row("AQT", 1), full_row("AZ", 1)],
                &[word_row("QAT", "AQT"), word_row("ZA", "AZ")],
            )
            .expect("write");

        assert_eq!(dataset.alphagram("AZ").expect("read"), Some(full_row("AZ", 1)));
        assert_eq!(dataset.words_for_alphagram("AQT").expect("read").len(), 1);
        let at_rank = dataset.alphagrams_at_probability(3, 1).expect("read");
        assert_eq!(at_rank.len(), 1);
        assert_eq!(at_rank[0].alphagram, "AQT");

        let uniq = dataset
            .alphagrams_by_index(AlphagramIndex::UniqToLexSplit, 1)
            .expect("read");
        assert_eq!(uniq.len(), 2);
        assert!(
            dataset
                .alphagrams_by_index(AlphagramIndex::Difficulty, 0)
                .expect("read")
                .is_empty()
        );

        let counts = dataset.counts().expect("counts");
        assert_eq!(counts.alphagrams, 2);
        assert_eq!(counts.words, 2);
        assert_eq!(counts.deleted_words, 0);
    }

    #[test]
    fn duplicate_row_rolls_back_the_whole_write() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let dataset = Dataset::create(temp_dir.path().join("T.db"), false).expect("create");
        let result = dataset.write_lexicon(
            &[full_row("AZ", 1)],
            &[word_row("ZA", "AZ"), word_row("ZA", "AZ")],
        );
        assert!(matches!(result, Err(LexdbError::DuplicateKey(_))));
        assert_eq!(dataset.counts().expect("counts"), DatasetCounts::default());
    }

    #[test]
    fn deleted_words_and_version_stamp() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let dataset = Dataset::create(temp_dir.path().join("T.db"), false).expect("create");
        dataset
            .write_deleted_words(&[DeletedWord::new("QUIZ")])
            .expect("write");
        dataset.stamp_version(6).expect("stamp");

        assert_eq!(dataset.deleted_words().expect("read"), vec![DeletedWord::new("QUIZ")]);
        assert_eq!(
            dataset.stored_version().expect("version"),
            StoredVersion::Present(6)
        );
    }
}

//! Write-side table handles that keep the secondary indices consistent with
//! the rows. One handle per table per write transaction.

use super::schema::{
    ALPHAGRAM_INDEX, ALPHAGRAMS, AlphagramIndex, PROB_INDEX, WORDS, live_indices,
};
use super::{decode, encode, storage_err};
use crate::{AlphagramRow, LexdbError, WordRow};
use redb::{MultimapTable, ReadableTable, Table, WriteTransaction};

// =============================================================================
// ALPHAGRAM TABLES
// =============================================================================

/// The `alphagrams` table plus every index over it.
pub(crate) struct AlphagramTables<'txn> {
    rows: Table<'txn, &'static str, &'static [u8]>,
    prob: MultimapTable<'txn, (u32, u32), &'static str>,
    secondary: Vec<(AlphagramIndex, MultimapTable<'txn, u64, &'static str>)>,
}

impl<'txn> AlphagramTables<'txn> {
    /// Open the rows and the indices present in this dataset.
    pub(crate) fn open(txn: &'txn WriteTransaction) -> Result<Self, LexdbError> {
        let live = live_indices(txn)?;
        let mut secondary = Vec::with_capacity(live.len());
        for index in live {
            let table = txn
                .open_multimap_table(index.definition())
                .map_err(storage_err)?;
            secondary.push((index, table));
        }
        Ok(Self {
            rows: txn.open_table(ALPHAGRAMS).map_err(storage_err)?,
            prob: txn.open_multimap_table(PROB_INDEX).map_err(storage_err)?,
            secondary,
        })
    }

    pub(crate) fn get(&self, alphagram: &str) -> Result<Option<AlphagramRow>, LexdbError> {
        self.rows
            .get(alphagram)
            .map_err(storage_err)?
            .map(|data| decode(data.value()))
            .transpose()
    }

    /// Every row in alphagram order.
    pub(crate) fn all(&self) -> Result<Vec<AlphagramRow>, LexdbError> {
        let mut rows = Vec::new();
        for entry in self.rows.iter().map_err(storage_err)? {
            let (_, value) = entry.map_err(storage_err)?;
            rows.push(decode(value.value())?);
        }
        Ok(rows)
    }

    /// Insert a new row. A second row with the same alphagram is an error.
    pub(crate) fn insert(&mut self, row: &AlphagramRow) -> Result<(), LexdbError> {
        if self.get(&row.alphagram)?.is_some() {
            return Err(LexdbError::DuplicateKey(row.alphagram.clone()));
        }
        self.write(row, None)
    }

    /// Replace an existing row. Returns false if there was no such row.
    pub(crate) fn update(&mut self, row: &AlphagramRow) -> Result<bool, LexdbError> {
        match self.get(&row.alphagram)? {
            Some(previous) => {
                self.write(row, Some(&previous))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn write(
        &mut self,
        row: &AlphagramRow,
        previous: Option<&AlphagramRow>,
    ) -> Result<(), LexdbError> {
        let key = row.alphagram.as_str();
        let bytes = encode(row)?;
        self.rows.insert(key, bytes.as_slice()).map_err(storage_err)?;

        if let Some(previous) = previous {
            self.prob
                .remove((previous.probability, previous.length), key)
                .map_err(storage_err)?;
        }
        self.prob
            .insert((row.probability, row.length), key)
            .map_err(storage_err)?;

        for (index, table) in &mut self.secondary {
            if let Some(old_key) = previous.and_then(|previous| index.key(previous)) {
                table.remove(old_key, key).map_err(storage_err)?;
            }
            if let Some(new_key) = index.key(row) {
                table.insert(new_key, key).map_err(storage_err)?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// WORD TABLES
// =============================================================================

/// The `words` table plus the alphagram -> word index.
pub(crate) struct WordTables<'txn> {
    rows: Table<'txn, &'static str, &'static [u8]>,
    by_alphagram: MultimapTable<'txn, &'static str, &'static str>,
}

impl<'txn> WordTables<'txn> {
    pub(crate) fn open(txn: &'txn WriteTransaction) -> Result<Self, LexdbError> {
        Ok(Self {
            rows: txn.open_table(WORDS).map_err(storage_err)?,
            by_alphagram: txn
                .open_multimap_table(ALPHAGRAM_INDEX)
                .map_err(storage_err)?,
        })
    }

    pub(crate) fn get(&self, word: &str) -> Result<Option<WordRow>, LexdbError> {
        self.rows
            .get(word)
            .map_err(storage_err)?
            .map(|data| decode(data.value()))
            .transpose()
    }

    /// Every row in word order.
    pub(crate) fn all(&self) -> Result<Vec<WordRow>, LexdbError> {
        let mut rows = Vec::new();
        for entry in self.rows.iter().map_err(storage_err)? {
            let (_, value) = entry.map_err(storage_err)?;
            rows.push(decode(value.value())?);
        }
        Ok(rows)
    }

    /// Insert a new row. A second row with the same word is an error.
    pub(crate) fn insert(&mut self, row: &WordRow) -> Result<(), LexdbError> {
        if self.get(&row.word)?.is_some() {
            return Err(LexdbError::DuplicateKey(row.word.clone()));
        }
        self.write(row, None)
    }

    /// Replace an existing row. Returns false if there was no such row.
    pub(crate) fn update(&mut self, row: &WordRow) -> Result<bool, LexdbError> {
        match self.get(&row.word)? {
            Some(previous) => {
                self.write(row, Some(&previous))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn write(&mut self, row: &WordRow, previous: Option<&WordRow>) -> Result<(), LexdbError> {
        let bytes = encode(row)?;
        self.rows
            .insert(row.word.as_str(), bytes.as_slice())
            .map_err(storage_err)?;
        if let Some(previous) = previous {
            self.by_alphagram
                .remove(previous.alphagram.as_str(), previous.word.as_str())
                .map_err(storage_err)?;
        }
        self.by_alphagram
            .insert(row.alphagram.as_str(), row.word.as_str())
            .map_err(storage_err)?;
        Ok(())
    }
}

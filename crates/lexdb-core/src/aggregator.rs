//! # Alphagram Aggregator
//!
//! Streams a word list and groups its words into anagram classes.
//!
//! Input format, one entry per line:
//! - tokens are separated by whitespace, blank lines are skipped
//! - token 0 is the word, folded to uppercase
//! - tokens 1..n, rejoined with single spaces, are the definition
//!
//! The arrangement count of a class is fetched once, when the first word of
//! the class is seen. No ordering is imposed here; see [`crate::ranker`].

use crate::engine::LexicalEngine;
use crate::{LexdbError, primitives};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Split one word-list line into `(WORD, definition)`.
///
/// Returns `None` for blank lines.
pub fn parse_line(line: &str) -> Option<(String, String)> {
    let mut tokens = line.split_whitespace();
    let word = tokens.next()?.to_uppercase();
    let definition = tokens.collect::<Vec<_>>().join(" ");
    Some((word, definition))
}

/// Open a word-list file for buffered reading.
pub(crate) fn open_word_list(path: &Path) -> Result<BufReader<File>, LexdbError> {
    let file = File::open(path).map_err(|e| {
        LexdbError::IoError(format!("Cannot open word list '{}': {}", path.display(), e))
    })?;
    Ok(BufReader::new(file))
}

/// Read only the word -> definition mapping of a word-list file.
pub fn read_definitions(path: &Path) -> Result<BTreeMap<String, String>, LexdbError> {
    let mut definitions = BTreeMap::new();
    for line in open_word_list(path)?.lines() {
        let line = line.map_err(|e| LexdbError::IoError(e.to_string()))?;
        if let Some((word, definition)) = parse_line(&line) {
            definitions.insert(word, definition);
        }
    }
    Ok(definitions)
}

// =============================================================================
// ALPHAGRAM CLASS
// =============================================================================

/// The words sharing one alphagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphagramClass {
    pub alphagram: String,
    /// Member words in first-seen order.
    pub words: Vec<String>,
    /// Normalized arrangement count, computed on first encounter.
    pub combinations: u64,
}

impl AlphagramClass {
    /// Number of characters in the alphagram.
    #[must_use]
    pub fn length(&self) -> usize {
        self.alphagram.chars().count()
    }
}

/// The result of scanning one word list.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Alphagram -> class.
    pub classes: BTreeMap<String, AlphagramClass>,
    /// Word -> definition. A repeated word keeps its last definition.
    pub definitions: BTreeMap<String, String>,
}

impl Aggregation {
    /// Number of distinct words.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.definitions.len()
    }

    /// Number of distinct alphagrams.
    #[must_use]
    pub fn alphagram_count(&self) -> usize {
        self.classes.len()
    }
}

// =============================================================================
// AGGREGATOR
// =============================================================================

/// Groups words by alphagram using a [`LexicalEngine`].
pub struct Aggregator<'e, E: LexicalEngine + ?Sized> {
    engine: &'e E,
}

impl<'e, E: LexicalEngine + ?Sized> Aggregator<'e, E> {
    #[must_use]
    pub fn new(engine: &'e E) -> Self {
        Self { engine }
    }

    /// Add one word to an aggregation.
    ///
    /// A word seen before only has its definition replaced; it is not added
    /// to its class a second time.
    pub fn add_word(&self, aggregation: &mut Aggregation, word: String, definition: String) {
        if aggregation
            .definitions
            .insert(word.clone(), definition)
            .is_some()
        {
            tracing::debug!("{} appears more than once; keeping the last definition", word);
            return;
        }

        let alphagram = self.engine.canonicalize(&word);
        match aggregation.classes.get_mut(&alphagram) {
            Some(class) => class.words.push(word),
            None => {
                let combinations = self.engine.count_arrangements(&alphagram, true);
                aggregation.classes.insert(
                    alphagram.clone(),
                    AlphagramClass {
                        alphagram,
                        words: vec![word],
                        combinations,
                    },
                );
            }
        }
    }

    /// Aggregate every entry of a buffered reader.
    pub fn aggregate_reader<R: BufRead>(&self, reader: R) -> Result<Aggregation, LexdbError> {
        let mut aggregation = Aggregation::default();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| LexdbError::IoError(e.to_string()))?;
            if let Some((word, definition)) = parse_line(&line) {
                self.add_word(&mut aggregation, word, definition);
            }
            if idx > 0 && idx % primitives::PROGRESS_INTERVAL == 0 {
                tracing::debug!("{} lines read...", idx);
            }
        }
        Ok(aggregation)
    }

    /// Aggregate a word-list file.
    pub fn aggregate_path(&self, path: &Path) -> Result<Aggregation, LexdbError> {
        tracing::info!("Aggregating alphagrams from {:?}", path);
        self.aggregate_reader(open_word_list(path)?)
    }
}

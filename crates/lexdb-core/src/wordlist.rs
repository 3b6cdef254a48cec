//! # Word List Dictionary
//!
//! An in-memory [`Dictionary`] over the words of one edition.
//!
//! Words are kept in a `BTreeSet` together with a set of the reversed words,
//! so both hook directions are prefix range scans.

use crate::aggregator::{open_word_list, parse_line};
use crate::engine::{Dictionary, HookSide};
use crate::LexdbError;
use std::collections::BTreeSet;
use std::io::BufRead;
use std::ops::Bound;
use std::path::Path;

/// The words of one lexicon edition.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: BTreeSet<String>,
    reversed: BTreeSet<String>,
}

impl WordList {
    /// Create an empty word list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a word. The word is stored as given.
    pub fn insert(&mut self, word: impl Into<String>) {
        let word = word.into();
        self.reversed.insert(word.chars().rev().collect());
        self.words.insert(word);
    }

    /// Load the words of a word-list reader (definitions are ignored).
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, LexdbError> {
        let mut list = Self::new();
        for line in reader.lines() {
            let line = line.map_err(|e| LexdbError::IoError(e.to_string()))?;
            if let Some((word, _)) = parse_line(&line) {
                list.insert(word);
            }
        }
        Ok(list)
    }

    /// Load the words of a word-list file.
    pub fn from_path(path: &Path) -> Result<Self, LexdbError> {
        Self::from_reader(open_word_list(path)?)
    }

    /// Number of words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate words in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for WordList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::new();
        for word in iter {
            list.insert(word);
        }
        list
    }
}

/// Last characters of the entries of `set` that extend `prefix` by exactly one character.
fn one_letter_extensions(set: &BTreeSet<String>, prefix: &str) -> BTreeSet<char> {
    let wanted = prefix.chars().count() + 1;
    set.range::<str, _>((Bound::Excluded(prefix), Bound::Unbounded))
        .take_while(|candidate| candidate.starts_with(prefix))
        .filter(|candidate| candidate.chars().count() == wanted)
        .filter_map(|candidate| candidate.chars().last())
        .collect()
}

impl Dictionary for WordList {
    fn is_member(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    fn front_hooks(&self, word: &str) -> BTreeSet<char> {
        let reversed: String = word.chars().rev().collect();
        one_letter_extensions(&self.reversed, &reversed)
    }

    fn back_hooks(&self, word: &str) -> BTreeSet<char> {
        one_letter_extensions(&self.words, word)
    }

    fn has_inner_hook(&self, word: &str, side: HookSide) -> bool {
        let mut chars = word.chars();
        let trimmed = match side {
            HookSide::Front => {
                chars.next();
                chars.as_str()
            }
            HookSide::Back => {
                chars.next_back();
                chars.as_str()
            }
        };
        !trimmed.is_empty() && self.is_member(trimmed)
    }
}

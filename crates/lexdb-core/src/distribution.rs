//! # Letter Distributions
//!
//! The tile set of a lexicon: letters in canonical order with their tile
//! counts and point values, the vowel set and the number of blanks.
//!
//! `LetterDistribution` is the crate's [`LexicalEngine`]. All arithmetic is
//! integer; arrangement counts saturate instead of overflowing.

use crate::engine::LexicalEngine;
use crate::{LexdbError, primitives};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One letter of the alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterSpec {
    pub letter: char,
    /// Tiles of this letter in the bag.
    pub count: u32,
    /// Points scored by one tile.
    pub points: u32,
}

/// A tile distribution. Letter order in `letters` is the canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterDistribution {
    pub letters: Vec<LetterSpec>,
    /// Characters counted by `num_vowels`.
    pub vowels: String,
    #[serde(default)]
    pub blanks: u32,
}

const ENGLISH: [(char, u32, u32); 26] = [
    ('A', 9, 1),
    ('B', 2, 3),
    ('C', 2, 3),
    ('D', 4, 2),
    ('E', 12, 1),
    ('F', 2, 4),
    ('G', 3, 2),
    ('H', 2, 4),
    ('I', 9, 1),
    ('J', 1, 8),
    ('K', 1, 5),
    ('L', 4, 1),
    ('M', 2, 3),
    ('N', 6, 1),
    ('O', 8, 1),
    ('P', 2, 3),
    ('Q', 1, 10),
    ('R', 6, 1),
    ('S', 4, 1),
    ('T', 6, 1),
    ('U', 4, 1),
    ('V', 2, 4),
    ('W', 2, 4),
    ('X', 1, 8),
    ('Y', 2, 4),
    ('Z', 1, 10),
];

impl LetterDistribution {
    /// The standard 100-tile English set.
    #[must_use]
    pub fn english() -> Self {
        Self {
            letters: ENGLISH
                .iter()
                .map(|&(letter, count, points)| LetterSpec {
                    letter,
                    count,
                    points,
                })
                .collect(),
            vowels: "AEIOU".to_string(),
            blanks: 2,
        }
    }

    /// Look up a built-in distribution by name.
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> {
        (name == primitives::DEFAULT_DISTRIBUTION).then(Self::english)
    }

    /// Reject duplicate letters and empty alphabets.
    pub fn validate(&self) -> Result<(), LexdbError> {
        if self.letters.is_empty() {
            return Err(LexdbError::InvalidConfig(
                "distribution has no letters".to_string(),
            ));
        }
        let mut seen = BTreeSet::new();
        for spec in &self.letters {
            if !seen.insert(spec.letter) {
                return Err(LexdbError::InvalidConfig(format!(
                    "letter {} appears twice in distribution",
                    spec.letter
                )));
            }
        }
        Ok(())
    }

    fn spec(&self, letter: char) -> Option<&LetterSpec> {
        self.letters.iter().find(|spec| spec.letter == letter)
    }

    fn position(&self, letter: char) -> Option<usize> {
        self.letters.iter().position(|spec| spec.letter == letter)
    }

    /// Tiles of `letter` in the bag; 0 for characters outside the alphabet.
    #[must_use]
    pub fn tiles(&self, letter: char) -> u32 {
        self.spec(letter).map(|spec| spec.count).unwrap_or(0)
    }

    /// Sum of the point values of the characters of `alphagram`.
    #[must_use]
    pub fn point_value(&self, alphagram: &str) -> u32 {
        alphagram
            .chars()
            .map(|c| self.spec(c).map(|spec| spec.points).unwrap_or(0))
            .fold(0u32, u32::saturating_add)
    }

    /// Number of characters of `alphagram` in the vowel set.
    #[must_use]
    pub fn num_vowels(&self, alphagram: &str) -> u32 {
        alphagram.chars().filter(|c| self.vowels.contains(*c)).count() as u32
    }
}

impl LexicalEngine for LetterDistribution {
    fn canonicalize(&self, word: &str) -> String {
        let mut chars: Vec<char> = word.chars().collect();
        // Letters outside the alphabet sort after it, by code point.
        chars.sort_by_key(|&c| (self.position(c).unwrap_or(usize::MAX), c));
        chars.into_iter().collect()
    }

    fn count_arrangements(&self, alphagram: &str, normalize: bool) -> u64 {
        let blanks = if normalize { self.blanks as usize } else { 0 };

        // Run-length groups of the alphagram: (letter, multiplicity).
        let mut groups: Vec<(char, usize)> = Vec::new();
        for c in alphagram.chars() {
            match groups.last_mut() {
                Some((letter, k)) if *letter == c => *k += 1,
                _ => groups.push((c, 1)),
            }
        }

        // ways[b] = draws of the letters seen so far using exactly b blanks.
        let mut ways = vec![0u64; blanks + 1];
        ways[0] = 1;
        for (letter, k) in groups {
            let tiles = u64::from(self.tiles(letter));
            let mut next = vec![0u64; blanks + 1];
            for used in 0..=blanks {
                if ways[used] == 0 {
                    continue;
                }
                for from_blanks in 0..=k.min(blanks - used) {
                    let c = binomial(tiles, (k - from_blanks) as u64);
                    if c == 0 {
                        continue;
                    }
                    let slot = &mut next[used + from_blanks];
                    *slot = slot.saturating_add(ways[used].saturating_mul(c));
                }
            }
            ways = next;
        }

        ways.iter()
            .enumerate()
            .map(|(b, w)| w.saturating_mul(binomial(blanks as u64, b as u64)))
            .fold(0u64, u64::saturating_add)
    }
}

/// `n choose k` with saturation.
fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        let Some(product) = result.checked_mul(u128::from(n - i)) else {
            return u64::MAX;
        };
        result = product / u128::from(i + 1);
    }
    u64::try_from(result).unwrap_or(u64::MAX)
}

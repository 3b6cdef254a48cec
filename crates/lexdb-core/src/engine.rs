//! # Lexical Engine Interface
//!
//! The seams between the pipeline and the dictionary machinery.
//!
//! - `LexicalEngine`: canonical alphagrams and arrangement counts. Implemented
//!   by [`LetterDistribution`](crate::LetterDistribution).
//! - `Dictionary`: membership and hook queries against one lexicon edition.
//!   Implemented by [`WordList`](crate::WordList).
//!
//! The pipeline is generic over both.

use std::collections::BTreeSet;

// =============================================================================
// LEXICAL ENGINE
// =============================================================================

/// Canonicalization and combinatorics over one alphabet.
pub trait LexicalEngine {
    /// Return the alphagram of `word`: its letters in canonical order.
    fn canonicalize(&self, word: &str) -> String;

    /// Count the distinct ways to draw `alphagram` from the tile bag.
    ///
    /// With `normalize` set, draws that use blanks in place of letters are
    /// counted as well. This is the figure stored in the dataset.
    fn count_arrangements(&self, alphagram: &str, normalize: bool) -> u64;
}

// =============================================================================
// DICTIONARY
// =============================================================================

/// Which end of the word an inner hook removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookSide {
    Front,
    Back,
}

/// Membership and hook queries against one lexicon edition.
pub trait Dictionary {
    /// Check whether `word` is valid in this edition.
    fn is_member(&self, word: &str) -> bool;

    /// Letters `L` such that `L + word` is valid.
    fn front_hooks(&self, word: &str) -> BTreeSet<char>;

    /// Letters `L` such that `word + L` is valid.
    fn back_hooks(&self, word: &str) -> BTreeSet<char>;

    /// Check whether `word` stays valid with its first (`Front`) or last
    /// (`Back`) letter removed.
    fn has_inner_hook(&self, word: &str, side: HookSide) -> bool;
}

/// Render a hook letter set as a string in the engine's canonical order.
pub fn sorted_hooks<E: LexicalEngine + ?Sized>(engine: &E, hooks: &BTreeSet<char>) -> String {
    let letters: String = hooks.iter().collect();
    engine.canonicalize(&letters)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Reversed;

    impl LexicalEngine for Reversed {
        fn canonicalize(&self, word: &str) -> String {
            let mut chars: Vec<char> = word.chars().collect();
            chars.sort_unstable_by(|a, b| b.cmp(a));
            chars.into_iter().collect()
        }

        fn count_arrangements(&self, _alphagram: &str, _normalize: bool) -> u64 {
            1
        }
    }

    #[test]
    fn hooks_follow_engine_order() {
        let hooks: BTreeSet<char> = ['A', 'S', 'D'].into_iter().collect();
        assert_eq!(sorted_hooks(&Reversed, &hooks), "SDA");
    }

    #[test]
    fn empty_hooks_render_empty() {
        assert_eq!(sorted_hooks(&Reversed, &BTreeSet::new()), "");
    }
}

//! # Probability Ranker
//!
//! Orders anagram classes and assigns each a rank within its length cohort.
//!
//! ## Ordering
//!
//! Classes are sorted by combinations descending, then by alphagram string
//! ascending. Existing datasets were ranked with this exact tie-break, so
//! it must not change.
//!
//! ## Ranking
//!
//! Walking the sorted classes, a counter per length (1..=15) is incremented
//! and its new value becomes the class's probability. Ranks within a length
//! are therefore dense, starting at 1 for the most likely class. Longer
//! alphagrams keep probability 0.

use crate::aggregator::AlphagramClass;
use crate::distribution::LetterDistribution;
use crate::primitives::MAX_RANKED_LENGTH;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// The fixed total order over classes: combinations desc, alphagram asc.
pub fn compare_by_probability(a: &AlphagramClass, b: &AlphagramClass) -> Ordering {
    b.combinations
        .cmp(&a.combinations)
        .then_with(|| a.alphagram.cmp(&b.alphagram))
}

// =============================================================================
// PROBABILITY COUNTERS
// =============================================================================

/// One running counter per ranked length, owned by a single ranking pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbabilityCounters {
    counts: [u32; MAX_RANKED_LENGTH + 1],
}

impl ProbabilityCounters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the counter for `length` and return its new value.
    ///
    /// Returns `None` for lengths outside 1..=15.
    pub fn next_rank(&mut self, length: usize) -> Option<u32> {
        if length == 0 || length > MAX_RANKED_LENGTH {
            return None;
        }
        let slot = &mut self.counts[length];
        *slot = slot.saturating_add(1);
        Some(*slot)
    }

    /// Ranked alphagrams per length, omitting empty lengths.
    #[must_use]
    pub fn length_counts(&self) -> BTreeMap<u32, u32> {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(length, count)| (length as u32, *count))
            .collect()
    }
}

// =============================================================================
// RANKED ALPHAGRAM
// =============================================================================

/// A class with its rank and letter statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedAlphagram {
    pub class: AlphagramClass,
    pub length: u32,
    /// Rank within the length cohort; 0 when unranked.
    pub probability: u32,
    pub point_value: u32,
    pub num_vowels: u32,
}

/// The output of one ranking pass, in probability order.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    pub alphagrams: Vec<RankedAlphagram>,
    pub counters: ProbabilityCounters,
}

/// Sort the classes and assign per-length probability ranks.
///
/// The result does not depend on the iteration order of `classes`.
pub fn rank<I>(classes: I, distribution: &LetterDistribution) -> Ranking
where
    I: IntoIterator<Item = AlphagramClass>,
{
    let mut sorted: Vec<AlphagramClass> = classes.into_iter().collect();
    sorted.sort_by(compare_by_probability);

    let mut counters = ProbabilityCounters::new();
    let alphagrams = sorted
        .into_iter()
        .map(|class| {
            let length = class.length();
            let probability = counters.next_rank(length).unwrap_or(0);
            RankedAlphagram {
                length: length as u32,
                probability,
                point_value: distribution.point_value(&class.alphagram),
                num_vowels: distribution.num_vowels(&class.alphagram),
                class,
            }
        })
        .collect();

    Ranking {
        alphagrams,
        counters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(alphagram: &str, combinations: u64) -> AlphagramClass {
        AlphagramClass {
            alphagram: alphagram.to_string(),
            words: vec![alphagram.to_string()],
            combinations,
        }
    }

    #[test]
    fn higher_combinations_rank_first() {
        let ranking = rank(
            vec![class("QZ", 6), class("AE", 500), class("AI", 400)],
            &LetterDistribution::english(),
        );
        let order: Vec<(&str, u32)> = ranking
            .alphagrams
            .iter()
            .map(|a| (a.class.alphagram.as_str(), a.probability))
            .collect();
        assert_eq!(order, vec![("AE", 1), ("AI", 2), ("QZ", 3)]);
    }

    #[test]
    fn ties_break_on_alphagram() {
        let ranking = rank(
            vec![class("EO", 100), class("AO", 100)],
            &LetterDistribution::english(),
        );
        assert_eq!(ranking.alphagrams[0].class.alphagram, "AO");
        assert_eq!(ranking.alphagrams[0].probability, 1);
        assert_eq!(ranking.alphagrams[1].probability, 2);
    }

    #[test]
    fn ranks_are_per_length() {
        let ranking = rank(
            vec![class("AE", 10), class("AEI", 20), class("AI", 5)],
            &LetterDistribution::english(),
        );
        let by_alphagram: BTreeMap<&str, u32> = ranking
            .alphagrams
            .iter()
            .map(|a| (a.class.alphagram.as_str(), a.probability))
            .collect();
        assert_eq!(by_alphagram["AEI"], 1);
        assert_eq!(by_alphagram["AE"], 1);
        assert_eq!(by_alphagram["AI"], 2);
        assert_eq!(
            ranking.counters.length_counts(),
            BTreeMap::from([(2, 2), (3, 1)])
        );
    }

    #[test]
    fn overlong_alphagrams_stay_unranked() {
        let long = "A".repeat(MAX_RANKED_LENGTH + 1);
        let ranking = rank(vec![class(&long, 1)], &LetterDistribution::english());
        assert_eq!(ranking.alphagrams[0].probability, 0);
        assert_eq!(ranking.alphagrams[0].length, 16);
        assert!(ranking.counters.length_counts().is_empty());
    }

    #[test]
    fn statistics_use_the_alphagram_letters() {
        let ranking = rank(vec![class("AQ", 1)], &LetterDistribution::english());
        assert_eq!(ranking.alphagrams[0].point_value, 11);
        assert_eq!(ranking.alphagrams[0].num_vowels, 1);
    }

    #[test]
    fn counters_reject_zero_length() {
        let mut counters = ProbabilityCounters::new();
        assert_eq!(counters.next_rank(0), None);
        assert_eq!(counters.next_rank(2), Some(1));
        assert_eq!(counters.next_rank(2), Some(2));
    }
}

//! # Property-Based Tests
//!
//! Determinism and grouping invariants of the aggregation and ranking pass.

use lexdb_core::{
    Aggregator, AlphagramClass, LetterDistribution, LexicalEngine, ProbabilityCounters, rank,
};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn word_list(words: &[String]) -> String {
    words.iter().map(|w| format!("{}\n", w)).collect()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Every word lands in exactly one class, the one of its alphagram.
    #[test]
    fn grouping_places_each_word_once(words in vec("[A-H]{1,7}", 1..60)) {
        let english = LetterDistribution::english();
        let aggregation = Aggregator::new(&english)
            .aggregate_reader(word_list(&words).as_bytes())
            .expect("aggregate");

        let distinct: BTreeSet<&String> = words.iter().collect();
        prop_assert_eq!(aggregation.word_count(), distinct.len());

        for word in distinct {
            let alphagram = english.canonicalize(word);
            let homes: Vec<&AlphagramClass> = aggregation
                .classes
                .values()
                .filter(|class| class.words.contains(word))
                .collect();
            prop_assert_eq!(homes.len(), 1);
            prop_assert_eq!(&homes[0].alphagram, &alphagram);
            prop_assert_eq!(homes[0].length(), alphagram.chars().count());
        }
    }

    /// Ranks within a length cohort are 1..=K, in non-increasing combinations.
    #[test]
    fn ranks_are_dense_and_monotonic(words in vec("[A-J]{1,6}", 1..80)) {
        let english = LetterDistribution::english();
        let aggregation = Aggregator::new(&english)
            .aggregate_reader(word_list(&words).as_bytes())
            .expect("aggregate");
        let ranking = rank(aggregation.classes.into_values(), &english);

        let mut cohorts: BTreeMap<u32, Vec<(u32, u64)>> = BTreeMap::new();
        for ranked in &ranking.alphagrams {
            cohorts
                .entry(ranked.length)
                .or_default()
                .push((ranked.probability, ranked.class.combinations));
        }
        for (length, mut cohort) in cohorts {
            cohort.sort_unstable();
            let ranks: Vec<u32> = cohort.iter().map(|(p, _)| *p).collect();
            let expected: Vec<u32> = (1..=cohort.len() as u32).collect();
            prop_assert_eq!(ranks, expected);
            for pair in cohort.windows(2) {
                prop_assert!(pair[0].1 >= pair[1].1);
            }
            prop_assert_eq!(
                ranking.counters.length_counts().get(&length).copied(),
                Some(cohort.len() as u32)
            );
        }
    }

    /// The order of the word list does not change the ranking.
    #[test]
    fn ranking_ignores_input_order(words in vec("[A-F]{2,5}", 1..50)) {
        let english = LetterDistribution::english();
        let aggregator = Aggregator::new(&english);

        let forward = aggregator
            .aggregate_reader(word_list(&words).as_bytes())
            .expect("aggregate");
        let mut reversed_words = words.clone();
        reversed_words.reverse();
        let backward = aggregator
            .aggregate_reader(word_list(&reversed_words).as_bytes())
            .expect("aggregate");

        let summarize = |classes: BTreeMap<String, AlphagramClass>| -> Vec<(String, u32)> {
            rank(classes.into_values(), &english)
                .alphagrams
                .into_iter()
                .map(|ranked| (ranked.class.alphagram, ranked.probability))
                .collect()
        };
        prop_assert_eq!(summarize(forward.classes), summarize(backward.classes));
    }

    /// Blank substitutions only add arrangements.
    #[test]
    fn normalized_count_dominates(word in "[A-Z]{1,8}") {
        let english = LetterDistribution::english();
        let alphagram = english.canonicalize(&word);
        prop_assert!(
            english.count_arrangements(&alphagram, true)
                >= english.count_arrangements(&alphagram, false)
        );
    }

    /// Lengths past the ranked range never consume a rank.
    #[test]
    fn long_lengths_are_unranked(length in 16usize..40) {
        let mut counters = ProbabilityCounters::new();
        prop_assert_eq!(counters.next_rank(length), None);
        prop_assert!(counters.length_counts().is_empty());
    }
}

//! # Build Driver
//!
//! Compiles one lexicon edition into a fresh dataset.
//!
//! 1. resolve the prior edition and the siblings' latest editions
//! 2. aggregate the word list into alphagram classes
//! 3. rank the classes and annotate every word
//! 4. write alphagrams and words in one transaction
//! 5. write the words deleted since the prior edition in a second one
//! 6. stamp the current version
//!
//! A dataset without a version stamp is an incomplete build.

use crate::aggregator::{Aggregation, Aggregator};
use crate::deletions::detect_deletions;
use crate::difficulty::DifficultyTable;
use crate::engine::{Dictionary, HookSide, sorted_hooks};
use crate::provenance::{AlphagramFlags, ProvenanceSources};
use crate::ranker::rank;
use crate::registry::LexiconRegistry;
use crate::storage::Dataset;
use crate::wordlist::WordList;
use crate::{AlphagramRow, LexdbError, WordRow, primitives};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Where and how to write a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub output_dir: PathBuf,
    /// Replace an existing dataset instead of refusing.
    pub overwrite: bool,
}

/// Summary of a completed build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub lexicon: String,
    pub dataset: PathBuf,
    pub alphagrams: usize,
    pub words: usize,
    pub deleted_words: usize,
    /// Ranked alphagrams per length.
    pub length_counts: BTreeMap<u32, u32>,
}

/// Path of the dataset of `lexicon` inside `dir`.
#[must_use]
pub fn dataset_path(dir: &Path, lexicon: &str) -> PathBuf {
    dir.join(format!("{}.{}", lexicon, primitives::DATASET_EXTENSION))
}

/// Build the dataset of lexicon `name`.
pub fn build_dataset(
    registry: &LexiconRegistry,
    name: &str,
    options: &BuildOptions,
) -> Result<BuildReport, LexdbError> {
    let spec = registry.lexicon(name)?;
    let path = dataset_path(&options.output_dir, name);
    if path.exists() && !options.overwrite {
        return Err(LexdbError::DatasetExists(path));
    }
    tracing::info!("Creating lexicon dataset for {}", name);

    let distribution = registry.distribution(&spec.distribution)?;
    let difficulties = match &spec.difficulties {
        Some(difficulty_path) => DifficultyTable::load(difficulty_path)?,
        None => DifficultyTable::new(),
    };
    let sources = ProvenanceSources::resolve(registry, spec)?;

    let Aggregation {
        classes,
        definitions,
    } = Aggregator::new(&distribution).aggregate_path(&spec.word_list)?;
    let dictionary: WordList = definitions.keys().map(String::as_str).collect();

    tracing::debug!("Sorting by probability");
    let ranking = rank(classes.into_values(), &distribution);

    let context = sources.context();
    let mut alphagram_rows = Vec::with_capacity(ranking.alphagrams.len());
    let mut word_rows = Vec::with_capacity(dictionary.len());
    for (idx, ranked) in ranking.alphagrams.iter().enumerate() {
        if idx % primitives::PROGRESS_INTERVAL == 0 {
            tracing::debug!("{}...", idx);
        }
        let alphagram = &ranked.class.alphagram;
        let mut flags = AlphagramFlags::default();
        for word in &ranked.class.words {
            let lexicon_symbols = context.symbols(word);
            flags.absorb(&lexicon_symbols, &sources.exclusive_markers);
            word_rows.push(WordRow {
                word: word.clone(),
                alphagram: alphagram.clone(),
                lexicon_symbols,
                definition: definitions.get(word).cloned().unwrap_or_default(),
                front_hooks: sorted_hooks(&distribution, &dictionary.front_hooks(word)),
                back_hooks: sorted_hooks(&distribution, &dictionary.back_hooks(word)),
                inner_front_hook: dictionary.has_inner_hook(word, HookSide::Front),
                inner_back_hook: dictionary.has_inner_hook(word, HookSide::Back),
            });
        }
        alphagram_rows.push(AlphagramRow {
            probability: ranked.probability,
            alphagram: alphagram.clone(),
            length: ranked.length,
            combinations: ranked.class.combinations,
            num_anagrams: Some(ranked.class.words.len() as u32),
            point_value: Some(ranked.point_value),
            num_vowels: Some(ranked.num_vowels),
            contains_word_uniq_to_lex_split: Some(flags.uniq_to_lex_split),
            contains_update_to_lex: Some(flags.update_to_lex),
            difficulty: difficulties.get(alphagram),
        });
    }

    std::fs::create_dir_all(&options.output_dir)
        .map_err(|e| LexdbError::IoError(e.to_string()))?;
    let dataset = Dataset::create(&path, options.overwrite)?;
    dataset.write_lexicon(&alphagram_rows, &word_rows)?;

    let deleted = match &sources.prior {
        Some(prior) => {
            let deleted = detect_deletions(prior.dictionary.iter(), &dictionary);
            tracing::info!("{} words of {} were deleted", deleted.len(), prior.spec.name);
            deleted
        }
        None => Vec::new(),
    };
    if !deleted.is_empty() {
        dataset.write_deleted_words(&deleted)?;
    }

    dataset.stamp_version(primitives::CURRENT_VERSION)?;

    Ok(BuildReport {
        lexicon: name.to_string(),
        dataset: path,
        alphagrams: alphagram_rows.len(),
        words: word_rows.len(),
        deleted_words: deleted.len(),
        length_counts: ranking.counters.length_counts(),
    })
}

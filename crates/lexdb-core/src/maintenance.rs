//! # Maintenance
//!
//! In-place repairs of an already built dataset. Row identities never change;
//! each operation runs in a single write transaction.

use crate::aggregator::read_definitions;
use crate::provenance::{AlphagramFlags, ProvenanceSources};
use crate::registry::LexiconRegistry;
use crate::storage::{AlphagramTables, Dataset, WordTables};
use crate::{LexdbError, primitives};
use std::collections::BTreeMap;
use std::path::Path;

/// Rewrite word definitions from the lexicon's word list.
///
/// Only words already in the dataset are touched. Returns the number of
/// definitions that changed.
pub fn fix_definitions(
    registry: &LexiconRegistry,
    lexicon: &str,
    db_path: &Path,
) -> Result<usize, LexdbError> {
    let spec = registry.lexicon(lexicon)?;
    let dataset = Dataset::open(db_path)?;
    let definitions = read_definitions(&spec.word_list)?;

    let changed = dataset.transaction(|txn| {
        let mut words = WordTables::open(txn)?;
        let mut changed = 0usize;
        for (word, definition) in &definitions {
            let Some(mut row) = words.get(word)? else {
                continue;
            };
            if row.definition == *definition {
                continue;
            }
            row.definition.clone_from(definition);
            words.update(&row)?;
            changed += 1;
        }
        Ok(changed)
    })?;
    tracing::info!("Updated {} definitions in {}", changed, db_path.display());
    Ok(changed)
}

/// Recompute every word's provenance symbols and every alphagram's flags.
///
/// The flags are only written when the dataset has the provenance columns.
/// Returns the number of words whose symbols changed.
pub fn fix_lexicon_symbols(
    registry: &LexiconRegistry,
    lexicon: &str,
    db_path: &Path,
) -> Result<usize, LexdbError> {
    let spec = registry.lexicon(lexicon)?;
    let dataset = Dataset::open(db_path)?;
    let sources = ProvenanceSources::resolve(registry, spec)?;
    let context = sources.context();
    let has_flags = dataset.has_object("alphagrams.contains_update_to_lex")?;
    if !has_flags {
        tracing::warn!("Dataset predates provenance flags; only word symbols are fixed");
    }

    let changed = dataset.transaction(|txn| {
        let mut words = WordTables::open(txn)?;
        let mut flags: BTreeMap<String, AlphagramFlags> = BTreeMap::new();
        let mut changed = 0usize;
        for (idx, mut row) in words.all()?.into_iter().enumerate() {
            if idx > 0 && idx % primitives::PROGRESS_INTERVAL == 0 {
                tracing::debug!("{}...", idx);
            }
            let symbols = context.symbols(&row.word);
            flags
                .entry(row.alphagram.clone())
                .or_default()
                .absorb(&symbols, &sources.exclusive_markers);
            if row.lexicon_symbols != symbols {
                row.lexicon_symbols = symbols;
                words.update(&row)?;
                changed += 1;
            }
        }
        drop(words);

        if has_flags {
            let mut alphagrams = AlphagramTables::open(txn)?;
            for (alphagram, flag) in &flags {
                let Some(mut row) = alphagrams.get(alphagram)? else {
                    continue;
                };
                row.contains_word_uniq_to_lex_split = Some(flag.uniq_to_lex_split);
                row.contains_update_to_lex = Some(flag.update_to_lex);
                alphagrams.update(&row)?;
            }
        }
        Ok(changed)
    })?;
    tracing::info!("Fixed symbols of {} words in {}", changed, db_path.display());
    Ok(changed)
}

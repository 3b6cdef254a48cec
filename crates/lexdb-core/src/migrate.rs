//! # Schema Migrator
//!
//! Advances an existing dataset toward [`CURRENT_VERSION`], one version per
//! call to [`Migrator::step`].
//!
//! ```text
//! (no version table) ─bootstrap─► 1 ─► 2 ─► 3 ─► 4 ─► 5 ─► 6 (terminal)
//! ```
//!
//! A dataset without a version table is a first-generation dataset: the
//! version table is created at 1 and the 1→2 transition runs in the same
//! call. A version table without a row is an unrecoverable inconsistency.
//!
//! Each transition runs its DDL and backfill in one write transaction; the
//! new version is stamped in a second one after that commits.
//!
//! [`CURRENT_VERSION`]: crate::primitives::CURRENT_VERSION

use crate::distribution::LetterDistribution;
use crate::provenance::AlphagramFlags;
use crate::registry::LexiconRegistry;
use crate::storage::{self, AlphagramTables, Dataset, StoredVersion, WordTables};
use crate::{DifficultyTable, LexdbError, primitives};
use redb::WriteTransaction;
use std::collections::BTreeMap;

// =============================================================================
// TRANSITIONS
// =============================================================================

/// One schema transition, named by the version it reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Transition {
    /// Anagram count, point value and vowel count.
    ToV2,
    /// Length index.
    ToV3,
    /// Provenance flags.
    ToV4,
    /// Difficulty.
    ToV5,
    /// Deleted words table.
    ToV6,
}

impl Transition {
    /// The transition that starts at `version`, if any.
    #[must_use]
    pub const fn from_version(version: u32) -> Option<Self> {
        match version {
            1 => Some(Self::ToV2),
            2 => Some(Self::ToV3),
            3 => Some(Self::ToV4),
            4 => Some(Self::ToV5),
            5 => Some(Self::ToV6),
            _ => None,
        }
    }

    /// Version reached after this transition.
    #[must_use]
    pub const fn target(self) -> u32 {
        match self {
            Self::ToV2 => 2,
            Self::ToV3 => 3,
            Self::ToV4 => 4,
            Self::ToV5 => 5,
            Self::ToV6 => 6,
        }
    }

    fn apply(self, txn: &WriteTransaction, context: &MigrationContext) -> Result<(), LexdbError> {
        match self {
            Self::ToV2 => {
                storage::add_anagram_stat_columns(txn)?;
                backfill_anagram_stats(txn, &context.distribution)
            }
            Self::ToV3 => storage::add_length_index(txn),
            Self::ToV4 => {
                storage::add_provenance_columns(txn)?;
                tracing::info!("Created provenance columns and indices");
                backfill_provenance_flags(txn, &context.exclusive_markers)
            }
            Self::ToV5 => {
                storage::add_difficulty_column(txn)?;
                tracing::info!("Created difficulty column and index");
                backfill_difficulty(txn, &context.difficulties)
            }
            Self::ToV6 => {
                storage::add_deleted_words_table(txn)?;
                tracing::info!("Created deletedwords table");
                Ok(())
            }
        }
    }
}

// =============================================================================
// BACKFILLS
// =============================================================================

/// Word count per alphagram, over words whose alphagram has a row.
fn backfill_anagram_stats(
    txn: &WriteTransaction,
    distribution: &LetterDistribution,
) -> Result<(), LexdbError> {
    let mut word_counts: BTreeMap<String, u32> = BTreeMap::new();
    for word in WordTables::open(txn)?.all()? {
        *word_counts.entry(word.alphagram).or_insert(0) += 1;
    }

    let mut alphagrams = AlphagramTables::open(txn)?;
    let mut updated = 0usize;
    for mut row in alphagrams.all()? {
        let Some(&count) = word_counts.get(&row.alphagram) else {
            continue;
        };
        row.num_anagrams = Some(count);
        row.point_value = Some(distribution.point_value(&row.alphagram));
        row.num_vowels = Some(distribution.num_vowels(&row.alphagram));
        alphagrams.update(&row)?;

        updated += 1;
        if updated % primitives::PROGRESS_INTERVAL == 0 {
            tracing::debug!("{}...", updated);
        }
    }
    tracing::info!("Backfilled anagram statistics of {} alphagrams", updated);
    Ok(())
}

/// Fold the stored symbol strings of each alphagram's words into its flags.
fn backfill_provenance_flags(
    txn: &WriteTransaction,
    exclusive_markers: &[String],
) -> Result<(), LexdbError> {
    let mut flags: BTreeMap<String, AlphagramFlags> = BTreeMap::new();
    for word in WordTables::open(txn)?.all()? {
        flags
            .entry(word.alphagram)
            .or_default()
            .absorb(&word.lexicon_symbols, exclusive_markers);
    }

    let mut alphagrams = AlphagramTables::open(txn)?;
    let mut updated = 0usize;
    for (alphagram, flag) in &flags {
        let Some(mut row) = alphagrams.get(alphagram)? else {
            continue;
        };
        row.contains_word_uniq_to_lex_split = Some(flag.uniq_to_lex_split);
        row.contains_update_to_lex = Some(flag.update_to_lex);
        alphagrams.update(&row)?;

        updated += 1;
        if updated % primitives::PROGRESS_INTERVAL == 0 {
            tracing::debug!("{}...", updated);
        }
    }
    tracing::info!("Backfilled provenance flags of {} alphagrams", updated);
    Ok(())
}

fn backfill_difficulty(
    txn: &WriteTransaction,
    difficulties: &DifficultyTable,
) -> Result<(), LexdbError> {
    if difficulties.is_empty() {
        tracing::info!("No difficulty table, leaving difficulty unset");
        return Ok(());
    }
    let mut alphagrams = AlphagramTables::open(txn)?;
    let mut updated = 0usize;
    for mut row in alphagrams.all()? {
        let Some(score) = difficulties.get(&row.alphagram) else {
            continue;
        };
        row.difficulty = Some(score);
        alphagrams.update(&row)?;
        updated += 1;
    }
    tracing::info!("Backfilled difficulty of {} alphagrams", updated);
    Ok(())
}

// =============================================================================
// MIGRATOR
// =============================================================================

/// Lexicon data the backfills need.
#[derive(Debug, Clone)]
pub struct MigrationContext {
    pub distribution: LetterDistribution,
    pub difficulties: DifficultyTable,
    /// Every family's exclusivity marker.
    pub exclusive_markers: Vec<String>,
}

impl MigrationContext {
    /// Gather the context of lexicon `name` from the registry.
    pub fn resolve(registry: &LexiconRegistry, name: &str) -> Result<Self, LexdbError> {
        let spec = registry.lexicon(name)?;
        let difficulties = match &spec.difficulties {
            Some(path) => DifficultyTable::load(path)?,
            None => DifficultyTable::new(),
        };
        Ok(Self {
            distribution: registry.distribution(&spec.distribution)?,
            difficulties,
            exclusive_markers: registry.exclusive_markers(),
        })
    }
}

/// Result of one [`Migrator::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Already at the current version; nothing changed.
    UpToDate { version: u32 },
    /// One transition was applied.
    Advanced {
        from: u32,
        to: u32,
        /// The version table was created during this step.
        bootstrapped: bool,
    },
}

/// Drives the version state machine of one dataset.
#[derive(Debug)]
pub struct Migrator<'d> {
    dataset: &'d Dataset,
    context: MigrationContext,
}

impl<'d> Migrator<'d> {
    #[must_use]
    pub fn new(dataset: &'d Dataset, context: MigrationContext) -> Self {
        Self { dataset, context }
    }

    /// Apply at most one transition.
    pub fn step(&self) -> Result<MigrationOutcome, LexdbError> {
        let (version, bootstrapped) = match self.dataset.stored_version()? {
            StoredVersion::Missing => {
                tracing::info!("No version table, creating one...");
                self.dataset.bootstrap_version_table()?;
                (primitives::FIRST_VERSION, true)
            }
            StoredVersion::Empty => return Err(LexdbError::EmptyVersionTable),
            StoredVersion::Present(version) => (version, false),
        };

        if version == primitives::CURRENT_VERSION {
            tracing::info!("DB version is up to date (version {})", version);
            return Ok(MigrationOutcome::UpToDate { version });
        }

        let transition =
            Transition::from_version(version).ok_or(LexdbError::UnknownVersion(version))?;
        let target = transition.target();
        tracing::info!("Version of this dataset is {}, moving to {}", version, target);

        self.dataset
            .transaction(|txn| transition.apply(txn, &self.context))?;
        self.dataset.stamp_version(target)?;

        if target < primitives::CURRENT_VERSION {
            tracing::info!("Run again to migrate to version {}", target + 1);
        }
        Ok(MigrationOutcome::Advanced {
            from: version,
            to: target,
            bootstrapped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AlphagramIndex, AlphagramRow, WordRow};
    use tempfile::TempDir;

    fn context() -> MigrationContext {
        let mut difficulties = DifficultyTable::new();
        difficulties.insert("AQT", 7);
        MigrationContext {
            distribution: LetterDistribution::english(),
            difficulties,
            exclusive_markers: vec!["#".to_string(), "$".to_string()],
        }
    }

    fn word(word: &str, alphagram: &str, symbols: &str) -> WordRow {
        WordRow {
            word: word.to_string(),
            alphagram: alphagram.to_string(),
            lexicon_symbols: symbols.to_string(),
            definition: String::new(),
            front_hooks: String::new(),
            back_hooks: String::new(),
            inner_front_hook: false,
            inner_back_hook: false,
        }
    }

    fn legacy_dataset(dir: &TempDir) -> Dataset {
        let dataset = Dataset::create_legacy(dir.path().join("OLD.db")).expect("create");
        dataset
            .write_lexicon(
                &[
                    AlphagramRow::legacy("AQT", 1, 4),
                    AlphagramRow::legacy("AXZ", 2, 2),
                    AlphagramRow::legacy("EIQSU", 1, 12),
                ],
                &[word("QAT", "AQT", ""), word("ZAX", "AXZ", "+#")],
            )
            .expect("write");
        dataset
    }

    #[test]
    fn transitions_cover_every_version_once() {
        for version in primitives::FIRST_VERSION..primitives::CURRENT_VERSION {
            let transition = Transition::from_version(version).expect("transition");
            assert_eq!(transition.target(), version + 1);
        }
        assert!(Transition::from_version(primitives::CURRENT_VERSION).is_none());
        assert!(Transition::from_version(0).is_none());
    }

    #[test]
    fn bootstrap_then_one_step_per_call() {
        let dir = TempDir::new().expect("create temp dir");
        let dataset = legacy_dataset(&dir);
        let migrator = Migrator::new(&dataset, context());

        assert_eq!(
            migrator.step().expect("step"),
            MigrationOutcome::Advanced {
                from: 1,
                to: 2,
                bootstrapped: true
            }
        );
        assert_eq!(
            dataset.stored_version().expect("version"),
            StoredVersion::Present(2)
        );

        for expected in 3..=primitives::CURRENT_VERSION {
            let outcome = migrator.step().expect("step");
            assert_eq!(
                outcome,
                MigrationOutcome::Advanced {
                    from: expected - 1,
                    to: expected,
                    bootstrapped: false
                }
            );
        }
        assert_eq!(
            migrator.step().expect("step"),
            MigrationOutcome::UpToDate {
                version: primitives::CURRENT_VERSION
            }
        );
    }

    #[test]
    fn anagram_stats_backfill_uses_joined_words() {
        let dir = TempDir::new().expect("create temp dir");
        let dataset = legacy_dataset(&dir);
        Migrator::new(&dataset, context()).step().expect("step");

        let qat = dataset.alphagram("AQT").expect("read").expect("row");
        assert_eq!(qat.num_anagrams, Some(1));
        assert_eq!(qat.point_value, Some(12));
        assert_eq!(qat.num_vowels, Some(1));

        // No word rows reference EIQSU.
        let orphan = dataset.alphagram("EIQSU").expect("read").expect("row");
        assert_eq!(orphan.num_anagrams, None);

        let by_points = dataset
            .alphagrams_by_index(AlphagramIndex::PointValue, 12)
            .expect("index");
        assert_eq!(by_points.len(), 1);
    }

    #[test]
    fn provenance_and_difficulty_backfills() {
        let dir = TempDir::new().expect("create temp dir");
        let dataset = legacy_dataset(&dir);
        let migrator = Migrator::new(&dataset, context());
        for _ in 0..4 {
            migrator.step().expect("step");
        }
        assert_eq!(
            dataset.stored_version().expect("version"),
            StoredVersion::Present(5)
        );

        let zax = dataset.alphagram("AXZ").expect("read").expect("row");
        assert_eq!(zax.contains_update_to_lex, Some(true));
        assert_eq!(zax.contains_word_uniq_to_lex_split, Some(true));
        let qat = dataset.alphagram("AQT").expect("read").expect("row");
        assert_eq!(qat.contains_update_to_lex, Some(false));
        assert_eq!(qat.difficulty, Some(7));
        assert_eq!(zax.difficulty, None);

        let updated = dataset
            .alphagrams_by_index(AlphagramIndex::UpdateToLex, 1)
            .expect("index");
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].alphagram, "AXZ");
    }

    #[test]
    fn current_dataset_is_a_no_op() {
        let dir = TempDir::new().expect("create temp dir");
        let dataset = Dataset::create(dir.path().join("NEW.db"), false).expect("create");
        dataset
            .stamp_version(primitives::CURRENT_VERSION)
            .expect("stamp");
        let outcome = Migrator::new(&dataset, context()).step().expect("step");
        assert_eq!(
            outcome,
            MigrationOutcome::UpToDate {
                version: primitives::CURRENT_VERSION
            }
        );
    }

    #[test]
    fn empty_version_table_is_fatal() {
        let dir = TempDir::new().expect("create temp dir");
        let dataset = Dataset::create(dir.path().join("NEW.db"), false).expect("create");
        let result = Migrator::new(&dataset, context()).step();
        assert!(matches!(result, Err(LexdbError::EmptyVersionTable)));
    }

    #[test]
    fn unknown_version_is_fatal() {
        let dir = TempDir::new().expect("create temp dir");
        let dataset = Dataset::create(dir.path().join("NEW.db"), false).expect("create");
        dataset.stamp_version(42).expect("stamp");
        let result = Migrator::new(&dataset, context()).step();
        assert!(matches!(result, Err(LexdbError::UnknownVersion(42))));
    }

    #[test]
    fn reapplying_a_transition_conflicts_and_leaves_version() {
        let dir = TempDir::new().expect("create temp dir");
        let dataset = Dataset::create(dir.path().join("NEW.db"), false).expect("create");
        // Lie about the version: the v2 columns already exist.
        dataset.stamp_version(1).expect("stamp");
        let result = Migrator::new(&dataset, context()).step();
        assert!(matches!(result, Err(LexdbError::SchemaConflict(_))));
        assert_eq!(
            dataset.stored_version().expect("version"),
            StoredVersion::Present(1)
        );
    }
}

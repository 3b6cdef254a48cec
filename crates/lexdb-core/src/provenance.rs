//! # Provenance Annotator
//!
//! Computes the symbol string of a word and the two per-alphagram flags.
//!
//! Markers are tested in a fixed order:
//! 1. the update marker `+`, when a prior edition exists and lacks the word
//! 2. the current family's marker, once per sibling family whose latest
//!    edition lacks the word
//!
//! A marker is appended at most once.

use crate::engine::Dictionary;
use crate::registry::{Lexicon, LexiconRegistry, LexiconSpec};
use crate::{LexdbError, primitives};

/// One exclusivity test: stamp `marker` if `sibling_latest` lacks the word.
#[derive(Debug)]
pub struct ExclusivityCheck<'a, D: Dictionary + ?Sized> {
    pub marker: &'a str,
    pub sibling_latest: &'a D,
}

/// Dictionaries the symbols of one lexicon are computed against.
#[derive(Debug)]
pub struct ProvenanceContext<'a, D: Dictionary + ?Sized> {
    /// The immediately prior edition in the same family.
    pub prior: Option<&'a D>,
    pub exclusivity: Vec<ExclusivityCheck<'a, D>>,
}

impl<D: Dictionary + ?Sized> ProvenanceContext<'_, D> {
    /// Compute the symbol string of `word`.
    #[must_use]
    pub fn symbols(&self, word: &str) -> String {
        let mut symbols = String::new();
        if let Some(prior) = self.prior {
            if !prior.is_member(word) {
                push_marker(&mut symbols, primitives::UPDATE_MARKER);
            }
        }
        for check in &self.exclusivity {
            if !check.sibling_latest.is_member(word) {
                push_marker(&mut symbols, check.marker);
            }
        }
        symbols
    }
}

fn push_marker(symbols: &mut String, marker: &str) {
    if !symbols.contains(marker) {
        symbols.push_str(marker);
    }
}

// =============================================================================
// ALPHAGRAM FLAGS
// =============================================================================

/// Per-alphagram aggregates of the member words' symbols.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlphagramFlags {
    /// Some member carries any family's exclusivity marker.
    pub uniq_to_lex_split: bool,
    /// Some member carries the update marker.
    pub update_to_lex: bool,
}

impl AlphagramFlags {
    /// Fold the symbol strings of one alphagram's words.
    pub fn from_symbols<I, S>(symbols: I, exclusive_markers: &[String]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = Self::default();
        for symbol in symbols {
            flags.absorb(symbol.as_ref(), exclusive_markers);
        }
        flags
    }

    /// Fold one more word's symbol string into the flags.
    pub fn absorb(&mut self, symbols: &str, exclusive_markers: &[String]) {
        if exclusive_markers
            .iter()
            .any(|marker| symbols.contains(marker.as_str()))
        {
            self.uniq_to_lex_split = true;
        }
        if symbols.contains(primitives::UPDATE_MARKER) {
            self.update_to_lex = true;
        }
    }
}

// =============================================================================
// PROVENANCE SOURCES
// =============================================================================

/// The loaded dictionaries a lexicon's provenance depends on.
#[derive(Debug, Clone)]
pub struct ProvenanceSources {
    pub prior: Option<Lexicon>,
    /// `(marker, latest edition of a sibling family)`.
    pub siblings: Vec<(String, Lexicon)>,
    /// Markers of every family, for the alphagram flags.
    pub exclusive_markers: Vec<String>,
}

impl ProvenanceSources {
    /// Resolve and load the prior edition and the siblings' latest editions.
    ///
    /// A missing prior edition is expected and only logged.
    pub fn resolve(registry: &LexiconRegistry, spec: &LexiconSpec) -> Result<Self, LexdbError> {
        let family = registry.family(&spec.family)?;

        let prior = match registry.prior_edition(&spec.family, &spec.name)? {
            Some(prior_spec) => {
                tracing::info!("Prior edition of {} is {}", spec.name, prior_spec.name);
                Some(Lexicon::open(prior_spec)?)
            }
            None => {
                tracing::info!(
                    "No prior edition of {} in family {}, skipping update markers",
                    spec.name,
                    spec.family
                );
                None
            }
        };

        let mut siblings = Vec::with_capacity(family.siblings.len());
        for sibling in &family.siblings {
            let latest = registry.latest_in_family(sibling).ok_or_else(|| {
                LexdbError::InvalidConfig(format!("family {} has no lexicons", sibling))
            })?;
            siblings.push((family.marker.clone(), Lexicon::open(latest)?));
        }

        Ok(Self {
            prior,
            siblings,
            exclusive_markers: registry.exclusive_markers(),
        })
    }

    /// Borrow the loaded dictionaries as a context.
    #[must_use]
    pub fn context(&self) -> ProvenanceContext<'_, crate::WordList> {
        ProvenanceContext {
            prior: self.prior.as_ref().map(|lexicon| &lexicon.dictionary),
            exclusivity: self
                .siblings
                .iter()
                .map(|(marker, lexicon)| ExclusivityCheck {
                    marker: marker.as_str(),
                    sibling_latest: &lexicon.dictionary,
                })
                .collect(),
        }
    }
}

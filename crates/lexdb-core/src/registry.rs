//! # Lexicon Registry
//!
//! The lexica this tool knows about, grouped into families.
//!
//! A family is a line of successive editions that share provenance
//! semantics. Each family names the marker it stamps on words missing from
//! its sibling families' latest editions, so adding a family is a
//! configuration change, not a code change.
//!
//! Within a family, editions are totally ordered by `edition`. That order
//! resolves the prior edition of a lexicon and the latest edition of a
//! family.
//!
//! The registry is plain data (`serde::Deserialize`); the binary loads it
//! from TOML.

use crate::distribution::LetterDistribution;
use crate::wordlist::WordList;
use crate::{LexdbError, primitives};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

fn default_distribution() -> String {
    primitives::DEFAULT_DISTRIBUTION.to_string()
}

/// Provenance semantics of one lexicon family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilySpec {
    /// Marker for words of this family absent from a sibling's latest edition.
    pub marker: String,
    /// Families compared against when computing exclusivity.
    #[serde(default)]
    pub siblings: Vec<String>,
}

/// One lexicon edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconSpec {
    pub name: String,
    pub family: String,
    /// Order key within the family; larger is newer.
    pub edition: u32,
    pub word_list: PathBuf,
    #[serde(default)]
    pub difficulties: Option<PathBuf>,
    #[serde(default = "default_distribution")]
    pub distribution: String,
}

/// Families, custom distributions and lexicons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconRegistry {
    #[serde(default)]
    pub families: BTreeMap<String, FamilySpec>,
    #[serde(default)]
    pub distributions: BTreeMap<String, LetterDistribution>,
    #[serde(default)]
    pub lexicons: Vec<LexiconSpec>,
}

impl LexiconRegistry {
    /// Check cross references and marker uniqueness.
    pub fn validate(&self) -> Result<(), LexdbError> {
        let mut markers = BTreeSet::new();
        for (id, family) in &self.families {
            if family.marker.is_empty() {
                return Err(LexdbError::InvalidConfig(format!(
                    "family {} has an empty marker",
                    id
                )));
            }
            if family.marker.contains(primitives::UPDATE_MARKER) {
                return Err(LexdbError::InvalidConfig(format!(
                    "family {} marker {:?} collides with the update marker",
                    id, family.marker
                )));
            }
            if !markers.insert(family.marker.as_str()) {
                return Err(LexdbError::InvalidConfig(format!(
                    "marker {:?} is used by more than one family",
                    family.marker
                )));
            }
            for sibling in &family.siblings {
                if sibling == id || !self.families.contains_key(sibling) {
                    return Err(LexdbError::InvalidConfig(format!(
                        "family {} lists invalid sibling {}",
                        id, sibling
                    )));
                }
            }
        }

        let mut names = BTreeSet::new();
        for lexicon in &self.lexicons {
            if !names.insert(lexicon.name.as_str()) {
                return Err(LexdbError::InvalidConfig(format!(
                    "lexicon {} is defined more than once",
                    lexicon.name
                )));
            }
            if !self.families.contains_key(&lexicon.family) {
                return Err(LexdbError::UnknownFamily(lexicon.family.clone()));
            }
            self.distribution(&lexicon.distribution)?;
        }

        for distribution in self.distributions.values() {
            distribution.validate()?;
        }
        Ok(())
    }

    /// Resolve relative word-list and difficulty paths against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for lexicon in &mut self.lexicons {
            if lexicon.word_list.is_relative() {
                lexicon.word_list = base.join(&lexicon.word_list);
            }
            if let Some(path) = lexicon.difficulties.as_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
    }

    /// Look up a lexicon by name.
    pub fn lexicon(&self, name: &str) -> Result<&LexiconSpec, LexdbError> {
        self.lexicons
            .iter()
            .find(|lexicon| lexicon.name == name)
            .ok_or_else(|| LexdbError::UnknownLexicon(name.to_string()))
    }

    /// Family identifier of a lexicon.
    pub fn family_of(&self, name: &str) -> Result<&str, LexdbError> {
        Ok(self.lexicon(name)?.family.as_str())
    }

    /// Look up a family by identifier.
    pub fn family(&self, id: &str) -> Result<&FamilySpec, LexdbError> {
        self.families
            .get(id)
            .ok_or_else(|| LexdbError::UnknownFamily(id.to_string()))
    }

    /// The edition immediately before `name` in `family`, if any.
    pub fn prior_edition(
        &self,
        family: &str,
        name: &str,
    ) -> Result<Option<&LexiconSpec>, LexdbError> {
        let current = self.lexicon(name)?;
        if current.family != family {
            return Err(LexdbError::InvalidConfig(format!(
                "lexicon {} is not in family {}",
                name, family
            )));
        }
        Ok(self
            .lexicons
            .iter()
            .filter(|lexicon| lexicon.family == family && lexicon.edition < current.edition)
            .max_by_key(|lexicon| lexicon.edition))
    }

    /// The newest edition of `family`, if it has any.
    #[must_use]
    pub fn latest_in_family(&self, family: &str) -> Option<&LexiconSpec> {
        self.lexicons
            .iter()
            .filter(|lexicon| lexicon.family == family)
            .max_by_key(|lexicon| lexicon.edition)
    }

    /// A configured distribution, falling back to the built-in ones.
    pub fn distribution(&self, name: &str) -> Result<LetterDistribution, LexdbError> {
        self.distributions
            .get(name)
            .cloned()
            .or_else(|| LetterDistribution::builtin(name))
            .ok_or_else(|| LexdbError::UnknownDistribution(name.to_string()))
    }

    /// Every family's exclusivity marker.
    #[must_use]
    pub fn exclusive_markers(&self) -> Vec<String> {
        self.families
            .values()
            .map(|family| family.marker.clone())
            .collect()
    }
}

// =============================================================================
// LOADED LEXICON
// =============================================================================

/// A lexicon edition with its dictionary in memory.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub spec: LexiconSpec,
    pub dictionary: WordList,
}

impl Lexicon {
    /// Load the edition's word list.
    pub fn open(spec: &LexiconSpec) -> Result<Self, LexdbError> {
        tracing::debug!("Loading dictionary for {}", spec.name);
        let dictionary = WordList::from_path(&spec.word_list)?;
        Ok(Self {
            spec: spec.clone(),
            dictionary,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn lexicon(name: &str, family: &str, edition: u32) -> LexiconSpec {
        LexiconSpec {
            name: name.to_string(),
            family: family.to_string(),
            edition,
            word_list: PathBuf::from(format!("{}.txt", name)),
            difficulties: None,
            distribution: default_distribution(),
        }
    }

    pub(crate) fn two_families() -> LexiconRegistry {
        LexiconRegistry {
            families: BTreeMap::from([
                (
                    "CSW".to_string(),
                    FamilySpec {
                        marker: "#".to_string(),
                        siblings: vec!["TWL".to_string()],
                    },
                ),
                (
                    "TWL".to_string(),
                    FamilySpec {
                        marker: "$".to_string(),
                        siblings: vec!["CSW".to_string()],
                    },
                ),
            ]),
            distributions: BTreeMap::new(),
            lexicons: vec![
                lexicon("CSW15", "CSW", 2015),
                lexicon("CSW19", "CSW", 2019),
                lexicon("TWL06", "TWL", 2006),
                lexicon("NWL18", "TWL", 2018),
            ],
        }
    }

    #[test]
    fn valid_registry_passes() {
        two_families().validate().expect("valid");
    }

    #[test]
    fn prior_edition_is_the_closest_older_one() {
        let registry = two_families();
        let prior = registry.prior_edition("CSW", "CSW19").expect("lookup");
        assert_eq!(prior.map(|l| l.name.as_str()), Some("CSW15"));
        let prior = registry.prior_edition("CSW", "CSW15").expect("lookup");
        assert!(prior.is_none());
    }

    #[test]
    fn prior_edition_requires_matching_family() {
        let registry = two_families();
        assert!(registry.prior_edition("TWL", "CSW19").is_err());
    }

    #[test]
    fn latest_in_family() {
        let registry = two_families();
        assert_eq!(
            registry.latest_in_family("TWL").map(|l| l.name.as_str()),
            Some("NWL18")
        );
        assert!(registry.latest_in_family("FISE").is_none());
    }

    #[test]
    fn unknown_names_are_reported() {
        let registry = two_families();
        assert!(matches!(
            registry.lexicon("OSPD4"),
            Err(LexdbError::UnknownLexicon(_))
        ));
        assert!(matches!(
            registry.family("FISE"),
            Err(LexdbError::UnknownFamily(_))
        ));
        assert!(matches!(
            registry.distribution("klingon"),
            Err(LexdbError::UnknownDistribution(_))
        ));
    }

    #[test]
    fn duplicate_markers_rejected() {
        let mut registry = two_families();
        if let Some(family) = registry.families.get_mut("TWL") {
            family.marker = "#".to_string();
        }
        assert!(matches!(
            registry.validate(),
            Err(LexdbError::InvalidConfig(_))
        ));
    }

    #[test]
    fn update_marker_is_reserved() {
        let mut registry = two_families();
        if let Some(family) = registry.families.get_mut("TWL") {
            family.marker = "+".to_string();
        }
        assert!(registry.validate().is_err());
    }

    #[test]
    fn unknown_sibling_rejected() {
        let mut registry = two_families();
        if let Some(family) = registry.families.get_mut("CSW") {
            family.siblings.push("FISE".to_string());
        }
        assert!(registry.validate().is_err());
    }

    #[test]
    fn paths_resolve_against_base() {
        let mut registry = two_families();
        registry.lexicons[0].difficulties = Some(PathBuf::from("d.txt"));
        registry.resolve_paths(Path::new("/data"));
        assert_eq!(registry.lexicons[0].word_list, PathBuf::from("/data/CSW15.txt"));
        assert_eq!(
            registry.lexicons[0].difficulties,
            Some(PathBuf::from("/data/d.txt"))
        );
    }
}

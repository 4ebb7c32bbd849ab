//! Business vocabularies used to recognise competitor brands and
//! high-intent phrasing inside search terms.
//!
//! Matching is case-insensitive substring containment. Phrases are stored
//! lowercased and trimmed; blank phrases are dropped and duplicates collapse.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A normalised set of phrases.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    phrases: BTreeSet<String>,
}

impl Vocabulary {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = phrases
            .into_iter()
            .map(|p| normalize(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();
        Self { phrases }
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }

    /// True if `term` contains any phrase of this vocabulary.
    pub fn matches(&self, term: &str) -> bool {
        self.first_match(term).is_some()
    }

    /// The longest phrase contained in `term`, ties broken alphabetically.
    ///
    /// Longest-first means "windshield repair" is reported over "repair"
    /// when both occur.
    pub fn first_match(&self, term: &str) -> Option<&str> {
        let haystack = normalize(term);
        self.phrases
            .iter()
            .filter(|p| haystack.contains(p.as_str()))
            .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
            .map(String::as_str)
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(phrases: Vec<String>) -> Self {
        Vocabulary::new(phrases)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(v: Vocabulary) -> Self {
        v.phrases.into_iter().collect()
    }
}

/// The two vocabularies the classifier needs, passed in explicitly per call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabularies {
    pub competitor_brands: Vocabulary,
    pub high_intent: Vocabulary,
}

impl Vocabularies {
    pub fn new(competitor_brands: Vocabulary, high_intent: Vocabulary) -> Self {
        Self {
            competitor_brands,
            high_intent,
        }
    }
}

/// Lowercase and collapse internal whitespace runs to a single space.
fn normalize(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Canonical form of a user-supplied label: trimmed, lowercased.
pub fn label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize a collection of labels into a canonical set, dropping blanks.
pub fn label_set<I, S>(raw: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|s| label(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect()
}

/// At least one normalized element common to both sets.
pub fn overlaps(a: &BTreeSet<String>, b: &BTreeSet<String>) -> bool {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().any(|x| large.contains(x))
}

/// Demographic labels arrive either as a flat list or as a weighted map
/// (label -> audience share). Both collapse to a canonical label set at the
/// model boundary; weights are not used by any filter.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LabelField {
    Flat(Vec<String>),
    Weighted(BTreeMap<String, f64>),
}

impl LabelField {
    pub fn into_labels(self) -> BTreeSet<String> {
        match self {
            LabelField::Flat(labels) => label_set(labels),
            LabelField::Weighted(weighted) => label_set(weighted.into_keys()),
        }
    }
}

impl Default for LabelField {
    fn default() -> Self {
        LabelField::Flat(Vec::new())
    }
}

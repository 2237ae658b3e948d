use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// The changes between two versions of a map.
///
/// Entry `i` of the version log holds the changes that produced archived
/// version `i` from archived version `i - 1` (from an empty map for `i = 0`).
/// The diff queries return the same shape for arbitrary version pairs. The
/// three key sets are pairwise disjoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize, V: Serialize",
    deserialize = "K: Deserialize<'de> + Eq + Hash, V: Deserialize<'de>"
))]
pub struct VersionRecord<K, V> {
    /// Keys absent from the source version, with their target values.
    #[serde(default)]
    pub additions: HashMap<K, V>,
    /// Keys absent from the target version, with their last known values.
    #[serde(default)]
    pub deletions: HashMap<K, V>,
    /// Keys present in both whose value changed, with their target values.
    #[serde(default)]
    pub modifications: HashMap<K, V>,
}

impl<K, V> VersionRecord<K, V> {
    pub fn new() -> Self {
        Self {
            additions: HashMap::new(),
            deletions: HashMap::new(),
            modifications: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.deletions.is_empty() && self.modifications.is_empty()
    }

    /// Number of keys touched by this record
    pub fn len(&self) -> usize {
        self.additions.len() + self.deletions.len() + self.modifications.len()
    }

    pub fn into_parts(self) -> (HashMap<K, V>, HashMap<K, V>, HashMap<K, V>) {
        (self.additions, self.deletions, self.modifications)
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for VersionRecord<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.additions == other.additions
            && self.deletions == other.deletions
            && self.modifications == other.modifications
    }
}

impl<K: Eq + Hash, V: Eq> Eq for VersionRecord<K, V> {}

impl<K, V> Default for VersionRecord<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

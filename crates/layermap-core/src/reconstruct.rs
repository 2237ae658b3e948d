use std::borrow::{Borrow, Cow};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use tracing::{debug, trace};

use crate::map::VersionedMap;
use crate::{Result, VersionError};

/// Key set of one version.
///
/// The current version is a live view over the table's own keys; archived
/// versions are rebuilt into a fresh set that later mutation cannot affect.
#[derive(Debug)]
pub enum VersionKeys<'a, K, V> {
    Live(&'a HashMap<K, V>),
    Archived(HashSet<K>),
}

impl<K: Eq + Hash, V> VersionKeys<'_, K, V> {
    pub fn is_live(&self) -> bool {
        matches!(self, VersionKeys::Live(_))
    }

    pub fn len(&self) -> usize {
        match self {
            VersionKeys::Live(table) => table.len(),
            VersionKeys::Archived(keys) => keys.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self {
            VersionKeys::Live(table) => table.contains_key(key),
            VersionKeys::Archived(keys) => keys.contains(key),
        }
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = &K> + '_> {
        match self {
            VersionKeys::Live(table) => Box::new(table.keys()),
            VersionKeys::Archived(keys) => Box::new(keys.iter()),
        }
    }
}

impl<K: Eq + Hash + Clone, V> VersionKeys<'_, K, V> {
    pub fn into_set(self) -> HashSet<K> {
        match self {
            VersionKeys::Live(table) => table.keys().cloned().collect(),
            VersionKeys::Archived(keys) => keys,
        }
    }
}

impl<K: Eq + Hash, V> PartialEq<HashSet<K>> for VersionKeys<'_, K, V> {
    fn eq(&self, other: &HashSet<K>) -> bool {
        self.len() == other.len() && other.iter().all(|key| self.contains(key))
    }
}

impl<K: Eq + Hash, V> VersionedMap<K, V> {
    /// Keys of `version`, or of the current version when `None`.
    pub fn keys_in_version(&self, version: Option<usize>) -> Result<VersionKeys<'_, K, V>>
    where
        K: Clone,
    {
        match self.archived_version(version)? {
            None => Ok(VersionKeys::Live(&self.current)),
            Some(v) => Ok(VersionKeys::Archived(self.replay_keys(v))),
        }
    }

    /// Value of `key` in `version`, or in the current version when `None`.
    pub fn lookup_value<Q>(&self, key: &Q, version: Option<usize>) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = match self.archived_version(version)? {
            None => self.current.get(key),
            Some(v) => self.archived_value(key, v),
        };
        value.ok_or(VersionError::KeyNotFound)
    }

    /// Resolve `version` to `Some(v)` when it names an archived version, or
    /// `None` for the live one.
    fn archived_version(&self, version: Option<usize>) -> Result<Option<usize>> {
        match version {
            None => Ok(None),
            Some(v) => {
                self.check_version(v)?;
                Ok((v < self.version_number()).then_some(v))
            }
        }
    }

    /// Replay the additions and deletions of records `0..=version`.
    pub(crate) fn replay_keys(&self, version: usize) -> HashSet<K>
    where
        K: Clone,
    {
        let mut keys = HashSet::new();
        for record in &self.log[..=version] {
            keys.extend(record.additions.keys().cloned());
            for key in record.deletions.keys() {
                keys.remove(key);
            }
        }
        keys
    }

    /// Scan records from `version` back to 0 for the latest mention of `key`.
    pub(crate) fn archived_value<Q>(&self, key: &Q, version: usize) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        for record in self.log[..=version].iter().rev() {
            if record.deletions.contains_key(key) {
                return None;
            }
            if let Some(value) = record.additions.get(key) {
                return Some(value);
            }
            if let Some(value) = record.modifications.get(key) {
                return Some(value);
            }
        }
        None
    }
}

impl<K: Eq + Hash + Clone, V: Clone> VersionedMap<K, V> {
    /// Contents of `version`.
    ///
    /// The current version is borrowed from the live table; any older one is
    /// rebuilt into an owned map.
    pub fn lookup_version(&self, version: usize) -> Result<Cow<'_, HashMap<K, V>>> {
        match self.archived_version(Some(version))? {
            None => Ok(Cow::Borrowed(&self.current)),
            Some(v) => Ok(Cow::Owned(self.snapshot(v))),
        }
    }

    pub(crate) fn snapshot(&self, version: usize) -> HashMap<K, V> {
        trace!(version, "reconstructing archived version");
        self.replay_keys(version)
            .into_iter()
            .filter_map(|key| {
                let value = self.archived_value(&key, version)?.clone();
                Some((key, value))
            })
            .collect()
    }

    /// Restore the previous version into the live table and return its
    /// number. The discarded record is not kept for redo.
    pub fn rewind_version(&mut self) -> Result<usize> {
        let Some(previous) = self.version_number().checked_sub(1) else {
            return Err(VersionError::RewindAtZero);
        };
        let restored = self.snapshot(previous);
        self.current.clear();
        self.current.extend(restored);
        self.log.pop();
        debug!(version = previous, keys = self.current.len(), "rewound version");
        Ok(previous)
    }
}

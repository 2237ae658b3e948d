use std::borrow::Borrow;
use std::collections::{hash_map, HashMap};
use std::hash::Hash;
use std::ops::Index;

use crate::record::VersionRecord;
use crate::{Result, VersionError};

/// A map whose current contents are directly mutable and whose earlier
/// versions can be reconstructed, diffed and rewound to.
///
/// Reads and writes through the map methods only touch the current version.
/// [`forward_version`](Self::forward_version) archives the current contents,
/// [`rewind_version`](Self::rewind_version) restores the previous archive.
#[derive(Debug, Clone)]
pub struct VersionedMap<K, V> {
    pub(crate) current: HashMap<K, V>,
    /// Version `v` below the current one is the replay of `log[..=v]`.
    pub(crate) log: Vec<VersionRecord<K, V>>,
}

impl<K, V> VersionedMap<K, V> {
    pub fn new() -> Self {
        Self {
            current: HashMap::new(),
            log: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            current: HashMap::with_capacity(capacity),
            log: Vec::new(),
        }
    }

    /// Number of the current (live) version. Starts at 0.
    pub fn version_number(&self) -> usize {
        self.log.len()
    }

    pub fn version_number_valid(&self, version: usize) -> bool {
        version <= self.version_number()
    }

    pub(crate) fn check_version(&self, version: usize) -> Result<()> {
        if self.version_number_valid(version) {
            Ok(())
        } else {
            Err(VersionError::InvalidVersion {
                requested: version,
                latest: self.version_number(),
            })
        }
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, K, V> {
        self.current.iter()
    }

    pub fn keys(&self) -> hash_map::Keys<'_, K, V> {
        self.current.keys()
    }

    pub fn values(&self) -> hash_map::Values<'_, K, V> {
        self.current.values()
    }

    /// Remove every key from the current version. Archived versions are kept.
    pub fn clear(&mut self) {
        self.current.clear();
    }

    /// The live table of the current version.
    pub fn as_map(&self) -> &HashMap<K, V> {
        &self.current
    }
}

impl<K: Eq + Hash, V> VersionedMap<K, V> {
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.current.get(key)
    }

    /// Mutable access to a live value. Archived copies are unaffected.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.current.get_mut(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.current.contains_key(key)
    }

    /// Set `key` in the current version, returning the previous value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.current.insert(key, value)
    }

    /// Delete `key` from the current version.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.current.remove(key).ok_or(VersionError::KeyNotFound)
    }

    /// Insert every pair into the current version, overwriting existing keys.
    pub fn update<I: IntoIterator<Item = (K, V)>>(&mut self, pairs: I) {
        self.current.extend(pairs);
    }
}

impl<K, V> Default for VersionedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> From<HashMap<K, V>> for VersionedMap<K, V> {
    fn from(current: HashMap<K, V>) -> Self {
        Self {
            current,
            log: Vec::new(),
        }
    }
}

impl<K: Eq + Hash, V, const N: usize> From<[(K, V); N]> for VersionedMap<K, V> {
    fn from(pairs: [(K, V); N]) -> Self {
        Self::from(HashMap::from(pairs))
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for VersionedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<HashMap<K, V>>())
    }
}

impl<K: Eq + Hash, V> Extend<(K, V)> for VersionedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.current.extend(iter);
    }
}

impl<'a, K, V> IntoIterator for &'a VersionedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = hash_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.current.iter()
    }
}

impl<K, Q, V> Index<&Q> for VersionedMap<K, V>
where
    K: Eq + Hash + Borrow<Q>,
    Q: Eq + Hash + ?Sized,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        &self.current[key]
    }
}

/// Compares the current version only.
impl<K: Eq + Hash, V: PartialEq> PartialEq<HashMap<K, V>> for VersionedMap<K, V> {
    fn eq(&self, other: &HashMap<K, V>) -> bool {
        self.current == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_is_version_zero() {
        let map: VersionedMap<String, i32> = VersionedMap::new();
        assert_eq!(map.version_number(), 0);
        assert!(map.is_empty());
        assert!(map.version_number_valid(0));
        assert!(!map.version_number_valid(1));
    }

    #[test]
    fn test_with_capacity_starts_empty() {
        let mut map: VersionedMap<&str, i32> = VersionedMap::with_capacity(16);
        assert!(map.as_map().capacity() >= 16);
        assert!(map.is_empty());
        assert_eq!(map.version_number(), 0);
        map.insert("a", 1);
        assert_eq!(map.forward_version(), 1);
    }

    #[test]
    fn test_current_version_operations() {
        let mut map = VersionedMap::from([("a", 1), ("b", 2)]);
        map.insert("c", 3);
        map.update([("d", 4)]);
        assert_eq!(map.remove("a"), Ok(1));
        assert_eq!(map, HashMap::from([("b", 2), ("c", 3), ("d", 4)]));
        assert_eq!(map.len(), 3);
        assert!(map.contains_key("b"));
        assert!(!map.contains_key("a"));
        assert_eq!(map["c"], 3);
        assert_eq!(map.version_number(), 0);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut map = VersionedMap::from([("a", 1)]);
        assert_eq!(map.insert("a", 5), Some(1));
        assert_eq!(map.get("a"), Some(&5));
    }

    #[test]
    fn test_remove_missing_key() {
        let mut map = VersionedMap::from([("a", 1)]);
        assert_eq!(map.remove("z"), Err(VersionError::KeyNotFound));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_get_mut_and_iteration() {
        let mut map: VersionedMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        *map.get_mut("a").unwrap() += 10;
        let mut pairs: Vec<_> = (&map).into_iter().map(|(k, v)| (*k, *v)).collect();
        pairs.sort();
        assert_eq!(pairs, vec![("a", 11), ("b", 2)]);
        assert_eq!(map.values().sum::<i32>(), 13);
    }

    #[test]
    fn test_check_version() {
        let map: VersionedMap<&str, i32> = VersionedMap::new();
        assert!(map.check_version(0).is_ok());
        assert_eq!(
            map.check_version(2),
            Err(VersionError::InvalidVersion { requested: 2, latest: 0 })
        );
    }
}

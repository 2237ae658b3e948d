use std::hash::Hash;

use tracing::debug;

use crate::map::VersionedMap;
use crate::record::VersionRecord;

impl<K: Eq + Hash + Clone, V: Clone + PartialEq> VersionedMap<K, V> {
    /// Archive the current contents as a new version and return its number.
    ///
    /// Only the difference against the latest archived version is stored.
    /// The live table is left untouched.
    pub fn forward_version(&mut self) -> usize {
        let record = match self.version_number().checked_sub(1) {
            Some(latest) => self.diff_against(latest),
            None => VersionRecord {
                additions: self.current.clone(),
                ..VersionRecord::new()
            },
        };
        debug!(
            version = self.log.len() + 1,
            additions = record.additions.len(),
            deletions = record.deletions.len(),
            modifications = record.modifications.len(),
            "archiving version"
        );
        self.log.push(record);
        self.version_number()
    }

    /// Diff the live table against archived version `latest`.
    ///
    /// All entries are clones, never references into the live table.
    pub(crate) fn diff_against(&self, latest: usize) -> VersionRecord<K, V> {
        let mut record = VersionRecord::new();
        let archived_keys = self.replay_keys(latest);
        for (key, value) in &self.current {
            if !archived_keys.contains(key) {
                record.additions.insert(key.clone(), value.clone());
            }
        }
        for key in archived_keys {
            // Keys replayed from log[..=latest] always carry a value there.
            let archived = self.archived_value(&key, latest);
            debug_assert!(archived.is_some(), "replayed key has no archived value");
            let Some(archived) = archived else {
                continue;
            };
            match self.current.get(&key) {
                None => {
                    record.deletions.insert(key, archived.clone());
                }
                Some(live) if live != archived => {
                    record.modifications.insert(key, live.clone());
                }
                Some(_) => {}
            }
        }
        record
    }
}

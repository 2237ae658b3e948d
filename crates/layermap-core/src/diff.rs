use std::borrow::Cow;
use std::hash::Hash;

use crate::map::VersionedMap;
use crate::record::VersionRecord;
use crate::{Result, VersionError};

impl<K: Eq + Hash + Clone, V: Clone + PartialEq> VersionedMap<K, V> {
    /// Changes recorded when `version` was archived.
    ///
    /// `None` diffs the live table against the latest archived version
    /// without archiving anything, and fails while nothing is archived.
    /// Version 0 has no predecessor and yields an empty diff.
    pub fn diff_previous(&self, version: Option<usize>) -> Result<Cow<'_, VersionRecord<K, V>>> {
        let Some(version) = version else {
            let latest = self
                .version_number()
                .checked_sub(1)
                .ok_or(VersionError::InvalidVersion { requested: 0, latest: 0 })?;
            return Ok(Cow::Owned(self.diff_against(latest)));
        };
        self.check_version(version)?;
        match version.checked_sub(1) {
            Some(index) => Ok(Cow::Borrowed(&self.log[index])),
            None => Ok(Cow::Owned(VersionRecord::new())),
        }
    }

    /// Changes from `from` to `to`, computed from scratch.
    ///
    /// Yields an empty diff unless `from < to`.
    pub fn diff_pair(&self, from: usize, to: usize) -> Result<VersionRecord<K, V>> {
        let mut record = VersionRecord::new();
        if from >= to {
            return Ok(record);
        }
        let old_keys = self.keys_in_version(Some(from))?;
        let new_keys = self.keys_in_version(Some(to))?;

        for key in new_keys.iter() {
            if !old_keys.contains(key) {
                let value = self.lookup_value(key, Some(to))?;
                record.additions.insert(key.clone(), value.clone());
            }
        }
        for key in old_keys.iter() {
            let old_value = self.lookup_value(key, Some(from))?;
            if !new_keys.contains(key) {
                record.deletions.insert(key.clone(), old_value.clone());
                continue;
            }
            let new_value = self.lookup_value(key, Some(to))?;
            if old_value != new_value {
                record.modifications.insert(key.clone(), new_value.clone());
            }
        }
        Ok(record)
    }
}

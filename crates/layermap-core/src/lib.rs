//! In-memory versioned key-value map.
//!
//! The live table is an ordinary `HashMap`. Committing a version stores only
//! the top-level difference against the previously archived version, so many
//! versions of a large map that differ in a few keys stay cheap.

pub mod archive;
pub mod diff;
pub mod map;
pub mod reconstruct;
pub mod record;

pub use map::VersionedMap;
pub use reconstruct::VersionKeys;
pub use record::VersionRecord;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("{}", invalid_version_message(.requested, .latest))]
    InvalidVersion { requested: usize, latest: usize },
    #[error("rewind impossible: no archived version")]
    RewindAtZero,
    #[error("key not found in requested version")]
    KeyNotFound,
}

fn invalid_version_message(requested: &usize, latest: &usize) -> String {
    if *latest > 0 {
        format!("versioned map has versions up to {latest}, but no version {requested}")
    } else {
        "versioned map has no versions".to_string()
    }
}

pub type Result<T> = std::result::Result<T, VersionError>;

//! The persisted form of a rating session.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::engine::{ActionLog, RatingEngine};
use crate::error::Result;
use crate::tier::{ImageId, TierMap};

use super::blob::BlobStore;

const ENTRY_IMAGES: &str = "images";
const ENTRY_CURSOR: &str = "currentImageIndex";
const ENTRY_TIERS: &str = "ratingMap";
const ENTRY_HISTORY: &str = "history";

/// Entry names written for every namespace.
pub const ENTRIES: [&str; 4] = [ENTRY_IMAGES, ENTRY_CURSOR, ENTRY_TIERS, ENTRY_HISTORY];

/// Storage key of one entry.
pub fn blob_key(namespace: &str, entry: &str) -> String {
    format!("{}.{}", namespace, entry)
}

/// Everything a session needs to resume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedState {
    pub catalog: Vec<ImageId>,
    pub cursor: usize,
    pub tiers: TierMap,
    pub history: ActionLog,
}

impl PersistedState {
    pub fn from_engine(engine: &RatingEngine) -> Self {
        Self {
            catalog: engine.catalog().to_vec(),
            cursor: engine.cursor(),
            tiers: engine.tiers().clone(),
            history: engine.log().clone(),
        }
    }

    pub fn into_engine(self) -> RatingEngine {
        RatingEngine::restore(self.catalog, self.tiers, self.cursor, self.history)
    }

    /// Load the state of `namespace`.
    ///
    /// Entries are read independently: a missing or unreadable entry falls
    /// back to its empty value and the rest are still restored.
    pub fn load(blobs: &dyn BlobStore, namespace: &str) -> Self {
        Self {
            catalog: load_entry(blobs, namespace, ENTRY_IMAGES),
            cursor: load_entry(blobs, namespace, ENTRY_CURSOR),
            tiers: load_entry(blobs, namespace, ENTRY_TIERS),
            history: load_entry(blobs, namespace, ENTRY_HISTORY),
        }
    }

    /// Write all four entries of `namespace`.
    pub fn save(&self, blobs: &dyn BlobStore, namespace: &str) -> Result<()> {
        save_entry(blobs, namespace, ENTRY_IMAGES, &self.catalog)?;
        save_entry(blobs, namespace, ENTRY_CURSOR, &self.cursor)?;
        save_entry(blobs, namespace, ENTRY_TIERS, &self.tiers)?;
        save_entry(blobs, namespace, ENTRY_HISTORY, &self.history)?;
        Ok(())
    }

    /// Remove every entry of `namespace`.
    pub fn clear(blobs: &dyn BlobStore, namespace: &str) -> Result<()> {
        for entry in ENTRIES {
            blobs.remove(&blob_key(namespace, entry))?;
        }
        Ok(())
    }
}

fn load_entry<T: DeserializeOwned + Default>(
    blobs: &dyn BlobStore,
    namespace: &str,
    entry: &str,
) -> T {
    let key = blob_key(namespace, entry);
    let raw = match blobs.get(&key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "could not read saved state entry");
            return T::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(key = %key, error = %e, "discarding unreadable saved state entry");
        T::default()
    })
}

fn save_entry<T: Serialize>(
    blobs: &dyn BlobStore,
    namespace: &str,
    entry: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    blobs.set(&blob_key(namespace, entry), &raw)
}

//! In-memory object store.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use crate::error::{Result, TierlistError};
use crate::tier::ImageId;

use super::{image_id, ObjectStore, Upload, UploadPolicy};

#[derive(Debug, Default)]
struct Inner {
    images: Vec<ImageId>,
    offline: bool,
    uploads: usize,
}

/// Object store that keeps identifiers in memory.
///
/// Clones share the same contents. It can be switched offline to make every
/// call fail with [`TierlistError::StoreUnavailable`].
#[derive(Debug, Clone)]
pub struct MemoryStore {
    dataset: String,
    policy: UploadPolicy,
    inner: Arc<Mutex<Inner>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("memory")
    }
}

impl MemoryStore {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            policy: UploadPolicy::default(),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Create a store that already holds `images`.
    pub fn with_images(dataset: impl Into<String>, images: &[&str]) -> Self {
        let store = Self::new(dataset);
        store.lock().images = images.iter().map(|s| s.to_string()).collect();
        store
    }

    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn online(&self) -> Result<MutexGuard<'_, Inner>> {
        let inner = self.lock();
        if inner.offline {
            return Err(TierlistError::StoreUnavailable(
                "memory store is offline".to_string(),
            ));
        }
        Ok(inner)
    }
}

impl ObjectStore for MemoryStore {
    fn dataset(&self) -> Result<String> {
        let _inner = self.online()?;
        Ok(self.dataset.clone())
    }

    fn list(&self) -> Result<Vec<ImageId>> {
        Ok(self.online()?.images.clone())
    }

    fn store(&self, upload: &Upload) -> Result<ImageId> {
        self.policy.check(upload)?;
        let mut inner = self.online()?;
        inner.uploads += 1;
        // The counter keeps names unique within one millisecond.
        let id = image_id(&format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            inner.uploads,
            upload.base_name()
        ));
        inner.images.push(id.clone());
        Ok(id)
    }

    fn delete_all(&self) -> Result<()> {
        self.online()?.images.clear();
        Ok(())
    }
}

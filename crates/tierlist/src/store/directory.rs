//! Object store backed by a local directory.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::dataset::dataset_id_for;
use crate::error::{Result, TierlistError};
use crate::tier::ImageId;

use super::{has_image_extension, image_id, ObjectStore, Upload, UploadPolicy};

/// Stores images as plain files in one directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    dataset: String,
    policy: UploadPolicy,
}

impl DirectoryStore {
    /// Open (and create if missing) an image directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.exists() {
            fs::create_dir_all(&root).map_err(|e| TierlistError::io(&root, e))?;
            tracing::info!(path = %root.display(), "created image directory");
        }
        let canonical = root.canonicalize().map_err(|e| TierlistError::io(&root, e))?;
        let dataset = dataset_id_for(&canonical);

        Ok(Self {
            root,
            dataset,
            policy: UploadPolicy::default(),
        })
    }

    /// Use a fixed dataset id instead of one derived from the path.
    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = dataset.into();
        self
    }

    pub fn with_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Write `upload` under a name that is not taken yet and return the name.
    ///
    /// Files are created with `create_new`, so two writers racing for the
    /// same name never overwrite each other; the loser takes the next suffix.
    fn write_new(&self, upload: &Upload) -> Result<String> {
        let name = upload.stored_name(Utc::now());
        let (stamp, base) = name.split_once('-').unwrap_or((name.as_str(), ""));

        let mut attempt = 0usize;
        loop {
            let candidate = if attempt == 0 {
                name.clone()
            } else {
                format!("{}-{}-{}", stamp, attempt, base)
            };
            let path = self.root.join(&candidate);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(&upload.bytes)
                        .map_err(|e| TierlistError::io(&path, e))?;
                    return Ok(candidate);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(TierlistError::io(&path, e)),
            }
        }
    }
}

impl ObjectStore for DirectoryStore {
    fn dataset(&self) -> Result<String> {
        Ok(self.dataset.clone())
    }

    fn list(&self) -> Result<Vec<ImageId>> {
        let entries = fs::read_dir(&self.root).map_err(|e| TierlistError::io(&self.root, e))?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| has_image_extension(name))
            .collect();

        // Stored names start with a millisecond timestamp, so this is upload order.
        names.sort();

        Ok(names.iter().map(|name| image_id(name)).collect())
    }

    fn store(&self, upload: &Upload) -> Result<ImageId> {
        self.policy.check(upload)?;

        let name = self.write_new(upload)?;

        tracing::info!(file = %name, bytes = upload.bytes.len(), "stored image");
        Ok(image_id(&name))
    }

    fn store_all(&self, uploads: &[Upload]) -> Result<Vec<ImageId>> {
        // Reject the whole batch before writing anything.
        for upload in uploads {
            self.policy.check(upload)?;
        }
        uploads.iter().map(|upload| self.store(upload)).collect()
    }

    fn delete_all(&self) -> Result<()> {
        let entries = fs::read_dir(&self.root).map_err(|e| TierlistError::io(&self.root, e))?;

        let mut deleted = 0;
        for entry in entries.filter_map(|entry| entry.ok()) {
            let path = entry.path();
            if path.is_file() {
                fs::remove_file(&path).map_err(|e| TierlistError::io(&path, e))?;
                deleted += 1;
            }
        }

        tracing::info!(deleted, path = %self.root.display(), "deleted all images");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg(name: &str) -> Upload {
        Upload::new(name, "image/jpeg", b"jpeg".to_vec())
    }

    #[test]
    fn test_open_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("images");

        let store = DirectoryStore::open(&root).unwrap();
        assert!(root.is_dir());
        assert!(store.list().unwrap().is_empty());
        assert!(!store.dataset().unwrap().is_empty());
    }

    #[test]
    fn test_store_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();

        let id = store.store(&jpeg("cat.jpg")).unwrap();
        assert!(id.starts_with("/images/"));
        assert!(id.ends_with("-cat.jpg"));

        fs::write(dir.path().join("readme.txt"), b"not an image").unwrap();
        assert_eq!(store.list().unwrap(), vec![id]);
    }

    #[test]
    fn test_same_name_twice_gets_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();

        let ids = store.store_all(&[jpeg("cat.jpg"), jpeg("cat.jpg")]).unwrap();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn test_concurrent_same_name_uploads_keep_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();

        let ids: Vec<ImageId> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let store = &store;
                    scope.spawn(move || {
                        store
                            .store(&Upload::new("cat.jpg", "image/jpeg", format!("cat {}", i)))
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 8);

        let mut contents: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| fs::read_to_string(entry.unwrap().path()).unwrap())
            .collect();
        contents.sort();
        contents.dedup();
        assert_eq!(contents.len(), 8);
    }

    #[test]
    fn test_rejected_batch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();

        let batch = [jpeg("ok.jpg"), Upload::new("bad.gif", "image/gif", b"gif".to_vec())];
        assert!(matches!(
            store.store_all(&batch),
            Err(TierlistError::UploadRejected { .. })
        ));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_all() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();
        store.store(&jpeg("a.jpg")).unwrap();
        store.store(&jpeg("b.jpg")).unwrap();

        store.delete_all().unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_dataset_is_stable_per_directory() {
        let dir = tempfile::tempdir().unwrap();
        let a = DirectoryStore::open(dir.path()).unwrap();
        let b = DirectoryStore::open(dir.path()).unwrap();
        let other = tempfile::tempdir().unwrap();
        let c = DirectoryStore::open(other.path()).unwrap();

        assert_eq!(a.dataset().unwrap(), b.dataset().unwrap());
        assert_ne!(a.dataset().unwrap(), c.dataset().unwrap());
        assert_eq!(
            a.with_dataset("holiday").dataset().unwrap(),
            "holiday".to_string()
        );
    }
}

//! Rating sessions: the engine tied to an object store and saved state.
//!
//! A [`Session`] owns everything one person's triage pass needs: the
//! [`RatingEngine`], the [`ObjectStore`] the images come from, the
//! [`BlobStore`] holding saved state, and an optional open review. Every
//! mutating call saves the state before returning.
//!
//! # Usage
//!
//! ```
//! use tierlist::persistence::MemoryBlobStore;
//! use tierlist::store::MemoryStore;
//! use tierlist::{Session, SessionConfig, Tier};
//!
//! let store = MemoryStore::with_images("holiday", &["/images/a.jpg", "/images/b.jpg"]);
//! let mut session = Session::open(store, MemoryBlobStore::new(), SessionConfig::new());
//!
//! session.assign(Tier::new(5).unwrap()).unwrap();
//! session.skip().unwrap();
//! println!("{}", session.export_snapshot().unwrap());
//! ```

mod export;
mod merge;

pub use export::{export_snapshot, write_export, DEFAULT_EXPORT_FILE};
pub use merge::{reconcile_catalog, MergePolicy};

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::config::SessionConfig;
use crate::dataset::{resolve_namespace, sanitize_namespace};
use crate::engine::{Action, CurrentImage, Progress, RatingEngine};
use crate::error::{Result, TierlistError};
use crate::persistence::{BlobStore, PersistedState};
use crate::review::ReviewSelection;
use crate::store::{ObjectStore, Upload};
use crate::tier::{ImageId, Tier};

/// Outcome of [`Session::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetReport {
    /// Whether the store confirmed deleting its images.
    pub images_deleted: bool,
    /// Catalog size after re-seeding from the store.
    pub catalog: usize,
}

/// One namespace's rating session.
pub struct Session {
    namespace: String,
    engine: RatingEngine,
    store: Arc<dyn ObjectStore>,
    blobs: Arc<dyn BlobStore>,
    review: Option<ReviewSelection>,
    config: SessionConfig,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("namespace", &self.namespace)
            .field("engine", &self.engine)
            .field("review", &self.review)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Resolve the namespace from the config, the store or the last
    /// remembered dataset, then initialize.
    pub fn open(
        store: impl ObjectStore + 'static,
        blobs: impl BlobStore + 'static,
        config: SessionConfig,
    ) -> Self {
        let store: Arc<dyn ObjectStore> = Arc::new(store);
        let blobs: Arc<dyn BlobStore> = Arc::new(blobs);
        let namespace =
            resolve_namespace(store.as_ref(), blobs.as_ref(), config.namespace.as_deref());
        Self::initialize(namespace, store, blobs, config)
    }

    /// Restore the saved state of `namespace` and reconcile its catalog with
    /// the store listing according to the configured merge policy.
    ///
    /// A store that cannot be listed is logged and the saved catalog kept.
    pub fn initialize(
        namespace: impl AsRef<str>,
        store: Arc<dyn ObjectStore>,
        blobs: Arc<dyn BlobStore>,
        config: SessionConfig,
    ) -> Self {
        let namespace = sanitize_namespace(namespace.as_ref());
        let mut state = PersistedState::load(blobs.as_ref(), &namespace);

        let listed = match store.list() {
            Ok(listed) => Some(listed),
            Err(e) => {
                tracing::warn!(error = %e, "could not list images, continuing with saved state");
                None
            }
        };
        let restored = std::mem::take(&mut state.catalog);
        state.catalog = reconcile_catalog(restored, listed, config.merge_policy);

        let engine = state.into_engine().with_undoable_moves(config.undoable_moves);
        tracing::info!(
            namespace = %namespace,
            catalog = engine.catalog().len(),
            rated = engine.tiers().rated_count(),
            policy = %config.merge_policy,
            "session initialized"
        );

        Self {
            namespace,
            engine,
            store,
            blobs,
            review: None,
            config,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn engine(&self) -> &RatingEngine {
        &self.engine
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    pub fn current_image(&self) -> CurrentImage<'_> {
        self.engine.current_image()
    }

    pub fn progress(&self) -> Progress {
        self.engine.progress()
    }

    pub fn assign(&mut self, tier: Tier) -> Result<ImageId> {
        let image = self.engine.assign(tier)?;
        self.persist_or_warn();
        Ok(image)
    }

    pub fn skip(&mut self) -> Result<ImageId> {
        let image = self.engine.skip()?;
        self.persist_or_warn();
        Ok(image)
    }

    pub fn undo(&mut self) -> Result<Action> {
        let action = self.engine.undo()?;
        self.persist_or_warn();
        Ok(action)
    }

    /// Move a rated image between tiers outside of a review.
    pub fn bump_tier(&mut self, image: &str, delta: i8) -> Result<Tier> {
        let tier = self.engine.bump_tier(image, delta)?;
        self.persist_or_warn();
        Ok(tier)
    }

    /// Start reviewing `tier`, replacing any open review.
    pub fn open_review(&mut self, tier: Tier) -> &ReviewSelection {
        self.review.insert(ReviewSelection::open(&self.engine, tier))
    }

    pub fn review(&self) -> Option<&ReviewSelection> {
        self.review.as_ref()
    }

    pub fn review_next(&mut self) -> Option<&ImageId> {
        let review = self.review.as_mut()?;
        review.next();
        review.current()
    }

    pub fn review_previous(&mut self) -> Option<&ImageId> {
        let review = self.review.as_mut()?;
        review.previous();
        review.current()
    }

    /// Move the image under the review by `delta` tiers.
    pub fn review_bump(&mut self, delta: i8) -> Result<Tier> {
        let review = self.review.as_mut().ok_or(TierlistError::NoCurrentImage)?;
        let tier = review.bump(&mut self.engine, delta)?;
        self.persist_or_warn();
        Ok(tier)
    }

    pub fn close_review(&mut self) {
        if let Some(review) = self.review.take() {
            review.close();
        }
    }

    /// Send files to the store and add the stored images to the catalog.
    ///
    /// If the store refuses or cannot be reached nothing changes locally.
    pub fn upload(&mut self, uploads: &[Upload]) -> Result<Vec<ImageId>> {
        let stored = self.store.store_all(uploads).inspect_err(|e| {
            tracing::warn!(error = %e, files = uploads.len(), "upload failed");
        })?;
        self.record_upload(stored.clone());
        Ok(stored)
    }

    /// Add already stored images to the catalog.
    pub fn record_upload(&mut self, images: Vec<ImageId>) -> usize {
        let added = self.engine.record_upload(images);
        tracing::info!(added, cursor = self.engine.cursor(), "recorded upload");
        self.persist_or_warn();
        added
    }

    /// Write the full engine state to the blob store.
    pub fn persist(&self) -> Result<()> {
        PersistedState::from_engine(&self.engine).save(self.blobs.as_ref(), &self.namespace)
    }

    /// The tier map as a pretty-printed JSON document.
    pub fn export_snapshot(&self) -> Result<String> {
        export_snapshot(self.engine.tiers())
    }

    pub fn export_to(&self, path: impl AsRef<Path>) -> Result<()> {
        write_export(self.engine.tiers(), path)
    }

    /// Forget all ratings and saved state, optionally deleting every image
    /// from the store, then re-seed the catalog from the store listing.
    pub fn reset(&mut self, delete_from_store: bool) -> ResetReport {
        self.review = None;
        self.engine.clear();
        if let Err(e) = PersistedState::clear(self.blobs.as_ref(), &self.namespace) {
            tracing::warn!(error = %e, "could not clear saved state");
        }

        let mut images_deleted = false;
        if delete_from_store {
            match self.store.delete_all() {
                Ok(()) => images_deleted = true,
                Err(e) => tracing::warn!(error = %e, "could not delete images from store"),
            }
        }

        match self.store.list() {
            Ok(listed) => self.engine.set_catalog(listed),
            Err(e) => tracing::warn!(error = %e, "could not list images after reset"),
        }

        self.persist_or_warn();
        tracing::info!(
            namespace = %self.namespace,
            images_deleted,
            catalog = self.engine.catalog().len(),
            "session reset"
        );

        ResetReport {
            images_deleted,
            catalog: self.engine.catalog().len(),
        }
    }

    fn persist_or_warn(&self) {
        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, namespace = %self.namespace, "could not save session state");
        }
    }
}

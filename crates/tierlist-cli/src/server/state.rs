//! Application state for the image server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tierlist::store::{DirectoryStore, UploadPolicy};
use tierlist::ObjectStore;

/// Default directory holding stored images.
pub const DEFAULT_IMAGES_DIR: &str = "images";

/// Default bind address.
pub const DEFAULT_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 3000);

/// Server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory the images are stored in. Created if missing.
    pub images_dir: PathBuf,
    /// Address to listen on.
    pub addr: SocketAddr,
    /// Dataset id to report instead of the one derived from the directory.
    pub dataset: Option<String>,
    /// Limit on a whole request body, in bytes. `None` leaves the size of a
    /// batch unbounded; each file is still held to the upload policy.
    pub body_limit: Option<usize>,
    /// Per-file upload checks.
    pub policy: UploadPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            addr: SocketAddr::from(DEFAULT_ADDR),
            dataset: None,
            body_limit: None,
            policy: UploadPolicy::default(),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The directory-backed store all routes operate on.
    pub store: Arc<DirectoryStore>,
    /// Settings the server was started with.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Open the images directory described by `config`.
    pub fn new(config: ServerConfig) -> tierlist::Result<Self> {
        let mut store = DirectoryStore::open(&config.images_dir)?.with_policy(config.policy.clone());
        if let Some(dataset) = &config.dataset {
            store = store.with_dataset(dataset.clone());
        }
        Ok(Self {
            store: Arc::new(store),
            config: Arc::new(config),
        })
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }
}

//! Object store: where image files live.
//!
//! The store hands out stable identifiers of the form `/images/<name>`,
//! lists them, and can delete everything. Three implementations exist:
//!
//! - [`DirectoryStore`] keeps files in a local directory (used by the server)
//! - [`HttpStore`] talks to a running server over HTTP
//! - [`MemoryStore`] keeps everything in memory (tests, offline sessions)

mod directory;
mod http;
mod memory;
mod upload;

pub use directory::DirectoryStore;
pub use http::HttpStore;
pub use memory::MemoryStore;
pub use upload::{Upload, UploadPolicy, ALLOWED_MIME_TYPES, MAX_FILE_BYTES};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;
use crate::tier::ImageId;

/// URL prefix under which stored images are served.
pub const IMAGE_URL_PREFIX: &str = "/images/";

static IMAGE_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|bmp|tiff|webp)$").expect("valid regex"));

/// Whether a stored file name has one of the listed image extensions.
pub fn has_image_extension(name: &str) -> bool {
    IMAGE_EXTENSION.is_match(name)
}

/// Identifier for a stored file name.
pub fn image_id(stored_name: &str) -> ImageId {
    format!("{}{}", IMAGE_URL_PREFIX, stored_name)
}

/// Backend holding the image files.
pub trait ObjectStore: Send + Sync {
    /// Namespace id used to scope client-side state for this store.
    fn dataset(&self) -> Result<String>;

    /// Identifiers of every stored image, in a stable order.
    fn list(&self) -> Result<Vec<ImageId>>;

    /// Store one file and return its identifier.
    fn store(&self, upload: &Upload) -> Result<ImageId>;

    /// Store several files. Implementations that can send a batch in one
    /// request override this.
    fn store_all(&self, uploads: &[Upload]) -> Result<Vec<ImageId>> {
        uploads.iter().map(|upload| self.store(upload)).collect()
    }

    /// Delete every stored image. Irreversible.
    fn delete_all(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension_filter() {
        assert!(has_image_extension("cat.jpg"));
        assert!(has_image_extension("CAT.JPEG"));
        assert!(has_image_extension("scan.tiff"));
        assert!(has_image_extension("1700000000000-photo.webp"));
        assert!(!has_image_extension("notes.txt"));
        assert!(!has_image_extension("archive.jpg.zip"));
        assert!(!has_image_extension(".DS_Store"));
    }

    #[test]
    fn test_image_id() {
        assert_eq!(image_id("a.png"), "/images/a.png");
    }
}

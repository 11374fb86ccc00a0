//! Files on their way into the store, and the checks they must pass.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{Result, TierlistError};

/// MIME types accepted for upload.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/bmp",
    "image/tiff",
    "image/webp",
];

/// Per-file size cap (50 MiB).
pub const MAX_FILE_BYTES: usize = 50 * 1024 * 1024;

/// An image file to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Name the file had on the client.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| TierlistError::io(path, e))?;
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self::new(file_name, content_type, bytes))
    }

    /// The client file name without any directory components.
    pub fn base_name(&self) -> &str {
        let name = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();
        if name.is_empty() || name == "." || name == ".." {
            "upload"
        } else {
            name
        }
    }

    /// Name under which the file is stored: `<unix-millis>-<base name>`.
    pub fn stored_name(&self, at: DateTime<Utc>) -> String {
        format!("{}-{}", at.timestamp_millis(), self.base_name())
    }
}

/// Type and size checks applied to every upload.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    /// Accepted MIME types.
    pub allowed_types: Vec<String>,
    /// Largest accepted file, in bytes.
    pub max_file_bytes: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_types: ALLOWED_MIME_TYPES.iter().map(|s| s.to_string()).collect(),
            max_file_bytes: MAX_FILE_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_file_bytes(mut self, max: usize) -> Self {
        self.max_file_bytes = max;
        self
    }

    pub fn check(&self, upload: &Upload) -> Result<()> {
        self.check_type(&upload.file_name, &upload.content_type)?;
        self.check_size(&upload.file_name, upload.bytes.len())
    }

    /// MIME type check on its own, for callers that know the type before
    /// the contents.
    pub fn check_type(&self, file_name: &str, content_type: &str) -> Result<()> {
        let normalized = content_type.to_ascii_lowercase();
        if !self.allowed_types.iter().any(|t| *t == normalized) {
            return Err(TierlistError::UploadRejected {
                file: file_name.to_string(),
                reason: format!(
                    "Invalid file type '{}'. Only images are allowed.",
                    content_type
                ),
            });
        }
        Ok(())
    }

    /// Size check on its own, for callers that stream a file in chunks.
    pub fn check_size(&self, file_name: &str, len: usize) -> Result<()> {
        if len > self.max_file_bytes {
            return Err(TierlistError::UploadRejected {
                file: file_name.to_string(),
                reason: format!(
                    "File too large ({} bytes, limit {} bytes)",
                    len, self.max_file_bytes
                ),
            });
        }
        Ok(())
    }
}

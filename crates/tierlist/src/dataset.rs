//! Dataset namespaces.
//!
//! Client state is stored per dataset so that sessions against different
//! image directories never see each other's ratings.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::persistence::BlobStore;
use crate::store::ObjectStore;

/// Namespace used when the store cannot name its dataset.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Blob key remembering the last dataset the store reported.
pub const LAST_NAMESPACE_KEY: &str = "last-namespace";

/// Derive a dataset id from an image directory path.
pub fn dataset_id_for(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("ds-{}", &digest[..12])
}

/// Reduce a namespace to characters safe for file names and storage keys.
pub fn sanitize_namespace(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        DEFAULT_NAMESPACE.to_string()
    } else {
        cleaned
    }
}

/// Pick the namespace for a session.
///
/// An explicit override wins; otherwise the store is asked and its answer
/// remembered in `blobs`. A store that cannot be reached yields the last
/// remembered namespace, or [`DEFAULT_NAMESPACE`] if there is none, so the
/// session can still start against its saved state.
pub fn resolve_namespace(
    store: &dyn ObjectStore,
    blobs: &dyn BlobStore,
    explicit: Option<&str>,
) -> String {
    if let Some(namespace) = explicit {
        return sanitize_namespace(namespace);
    }
    match store.dataset() {
        Ok(dataset) => {
            let namespace = sanitize_namespace(&dataset);
            if let Err(e) = blobs.set(LAST_NAMESPACE_KEY, &namespace) {
                tracing::warn!(error = %e, "could not remember namespace");
            }
            namespace
        }
        Err(e) => match last_namespace(blobs) {
            Some(namespace) => {
                tracing::warn!(
                    error = %e,
                    namespace = %namespace,
                    "could not resolve dataset, using last namespace"
                );
                namespace
            }
            None => {
                tracing::warn!(error = %e, "could not resolve dataset, using default namespace");
                DEFAULT_NAMESPACE.to_string()
            }
        },
    }
}

fn last_namespace(blobs: &dyn BlobStore) -> Option<String> {
    match blobs.get(LAST_NAMESPACE_KEY) {
        Ok(value) => value
            .map(|raw| sanitize_namespace(&raw))
            .filter(|namespace| namespace != DEFAULT_NAMESPACE),
        Err(e) => {
            tracing::warn!(error = %e, "could not read last namespace");
            None
        }
    }
}

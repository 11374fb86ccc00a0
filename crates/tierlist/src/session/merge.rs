//! Combining the saved catalog with the store's listing.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::tier::ImageId;

/// Policy for reconciling a restored catalog with the store listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// Saved state wins. The listing only seeds an empty catalog.
    #[default]
    PreferLocal,
    /// Keep the saved catalog and append listed images it does not know.
    Union,
    /// Replace the catalog with the listing.
    PreferServer,
}

impl MergePolicy {
    pub fn label(&self) -> &'static str {
        match self {
            MergePolicy::PreferLocal => "prefer-local",
            MergePolicy::Union => "union",
            MergePolicy::PreferServer => "prefer-server",
        }
    }
}

impl std::str::FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "prefer-local" | "local" => Ok(MergePolicy::PreferLocal),
            "union" | "merge" => Ok(MergePolicy::Union),
            "prefer-server" | "server" => Ok(MergePolicy::PreferServer),
            _ => Err(format!(
                "Unknown merge policy: {}. Use prefer-local, union, or prefer-server.",
                s
            )),
        }
    }
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Decide the session catalog.
///
/// `listed` is `None` when the store could not be asked; the restored
/// catalog is then kept whatever the policy.
pub fn reconcile_catalog(
    restored: Vec<ImageId>,
    listed: Option<Vec<ImageId>>,
    policy: MergePolicy,
) -> Vec<ImageId> {
    let Some(listed) = listed else {
        return restored;
    };

    match policy {
        MergePolicy::PreferLocal => {
            if restored.is_empty() {
                listed
            } else {
                restored
            }
        }
        MergePolicy::Union => {
            let mut known: HashSet<ImageId> = restored.iter().cloned().collect();
            let mut catalog = restored;
            for image in listed {
                if known.insert(image.clone()) {
                    catalog.push(image);
                }
            }
            catalog
        }
        MergePolicy::PreferServer => listed,
    }
}

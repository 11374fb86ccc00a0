//! Session configuration.

use crate::session::MergePolicy;

/// Configuration for a rating session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Namespace to use instead of the store's dataset id.
    pub namespace: Option<String>,
    /// How saved state and the store listing are combined at start-up.
    pub merge_policy: MergePolicy,
    /// Put review-view tier moves on the undo stack.
    pub undoable_moves: bool,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn with_undoable_moves(mut self, enabled: bool) -> Self {
        self.undoable_moves = enabled;
        self
    }
}

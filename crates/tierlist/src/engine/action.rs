//! Undoable actions recorded by the rating engine.

use serde::{Deserialize, Serialize};

use crate::tier::{ImageId, Tier};

/// One entry of the undo stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// An image was placed into a tier from the main rating view.
    Assign {
        image: ImageId,
        #[serde(rename = "rating")]
        tier: Tier,
    },

    /// The shown image was passed over. `index` is the cursor before the skip.
    Skip {
        #[serde(rename = "index")]
        cursor_before: usize,
        image: ImageId,
    },

    /// An image was moved between tiers from the review view. Only recorded
    /// when review moves are configured to be undoable.
    Move { image: ImageId, from: Tier, to: Tier },
}

impl Action {
    pub fn image(&self) -> &str {
        match self {
            Action::Assign { image, .. } | Action::Skip { image, .. } | Action::Move { image, .. } => {
                image
            }
        }
    }

    /// Short description for logs and terminal output.
    pub fn describe(&self) -> String {
        match self {
            Action::Assign { image, tier } => format!("assign {} to {}", image, tier.label()),
            Action::Skip { image, .. } => format!("skip {}", image),
            Action::Move { image, from, to } => {
                format!("move {} from {} to {}", image, from.label(), to.label())
            }
        }
    }
}

/// Stack of undoable actions. Only the most recent entry can be popped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLog {
    actions: Vec<Action>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub(crate) fn pop(&mut self) -> Option<Action> {
        self.actions.pop()
    }

    pub fn last(&self) -> Option<&Action> {
        self.actions.last()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }
}

impl From<Vec<Action>> for ActionLog {
    fn from(actions: Vec<Action>) -> Self {
        Self { actions }
    }
}

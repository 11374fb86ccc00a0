//! The rating engine: catalog, tiers, cursor and undo stack.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{Result, TierlistError};
use crate::tier::{ImageId, Tier, TierCounts, TierMap};

use super::action::{Action, ActionLog};

/// What the main rating view should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CurrentImage<'a> {
    /// An unrated image at catalog index `position`; `remaining` counts all
    /// unrated images.
    Showing {
        image: &'a str,
        position: usize,
        remaining: usize,
    },
    /// The catalog holds no unrated image at all.
    NothingUnrated,
    /// Unrated images exist, but the cursor has moved past all of them.
    Exhausted,
}

impl<'a> CurrentImage<'a> {
    pub fn image(&self) -> Option<&'a str> {
        match self {
            CurrentImage::Showing { image, .. } => Some(*image),
            _ => None,
        }
    }

    pub fn is_showing(&self) -> bool {
        matches!(self, CurrentImage::Showing { .. })
    }

    /// User-facing text for the two empty states.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            CurrentImage::Showing { .. } => None,
            CurrentImage::NothingUnrated => {
                Some("No images remain to be ranked. Please upload more to continue.")
            }
            CurrentImage::Exhausted => Some("All images have been ranked or no images remain."),
        }
    }
}

/// Progress summary of a rating pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub catalog: usize,
    pub rated: usize,
    pub unrated: usize,
    pub cursor: usize,
    pub undo_depth: usize,
    pub tiers: TierCounts,
}

impl Progress {
    /// Fraction of the catalog that has a tier (1.0 for an empty catalog).
    pub fn fraction(&self) -> f64 {
        if self.catalog == 0 {
            return 1.0;
        }
        self.rated as f64 / self.catalog as f64
    }
}

/// State machine behind one-image-at-a-time rating.
///
/// The cursor is a position in the catalog. The shown image is the first
/// catalog image at or after the cursor that has no tier, so images rated
/// earlier (or by another pass) are stepped over without moving the cursor.
/// An assignment advances the cursor by one and its undo steps back by one;
/// a skip jumps past the skipped image and its undo restores the recorded
/// cursor. Both undos therefore land on the exact pre-action state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingEngine {
    catalog: Vec<ImageId>,
    tiers: TierMap,
    cursor: usize,
    log: ActionLog,
    undoable_moves: bool,
}

impl RatingEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine over a catalog with nothing rated yet.
    pub fn with_catalog(catalog: Vec<ImageId>) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Rebuild an engine from persisted parts.
    ///
    /// Duplicate tier entries are dropped so that the uniqueness invariant
    /// holds even for hand-edited state (the first occurrence wins).
    pub fn restore(catalog: Vec<ImageId>, tiers: TierMap, cursor: usize, log: ActionLog) -> Self {
        let mut seen = HashSet::new();
        let mut clean = TierMap::new();
        for (tier, images) in tiers.iter() {
            for image in images {
                if seen.insert(image.clone()) {
                    clean.push(tier, image.clone());
                }
            }
        }
        Self {
            catalog,
            tiers: clean,
            cursor,
            log,
            undoable_moves: false,
        }
    }

    /// Record review-view tier moves on the undo stack.
    pub fn with_undoable_moves(mut self, enabled: bool) -> Self {
        self.undoable_moves = enabled;
        self
    }

    pub fn catalog(&self) -> &[ImageId] {
        &self.catalog
    }

    pub fn tiers(&self) -> &TierMap {
        &self.tiers
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    /// Catalog images without a tier, in catalog order.
    pub fn unrated_sequence(&self) -> impl Iterator<Item = &ImageId> + '_ {
        let rated = self.rated_set();
        self.catalog
            .iter()
            .filter(move |image| !rated.contains(image.as_str()))
    }

    pub fn current_image(&self) -> CurrentImage<'_> {
        let rated = self.rated_set();
        let mut remaining = 0;
        let mut shown = None;
        for (index, image) in self.catalog.iter().enumerate() {
            if rated.contains(image.as_str()) {
                continue;
            }
            remaining += 1;
            if shown.is_none() && index >= self.cursor {
                shown = Some((index, image.as_str()));
            }
        }

        match shown {
            Some((position, image)) => CurrentImage::Showing {
                image,
                position,
                remaining,
            },
            None if remaining == 0 => CurrentImage::NothingUnrated,
            None => CurrentImage::Exhausted,
        }
    }

    pub fn is_rated(&self, image: &str) -> bool {
        self.tiers.contains(image)
    }

    pub fn current_tier(&self, image: &str) -> Option<Tier> {
        self.tiers.tier_of(image)
    }

    /// Put the shown image into `tier` and advance.
    pub fn assign(&mut self, tier: Tier) -> Result<ImageId> {
        let (_, image) = self.shown()?;

        self.tiers.remove_everywhere(&image);
        self.tiers.push(tier, image.clone());
        self.log.push(Action::Assign {
            image: image.clone(),
            tier,
        });
        self.cursor += 1;

        tracing::debug!(image = %image, tier = %tier, cursor = self.cursor, "assigned");
        Ok(image)
    }

    /// Pass over the shown image without rating it.
    pub fn skip(&mut self) -> Result<ImageId> {
        let (position, image) = self.shown()?;

        self.log.push(Action::Skip {
            cursor_before: self.cursor,
            image: image.clone(),
        });
        self.cursor = position + 1;

        tracing::debug!(image = %image, cursor = self.cursor, "skipped");
        Ok(image)
    }

    /// Revert the most recent action and return it.
    ///
    /// Undoing an assignment steps the cursor back by one; undoing a skip
    /// restores the exact cursor recorded with it.
    pub fn undo(&mut self) -> Result<Action> {
        let action = self.log.pop().ok_or(TierlistError::NothingToUndo)?;

        match &action {
            Action::Assign { image, .. } => {
                self.tiers.remove_everywhere(image);
                self.cursor = self.cursor.saturating_sub(1);
            }
            Action::Skip { cursor_before, .. } => {
                self.cursor = *cursor_before;
            }
            Action::Move { image, from, .. } => {
                self.tiers.remove_everywhere(image);
                self.tiers.push(*from, image.clone());
            }
        }

        tracing::debug!(action = %action.describe(), cursor = self.cursor, "undone");
        Ok(action)
    }

    /// Move a rated image `delta` tiers up or down, appending it to the end
    /// of the destination tier. Returns the destination.
    pub fn bump_tier(&mut self, image: &str, delta: i8) -> Result<Tier> {
        let from = self
            .current_tier(image)
            .ok_or_else(|| TierlistError::NotRated(image.to_string()))?;
        let to = from.offset(delta).ok_or_else(|| TierlistError::TierOutOfRange {
            image: image.to_string(),
            from,
            delta,
        })?;

        self.tiers.remove_from(from, image);
        self.tiers.push(to, image.to_string());
        if self.undoable_moves {
            self.log.push(Action::Move {
                image: image.to_string(),
                from,
                to,
            });
        }

        tracing::debug!(image = %image, from = %from, to = %to, "moved between tiers");
        Ok(to)
    }

    /// Append newly stored images to the catalog.
    ///
    /// When nothing was showing before the upload the cursor returns to the
    /// start so the new images are presented right away.
    pub fn record_upload(&mut self, images: impl IntoIterator<Item = ImageId>) -> usize {
        let was_idle = !self.current_image().is_showing();
        let before = self.catalog.len();
        self.catalog.extend(images);
        if was_idle {
            self.cursor = 0;
        }
        self.catalog.len() - before
    }

    /// Replace the catalog, keeping tiers, cursor and log.
    pub(crate) fn set_catalog(&mut self, catalog: Vec<ImageId>) {
        self.catalog = catalog;
    }

    /// Drop every piece of state except configuration.
    pub fn clear(&mut self) {
        *self = Self::new().with_undoable_moves(self.undoable_moves);
    }

    pub fn progress(&self) -> Progress {
        let unrated = self.unrated_sequence().count();
        Progress {
            catalog: self.catalog.len(),
            rated: self.catalog.len() - unrated,
            unrated,
            cursor: self.cursor,
            undo_depth: self.log.len(),
            tiers: self.tiers.counts(),
        }
    }

    fn shown(&self) -> Result<(usize, ImageId)> {
        match self.current_image() {
            CurrentImage::Showing {
                image, position, ..
            } => Ok((position, image.to_string())),
            _ => Err(TierlistError::NoCurrentImage),
        }
    }

    fn rated_set(&self) -> HashSet<&str> {
        self.tiers
            .iter()
            .flat_map(|(_, images)| images.iter().map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(n: u8) -> Tier {
        Tier::new(n).unwrap()
    }

    fn engine(images: &[&str]) -> RatingEngine {
        RatingEngine::with_catalog(images.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_empty_catalog_has_nothing_unrated() {
        let engine = RatingEngine::new();
        assert_eq!(engine.current_image(), CurrentImage::NothingUnrated);
        assert!(engine.current_image().message().is_some());
    }

    #[test]
    fn test_cursor_past_end_is_exhausted() {
        let mut engine = engine(&["a", "b"]);
        engine.skip().unwrap();
        engine.skip().unwrap();

        assert_eq!(engine.current_image(), CurrentImage::Exhausted);
        assert!(matches!(engine.skip(), Err(TierlistError::NoCurrentImage)));
        assert!(matches!(engine.assign(tier(1)), Err(TierlistError::NoCurrentImage)));
        assert_eq!(engine.log().len(), 2);
    }

    #[test]
    fn test_assign_moves_to_next_image() {
        let mut engine = engine(&["a", "b", "c", "d"]);
        engine.assign(tier(5)).unwrap();

        assert_eq!(engine.current_image().image(), Some("b"));
        assert_eq!(engine.cursor(), 1);
        assert_eq!(engine.progress().unrated, 3);
        assert_eq!(engine.unrated_sequence().count(), 3);
    }

    #[test]
    fn test_rated_images_ahead_of_cursor_are_stepped_over() {
        let mut engine = engine(&["a", "b", "c", "d"]);
        engine.assign(tier(1)).unwrap();
        engine.assign(tier(2)).unwrap();
        // Rewind as an upload into an idle view would.
        engine.cursor = 0;

        assert_eq!(
            engine.current_image(),
            CurrentImage::Showing {
                image: "c",
                position: 2,
                remaining: 2
            }
        );

        engine.skip().unwrap();
        assert_eq!(engine.cursor(), 3);
        assert_eq!(engine.current_image().image(), Some("d"));

        engine.assign(tier(4)).unwrap();
        engine.undo().unwrap();
        assert_eq!(engine.cursor(), 3);
        engine.undo().unwrap();
        assert_eq!(engine.cursor(), 0);
        assert_eq!(engine.current_image().image(), Some("c"));
    }

    #[test]
    fn test_undo_assign_steps_back() {
        let mut engine = engine(&["a", "b", "c"]);
        engine.assign(tier(2)).unwrap();
        let undone = engine.undo().unwrap();

        assert!(matches!(undone, Action::Assign { .. }));
        assert_eq!(engine.cursor(), 0);
        assert!(!engine.is_rated("a"));
        assert_eq!(engine.current_image().image(), Some("a"));
    }

    #[test]
    fn test_undo_on_empty_log() {
        let mut engine = engine(&["a"]);
        assert!(matches!(engine.undo(), Err(TierlistError::NothingToUndo)));
    }

    #[test]
    fn test_bump_requires_rated_image() {
        let mut engine = engine(&["a"]);
        assert!(matches!(
            engine.bump_tier("a", 1),
            Err(TierlistError::NotRated(_))
        ));
    }

    #[test]
    fn test_bump_out_of_range() {
        let mut engine = engine(&["a"]);
        engine.assign(tier(5)).unwrap();

        let err = engine.bump_tier("a", 1).unwrap_err();
        assert!(matches!(err, TierlistError::TierOutOfRange { delta: 1, .. }));
        assert_eq!(engine.current_tier("a"), Some(tier(5)));
    }

    #[test]
    fn test_undoable_moves() {
        let mut engine = engine(&["a", "b"]).with_undoable_moves(true);
        engine.assign(tier(3)).unwrap();
        engine.bump_tier("a", -2).unwrap();
        assert_eq!(engine.current_tier("a"), Some(tier(1)));
        let cursor = engine.cursor();

        let undone = engine.undo().unwrap();
        assert!(matches!(undone, Action::Move { .. }));
        assert_eq!(engine.current_tier("a"), Some(tier(3)));
        assert_eq!(engine.cursor(), cursor);
    }

    #[test]
    fn test_restore_drops_duplicate_tier_entries() {
        let mut tiers = TierMap::new();
        tiers.push(tier(1), "a".to_string());
        tiers.push(tier(4), "a".to_string());

        let engine = RatingEngine::restore(vec!["a".to_string()], tiers, 0, ActionLog::new());
        assert_eq!(engine.tiers().rated_count(), 1);
        assert_eq!(engine.current_tier("a"), Some(tier(1)));
    }

    #[test]
    fn test_clear_keeps_configuration() {
        let mut engine = engine(&["a"]).with_undoable_moves(true);
        engine.assign(tier(1)).unwrap();
        engine.clear();

        assert!(engine.catalog().is_empty());
        assert!(engine.log().is_empty());
        engine.record_upload(vec!["b".to_string()]);
        engine.assign(tier(2)).unwrap();
        engine.bump_tier("b", 1).unwrap();
        assert_eq!(engine.log().len(), 2);
    }
}

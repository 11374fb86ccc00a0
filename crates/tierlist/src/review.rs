//! Per-tier review view.
//!
//! A [`ReviewSelection`] browses a snapshot of one tier independently of the
//! main rating flow. Tier moves made from the view go straight into the
//! engine; the snapshot is only refreshed to keep the view on the moved
//! image.

use crate::engine::RatingEngine;
use crate::error::{Result, TierlistError};
use crate::tier::{ImageId, Tier};

/// Transient browsing state over one tier. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSelection {
    tier: Tier,
    snapshot: Vec<ImageId>,
    index: usize,
}

impl ReviewSelection {
    /// Snapshot `tier` and point at its first image.
    pub fn open(engine: &RatingEngine, tier: Tier) -> Self {
        Self {
            tier,
            snapshot: engine.tiers().images(tier).to_vec(),
            index: 0,
        }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    pub fn images(&self) -> &[ImageId] {
        &self.snapshot
    }

    /// The image under the view, `None` for an empty tier.
    pub fn current(&self) -> Option<&ImageId> {
        self.snapshot.get(self.index)
    }

    /// Step forward, wrapping around.
    pub fn next(&mut self) {
        if !self.snapshot.is_empty() {
            self.index = (self.index + 1) % self.snapshot.len();
        }
    }

    /// Step back, wrapping around.
    pub fn previous(&mut self) {
        if !self.snapshot.is_empty() {
            let len = self.snapshot.len();
            self.index = (self.index + len - 1) % len;
        }
    }

    /// Move the viewed image `delta` tiers and follow it to its new tier.
    ///
    /// On failure (empty view, tier out of range) the selection is left as
    /// it was.
    pub fn bump(&mut self, engine: &mut RatingEngine, delta: i8) -> Result<Tier> {
        let image = match self.current() {
            Some(image) => image.clone(),
            None => return Err(TierlistError::NoCurrentImage),
        };

        let destination = engine.bump_tier(&image, delta)?;

        self.tier = destination;
        self.snapshot = engine.tiers().images(destination).to_vec();
        self.index = self
            .snapshot
            .iter()
            .position(|i| *i == image)
            .unwrap_or(0);

        Ok(destination)
    }

    /// End the review. Nothing needs writing back.
    pub fn close(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(n: u8) -> Tier {
        Tier::new(n).unwrap()
    }

    /// Engine with `images` all assigned to `t`, in order.
    fn engine_with_tier(t: Tier, images: &[&str]) -> RatingEngine {
        let mut engine =
            RatingEngine::with_catalog(images.iter().map(|s| s.to_string()).collect());
        for _ in images {
            engine.assign(t).unwrap();
        }
        engine
    }

    #[test]
    fn test_cyclic_navigation() {
        let engine = engine_with_tier(tier(2), &["x", "y", "z"]);
        let mut review = ReviewSelection::open(&engine, tier(2));

        assert_eq!(review.current().map(String::as_str), Some("x"));
        review.previous();
        assert_eq!(review.current().map(String::as_str), Some("z"));
        review.next();
        review.next();
        assert_eq!(review.current().map(String::as_str), Some("y"));
    }

    #[test]
    fn test_empty_tier_navigation_is_noop() {
        let engine = RatingEngine::new();
        let mut review = ReviewSelection::open(&engine, tier(5));

        review.next();
        review.previous();
        assert_eq!(review.index(), 0);
        assert!(review.current().is_none());
    }

    #[test]
    fn test_bump_follows_image() {
        let mut engine = engine_with_tier(tier(2), &["x", "y"]);
        engine.record_upload(vec!["w".to_string()]);
        engine.assign(tier(3)).unwrap();

        let mut review = ReviewSelection::open(&engine, tier(2));
        let destination = review.bump(&mut engine, 1).unwrap();

        assert_eq!(destination, tier(3));
        assert_eq!(review.tier(), tier(3));
        assert_eq!(review.images(), ["w".to_string(), "x".to_string()]);
        assert_eq!(review.current().map(String::as_str), Some("x"));
        assert_eq!(engine.tiers().images(tier(2)), ["y".to_string()]);
    }

    #[test]
    fn test_failed_bump_keeps_view() {
        let mut engine = engine_with_tier(tier(1), &["x"]);
        let mut review = ReviewSelection::open(&engine, tier(1));

        let err = review.bump(&mut engine, -1).unwrap_err();
        assert!(matches!(err, TierlistError::TierOutOfRange { .. }));
        assert_eq!(review.tier(), tier(1));
        assert_eq!(review.current().map(String::as_str), Some("x"));
    }

    #[test]
    fn test_bump_on_empty_view() {
        let mut engine = RatingEngine::new();
        let mut review = ReviewSelection::open(&engine, tier(3));
        assert!(matches!(
            review.bump(&mut engine, 1),
            Err(TierlistError::NoCurrentImage)
        ));
    }
}

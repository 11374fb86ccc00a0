//! Tiers and the tier map.
//!
//! A [`TierMap`] holds one ordered list of images per tier. Order within a
//! tier only records assignment order (most recent last); the last entry is
//! what a UI shows as the tier's thumbnail.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TierlistError};

/// Stable identifier of an image, as handed out by the object store.
pub type ImageId = String;

/// A star tier from 1 (lowest) to 5 (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tier(u8);

impl Tier {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Create a tier, rejecting values outside 1-5.
    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Tier(value))
        } else {
            Err(TierlistError::InvalidTier(value as i64))
        }
    }

    /// All tiers in ascending order.
    pub fn all() -> impl Iterator<Item = Tier> {
        (Self::MIN..=Self::MAX).map(Tier)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// The tier `delta` steps away, or `None` when that leaves 1-5.
    pub fn offset(self, delta: i8) -> Option<Tier> {
        let target = self.0 as i16 + delta as i16;
        if (Self::MIN as i16..=Self::MAX as i16).contains(&target) {
            Some(Tier(target as u8))
        } else {
            None
        }
    }

    /// Star label, e.g. `3 ★`.
    pub fn label(self) -> String {
        format!("{} ★", self.0)
    }
}

impl TryFrom<u8> for Tier {
    type Error = TierlistError;

    fn try_from(value: u8) -> Result<Self> {
        Tier::new(value)
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.0
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Tier {
    type Err = TierlistError;

    fn from_str(s: &str) -> Result<Self> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| TierlistError::Config(format!("Not a tier number: '{}'", s)))?;
        u8::try_from(value)
            .map_err(|_| TierlistError::InvalidTier(value))
            .and_then(Tier::new)
    }
}

/// Mapping from tier to the images assigned to it.
///
/// Every tier is always present (possibly empty), so the serialized form is
/// `{"1": [...], "2": [...], ..., "5": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Tier, Vec<ImageId>>")]
pub struct TierMap {
    #[serde(flatten)]
    tiers: BTreeMap<Tier, Vec<ImageId>>,
}

impl Default for TierMap {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BTreeMap<Tier, Vec<ImageId>>> for TierMap {
    fn from(mut tiers: BTreeMap<Tier, Vec<ImageId>>) -> Self {
        for tier in Tier::all() {
            tiers.entry(tier).or_default();
        }
        Self { tiers }
    }
}

impl TierMap {
    /// Create a map with five empty tiers.
    pub fn new() -> Self {
        Self::from(BTreeMap::new())
    }

    /// Images in a tier, oldest assignment first.
    pub fn images(&self, tier: Tier) -> &[ImageId] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The most recently placed image of a tier.
    pub fn preview(&self, tier: Tier) -> Option<&ImageId> {
        self.images(tier).last()
    }

    /// The tier holding `image`, if any.
    pub fn tier_of(&self, image: &str) -> Option<Tier> {
        self.tiers
            .iter()
            .find(|(_, images)| images.iter().any(|i| i == image))
            .map(|(tier, _)| *tier)
    }

    pub fn contains(&self, image: &str) -> bool {
        self.tier_of(image).is_some()
    }

    /// Append `image` to the end of `tier`.
    pub(crate) fn push(&mut self, tier: Tier, image: ImageId) {
        self.tiers.entry(tier).or_default().push(image);
    }

    /// Remove `image` from one tier. Returns whether it was there.
    pub(crate) fn remove_from(&mut self, tier: Tier, image: &str) -> bool {
        match self.tiers.get_mut(&tier) {
            Some(images) => match images.iter().position(|i| i == image) {
                Some(index) => {
                    images.remove(index);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Remove `image` from every tier it appears in.
    pub(crate) fn remove_everywhere(&mut self, image: &str) {
        for images in self.tiers.values_mut() {
            images.retain(|i| i != image);
        }
    }

    /// Iterate over `(tier, images)` in ascending tier order.
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &[ImageId])> {
        self.tiers.iter().map(|(tier, images)| (*tier, images.as_slice()))
    }

    /// Number of rated images across all tiers.
    pub fn rated_count(&self) -> usize {
        self.tiers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rated_count() == 0
    }

    pub fn counts(&self) -> TierCounts {
        let mut counts = TierCounts::default();
        for (tier, images) in self.iter() {
            counts.by_tier[(tier.get() - 1) as usize] = images.len();
        }
        counts
    }
}

/// Number of images per tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    /// Index 0 is tier 1.
    pub by_tier: [usize; 5],
}

impl TierCounts {
    pub fn get(&self, tier: Tier) -> usize {
        self.by_tier[(tier.get() - 1) as usize]
    }

    pub fn total(&self) -> usize {
        self.by_tier.iter().sum()
    }
}

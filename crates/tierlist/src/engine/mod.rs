//! Rating engine: one unrated image at a time, five tiers, an undo stack.
//!
//! # Usage
//!
//! ```
//! use tierlist::engine::{CurrentImage, RatingEngine};
//! use tierlist::Tier;
//!
//! let mut engine = RatingEngine::with_catalog(vec![
//!     "/images/a.jpg".to_string(),
//!     "/images/b.jpg".to_string(),
//! ]);
//!
//! engine.assign(Tier::new(4).unwrap()).unwrap();
//! assert_eq!(engine.current_image().image(), Some("/images/b.jpg"));
//!
//! engine.skip().unwrap();
//! assert_eq!(engine.current_image(), CurrentImage::Exhausted);
//!
//! engine.undo().unwrap();
//! assert_eq!(engine.current_image().image(), Some("/images/b.jpg"));
//! ```

mod action;
mod rating;

pub use action::{Action, ActionLog};
pub use rating::{CurrentImage, Progress, RatingEngine};

//! Tierlist: five-tier image triage.
//!
//! Images are shown one at a time and sorted into tiers from 1 to 5 stars.
//! Every action can be undone, images can be skipped for later, and a review
//! view lets already rated images move between tiers.
//!
//! # Core Principles
//!
//! - **Images are opaque**: an image is only the identifier the store gave it
//! - **Local state wins**: ratings live with the client, the store only holds files
//! - **Save after every change**: a session can be dropped at any moment
//!
//! # Example
//!
//! ```no_run
//! use tierlist::persistence::FileBlobStore;
//! use tierlist::store::HttpStore;
//! use tierlist::{Session, SessionConfig, Tier};
//!
//! let store = HttpStore::new("http://127.0.0.1:3000").unwrap();
//! let mut session = Session::open(store, FileBlobStore::new(".tierlist"), SessionConfig::new());
//!
//! if let Some(image) = session.current_image().image() {
//!     println!("Rating {}", image);
//! }
//! session.assign(Tier::new(3).unwrap()).unwrap();
//! session.export_to("ratingMap.json").unwrap();
//! ```

pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod review;
pub mod session;
pub mod store;
pub mod tier;

pub use config::SessionConfig;
pub use engine::{Action, CurrentImage, Progress, RatingEngine};
pub use error::{Result, TierlistError};
pub use review::ReviewSelection;
pub use session::{MergePolicy, ResetReport, Session};
pub use store::{ObjectStore, Upload};
pub use tier::{ImageId, Tier, TierCounts, TierMap};

//! Client-side persistence of a rating session.
//!
//! Session state is kept in a key-value [`BlobStore`] as four JSON entries
//! per namespace:
//!
//! ```text
//! <namespace>.images             # catalog
//! <namespace>.currentImageIndex  # cursor
//! <namespace>.ratingMap          # tier map
//! <namespace>.history            # undo stack
//! last-namespace                 # dataset the store last reported
//! ```
//!
//! [`FileBlobStore`] keeps each entry in its own file under a state
//! directory; [`MemoryBlobStore`] is the in-memory equivalent.

mod blob;
mod state;

pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use state::{blob_key, PersistedState, ENTRIES};

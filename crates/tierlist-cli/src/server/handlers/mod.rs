//! API request handlers.

mod dataset;
mod images;

pub use dataset::*;
pub use images::*;

//! HTTP object store: dataset id, image listing, uploads and bulk delete
//! over an image directory.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;

//! CLI command implementations.

pub mod export;
pub mod rate;
pub mod reset;
pub mod serve;
pub mod status;
pub mod upload;

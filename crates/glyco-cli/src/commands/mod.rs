//! CLI command implementations.

pub mod init;
pub mod predict;
pub mod normalize;
pub mod model;
pub mod ranges;

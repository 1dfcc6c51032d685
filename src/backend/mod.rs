//! Traverser implementations for trees that live outside this crate

pub mod fs;
pub mod json;

pub use fs::{FsEntry, FsTraverser};
pub use json::{JsonKey, JsonNode, JsonTraverser};

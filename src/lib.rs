//! treeaxis - lazy XPath-style axis queries over any tree
//!
//! A backend describes its tree once by implementing [`Traverser`]; every
//! axis then works on it:
//! - children, ancestors, preceding and following siblings
//! - descendants in pre-order, without recursion, on a pooled cursor stack
//! - an "and self" variant of each
//!
//! Backends shipped with the crate:
//! - [`dom`]: arena document with interned names
//! - [`backend::fs`]: directory trees
//! - [`backend::json`]: `serde_json::Value` documents
//!
//! Axes are lazy and single-pass. Infallible backends get a plain
//! `Iterator`; fallible ones are pulled through [`AxisCursor`].

pub mod axis;
pub mod backend;
pub mod dom;
pub mod error;
pub mod memory;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod pool;
pub mod traverser;

#[cfg(test)]
mod testing;

pub use axis::{navigate, Axis, AxisCursor, AxisIter, TraverserExt};
pub use error::{Error, Result};
pub use pool::{CursorPool, CursorStack, PoolOptions, PoolStats};
pub use traverser::{ParentCache, Traverser};

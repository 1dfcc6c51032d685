//! DOM Module - Arena-based Document
//!
//! In-memory tree backend for the axis engine:
//! - Arena allocation for nodes
//! - NodeId (u32) indices for cache-friendly traversal
//! - String interning for element names and text
//! - [`DomTraverser`], an infallible [`Traverser`](crate::traverser::Traverser)
//!   with exact child counts

pub mod document;
pub mod node;
pub mod strings;
pub mod traverser;

pub use document::{ChildIter, Document, DOCUMENT_NODE};
pub use node::{Node, NodeId, NodeKind};
pub use strings::StringPool;
pub use traverser::DomTraverser;

//! Arena node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// Comment
    Comment,
}

/// A node in the arena
#[derive(Debug, Clone)]
pub struct Node {
    /// Type of this node
    pub kind: NodeKind,
    /// Parent node (None for the document node)
    pub parent: Option<NodeId>,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// Index into string pool for the name (elements) or content (text, comments)
    pub name_id: u32,
    /// Number of children linked under this node
    pub child_count: u32,
    /// Depth in document tree
    pub depth: u16,
}

impl Node {
    fn with_kind(kind: NodeKind, name_id: u32, parent: Option<NodeId>, depth: u16) -> Self {
        Node {
            kind,
            parent,
            first_child: None,
            last_child: None,
            next_sibling: None,
            name_id,
            child_count: 0,
            depth,
        }
    }

    /// Create a new document root node
    pub fn document() -> Self {
        Self::with_kind(NodeKind::Document, 0, None, 0)
    }

    /// Create a new element node
    pub fn element(name_id: u32, parent: Option<NodeId>, depth: u16) -> Self {
        Self::with_kind(NodeKind::Element, name_id, parent, depth)
    }

    /// Create a new text node
    pub fn text(content_id: u32, parent: Option<NodeId>, depth: u16) -> Self {
        Self::with_kind(NodeKind::Text, content_id, parent, depth)
    }

    /// Create a new comment node
    pub fn comment(content_id: u32, parent: Option<NodeId>, depth: u16) -> Self {
        Self::with_kind(NodeKind::Comment, content_id, parent, depth)
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Whether nodes may be appended under this one
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Document | NodeKind::Element)
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }
}

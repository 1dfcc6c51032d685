//! Arena Document
//!
//! Tree storage with:
//! - Arena allocation for nodes
//! - NodeId indices with parent/child/sibling links
//! - String interning for names and text

use super::node::{Node, NodeId, NodeKind};
use super::strings::StringPool;
use super::traverser::DomTraverser;
use crate::axis::TraverserExt;
use crate::pool::CursorPool;

/// Id of the document node, parent of every top-level node
pub const DOCUMENT_NODE: NodeId = 0;

/// A tree stored in arena format
#[derive(Debug)]
pub struct Document {
    /// Arena of nodes
    nodes: Vec<Node>,
    /// Interned strings
    pub strings: StringPool,
    /// First element appended under the document node
    root_element: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document holding only the document node
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(256);
        nodes.push(Node::document());
        Document {
            nodes,
            strings: StringPool::new(),
            root_element: None,
        }
    }

    /// Append an element as the last child of `parent`.
    ///
    /// Returns `None`, leaving the document unchanged, when `parent` is not
    /// in the arena or is a text or comment node.
    pub fn append_element(&mut self, parent: NodeId, name: &str) -> Option<NodeId> {
        let depth = self.child_depth(parent)?;
        let name_id = self.strings.intern(name);
        let id = self.push_child(parent, Node::element(name_id, Some(parent), depth));
        if self.root_element.is_none() && parent == DOCUMENT_NODE {
            self.root_element = Some(id);
        }
        Some(id)
    }

    /// Append a text node as the last child of `parent`
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Option<NodeId> {
        let depth = self.child_depth(parent)?;
        let content_id = self.strings.intern(text);
        Some(self.push_child(parent, Node::text(content_id, Some(parent), depth)))
    }

    /// Append a comment as the last child of `parent`
    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> Option<NodeId> {
        let depth = self.child_depth(parent)?;
        let content_id = self.strings.intern(text);
        Some(self.push_child(parent, Node::comment(content_id, Some(parent), depth)))
    }

    /// Depth of a new child, `None` if `parent` cannot take children
    fn child_depth(&self, parent: NodeId) -> Option<u16> {
        self.get_node(parent)
            .filter(|p| p.is_container())
            .map(|p| p.depth.saturating_add(1))
    }

    /// Push a node whose parent was checked by `child_depth`
    fn push_child(&mut self, parent_id: NodeId, node: Node) -> NodeId {
        let child_id = self.nodes.len() as NodeId;
        self.nodes.push(node);

        let parent = &mut self.nodes[parent_id as usize];
        let previous_last = parent.last_child.replace(child_id);
        if previous_last.is_none() {
            parent.first_child = Some(child_id);
        }
        parent.child_count += 1;
        if let Some(last_id) = previous_last {
            self.nodes[last_id as usize].next_sibling = Some(child_id);
        }
        child_id
    }

    /// Get the document node
    pub fn document_node(&self) -> &Node {
        &self.nodes[DOCUMENT_NODE as usize]
    }

    /// Get root element ID
    pub fn root_element_id(&self) -> Option<NodeId> {
        self.root_element
    }

    /// Get a node by ID
    #[inline]
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Get element name as string
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        if node.is_element() {
            self.strings.get_str(node.name_id)
        } else {
            None
        }
    }

    /// Get the content of a text or comment node
    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        match node.kind {
            NodeKind::Text | NodeKind::Comment => self.strings.get_str(node.name_id),
            _ => None,
        }
    }

    /// Get total number of nodes, the document node included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over children of a node by following sibling links
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter {
            doc: self,
            next: first,
        }
    }

    /// Traverser rooted at `id`, `None` if the id is not in the arena
    pub fn traverser(&self, id: NodeId) -> Option<DomTraverser<'_>> {
        self.get_node(id).map(|_| DomTraverser::new(self, id))
    }

    /// First element named `name` in document order, walking on `pool`
    pub fn find_element<'d>(
        &'d self,
        name: &str,
        pool: &CursorPool<DomTraverser<'d>>,
    ) -> Option<NodeId> {
        let name_id = self.lookup_name(name)?;
        DomTraverser::new(self, DOCUMENT_NODE)
            .descendants_in(pool)
            .find(|&id| self.is_element_named(id, name_id))
    }

    /// Every element named `name` in document order, walking on `pool`
    pub fn find_all_elements<'d>(
        &'d self,
        name: &str,
        pool: &CursorPool<DomTraverser<'d>>,
    ) -> Vec<NodeId> {
        let Some(name_id) = self.lookup_name(name) else {
            return Vec::new();
        };
        DomTraverser::new(self, DOCUMENT_NODE)
            .descendants_in(pool)
            .filter(|&id| self.is_element_named(id, name_id))
            .collect()
    }

    fn is_element_named(&self, id: NodeId, name_id: u32) -> bool {
        self.get_node(id)
            .is_some_and(|n| n.is_element() && n.name_id == name_id)
    }

    fn lookup_name(&self, name: &str) -> Option<u32> {
        self.strings.lookup(name).filter(|&id| id != 0)
    }
}

/// Iterator over child nodes
pub struct ChildIter<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

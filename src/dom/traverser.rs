//! Traverser over the arena document

use std::convert::Infallible;

use super::document::Document;
use super::node::NodeId;
use crate::traverser::{ParentCache, Traverser};

#[derive(Debug, Clone, Copy)]
enum ChildCursor {
    Uninitialized,
    At(Option<NodeId>),
}

/// Cursor over a [`Document`] rooted at one node.
///
/// Sibling navigation follows the arena links: the following-sibling cursor
/// starts at the origin's `next_sibling`, the preceding-sibling cursor at the
/// parent's `first_child` and stops when it reaches the origin.
#[derive(Debug, Clone)]
pub struct DomTraverser<'a> {
    doc: &'a Document,
    origin: NodeId,
    child: ChildCursor,
    following: ParentCache<Option<NodeId>>,
    preceding: ParentCache<Option<NodeId>>,
}

impl<'a> DomTraverser<'a> {
    pub(crate) fn new(doc: &'a Document, origin: NodeId) -> Self {
        DomTraverser {
            doc,
            origin,
            child: ChildCursor::Uninitialized,
            following: ParentCache::Uninitialized,
            preceding: ParentCache::Uninitialized,
        }
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    fn parent(&self) -> Option<NodeId> {
        self.doc.get_node(self.origin).and_then(|n| n.parent)
    }
}

impl<'a> Traverser for DomTraverser<'a> {
    type Node = NodeId;
    type Error = Infallible;

    #[inline]
    fn origin(&self) -> NodeId {
        self.origin
    }

    fn try_get_parent(&self) -> Result<Option<NodeId>, Infallible> {
        Ok(self.parent())
    }

    fn try_get_child_count(&mut self) -> Result<Option<usize>, Infallible> {
        Ok(Some(
            self.doc
                .get_node(self.origin)
                .map_or(0, |n| n.child_count as usize),
        ))
    }

    fn try_get_has_child(&mut self) -> Result<Option<bool>, Infallible> {
        Ok(Some(
            self.doc
                .get_node(self.origin)
                .is_some_and(|n| n.has_children()),
        ))
    }

    fn try_get_next_child(&mut self) -> Result<Option<NodeId>, Infallible> {
        let current = match self.child {
            ChildCursor::Uninitialized => self.doc.get_node(self.origin).and_then(|n| n.first_child),
            ChildCursor::At(next) => next,
        };
        let following = current.and_then(|id| self.doc.get_node(id)?.next_sibling);
        self.child = ChildCursor::At(following);
        Ok(current)
    }

    fn try_get_next_sibling(&mut self) -> Result<Option<NodeId>, Infallible> {
        let doc = self.doc;
        let origin = self.origin;
        let parent = self.parent();
        let Some(cursor) = self.following.get_or_resolve(|| {
            Ok::<_, Infallible>(parent.map(|_| doc.get_node(origin).and_then(|n| n.next_sibling)))
        })?
        else {
            return Ok(None);
        };
        let current = *cursor;
        *cursor = current.and_then(|id| doc.get_node(id)?.next_sibling);
        Ok(current)
    }

    fn try_get_previous_sibling(&mut self) -> Result<Option<NodeId>, Infallible> {
        let doc = self.doc;
        let origin = self.origin;
        let parent = self.parent();
        let Some(cursor) = self.preceding.get_or_resolve(|| {
            Ok::<_, Infallible>(parent.map(|p| doc.get_node(p).and_then(|n| n.first_child)))
        })?
        else {
            return Ok(None);
        };
        match *cursor {
            Some(id) if id != origin => {
                *cursor = doc.get_node(id).and_then(|n| n.next_sibling);
                Ok(Some(id))
            }
            _ => {
                *cursor = None;
                Ok(None)
            }
        }
    }

    fn convert_to_traverser(&self, node: NodeId) -> Result<Self, Infallible> {
        Ok(DomTraverser::new(self.doc, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{Axis, TraverserExt};
    use crate::dom::DOCUMENT_NODE;
    use crate::pool::CursorPool;
    use pretty_assertions::assert_eq;

    /// Root{ A{ A1, A2 }, B }
    fn scenario() -> Document {
        let mut doc = Document::new();
        let root = doc.append_element(DOCUMENT_NODE, "Root").unwrap();
        let a = doc.append_element(root, "A").unwrap();
        doc.append_element(a, "A1").unwrap();
        doc.append_element(a, "A2").unwrap();
        doc.append_element(root, "B").unwrap();
        doc
    }

    fn names(doc: &Document, ids: impl IntoIterator<Item = NodeId>) -> Vec<&str> {
        ids.into_iter()
            .map(|id| doc.node_name(id).unwrap_or("#document"))
            .collect()
    }

    fn at<'a>(doc: &'a Document, name: &str) -> DomTraverser<'a> {
        let id = doc.find_element(name, &CursorPool::new()).unwrap();
        doc.traverser(id).unwrap()
    }

    #[test]
    fn test_scenario_axes() {
        let doc = scenario();
        let pool = CursorPool::new();
        assert_eq!(
            names(&doc, at(&doc, "Root").descendants_in(&pool)),
            ["A", "A1", "A2", "B"]
        );
        assert_eq!(
            names(&doc, at(&doc, "Root").descendants_and_self_in(&pool)),
            ["Root", "A", "A1", "A2", "B"]
        );
        assert_eq!(names(&doc, at(&doc, "Root").children()), ["A", "B"]);
        assert_eq!(names(&doc, at(&doc, "A1").ancestors()), ["A", "Root", "#document"]);
        assert_eq!(names(&doc, at(&doc, "A2").before_self()), ["A1"]);
        assert_eq!(names(&doc, at(&doc, "A1").after_self()), ["A2"]);
    }

    #[test]
    fn test_document_node_is_the_root() {
        let doc = scenario();
        let top = doc.traverser(DOCUMENT_NODE).unwrap();
        assert_eq!(top.clone().ancestors().count(), 0);
        assert_eq!(top.clone().ancestors_and_self().collect::<Vec<_>>(), [DOCUMENT_NODE]);
        assert_eq!(top.clone().before_self_and_self().collect::<Vec<_>>(), [DOCUMENT_NODE]);
        assert_eq!(top.after_self().count(), 0);
    }

    #[test]
    fn test_mixed_content_order() {
        let mut doc = Document::new();
        let root = doc.append_element(DOCUMENT_NODE, "p").unwrap();
        doc.append_text(root, "one ").unwrap();
        let em = doc.append_element(root, "em").unwrap();
        doc.append_text(em, "two").unwrap();
        doc.append_comment(root, "three").unwrap();

        let pool = CursorPool::new();
        let texts: Vec<_> = doc
            .traverser(root)
            .unwrap()
            .descendants_in(&pool)
            .map(|id| doc.text_content(id).or(doc.node_name(id)).unwrap())
            .collect();
        assert_eq!(texts, ["one ", "em", "two", "three"]);
    }

    #[test]
    fn test_child_cursor_is_idempotent() {
        let doc = scenario();
        let mut t = at(&doc, "A");
        assert_eq!(t.try_get_child_count(), Ok(Some(2)));
        assert!(t.try_get_next_child().unwrap().is_some());
        assert!(t.try_get_next_child().unwrap().is_some());
        for _ in 0..3 {
            assert_eq!(t.try_get_next_child(), Ok(None));
        }
        let mut leaf = at(&doc, "B");
        assert_eq!(leaf.try_get_has_child(), Ok(Some(false)));
        assert_eq!(leaf.try_get_next_child(), Ok(None));
    }

    #[test]
    fn test_previous_sibling_stops_at_origin() {
        let mut doc = Document::new();
        let root = doc.append_element(DOCUMENT_NODE, "r").unwrap();
        let kids: Vec<_> = (0..5)
            .map(|i| doc.append_element(root, &format!("k{}", i)).unwrap())
            .collect();
        for (i, &kid) in kids.iter().enumerate() {
            let before: Vec<_> = doc.traverser(kid).unwrap().before_self().collect();
            let after: Vec<_> = doc.traverser(kid).unwrap().after_self().collect();
            assert_eq!(before, &kids[..i]);
            assert_eq!(after, &kids[i + 1..]);
        }
        let mut t = doc.traverser(kids[2]).unwrap();
        while t.try_get_previous_sibling().unwrap().is_some() {}
        assert_eq!(t.try_get_previous_sibling(), Ok(None));

        let mut following = doc.traverser(kids[3]).unwrap().after_self_and_self();
        assert_eq!(following.by_ref().collect::<Vec<_>>(), &kids[3..]);
        for _ in 0..3 {
            assert_eq!(following.next(), None);
        }
    }

    #[test]
    fn test_pooled_descendants_reuse_storage() {
        let doc = scenario();
        let root = doc.root_element_id().unwrap();
        let pool = CursorPool::new();
        for _ in 0..25 {
            let n = doc
                .traverser(root)
                .unwrap()
                .axis(Axis::DescendantOrSelf, &pool)
                .count();
            assert_eq!(n, 5);
        }
        assert_eq!(pool.stats().allocated, 1);
        assert_eq!(pool.stats().peak_depth, 2);
    }

    #[test]
    fn test_explicit_pool_for_borrowed_traverser() {
        let doc = scenario();
        let root = doc.root_element_id().unwrap();
        let pool: CursorPool<DomTraverser<'_>> = CursorPool::new();
        let first: Vec<_> = doc.traverser(root).unwrap().descendants_in(&pool).collect();
        let second: Vec<_> = doc.traverser(root).unwrap().descendants_in(&pool).collect();
        assert_eq!(first, second);
        assert_eq!(pool.stats().rented, 2);
    }
}

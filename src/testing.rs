//! Instrumented in-memory backend shared by the axis tests.

use std::cell::Cell;

use crate::traverser::{ParentCache, Traverser};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("listing children of node {0} failed")]
pub struct ListError(pub usize);

#[derive(Debug)]
struct TestNode {
    name: String,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Tree built from a compact literal such as `Root(A(A1,A2),B)`.
///
/// Counts live traversers so tests can check that axes release every
/// cursor they create.
#[derive(Debug)]
pub struct TestTree {
    nodes: Vec<TestNode>,
    hints: bool,
    fail_children_of: Option<usize>,
    live: Cell<isize>,
    created: Cell<usize>,
}

impl TestTree {
    pub fn parse(literal: &str) -> Self {
        let mut tree = TestTree {
            nodes: Vec::new(),
            hints: true,
            fail_children_of: None,
            live: Cell::new(0),
            created: Cell::new(0),
        };
        let bytes: Vec<char> = literal.chars().filter(|c| !c.is_whitespace()).collect();
        let mut pos = 0;
        tree.parse_node(&bytes, &mut pos, None);
        assert_eq!(pos, bytes.len(), "trailing input in tree literal");
        tree
    }

    fn parse_node(&mut self, input: &[char], pos: &mut usize, parent: Option<usize>) -> usize {
        let start = *pos;
        while *pos < input.len() && !matches!(input[*pos], '(' | ')' | ',') {
            *pos += 1;
        }
        let id = self.nodes.len();
        self.nodes.push(TestNode {
            name: input[start..*pos].iter().collect(),
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            self.nodes[p].children.push(id);
        }
        if *pos < input.len() && input[*pos] == '(' {
            *pos += 1;
            loop {
                self.parse_node(input, pos, Some(id));
                match input.get(*pos) {
                    Some(',') => *pos += 1,
                    Some(')') => {
                        *pos += 1;
                        break;
                    }
                    other => panic!("unexpected {:?} in tree literal", other),
                }
            }
        }
        id
    }

    /// A chain `n0(n1(n2(...)))` of the given depth
    pub fn chain(depth: usize) -> Self {
        let nodes = (0..depth)
            .map(|i| TestNode {
                name: format!("n{}", i),
                parent: i.checked_sub(1),
                children: if i + 1 < depth { vec![i + 1] } else { Vec::new() },
            })
            .collect();
        TestTree {
            nodes,
            hints: true,
            fail_children_of: None,
            live: Cell::new(0),
            created: Cell::new(0),
        }
    }

    pub fn without_hints(mut self) -> Self {
        self.hints = false;
        self
    }

    pub fn failing_children_of(mut self, name: &str) -> Self {
        self.fail_children_of = Some(self.id(name));
        self
    }

    pub fn root(&self) -> usize {
        0
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn id(&self, name: &str) -> usize {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .unwrap_or_else(|| panic!("no node named {}", name))
    }

    pub fn names(&self, ids: &[usize]) -> Vec<&str> {
        ids.iter().map(|&id| self.nodes[id].name.as_str()).collect()
    }

    pub fn traverser(&self, name: &str) -> TestTraverser<'_> {
        TestTraverser::new(self, self.id(name))
    }

    pub fn traverser_at(&self, id: usize) -> TestTraverser<'_> {
        TestTraverser::new(self, id)
    }

    /// Reference pre-order, recursive
    pub fn preorder(&self, id: usize, out: &mut Vec<usize>) {
        out.push(id);
        for &child in &self.nodes[id].children {
            self.preorder(child, out);
        }
    }

    pub fn children_of(&self, id: usize) -> &[usize] {
        &self.nodes[id].children
    }

    pub fn live_traversers(&self) -> isize {
        self.live.get()
    }

    pub fn created_traversers(&self) -> usize {
        self.created.get()
    }
}

pub struct TestTraverser<'a> {
    tree: &'a TestTree,
    id: usize,
    next_child: usize,
    following: ParentCache<usize>,
    preceding: ParentCache<(usize, usize)>,
}

impl<'a> TestTraverser<'a> {
    fn new(tree: &'a TestTree, id: usize) -> Self {
        tree.live.set(tree.live.get() + 1);
        tree.created.set(tree.created.get() + 1);
        TestTraverser {
            tree,
            id,
            next_child: 0,
            following: ParentCache::Uninitialized,
            preceding: ParentCache::Uninitialized,
        }
    }
}

impl Drop for TestTraverser<'_> {
    fn drop(&mut self) {
        self.tree.live.set(self.tree.live.get() - 1);
    }
}

impl<'a> Traverser for TestTraverser<'a> {
    type Node = usize;
    type Error = ListError;

    fn origin(&self) -> usize {
        self.id
    }

    fn try_get_parent(&self) -> Result<Option<usize>, ListError> {
        Ok(self.tree.nodes[self.id].parent)
    }

    fn try_get_child_count(&mut self) -> Result<Option<usize>, ListError> {
        Ok(self
            .tree
            .hints
            .then(|| self.tree.nodes[self.id].children.len()))
    }

    fn try_get_has_child(&mut self) -> Result<Option<bool>, ListError> {
        Ok(self
            .tree
            .hints
            .then(|| !self.tree.nodes[self.id].children.is_empty()))
    }

    fn try_get_next_child(&mut self) -> Result<Option<usize>, ListError> {
        if self.tree.fail_children_of == Some(self.id) {
            return Err(ListError(self.id));
        }
        let children = &self.tree.nodes[self.id].children;
        let next = children.get(self.next_child).copied();
        if next.is_some() {
            self.next_child += 1;
        }
        Ok(next)
    }

    fn try_get_next_sibling(&mut self) -> Result<Option<usize>, ListError> {
        let tree = self.tree;
        let id = self.id;
        let Some(index) = self.following.get_or_resolve(|| {
            Ok::<_, ListError>(tree.nodes[id].parent.map(|p| {
                let pos = tree.nodes[p].children.iter().position(|&c| c == id);
                pos.map_or(usize::MAX, |pos| pos + 1)
            }))
        })?
        else {
            return Ok(None);
        };
        let Some(parent) = tree.nodes[id].parent else {
            return Ok(None);
        };
        let next = tree.nodes[parent].children.get(*index).copied();
        if next.is_some() {
            *index += 1;
        }
        Ok(next)
    }

    fn try_get_previous_sibling(&mut self) -> Result<Option<usize>, ListError> {
        let tree = self.tree;
        let id = self.id;
        let Some((parent, cursor)) = self
            .preceding
            .get_or_resolve(|| Ok::<_, ListError>(tree.nodes[id].parent.map(|p| (p, 0))))?
        else {
            return Ok(None);
        };
        match tree.nodes[*parent].children.get(*cursor).copied() {
            Some(sibling) if sibling != id => {
                *cursor += 1;
                Ok(Some(sibling))
            }
            _ => Ok(None),
        }
    }

    fn convert_to_traverser(&self, node: usize) -> Result<Self, ListError> {
        Ok(TestTraverser::new(self.tree, node))
    }
}

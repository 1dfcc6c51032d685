//! Traverser over a `serde_json::Value`
//!
//! Objects and arrays are interior nodes, every other value is a leaf.
//! Object members come out in map iteration order, array items by index.

use std::convert::Infallible;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::traverser::{ParentCache, Traverser};

/// How a value is reached from its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKey<'a> {
    Root,
    Field(&'a str),
    Index(usize),
}

impl fmt::Display for JsonKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonKey::Root => Ok(()),
            JsonKey::Field(name) => f.write_str(name),
            JsonKey::Index(i) => write!(f, "{}", i),
        }
    }
}

/// A position in a JSON document.
///
/// Holds the chain of parents, so cloning is a reference-count bump.
/// Two nodes are equal when they refer to the same value in memory.
#[derive(Clone)]
pub struct JsonNode<'a> {
    key: JsonKey<'a>,
    value: &'a Value,
    parent: Option<Rc<JsonNode<'a>>>,
}

impl<'a> JsonNode<'a> {
    pub fn root(value: &'a Value) -> Self {
        JsonNode {
            key: JsonKey::Root,
            value,
            parent: None,
        }
    }

    fn child(parent: &Rc<JsonNode<'a>>, key: JsonKey<'a>, value: &'a Value) -> Self {
        JsonNode {
            key,
            value,
            parent: Some(Rc::clone(parent)),
        }
    }

    #[inline]
    pub fn key(&self) -> JsonKey<'a> {
        self.key
    }

    #[inline]
    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn parent(&self) -> Option<&JsonNode<'a>> {
        self.parent.as_deref()
    }

    /// JSON pointer (RFC 6901) from the document root
    pub fn pointer(&self) -> String {
        let mut keys = Vec::new();
        let mut node = Some(self);
        while let Some(n) = node {
            if n.key != JsonKey::Root {
                keys.push(n.key);
            }
            node = n.parent();
        }
        let mut out = String::new();
        for key in keys.iter().rev() {
            out.push('/');
            out.push_str(&key.to_string().replace('~', "~0").replace('/', "~1"));
        }
        out
    }
}

impl PartialEq for JsonNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.value, other.value)
    }
}

impl Eq for JsonNode<'_> {}

impl fmt::Debug for JsonNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonNode")
            .field("pointer", &self.pointer())
            .field("value", self.value)
            .finish()
    }
}

/// Children of one value, with the key each is reached by
enum Members<'a> {
    Object(serde_json::map::Iter<'a>),
    Array(std::iter::Enumerate<std::slice::Iter<'a, Value>>),
    Empty,
}

impl<'a> Members<'a> {
    fn of(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => Members::Object(map.iter()),
            Value::Array(items) => Members::Array(items.iter().enumerate()),
            _ => Members::Empty,
        }
    }
}

impl<'a> Iterator for Members<'a> {
    type Item = (JsonKey<'a>, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Members::Object(iter) => iter
                .next()
                .map(|(name, value)| (JsonKey::Field(name.as_str()), value)),
            Members::Array(iter) => iter.next().map(|(i, value)| (JsonKey::Index(i), value)),
            Members::Empty => None,
        }
    }
}

fn member_count(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.len(),
        Value::Array(items) => items.len(),
        _ => 0,
    }
}

/// Sibling cursor: the shared parent and the walk over its members
struct SiblingScan<'a> {
    parent: Rc<JsonNode<'a>>,
    members: Members<'a>,
}

impl<'a> SiblingScan<'a> {
    fn over(parent: &Rc<JsonNode<'a>>) -> Self {
        SiblingScan {
            parent: Rc::clone(parent),
            members: Members::of(parent.value),
        }
    }
}

/// Cursor over a JSON document rooted at one node
pub struct JsonTraverser<'a> {
    origin: JsonNode<'a>,
    /// Origin wrapped once so its children can share it as parent
    shared: Option<Rc<JsonNode<'a>>>,
    children: Option<Members<'a>>,
    following: ParentCache<SiblingScan<'a>>,
    preceding: ParentCache<SiblingScan<'a>>,
}

impl<'a> JsonTraverser<'a> {
    /// Traverser at the document root
    pub fn new(value: &'a Value) -> Self {
        Self::from_node(JsonNode::root(value))
    }

    pub fn from_node(origin: JsonNode<'a>) -> Self {
        JsonTraverser {
            origin,
            shared: None,
            children: None,
            following: ParentCache::Uninitialized,
            preceding: ParentCache::Uninitialized,
        }
    }

    fn shared_origin(&mut self) -> Rc<JsonNode<'a>> {
        let origin = &self.origin;
        Rc::clone(self.shared.get_or_insert_with(|| Rc::new(origin.clone())))
    }
}

impl fmt::Debug for JsonTraverser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonTraverser")
            .field("origin", &self.origin.pointer())
            .finish_non_exhaustive()
    }
}

impl<'a> Traverser for JsonTraverser<'a> {
    type Node = JsonNode<'a>;
    type Error = Infallible;

    fn origin(&self) -> JsonNode<'a> {
        self.origin.clone()
    }

    fn try_get_parent(&self) -> Result<Option<JsonNode<'a>>, Infallible> {
        Ok(self.origin.parent().cloned())
    }

    fn try_get_child_count(&mut self) -> Result<Option<usize>, Infallible> {
        Ok(Some(member_count(self.origin.value)))
    }

    fn try_get_has_child(&mut self) -> Result<Option<bool>, Infallible> {
        Ok(Some(member_count(self.origin.value) > 0))
    }

    fn try_get_next_child(&mut self) -> Result<Option<JsonNode<'a>>, Infallible> {
        let value = self.origin.value;
        let Some((key, child)) = self
            .children
            .get_or_insert_with(|| Members::of(value))
            .next()
        else {
            return Ok(None);
        };
        let parent = self.shared_origin();
        Ok(Some(JsonNode::child(&parent, key, child)))
    }

    fn try_get_next_sibling(&mut self) -> Result<Option<JsonNode<'a>>, Infallible> {
        let origin = &self.origin;
        let Some(scan) = self.following.get_or_resolve(|| {
            Ok::<_, Infallible>(origin.parent.as_ref().map(|parent| {
                let mut scan = SiblingScan::over(parent);
                // Skip up to and including the origin itself
                let _ = scan.members.by_ref().find(|&(key, _)| key == origin.key);
                scan
            }))
        })?
        else {
            return Ok(None);
        };
        Ok(scan
            .members
            .next()
            .map(|(key, value)| JsonNode::child(&scan.parent, key, value)))
    }

    fn try_get_previous_sibling(&mut self) -> Result<Option<JsonNode<'a>>, Infallible> {
        let origin = &self.origin;
        let Some(scan) = self.preceding.get_or_resolve(|| {
            Ok::<_, Infallible>(origin.parent.as_ref().map(SiblingScan::over))
        })?
        else {
            return Ok(None);
        };
        match scan.members.next() {
            Some((key, value)) if key != origin.key => {
                Ok(Some(JsonNode::child(&scan.parent, key, value)))
            }
            _ => {
                scan.members = Members::Empty;
                Ok(None)
            }
        }
    }

    fn convert_to_traverser(&self, node: JsonNode<'a>) -> Result<Self, Infallible> {
        Ok(JsonTraverser::from_node(node))
    }
}

//! Traverser capability contract
//!
//! A backend exposes its tree to the axis engine by implementing [`Traverser`]
//! for a cursor type bound to one node. Every axis in [`crate::axis`] is
//! written once against this trait and nothing else.

/// Per-node navigation cursor implemented by each tree backend.
///
/// A traverser is built for one node (its origin) and consumed by a single
/// axis query. The stateful operations only move forward: once
/// `try_get_next_child`, `try_get_next_sibling` or `try_get_previous_sibling`
/// returns `Ok(None)` it must keep returning `Ok(None)`.
///
/// Resources held by a traverser (open directory handles, enumerators) are
/// released by `Drop`; the axis engine drops every traverser it creates as
/// soon as it is exhausted or replaced.
///
/// Mutating the underlying tree while a traverser over it is alive is
/// undefined. Borrow-based backends rule it out at compile time.
pub trait Traverser: Sized {
    /// Handle to a position in the backend tree
    type Node: Clone;
    /// Failure of a backend primitive; `Infallible` for in-memory backends
    type Error: std::error::Error;

    /// The node this traverser was built from
    fn origin(&self) -> Self::Node;

    /// Parent of the origin, `None` at the root
    fn try_get_parent(&self) -> Result<Option<Self::Node>, Self::Error>;

    /// Number of children, if the backend can tell cheaply
    fn try_get_child_count(&mut self) -> Result<Option<usize>, Self::Error> {
        Ok(None)
    }

    /// Whether the origin has any child, if the backend can tell cheaply
    fn try_get_has_child(&mut self) -> Result<Option<bool>, Self::Error> {
        Ok(None)
    }

    /// Next child of the origin in backend order
    fn try_get_next_child(&mut self) -> Result<Option<Self::Node>, Self::Error>;

    /// Next sibling after the origin.
    ///
    /// The first call resolves the parent and caches the outcome, including
    /// the absence of a parent.
    fn try_get_next_sibling(&mut self) -> Result<Option<Self::Node>, Self::Error>;

    /// Next sibling before the origin, in ascending order.
    ///
    /// Scans from the parent's first child and stops exactly at the origin.
    fn try_get_previous_sibling(&mut self) -> Result<Option<Self::Node>, Self::Error>;

    /// Fresh traverser rooted at `node`
    fn convert_to_traverser(&self, node: Self::Node) -> Result<Self, Self::Error>;
}

/// Lazily resolved parent state for sibling navigation.
///
/// `P` is whatever a backend keeps once the parent is known: the parent
/// handle plus its position in the parent's children.
#[derive(Debug, Clone, Default)]
pub enum ParentCache<P> {
    /// Parent not looked up yet
    #[default]
    Uninitialized,
    /// Looked up; the origin is a root
    NoParent,
    /// Looked up; sibling cursor state
    HasParent(P),
}

impl<P> ParentCache<P> {
    /// Resolve the parent on first use, then hand out the cached state.
    ///
    /// `resolve` runs at most once per successful lookup; a `NoParent`
    /// outcome is remembered so later calls return `None` immediately.
    pub fn get_or_resolve<E>(
        &mut self,
        resolve: impl FnOnce() -> Result<Option<P>, E>,
    ) -> Result<Option<&mut P>, E> {
        if let ParentCache::Uninitialized = self {
            *self = match resolve()? {
                Some(state) => ParentCache::HasParent(state),
                None => ParentCache::NoParent,
            };
        }
        match self {
            ParentCache::HasParent(state) => Ok(Some(state)),
            _ => Ok(None),
        }
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, ParentCache::Uninitialized)
    }
}

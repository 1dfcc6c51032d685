//! Axis Engine
//!
//! The five traversal strategies, each with an "and self" variant:
//! - child, child-or-self
//! - descendant, descendant-or-self
//! - ancestor, ancestor-or-self
//! - preceding-sibling, preceding-sibling-or-self
//! - following-sibling, following-sibling-or-self
//!
//! Every axis is a lazy, forward-only cursor over a [`Traverser`]. Nothing is
//! computed until the caller pulls, and a fresh axis call always starts from
//! fresh state.

use std::fmt;
use std::iter::FusedIterator;

use crate::pool::CursorPool;
use crate::traverser::Traverser;

/// `Iterator` for axes over traversers that cannot fail
macro_rules! infallible_iterator {
    ($axis:ident) => {
        impl<Tr> Iterator for $axis<Tr>
        where
            Tr: $crate::traverser::Traverser<Error = ::std::convert::Infallible>,
        {
            type Item = Tr::Node;

            #[inline]
            fn next(&mut self) -> Option<Tr::Node> {
                match $crate::axis::AxisCursor::try_next(self) {
                    Ok(node) => node,
                    Err(never) => match never {},
                }
            }
        }

        impl<Tr> ::std::iter::FusedIterator for $axis<Tr> where
            Tr: $crate::traverser::Traverser<Error = ::std::convert::Infallible>
        {
        }
    };
}
pub(crate) use infallible_iterator;

mod ancestors;
mod children;
mod descendants;
mod siblings;

pub use ancestors::Ancestors;
pub use children::Children;
pub use descendants::Descendants;
pub use siblings::{AfterSelf, BeforeSelf};

/// Pull-based cursor shared by every axis.
///
/// After it returns `Ok(None)` or an error, every later call returns
/// `Ok(None)`.
pub trait AxisCursor {
    type Node;
    type Error;

    /// Pull the next node
    fn try_next(&mut self) -> Result<Option<Self::Node>, Self::Error>;

    /// Iterator of `Result`s, usable with fallible backends
    fn results(self) -> Results<Self>
    where
        Self: Sized,
    {
        Results { axis: self }
    }

    /// Drain the axis, stopping at the first error
    fn try_to_vec(mut self) -> Result<Vec<Self::Node>, Self::Error>
    where
        Self: Sized,
    {
        let mut out = Vec::new();
        while let Some(node) = self.try_next()? {
            out.push(node);
        }
        Ok(out)
    }

    /// Count the remaining nodes, stopping at the first error
    fn try_count(mut self) -> Result<usize, Self::Error>
    where
        Self: Sized,
    {
        let mut count = 0;
        while self.try_next()?.is_some() {
            count += 1;
        }
        Ok(count)
    }
}

/// Adapter yielding `Result<Node, Error>`; ends after the first error
pub struct Results<A> {
    axis: A,
}

impl<A: AxisCursor> Iterator for Results<A> {
    type Item = Result<A::Node, A::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.axis.try_next().transpose()
    }
}

impl<A: AxisCursor> FusedIterator for Results<A> {}

/// Drop the traverser once a step is not a node
#[inline]
pub(crate) fn settle<Tr, T, E>(
    slot: &mut Option<Tr>,
    step: Result<Option<T>, E>,
) -> Result<Option<T>, E> {
    if !matches!(step, Ok(Some(_))) {
        *slot = None;
    }
    step
}

/// Axis kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Child,
    ChildOrSelf,
    Descendant,
    DescendantOrSelf,
    Ancestor,
    AncestorOrSelf,
    PrecedingSibling,
    PrecedingSiblingOrSelf,
    FollowingSibling,
    FollowingSiblingOrSelf,
}

impl Axis {
    pub const ALL: [Axis; 10] = [
        Axis::Child,
        Axis::ChildOrSelf,
        Axis::Descendant,
        Axis::DescendantOrSelf,
        Axis::Ancestor,
        Axis::AncestorOrSelf,
        Axis::PrecedingSibling,
        Axis::PrecedingSiblingOrSelf,
        Axis::FollowingSibling,
        Axis::FollowingSiblingOrSelf,
    ];

    /// Parse an axis name.
    ///
    /// Accepts the XPath spellings (`descendant-or-self`) and the
    /// and-self spellings (`descendants-and-self`, `before-self`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "child" | "children" => Some(Axis::Child),
            "child-or-self" | "children-and-self" => Some(Axis::ChildOrSelf),
            "descendant" | "descendants" => Some(Axis::Descendant),
            "descendant-or-self" | "descendants-and-self" => Some(Axis::DescendantOrSelf),
            "ancestor" | "ancestors" => Some(Axis::Ancestor),
            "ancestor-or-self" | "ancestors-and-self" => Some(Axis::AncestorOrSelf),
            "preceding-sibling" | "before-self" => Some(Axis::PrecedingSibling),
            "preceding-sibling-or-self" | "before-self-and-self" => {
                Some(Axis::PrecedingSiblingOrSelf)
            }
            "following-sibling" | "after-self" => Some(Axis::FollowingSibling),
            "following-sibling-or-self" | "after-self-and-self" => {
                Some(Axis::FollowingSiblingOrSelf)
            }
            _ => None,
        }
    }

    /// XPath-style name
    pub fn name(self) -> &'static str {
        match self {
            Axis::Child => "child",
            Axis::ChildOrSelf => "child-or-self",
            Axis::Descendant => "descendant",
            Axis::DescendantOrSelf => "descendant-or-self",
            Axis::Ancestor => "ancestor",
            Axis::AncestorOrSelf => "ancestor-or-self",
            Axis::PrecedingSibling => "preceding-sibling",
            Axis::PrecedingSiblingOrSelf => "preceding-sibling-or-self",
            Axis::FollowingSibling => "following-sibling",
            Axis::FollowingSiblingOrSelf => "following-sibling-or-self",
        }
    }

    pub fn includes_self(self) -> bool {
        matches!(
            self,
            Axis::ChildOrSelf
                | Axis::DescendantOrSelf
                | Axis::AncestorOrSelf
                | Axis::PrecedingSiblingOrSelf
                | Axis::FollowingSiblingOrSelf
        )
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Axis::from_name(s).ok_or_else(|| format!("Unknown axis: {}", s))
    }
}

/// Any axis, chosen at runtime
pub enum AxisIter<Tr> {
    Children(Children<Tr>),
    Descendants(Descendants<Tr>),
    Ancestors(Ancestors<Tr>),
    BeforeSelf(BeforeSelf<Tr>),
    AfterSelf(AfterSelf<Tr>),
}

impl<Tr: Traverser> AxisCursor for AxisIter<Tr> {
    type Node = Tr::Node;
    type Error = Tr::Error;

    fn try_next(&mut self) -> Result<Option<Tr::Node>, Tr::Error> {
        match self {
            AxisIter::Children(axis) => axis.try_next(),
            AxisIter::Descendants(axis) => axis.try_next(),
            AxisIter::Ancestors(axis) => axis.try_next(),
            AxisIter::BeforeSelf(axis) => axis.try_next(),
            AxisIter::AfterSelf(axis) => axis.try_next(),
        }
    }
}

infallible_iterator!(AxisIter);

/// Navigate along an axis from the traverser's origin
pub fn navigate<Tr: Traverser>(traverser: Tr, axis: Axis, pool: &CursorPool<Tr>) -> AxisIter<Tr> {
    let with_self = axis.includes_self();
    match axis {
        Axis::Child | Axis::ChildOrSelf => AxisIter::Children(Children::new(traverser, with_self)),
        Axis::Descendant | Axis::DescendantOrSelf => {
            AxisIter::Descendants(Descendants::new(traverser, with_self, pool.clone()))
        }
        Axis::Ancestor | Axis::AncestorOrSelf => {
            AxisIter::Ancestors(Ancestors::new(traverser, with_self))
        }
        Axis::PrecedingSibling | Axis::PrecedingSiblingOrSelf => {
            AxisIter::BeforeSelf(BeforeSelf::new(traverser, with_self))
        }
        Axis::FollowingSibling | Axis::FollowingSiblingOrSelf => {
            AxisIter::AfterSelf(AfterSelf::new(traverser, with_self))
        }
    }
}

/// Axis constructors on every traverser
pub trait TraverserExt: Traverser {
    fn children(self) -> Children<Self> {
        Children::new(self, false)
    }

    fn children_and_self(self) -> Children<Self> {
        Children::new(self, true)
    }

    fn ancestors(self) -> Ancestors<Self> {
        Ancestors::new(self, false)
    }

    fn ancestors_and_self(self) -> Ancestors<Self> {
        Ancestors::new(self, true)
    }

    fn before_self(self) -> BeforeSelf<Self> {
        BeforeSelf::new(self, false)
    }

    fn before_self_and_self(self) -> BeforeSelf<Self> {
        BeforeSelf::new(self, true)
    }

    fn after_self(self) -> AfterSelf<Self> {
        AfterSelf::new(self, false)
    }

    fn after_self_and_self(self) -> AfterSelf<Self> {
        AfterSelf::new(self, true)
    }

    /// Descendants on this thread's pool for `Self`.
    ///
    /// Traversers that borrow their tree are not `'static`; they pass a pool
    /// to [`descendants_in`](Self::descendants_in) instead.
    fn descendants(self) -> Descendants<Self>
    where
        Self: 'static,
    {
        Descendants::new(self, false, CursorPool::local())
    }

    fn descendants_and_self(self) -> Descendants<Self>
    where
        Self: 'static,
    {
        Descendants::new(self, true, CursorPool::local())
    }

    fn descendants_in(self, pool: &CursorPool<Self>) -> Descendants<Self> {
        Descendants::new(self, false, pool.clone())
    }

    fn descendants_and_self_in(self, pool: &CursorPool<Self>) -> Descendants<Self> {
        Descendants::new(self, true, pool.clone())
    }

    fn axis(self, axis: Axis, pool: &CursorPool<Self>) -> AxisIter<Self> {
        navigate(self, axis, pool)
    }
}

impl<Tr: Traverser> TraverserExt for Tr {}

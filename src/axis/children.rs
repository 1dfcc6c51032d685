//! child:: axis

use super::{settle, AxisCursor};
use crate::traverser::Traverser;

/// Children of the origin, optionally preceded by the origin itself.
///
/// Holds a single traverser, dropped as soon as the children run out.
pub struct Children<Tr> {
    traverser: Option<Tr>,
    with_self: bool,
}

impl<Tr: Traverser> Children<Tr> {
    pub fn new(traverser: Tr, with_self: bool) -> Self {
        Children {
            traverser: Some(traverser),
            with_self,
        }
    }
}

impl<Tr: Traverser> AxisCursor for Children<Tr> {
    type Node = Tr::Node;
    type Error = Tr::Error;

    fn try_next(&mut self) -> Result<Option<Tr::Node>, Tr::Error> {
        let Some(traverser) = self.traverser.as_mut() else {
            return Ok(None);
        };
        if self.with_self {
            self.with_self = false;
            return Ok(Some(traverser.origin()));
        }
        let step = traverser.try_get_next_child();
        settle(&mut self.traverser, step)
    }
}

super::infallible_iterator!(Children);

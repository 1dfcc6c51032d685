//! preceding-sibling:: and following-sibling:: axes
//!
//! Both come out in document order. [`BeforeSelf`] places the origin last
//! when asked to include it, [`AfterSelf`] places it first.

use super::{settle, AxisCursor};
use crate::traverser::Traverser;

/// Siblings before the origin, ascending, optionally followed by the origin
pub struct BeforeSelf<Tr> {
    traverser: Option<Tr>,
    with_self: bool,
}

impl<Tr: Traverser> BeforeSelf<Tr> {
    pub fn new(traverser: Tr, with_self: bool) -> Self {
        BeforeSelf {
            traverser: Some(traverser),
            with_self,
        }
    }
}

impl<Tr: Traverser> AxisCursor for BeforeSelf<Tr> {
    type Node = Tr::Node;
    type Error = Tr::Error;

    fn try_next(&mut self) -> Result<Option<Tr::Node>, Tr::Error> {
        let Some(traverser) = self.traverser.as_mut() else {
            return Ok(None);
        };
        match traverser.try_get_previous_sibling() {
            Ok(Some(sibling)) => Ok(Some(sibling)),
            Ok(None) => {
                let origin = self.with_self.then(|| traverser.origin());
                self.with_self = false;
                self.traverser = None;
                Ok(origin)
            }
            Err(e) => {
                self.traverser = None;
                Err(e)
            }
        }
    }
}

/// Siblings after the origin, ascending, optionally preceded by the origin
pub struct AfterSelf<Tr> {
    traverser: Option<Tr>,
    with_self: bool,
}

impl<Tr: Traverser> AfterSelf<Tr> {
    pub fn new(traverser: Tr, with_self: bool) -> Self {
        AfterSelf {
            traverser: Some(traverser),
            with_self,
        }
    }
}

impl<Tr: Traverser> AxisCursor for AfterSelf<Tr> {
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
        let step = traverser.try_get_next_sibling();
        settle(&mut self.traverser, step)
    }
}

super::infallible_iterator!(BeforeSelf);
super::infallible_iterator!(AfterSelf);

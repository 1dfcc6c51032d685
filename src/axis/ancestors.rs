//! ancestor:: axis

use super::AxisCursor;
use crate::traverser::Traverser;

/// Parent chain of the origin, nearest first.
///
/// Each step converts the parent into a new traverser and drops the previous
/// one, so only one traverser is held between pulls.
pub struct Ancestors<Tr> {
    traverser: Option<Tr>,
    with_self: bool,
}

impl<Tr: Traverser> Ancestors<Tr> {
    pub fn new(traverser: Tr, with_self: bool) -> Self {
        Ancestors {
            traverser: Some(traverser),
            with_self,
        }
    }
}

impl<Tr: Traverser> AxisCursor for Ancestors<Tr> {
    type Node = Tr::Node;
    type Error = Tr::Error;

    fn try_next(&mut self) -> Result<Option<Tr::Node>, Tr::Error> {
        let Some(current) = self.traverser.as_ref() else {
            return Ok(None);
        };
        if self.with_self {
            self.with_self = false;
            return Ok(Some(current.origin()));
        }

        let step = current.try_get_parent().and_then(|parent| match parent {
            Some(parent) => current
                .convert_to_traverser(parent.clone())
                .map(|next| Some((parent, next))),
            None => Ok(None),
        });

        match step {
            Ok(Some((parent, next))) => {
                self.traverser = Some(next);
                Ok(Some(parent))
            }
            Ok(None) => {
                self.traverser = None;
                Ok(None)
            }
            Err(e) => {
                self.traverser = None;
                Err(e)
            }
        }
    }
}

super::infallible_iterator!(Ancestors);

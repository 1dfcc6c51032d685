//! descendant:: axis
//!
//! Pre-order depth-first walk without recursion. One traverser per open
//! level sits on a [`CursorStack`] rented from a [`CursorPool`]:
//!
//! 1. the origin traverser is pushed on the first pull
//! 2. the top traverser yields its next child, which is emitted at once;
//!    if the child may have children its own traverser is pushed
//! 3. an exhausted traverser is popped and dropped
//! 4. an empty stack ends the walk
//!
//! Working memory is O(depth) and the stack storage is reused across
//! traversals sharing a pool.

use super::AxisCursor;
use crate::pool::{CursorPool, CursorStack};
use crate::traverser::Traverser;

enum State<Tr> {
    NotStarted(Tr),
    Walking(CursorStack<Tr>),
    Done,
}

/// All nodes below the origin in pre-order, optionally preceded by the origin.
///
/// Dropping the axis at any point drops every traverser still on its stack
/// and returns the stack to the pool.
pub struct Descendants<Tr> {
    state: State<Tr>,
    with_self: bool,
    pool: CursorPool<Tr>,
}

impl<Tr: Traverser> Descendants<Tr> {
    pub fn new(traverser: Tr, with_self: bool, pool: CursorPool<Tr>) -> Self {
        Descendants {
            state: State::NotStarted(traverser),
            with_self,
            pool,
        }
    }

    /// Number of open levels on the stack
    pub fn open_levels(&self) -> usize {
        match &self.state {
            State::Walking(stack) => stack.len(),
            _ => 0,
        }
    }

    fn start(&mut self) {
        if let State::NotStarted(origin) = std::mem::replace(&mut self.state, State::Done) {
            let mut stack = self.pool.rent();
            stack.push(origin);
            self.state = State::Walking(stack);
        }
    }
}

impl<Tr: Traverser> AxisCursor for Descendants<Tr> {
    type Node = Tr::Node;
    type Error = Tr::Error;

    fn try_next(&mut self) -> Result<Option<Tr::Node>, Tr::Error> {
        if self.with_self {
            self.with_self = false;
            if let State::NotStarted(origin) = &self.state {
                return Ok(Some(origin.origin()));
            }
        }
        if matches!(self.state, State::NotStarted(_)) {
            self.start();
        }
        let State::Walking(stack) = &mut self.state else {
            return Ok(None);
        };
        match advance(stack) {
            Ok(Some(node)) => Ok(Some(node)),
            other => {
                // releases the stack back to the pool
                self.state = State::Done;
                other
            }
        }
    }
}

super::infallible_iterator!(Descendants);

fn advance<Tr: Traverser>(stack: &mut CursorStack<Tr>) -> Result<Option<Tr::Node>, Tr::Error> {
    while let Some(top) = stack.peek_mut() {
        match top.try_get_next_child()? {
            Some(node) => {
                let mut child = top.convert_to_traverser(node.clone())?;
                if may_have_children(&mut child)? {
                    stack.push(child);
                }
                return Ok(Some(node));
            }
            None => drop(stack.pop()),
        }
    }
    Ok(None)
}

/// Uses the cheap hints; an unknown answer counts as "maybe"
fn may_have_children<Tr: Traverser>(traverser: &mut Tr) -> Result<bool, Tr::Error> {
    if let Some(has_child) = traverser.try_get_has_child()? {
        return Ok(has_child);
    }
    Ok(traverser.try_get_child_count()? != Some(0))
}

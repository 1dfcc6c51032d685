//! Pooled Cursor Stacks
//!
//! Depth-first traversal keeps one child cursor per open tree level. The
//! stacks holding those cursors are rented from a [`CursorPool`] and handed
//! back when the traversal ends, so repeated traversals reuse the same
//! backing storage instead of allocating a fresh stack each time.
//!
//! Pools are single-threaded by construction: [`CursorPool`] is an `Rc`
//! handle and therefore neither `Send` nor `Sync`. Sharing one between
//! threads is a compile error, not a runtime race. Use
//! [`CursorPool::local`] for a per-thread pool, or create one pool per
//! worker (see [`crate::parallel`]).

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

/// Pool sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    /// Capacity of a freshly allocated stack (tree depth it holds without growing)
    pub initial_capacity: usize,
    /// Free stacks kept for reuse; surplus stacks are dropped on return
    pub max_retained: usize,
}

impl Default for PoolOptions {
    fn default() -> Self {
        PoolOptions {
            initial_capacity: 16,
            max_retained: 8,
        }
    }
}

/// Usage counters for a pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Stacks handed out
    pub rented: usize,
    /// Stacks handed back
    pub returned: usize,
    /// Stacks allocated because the free list was empty
    pub allocated: usize,
    /// Stacks currently on the free list
    pub retained: usize,
    /// Deepest stack seen
    pub peak_depth: usize,
}

struct PoolInner<C> {
    free: RefCell<Vec<Vec<C>>>,
    options: PoolOptions,
    stats: Cell<PoolStats>,
}

/// Free list of reusable cursor stacks.
///
/// Cloning the handle shares the same free list.
pub struct CursorPool<C> {
    inner: Rc<PoolInner<C>>,
}

impl<C> Clone for CursorPool<C> {
    fn clone(&self) -> Self {
        CursorPool {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C> Default for CursorPool<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for CursorPool<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorPool")
            .field("options", &self.inner.options)
            .field("stats", &self.stats())
            .finish()
    }
}

impl<C> CursorPool<C> {
    pub fn new() -> Self {
        Self::with_options(PoolOptions::default())
    }

    pub fn with_options(options: PoolOptions) -> Self {
        CursorPool {
            inner: Rc::new(PoolInner {
                free: RefCell::new(Vec::with_capacity(options.max_retained)),
                options,
                stats: Cell::new(PoolStats::default()),
            }),
        }
    }

    pub fn options(&self) -> PoolOptions {
        self.inner.options
    }

    /// Take an empty stack from the free list, allocating one if none is free
    pub fn rent(&self) -> CursorStack<C> {
        let reused = self.inner.free.borrow_mut().pop();
        let items = match reused {
            Some(items) => items,
            None => {
                self.update_stats(|s| s.allocated += 1);
                trace!(
                    capacity = self.inner.options.initial_capacity,
                    "cursor pool: allocating stack"
                );
                Vec::with_capacity(self.inner.options.initial_capacity)
            }
        };
        debug_assert!(items.is_empty(), "pooled stack returned non-empty");
        self.update_stats(|s| s.rented += 1);
        CursorStack {
            items,
            pool: self.clone(),
        }
    }

    /// Snapshot of the usage counters
    pub fn stats(&self) -> PoolStats {
        let mut stats = self.inner.stats.get();
        stats.retained = self.inner.free.borrow().len();
        stats
    }

    /// Total capacity, in cursors, of the stacks on the free list
    pub fn retained_capacity(&self) -> usize {
        self.inner.free.borrow().iter().map(Vec::capacity).sum()
    }

    /// Drop every retained stack
    pub fn clear(&self) {
        self.inner.free.borrow_mut().clear();
    }

    fn give_back(&self, items: Vec<C>) {
        debug_assert!(items.is_empty());
        self.update_stats(|s| s.returned += 1);
        let mut free = self.inner.free.borrow_mut();
        if free.len() < self.inner.options.max_retained {
            trace!(capacity = items.capacity(), "cursor pool: stack returned");
            free.push(items);
        } else {
            trace!("cursor pool: free list full, dropping stack");
        }
    }

    fn update_stats(&self, f: impl FnOnce(&mut PoolStats)) {
        let mut stats = self.inner.stats.get();
        f(&mut stats);
        self.inner.stats.set(stats);
    }
}

impl<C: 'static> CursorPool<C> {
    /// This thread's pool for cursor type `C`.
    ///
    /// One pool exists per thread and cursor type; every call on the same
    /// thread returns a handle to the same free list.
    pub fn local() -> Self {
        thread_local! {
            static POOLS: RefCell<HashMap<TypeId, Box<dyn Any>>> = RefCell::new(HashMap::new());
        }

        POOLS.with(|pools| {
            let mut pools = pools.borrow_mut();
            let entry = pools
                .entry(TypeId::of::<C>())
                .or_insert_with(|| Box::new(CursorPool::<C>::new()));
            match entry.downcast_ref::<CursorPool<C>>() {
                Some(pool) => pool.clone(),
                None => unreachable!("pool registry is keyed by cursor TypeId"),
            }
        })
    }
}

/// A stack rented from a [`CursorPool`].
///
/// Dropping the stack releases it: remaining cursors are popped and dropped
/// from the top down, then the emptied storage goes back to the pool.
pub struct CursorStack<C> {
    items: Vec<C>,
    pool: CursorPool<C>,
}

impl<C> CursorStack<C> {
    #[inline]
    pub fn push(&mut self, cursor: C) {
        self.items.push(cursor);
        let depth = self.items.len();
        if depth > self.pool.inner.stats.get().peak_depth {
            self.pool.update_stats(|s| s.peak_depth = depth);
        }
    }

    #[inline]
    pub fn peek_mut(&mut self) -> Option<&mut C> {
        self.items.last_mut()
    }

    #[inline]
    pub fn pop(&mut self) -> Option<C> {
        self.items.pop()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }
}

impl<C> Drop for CursorStack<C> {
    fn drop(&mut self) {
        while let Some(cursor) = self.items.pop() {
            drop(cursor);
        }
        self.pool.give_back(std::mem::take(&mut self.items));
    }
}

impl<C> fmt::Debug for CursorStack<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorStack")
            .field("len", &self.items.len())
            .field("capacity", &self.items.capacity())
            .finish()
    }
}

//! Parallel axis evaluation
//!
//! Uses Rayon to run one axis from many origins at once. Pools are not
//! shared between threads: every rayon job builds its own through
//! `map_init`, and the stacks it rents never leave that job.

use rayon::prelude::*;

use crate::axis::{navigate, Axis, AxisCursor};
use crate::pool::CursorPool;
use crate::traverser::Traverser;

/// Evaluate `axis` from every origin, results in input order
pub fn evaluate_parallel<Tr>(origins: Vec<Tr>, axis: Axis) -> Vec<Result<Vec<Tr::Node>, Tr::Error>>
where
    Tr: Traverser + Send,
    Tr::Node: Send,
    Tr::Error: Send,
{
    origins
        .into_par_iter()
        .map_init(CursorPool::new, |pool, origin| {
            navigate(origin, axis, pool).try_to_vec()
        })
        .collect()
}

/// Size of `axis` from every origin, results in input order
pub fn count_parallel<Tr>(origins: Vec<Tr>, axis: Axis) -> Vec<Result<usize, Tr::Error>>
where
    Tr: Traverser + Send,
    Tr::Error: Send,
{
    origins
        .into_par_iter()
        .map_init(CursorPool::new, |pool, origin| {
            navigate(origin, axis, pool).try_count()
        })
        .collect()
}

//! Search tasks run by the optimize workflow.
//!
//! Each task explores the bounded configuration space through a [`SearchContext`]
//! (objective, base configuration, settings, clock) and returns the best candidate it
//! visited together with every trial in evaluation order. Grid search is a single parallel
//! sweep, SPSA a sequence of mirrored-pair evaluations, and the hybrid task chains the two.
//!
//! [`SearchContext`]: crate::engine::context::SearchContext

pub mod grid_search;
pub mod hybrid;
pub mod spsa;

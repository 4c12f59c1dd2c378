//! # Engine Module
//!
//! Stateful simulation and search logic built on the pure functions in [`crate::core`].
//!
//! ## Overview
//!
//! A [`simulation::SimulationEngine`] integrates one reactor configuration forward in time,
//! records snapshots, and stops at the first failure. Runs are summarized into
//! [`statistics::OperationStatistics`] and reduced to a scalar by a
//! [`scoring::ScoringFunction`]. The search tasks explore a bounded
//! [`space::ConfigurationSpace`] by calling an [`evaluator::Evaluator`] per candidate.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Run, failure-threshold and optimizer settings with builders
//! - **Simulation** ([`simulation`], [`failure`], [`statistics`]) - Time integration, the failure
//!   predicate, and run summaries
//! - **Search** ([`space`], [`scoring`], [`evaluator`], [`tasks`]) - Bounds, objectives, and the
//!   grid, SPSA and hybrid searches
//! - **State Tracking** ([`state`]) - Trials, optimization results, and the caller-owned session
//! - **Progress Monitoring** ([`progress`]) - Progress events for front ends
//! - **Error Handling** ([`error`]) - Engine-level error aggregation

pub mod config;
pub(crate) mod context;
pub mod error;
pub mod evaluator;
pub mod failure;
pub mod progress;
pub mod scoring;
pub mod simulation;
pub mod space;
pub mod state;
pub mod statistics;
pub(crate) mod tasks;
pub(crate) mod utils;

//! # Workflows Module
//!
//! High-level entry points that tie the [`crate::engine`] and [`crate::core`] layers
//! together.
//!
//! - **Simulation Workflow** ([`simulate`]) - Builds an engine for one configuration, runs it,
//!   and returns the final state, statistics and saved history.
//! - **Optimization Workflow** ([`optimize`]) - Applies solution overlays, clamps the base
//!   configuration, runs grid search, SPSA or the hybrid of both, and records the outcome in a
//!   caller-owned session.

pub mod optimize;
pub mod simulate;

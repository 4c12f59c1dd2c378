//! # reactorsim Core Library
//!
//! A zero-dimensional tokamak simulator with a search layer for finding reactor designs that
//! operate long, ignite, and stay within their material limits.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so every piece can be tested on
//! its own.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ReactorConfiguration`,
//!   `ReactorState`), the pure physics functions, the material catalog, the closed set of
//!   solution overlays, and configuration persistence.
//!
//! - **[`engine`]: The Logic Core.** The stateful `SimulationEngine` that integrates a
//!   configuration through time, the failure predicate and run statistics, scoring policies,
//!   the bounded `ConfigurationSpace`, and the grid, SPSA and hybrid search tasks.
//!
//! - **[`workflows`]: The Public API.** Entry points that tie `engine` and `core` together:
//!   run one simulation, or optimize a design within caller-owned session state.

pub mod core;
pub mod engine;
pub mod workflows;

//! # Core Module
//!
//! The stateless foundation of the library: data models, pure physics and the lookup tables
//! the simulation engine consumes.
//!
//! ## Architecture
//!
//! - **Physics** ([`physics`]) - Pure 0-D plasma, magnetic, power and neutronics relations
//! - **Materials** ([`materials`]) - Thermal and radiation-damage limits by material identifier
//! - **Data Model** ([`models`]) - `ReactorConfiguration` inputs and `ReactorState` snapshots
//! - **Solutions** ([`solutions`]) - Named configuration overlays applied before a search
//! - **Persistence** ([`io`]) - JSON and TOML configuration files
//!
//! Nothing here holds mutable state across calls.

pub mod io;
pub mod materials;
pub mod models;
pub mod physics;
pub mod solutions;

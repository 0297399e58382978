//! # U-Floorplan Core
//!
//! Core types and abstractions for the U-Floorplan block placement engine.
//!
//! This crate provides the pieces that do not depend on the floorplanning
//! domain itself: rectangle geometry, the simulated annealing framework, the
//! solver configuration and trait, and the result types.
//!
//! ## Core Components
//!
//! - **Rectangles**: `Rect` with overlap, containment and abutment tests
//! - **SA framework**: `SaRunner` minimizing any `SaProblem`
//! - **Solver trait**: Common interface with progressive refinement
//! - **Results**: `SolveResult`, `PlacedBlock`
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod error;
pub mod placement;
pub mod rect;
pub mod result;
pub mod sa;
pub mod solver;

// Re-exports
pub use error::{Error, Result};
pub use placement::{PlacedBlock, PlacementStats};
pub use rect::{Axis, Rect, Side, EPSILON};
pub use result::{SolveResult, SolveSummary};
pub use sa::{
    NeighborhoodOperator, SaConfig, SaProblem, SaResult, SaRunner, SaSolution, MAX_COOLING_RATE,
    MIN_COOLING_RATE,
};
pub use solver::{Config, ProgressCallback, ProgressInfo, Solver, Strategy};

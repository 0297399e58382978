//! # U-Floorplan Planner
//!
//! Constrained rectangular block floorplanning for the U-Floorplan engine.
//!
//! Blocks carry a location preference (corner, quadrant, center or none) and
//! may name one neighbor they must abut. The planner builds a greedy layout,
//! refines it with simulated annealing and compacts the result toward the
//! origin.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use u_floorplan_planner::{BlockSpec, Config, Floorplanner, LocationPreference, Solver};
//!
//! let blocks = vec![
//!     BlockSpec::new("Processor", 100.0, 80.0).with_location(LocationPreference::TopLeftCorner),
//!     BlockSpec::new("Memory", 60.0, 100.0).with_neighbor("Processor"),
//! ];
//! let planner = Floorplanner::new(Config::new().with_seed(42));
//! let result = planner.solve(&blocks)?;
//! ```

pub mod block;
pub mod compaction;
pub mod constraint;
pub mod cost;
#[cfg(feature = "serde")]
pub mod document;
pub mod floorplan;
pub mod initial;
pub mod perturb;
pub mod planner;
pub mod sa_floorplan;

// Re-exports
pub use block::{BlockSpec, LocationPreference};
pub use constraint::{classify, Classification, NeighborGroup};
pub use cost::{CostBreakdown, CostModel};
#[cfg(feature = "serde")]
pub use document::{ConfigRequest, FloorplanRequest};
pub use floorplan::FloorPlan;
pub use perturb::PerturbationConfig;
pub use planner::Floorplanner;
pub use u_floorplan_core::{
    Config, Error, PlacedBlock, ProgressInfo, Result, SolveResult, Solver, Strategy,
};

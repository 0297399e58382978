//! # U-Floorplan
//!
//! Constrained rectangular block floorplanning engine.
//!
//! Places rectangular blocks into a compact, non-overlapping layout while
//! honoring per-block location preferences (corners, quadrants, center) and
//! neighbor abutment relations, with a bound on the layout aspect ratio.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use u_floorplan::planner::{BlockSpec, Floorplanner, LocationPreference};
//! use u_floorplan::core::{Config, Solver};
//!
//! let blocks = vec![
//!     BlockSpec::new("Processor", 100.0, 80.0).with_location(LocationPreference::TopLeftCorner),
//!     BlockSpec::new("Memory", 60.0, 100.0).with_neighbor("Processor"),
//! ];
//!
//! let planner = Floorplanner::new(Config::new().with_max_aspect_ratio(2.0).with_seed(7));
//! let first = planner.solve(&blocks)?;
//!
//! // Progressive refinement restarts the annealing schedule from `first`.
//! let better = planner.refine(&blocks, &first)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialization support and the JSON document module

/// Core traits and abstractions.
pub use u_floorplan_core as core;

/// Block floorplanning.
pub use u_floorplan_planner as planner;

// Re-export commonly used types at root level
pub use u_floorplan_core::{Config, PlacedBlock, SolveResult, Solver, Strategy};
pub use u_floorplan_planner::{BlockSpec, Floorplanner, LocationPreference};

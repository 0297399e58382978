//! Solve result representation.

use crate::placement::{PlacedBlock, PlacementStats};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a floorplanning solve operation.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolveResult {
    /// One placement per input block, in input order.
    pub placements: Vec<PlacedBlock>,

    /// Width of the layout bounding box.
    pub bounding_width: f64,

    /// Height of the layout bounding box.
    pub bounding_height: f64,

    /// Bounding box area.
    pub area: f64,

    /// `max(W, H) / min(W, H)` of the bounding box.
    pub aspect_ratio: f64,

    /// Number of blocks whose location preference is not met.
    pub location_violations: usize,

    /// Number of neighbor pairs that do not abut.
    pub neighbor_violations: usize,

    /// Number of annealing iterations performed.
    pub iterations: u64,

    /// Cost of the returned layout.
    pub best_cost: f64,

    /// Best-cost history sampled during annealing.
    pub cost_history: Vec<f64>,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,

    /// Strategy used for solving.
    pub strategy: Option<String>,

    /// Whether the solve was cancelled early.
    pub cancelled: bool,
}

impl SolveResult {
    /// Creates a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of placed blocks.
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// Returns true if every location and neighbor constraint is met.
    pub fn is_feasible(&self) -> bool {
        self.location_violations == 0 && self.neighbor_violations == 0
    }

    /// Returns true if the solve ran to completion.
    pub fn completed_normally(&self) -> bool {
        !self.cancelled
    }

    /// Looks up a placement by block name.
    pub fn placement(&self, name: &str) -> Option<&PlacedBlock> {
        self.placements.iter().find(|p| p.name == name)
    }

    /// Sets the strategy name.
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Computes placement statistics.
    pub fn placement_stats(&self) -> PlacementStats {
        PlacementStats::from_placements(&self.placements)
    }

    /// Returns block density (block area / bounding area) as a percentage string.
    pub fn density_percent(&self) -> String {
        format!("{:.1}%", self.placement_stats().density() * 100.0)
    }
}

/// Summary statistics for a solve result.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveSummary {
    /// Total blocks placed.
    pub total_placed: usize,
    /// Bounding box area.
    pub area: f64,
    /// Bounding box aspect ratio.
    pub aspect_ratio: f64,
    /// Block density percentage.
    pub density_percent: f64,
    /// Total constraint violations.
    pub violations: usize,
    /// Computation time in milliseconds.
    pub time_ms: u64,
    /// Strategy used.
    pub strategy: String,
}

impl From<&SolveResult> for SolveSummary {
    fn from(result: &SolveResult) -> Self {
        Self {
            total_placed: result.placements.len(),
            area: result.area,
            aspect_ratio: result.aspect_ratio,
            density_percent: result.placement_stats().density() * 100.0,
            violations: result.location_violations + result.neighbor_violations,
            time_ms: result.computation_time_ms,
            strategy: result
                .strategy
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_block_result() -> SolveResult {
        let mut result = SolveResult::new();
        result
            .placements
            .push(PlacedBlock::new("cpu", 0.0, 0.0, 100.0, 80.0));
        result
            .placements
            .push(PlacedBlock::new("mem", 100.0, 0.0, 60.0, 100.0));
        result.bounding_width = 160.0;
        result.bounding_height = 100.0;
        result.area = 16000.0;
        result.aspect_ratio = 1.6;
        result
    }

    #[test]
    fn test_result_new() {
        let result = SolveResult::new();
        assert!(result.placements.is_empty());
        assert!(result.is_feasible());
        assert!(result.completed_normally());
    }

    #[test]
    fn test_result_lookup() {
        let result = two_block_result();
        assert_eq!(result.placed_count(), 2);
        assert_eq!(result.placement("mem").map(|p| p.x), Some(100.0));
        assert!(result.placement("gpu").is_none());
        assert_eq!(result.density_percent(), "87.5%");
    }

    #[test]
    fn test_solve_summary() {
        let mut result = two_block_result().with_strategy("greedy");
        result.location_violations = 1;
        result.neighbor_violations = 2;
        result.computation_time_ms = 12;

        let summary = SolveSummary::from(&result);
        assert_eq!(summary.total_placed, 2);
        assert_eq!(summary.violations, 3);
        assert_eq!(summary.strategy, "greedy");
        assert!(!result.is_feasible());
    }
}

//! Cost function for floorplans.

use crate::floorplan::FloorPlan;

/// Multiplier applied to `violations × area`.
pub const PENALTY_FACTOR: f64 = 5000.0;

/// Weight of the aspect-ratio overshoot.
pub const ASPECT_PENALTY_WEIGHT: f64 = 100.0;

/// Individual terms of a cost evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    /// Bounding box area.
    pub area: f64,
    /// Bounding box aspect ratio.
    pub aspect_ratio: f64,
    /// Penalty for exceeding the maximum aspect ratio.
    pub aspect_penalty: f64,
    /// Blocks with an unmet location preference.
    pub location_violations: usize,
    /// Neighbor pairs that do not abut.
    pub neighbor_violations: usize,
    /// Total cost.
    pub total: f64,
}

impl CostBreakdown {
    /// Sum of both violation counters.
    pub fn violations(&self) -> usize {
        self.location_violations + self.neighbor_violations
    }
}

/// Evaluates floorplans against a maximum aspect ratio.
#[derive(Debug, Clone, Copy)]
pub struct CostModel {
    max_aspect_ratio: f64,
}

impl CostModel {
    /// Creates a cost model.
    pub fn new(max_aspect_ratio: f64) -> Self {
        Self { max_aspect_ratio }
    }

    /// The aspect ratio bound.
    pub fn max_aspect_ratio(&self) -> f64 {
        self.max_aspect_ratio
    }

    /// `area × (ratio − max) × weight` when the ratio exceeds the bound, else 0.
    pub fn aspect_penalty(&self, area: f64, ratio: f64) -> f64 {
        if ratio <= self.max_aspect_ratio {
            0.0
        } else {
            area * (ratio - self.max_aspect_ratio) * ASPECT_PENALTY_WEIGHT
        }
    }

    /// Area plus aspect penalty, without constraint terms.
    pub fn base_cost(&self, plan: &FloorPlan) -> f64 {
        let area = plan.area();
        area + self.aspect_penalty(area, plan.aspect_ratio())
    }

    /// Full evaluation, recomputing violations from scratch.
    pub fn evaluate(&self, plan: &FloorPlan) -> CostBreakdown {
        let area = plan.area();
        let aspect_ratio = plan.aspect_ratio();
        let aspect_penalty = self.aspect_penalty(area, aspect_ratio);
        let location_violations = plan.location_violations();
        let neighbor_violations = plan.neighbor_violations();
        let violations = (location_violations + neighbor_violations) as f64;

        CostBreakdown {
            area,
            aspect_ratio,
            aspect_penalty,
            location_violations,
            neighbor_violations,
            total: area + aspect_penalty + violations * area * PENALTY_FACTOR,
        }
    }

    /// Total cost.
    pub fn cost(&self, plan: &FloorPlan) -> f64 {
        self.evaluate(plan).total
    }
}

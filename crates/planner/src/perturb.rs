//! Neighborhood moves over floorplans.
//!
//! Every operator either returns an overlap-free plan or gives up; after
//! `max_attempts` failures the move is reported as impossible.

use crate::constraint::Classification;
use crate::cost::CostModel;
use crate::floorplan::FloorPlan;
use crate::initial::{
    attach_candidates, best_position, shelf_limit, shelf_shape, valid_positions, ShelfDirection,
    UnitShape,
};
use rand::prelude::*;
use u_floorplan_core::rect::{Rect, Side};
use u_floorplan_core::sa::NeighborhoodOperator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tuning knobs for the perturbation operators.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PerturbationConfig {
    /// Attempts before a move is given up.
    pub max_attempts: usize,
    /// Probability that a relocation detaches a group leaf instead of moving a unit.
    pub detach_probability: f64,
    /// Probability that a relocation uses the best position rather than a random one.
    pub heuristic_probability: f64,
}

impl Default for PerturbationConfig {
    fn default() -> Self {
        Self {
            max_attempts: 16,
            detach_probability: 0.1,
            heuristic_probability: 0.5,
        }
    }
}

impl PerturbationConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of attempts per perturbation.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Sets the detach probability.
    pub fn with_detach_probability(mut self, p: f64) -> Self {
        self.detach_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the probability of a heuristic relocation.
    pub fn with_heuristic_probability(mut self, p: f64) -> Self {
        self.heuristic_probability = p.clamp(0.0, 1.0);
        self
    }
}

/// Applies neighborhood operators to floorplans.
pub struct Perturber<'a> {
    classification: &'a Classification,
    model: &'a CostModel,
    config: &'a PerturbationConfig,
}

impl<'a> Perturber<'a> {
    /// Creates a perturber over a fixed unit decomposition.
    pub fn new(
        classification: &'a Classification,
        model: &'a CostModel,
        config: &'a PerturbationConfig,
    ) -> Self {
        Self {
            classification,
            model,
            config,
        }
    }

    /// Produces a neighbor of `plan`, or `None` if every attempt fails.
    pub fn perturb<R: Rng>(
        &self,
        plan: &FloorPlan,
        operator: NeighborhoodOperator,
        rng: &mut R,
    ) -> Option<FloorPlan> {
        for _ in 0..self.config.max_attempts {
            let candidate = match operator {
                NeighborhoodOperator::Relocate => self.relocate(plan, rng),
                NeighborhoodOperator::Rotation => self.rotate(plan, rng),
                NeighborhoodOperator::Swap => self.swap(plan, rng),
                NeighborhoodOperator::Repack => self.repack(plan, rng),
            };
            if let Some(mut next) = candidate {
                next.normalize();
                return Some(next);
            }
        }
        None
    }

    /// True if the unit holds a block whose corner or center preference is met.
    pub fn is_protected(&self, plan: &FloorPlan, unit: usize) -> bool {
        self.classification.units[unit]
            .iter()
            .any(|&m| plan.block(m).location.is_strict() && plan.is_satisfied(m))
    }

    /// Units that may be moved; falls back to all units when fewer than `needed` are free.
    fn eligible_units(&self, plan: &FloorPlan, needed: usize) -> Vec<usize> {
        let all = 0..self.classification.unit_count();
        let free: Vec<usize> = all.clone().filter(|&u| !self.is_protected(plan, u)).collect();
        if free.len() >= needed {
            free
        } else {
            all.collect()
        }
    }

    /// Moves a unit to the best or a random valid position.
    fn relocate<R: Rng>(&self, plan: &FloorPlan, rng: &mut R) -> Option<FloorPlan> {
        if rng.gen::<f64>() < self.config.detach_probability {
            if let Some(next) = self.detach(plan, rng) {
                return Some(next);
            }
        }

        if self.classification.unit_count() < 2 {
            return None;
        }
        let units = self.eligible_units(plan, 1);
        let &unit = units.choose(rng)?;

        let mut next = plan.clone();
        let shape = UnitShape::capture(&next, &self.classification.units[unit]);
        shape.unplace(&mut next);

        let position = if rng.gen::<f64>() < self.config.heuristic_probability {
            best_position(&mut next, &shape, self.model)
        } else {
            valid_positions(&next, &shape).choose(rng).copied()
        };

        let (x, y) = position?;
        shape.place_at(&mut next, x, y);
        Some(next)
    }

    /// Re-attaches a group leaf at another position along its partner.
    fn detach<R: Rng>(&self, plan: &FloorPlan, rng: &mut R) -> Option<FloorPlan> {
        let graph = &self.classification.graph;
        let leaves: Vec<usize> = self
            .classification
            .groups
            .iter()
            .flat_map(|g| g.members.iter().copied())
            .filter(|&m| graph.is_leaf(m) && graph.parent[m].is_some())
            .filter(|&m| !(plan.block(m).location.is_strict() && plan.is_satisfied(m)))
            .collect();

        let &leaf = leaves.choose(rng)?;
        let partner = graph.parent[leaf]?;

        let others: Vec<Rect> = plan
            .placed_rects()
            .filter(|(i, _)| *i != leaf)
            .map(|(_, r)| r)
            .collect();
        let b = plan.block(leaf);
        let current = plan.rect(leaf);
        let candidates: Vec<Rect> = attach_candidates(
            &plan.rect(partner),
            b.effective_width(),
            b.effective_height(),
            &others,
            &Side::ALL,
        )
        .into_iter()
        .filter(|r| *r != current && !plan.collides(r, &[leaf]))
        .collect();

        let target = candidates.choose(rng)?;
        let mut next = plan.clone();
        next.place(leaf, target.min_x, target.min_y);
        Some(next)
    }

    /// Rotates one to three units. A singleton toggles its rotation; a group is
    /// transposed about its top-left corner.
    fn rotate<R: Rng>(&self, plan: &FloorPlan, rng: &mut R) -> Option<FloorPlan> {
        let units = self.eligible_units(plan, 1);
        if units.is_empty() {
            return None;
        }
        let count = rng.gen_range(1..=units.len().min(3));
        let picked: Vec<usize> = units.choose_multiple(rng, count).copied().collect();

        let mut next = plan.clone();
        for &unit in &picked {
            let members = &self.classification.units[unit];
            let origin = plan.members_bbox(members)?;
            for &m in members {
                let b = plan.block(m);
                let (dx, dy) = (b.x - origin.min_x, b.y - origin.min_y);
                next.set_rotated(m, !b.rotated);
                next.place(m, origin.min_x + dy, origin.min_y + dx);
            }
        }

        if picked
            .iter()
            .any(|&u| next.unit_collides(&self.classification.units[u]))
        {
            return None;
        }
        Some(next)
    }

    /// Shuffles the free units and packs them onto rows, keeping each group rigid.
    ///
    /// The rows aim for the current layout's width-to-height ratio. The packed
    /// block is then dropped at the best free position around the protected units.
    fn repack<R: Rng>(&self, plan: &FloorPlan, rng: &mut R) -> Option<FloorPlan> {
        let mut units = self.eligible_units(plan, 2);
        if units.len() < 2 {
            return None;
        }
        units.shuffle(rng);

        let mut next = plan.clone();
        let shapes: Vec<UnitShape> = units
            .iter()
            .map(|&u| UnitShape::capture(plan, &self.classification.units[u]))
            .collect();
        for shape in &shapes {
            shape.unplace(&mut next);
        }

        let aspect = plan.bounding_box().map_or(1.0, |bb| bb.width() / bb.height());
        let limit = shelf_limit(&shapes, ShelfDirection::Rows, aspect);
        let packed = shelf_shape(&shapes, ShelfDirection::Rows, limit);

        let (x, y) = best_position(&mut next, &packed, self.model)?;
        packed.place_at(&mut next, x, y);
        Some(next)
    }

    /// Exchanges the top-left positions of two units.
    fn swap<R: Rng>(&self, plan: &FloorPlan, rng: &mut R) -> Option<FloorPlan> {
        let units = self.eligible_units(plan, 2);
        if units.len() < 2 {
            return None;
        }
        let picked: Vec<usize> = units.choose_multiple(rng, 2).copied().collect();
        let (a, b) = (picked[0], picked[1]);
        let members_a = &self.classification.units[a];
        let members_b = &self.classification.units[b];
        let box_a = plan.members_bbox(members_a)?;
        let box_b = plan.members_bbox(members_b)?;

        let mut next = plan.clone();
        let (dx, dy) = (box_b.min_x - box_a.min_x, box_b.min_y - box_a.min_y);
        next.translate(members_a, dx, dy);
        next.translate(members_b, -dx, -dy);

        if next.unit_collides(members_a) || next.unit_collides(members_b) {
            return None;
        }
        Some(next)
    }
}

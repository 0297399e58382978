//! Post-optimization compaction.
//!
//! Units slide toward the origin, first along x then along y, until a full
//! round moves nothing. Groups slide rigidly; units holding a satisfied
//! corner or center block stay where they are.

use crate::constraint::Classification;
use crate::cost::CostModel;
use crate::floorplan::FloorPlan;
use std::cmp::Ordering;
use u_floorplan_core::rect::{Axis, EPSILON};

/// Upper bound on compaction rounds.
pub const MAX_COMPACTION_ROUNDS: usize = 64;

/// Slides shorter than this fraction of the unit's shorter side are ignored.
pub const MIN_SLIDE: f64 = 1e-6;

/// Whether the unit contains a block whose strict preference currently holds.
fn is_locked(plan: &FloorPlan, members: &[usize]) -> bool {
    members
        .iter()
        .any(|&m| plan.block(m).location.is_strict() && plan.is_satisfied(m))
}

/// How far a unit can slide toward negative `axis` before touching a block or
/// the bounding-box origin.
fn slide_distance(plan: &FloorPlan, members: &[usize], axis: Axis) -> f64 {
    let origin = match plan.bounding_box() {
        Some(bb) => bb.min(axis),
        None => return 0.0,
    };
    let across = match axis {
        Axis::X => Axis::Y,
        Axis::Y => Axis::X,
    };

    let mut limit = f64::INFINITY;
    for &m in members {
        let r = plan.rect(m);
        limit = limit.min(r.min(axis) - origin);
        for (i, o) in plan.placed_rects() {
            let tol = r.tolerance(&o);
            if members.contains(&i) || r.overlap_along(&o, across) <= tol {
                continue;
            }
            if o.max(axis) <= r.min(axis) + tol {
                limit = limit.min(r.min(axis) - o.max(axis));
            }
        }
    }
    limit.max(0.0)
}

/// Snapshot of the quantities a slide must not make worse.
struct Guard {
    violations: usize,
    area: f64,
    aspect_ratio: f64,
}

impl Guard {
    fn capture(plan: &FloorPlan) -> Self {
        Self {
            violations: plan.violations(),
            area: plan.area(),
            aspect_ratio: plan.aspect_ratio(),
        }
    }

    fn allows(&self, plan: &FloorPlan, max_aspect_ratio: f64) -> bool {
        let after = Guard::capture(plan);
        if after.violations > self.violations {
            return false;
        }
        if after.area > self.area * (1.0 + EPSILON) {
            return false;
        }
        if self.aspect_ratio <= max_aspect_ratio {
            after.aspect_ratio <= max_aspect_ratio
        } else {
            after.aspect_ratio <= self.aspect_ratio
        }
    }
}

/// Compacts the layout in place and returns the number of slides performed.
///
/// The result is normalized, overlap-free, and a second call changes nothing.
pub fn compact(plan: &mut FloorPlan, classification: &Classification, model: &CostModel) -> usize {
    plan.normalize();
    let mut slides = 0;

    for round in 0..MAX_COMPACTION_ROUNDS {
        let mut moved = false;

        for axis in [Axis::X, Axis::Y] {
            let mut order: Vec<usize> = (0..classification.unit_count()).collect();
            let lead = |u: usize| {
                plan.members_bbox(&classification.units[u])
                    .map_or(0.0, |b| b.min(axis))
            };
            order.sort_by(|&a, &b| lead(a).partial_cmp(&lead(b)).unwrap_or(Ordering::Equal));

            for unit in order {
                let members = &classification.units[unit];
                if is_locked(plan, members) {
                    continue;
                }

                let distance = slide_distance(plan, members, axis);
                let min_slide = plan
                    .members_bbox(members)
                    .map_or(0.0, |b| MIN_SLIDE * b.min_side());
                if distance <= min_slide {
                    continue;
                }

                let guard = Guard::capture(plan);
                let (dx, dy) = match axis {
                    Axis::X => (-distance, 0.0),
                    Axis::Y => (0.0, -distance),
                };
                plan.translate(members, dx, dy);

                if plan.unit_collides(members) || !guard.allows(plan, model.max_aspect_ratio()) {
                    plan.translate(members, -dx, -dy);
                    continue;
                }

                moved = true;
                slides += 1;
            }
        }

        if !moved {
            log::debug!("Compaction converged after {} rounds, {} slides", round + 1, slides);
            break;
        }
    }

    plan.normalize();
    slides
}

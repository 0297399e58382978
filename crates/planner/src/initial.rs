//! Greedy initial placement.
//!
//! Neighbor groups are laid out once as rigid shapes. Three layouts are then
//! built from those shapes and the cheapest one is kept:
//!
//! - **Candidates**: every unit is dropped at the best non-overlapping position
//!   around the blocks already placed
//! - **Rows**: units fill shelves left to right
//! - **Columns**: units fill shelves top to bottom

use crate::block::{Block, LocationPreference};
use crate::constraint::{Classification, NeighborGraph, NeighborGroup, CENTER_TOLERANCE};
use crate::cost::CostModel;
use crate::floorplan::FloorPlan;
use std::cmp::Ordering;
use std::collections::VecDeque;
use u_floorplan_core::rect::{Rect, Side, EPSILON};

/// A rigid arrangement of blocks, stored as offsets from the unit's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitShape {
    /// Member blocks.
    pub members: Vec<usize>,
    /// Offset of each member's top-left corner, parallel to `members`.
    pub offsets: Vec<(f64, f64)>,
    /// Width of the unit's bounding box.
    pub width: f64,
    /// Height of the unit's bounding box.
    pub height: f64,
}

impl UnitShape {
    /// Shape of a single block in its current orientation.
    pub fn single(plan: &FloorPlan, block: usize) -> Self {
        let b = plan.block(block);
        Self {
            members: vec![block],
            offsets: vec![(0.0, 0.0)],
            width: b.effective_width(),
            height: b.effective_height(),
        }
    }

    /// Captures the current relative arrangement of the members.
    pub fn capture(plan: &FloorPlan, members: &[usize]) -> Self {
        let bb = plan
            .members_bbox(members)
            .unwrap_or_else(|| Rect::new(0.0, 0.0, 0.0, 0.0));
        let offsets = members
            .iter()
            .map(|&m| {
                let b = plan.block(m);
                (b.x - bb.min_x, b.y - bb.min_y)
            })
            .collect();
        Self {
            members: members.to_vec(),
            offsets,
            width: bb.width(),
            height: bb.height(),
        }
    }

    /// Places every member with the unit's top-left corner at `(x, y)`.
    pub fn place_at(&self, plan: &mut FloorPlan, x: f64, y: f64) {
        for (&m, &(dx, dy)) in self.members.iter().zip(&self.offsets) {
            plan.place(m, x + dx, y + dy);
        }
    }

    /// Removes every member from the plan.
    pub fn unplace(&self, plan: &mut FloorPlan) {
        for &m in &self.members {
            plan.unplace(m);
        }
    }

    /// Whether the unit at `(x, y)` would overlap a placed block outside the unit.
    pub fn fits_at(&self, plan: &FloorPlan, x: f64, y: f64) -> bool {
        self.members
            .iter()
            .zip(&self.offsets)
            .all(|(&m, &(dx, dy))| {
                let b = plan.block(m);
                let r = Rect::from_origin_size(
                    x + dx,
                    y + dy,
                    b.effective_width(),
                    b.effective_height(),
                );
                !plan.collides(&r, &self.members)
            })
    }
}

/// Candidate rectangles of size `w × h` that share an edge with `partner`.
///
/// Positions align with the partner's edges, its center line, and the edges of
/// `others` along the shared side.
pub fn attach_candidates(partner: &Rect, w: f64, h: f64, others: &[Rect], sides: &[Side]) -> Vec<Rect> {
    let (pcx, pcy) = partner.center();
    let mut ys = vec![partner.min_y, partner.max_y - h, pcy - h / 2.0];
    let mut xs = vec![partner.min_x, partner.max_x - w, pcx - w / 2.0];
    for o in others {
        ys.extend([o.min_y, o.max_y - h]);
        xs.extend([o.min_x, o.max_x - w]);
    }

    let mut out = Vec::new();
    for side in sides {
        match side {
            Side::Right | Side::Left => {
                let x = if *side == Side::Right {
                    partner.max_x
                } else {
                    partner.min_x - w
                };
                out.extend(ys.iter().map(|&y| Rect::from_origin_size(x, y, w, h)));
            }
            Side::Bottom | Side::Top => {
                let y = if *side == Side::Bottom {
                    partner.max_y
                } else {
                    partner.min_y - h
                };
                out.extend(xs.iter().map(|&x| Rect::from_origin_size(x, y, w, h)));
            }
        }
    }

    out.retain(|r| r.abuts(partner));
    out
}

/// Picks the start member of a group: a strict preference first, then any
/// preference, then the anchor.
fn start_member(blocks: &[Block], group: &NeighborGroup) -> usize {
    group
        .members
        .iter()
        .copied()
        .find(|&m| blocks[m].location.is_strict())
        .or_else(|| {
            group
                .members
                .iter()
                .copied()
                .find(|&m| blocks[m].location.is_constrained())
        })
        .unwrap_or(group.anchor)
}

/// Computes the rigid internal layout of a neighbor group.
///
/// The start member sits at the origin and the rest of the tree grows to the
/// right and downward from it. The arrangement is then mirrored so the start
/// member ends up at the group corner its preference asks for.
pub fn group_shape(blocks: &[Block], group: &NeighborGroup, graph: &NeighborGraph) -> UnitShape {
    let start = start_member(blocks, group);
    let start_pref = blocks[start].location;
    let centered = start_pref == LocationPreference::Center;

    let mut rects: Vec<Option<Rect>> = vec![None; blocks.len()];
    rects[start] = Some(Rect::from_origin_size(
        0.0,
        0.0,
        blocks[start].effective_width(),
        blocks[start].effective_height(),
    ));

    let mut queue = VecDeque::from([start]);
    while let Some(u) = queue.pop_front() {
        let partner = match rects[u] {
            Some(r) => r,
            None => continue,
        };
        for v in graph.adjacent(u) {
            if rects[v].is_some() {
                continue;
            }
            let placed: Vec<Rect> = rects.iter().flatten().copied().collect();
            let (w, h) = (blocks[v].effective_width(), blocks[v].effective_height());
            let start_rect = rects[start].unwrap_or(partner);

            let choice = attach_in_group(&partner, w, h, &placed, &start_rect, centered)
                .unwrap_or_else(|| {
                    log::warn!(
                        "Could not attach '{}' to '{}' inside its group; placing it apart",
                        blocks[v].name,
                        blocks[u].name
                    );
                    let bb = Rect::enclosing(placed.iter().copied())
                        .unwrap_or(partner);
                    Rect::from_origin_size(bb.max_x, bb.min_y, w, h)
                });
            rects[v] = Some(choice);
            queue.push_back(v);
        }
    }

    let bb = Rect::enclosing(group.members.iter().filter_map(|&m| rects[m]))
        .unwrap_or_else(|| Rect::new(0.0, 0.0, 0.0, 0.0));
    let flip_x = start_pref.is_right();
    let flip_y = start_pref.is_bottom();

    let offsets = group
        .members
        .iter()
        .map(|&m| {
            let r = rects[m].unwrap_or(bb);
            let x = if flip_x {
                bb.max_x - r.max_x
            } else {
                r.min_x - bb.min_x
            };
            let y = if flip_y {
                bb.max_y - r.max_y
            } else {
                r.min_y - bb.min_y
            };
            (x, y)
        })
        .collect();

    UnitShape {
        members: group.members.clone(),
        offsets,
        width: bb.width(),
        height: bb.height(),
    }
}

/// Chooses where a member attaches to its partner inside a group layout.
fn attach_in_group(
    partner: &Rect,
    w: f64,
    h: f64,
    placed: &[Rect],
    start: &Rect,
    centered: bool,
) -> Option<Rect> {
    let free = |r: &Rect| !placed.iter().any(|p| p.intersects(r));
    let center_miss = |r: &Rect| {
        if !centered {
            return false;
        }
        let bb = placed.iter().fold(*r, |acc, p| acc.union(p));
        let (bx, by) = bb.center();
        let (sx, sy) = start.center();
        let slack = (CENTER_TOLERANCE + EPSILON) * (bb.width() + bb.height());
        (sx - bx).abs() + (sy - by).abs() > slack
    };
    let score = |r: &Rect| {
        let area = placed.iter().fold(*r, |acc, p| acc.union(p)).area();
        (center_miss(r), area)
    };
    let pick = |candidates: Vec<Rect>| {
        candidates
            .into_iter()
            .filter(|r| free(r))
            .map(|r| (score(&r), r))
            .min_by(|(a, _), (b, _)| {
                a.0.cmp(&b.0)
                    .then(a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            })
            .map(|(_, r)| r)
    };

    let first = if centered {
        attach_candidates(partner, w, h, placed, &Side::ALL)
    } else {
        attach_candidates(partner, w, h, placed, &[Side::Right, Side::Bottom])
            .into_iter()
            .filter(|r| {
                let tol = r.tolerance(start);
                r.min_x >= start.min_x - tol && r.min_y >= start.min_y - tol
            })
            .collect()
    };

    pick(first).or_else(|| pick(attach_candidates(partner, w, h, placed, &Side::ALL)))
}

/// Candidate top-left positions for a unit: around every placed block, at the
/// inner corners and center of the bounding box, and flush outside each side of it.
pub fn candidate_positions(plan: &FloorPlan, shape: &UnitShape) -> Vec<(f64, f64)> {
    let (w, h) = (shape.width, shape.height);
    let bb = match plan.bounding_box() {
        Some(bb) => bb,
        None => return vec![(0.0, 0.0)],
    };

    let mut out = Vec::new();
    for (_, r) in plan.placed_rects() {
        out.extend([
            (r.max_x, r.min_y),
            (r.max_x, r.max_y - h),
            (r.min_x, r.max_y),
            (r.max_x - w, r.max_y),
            (r.min_x - w, r.min_y),
            (r.min_x - w, r.max_y - h),
            (r.min_x, r.min_y - h),
            (r.max_x - w, r.min_y - h),
        ]);
    }

    let (cx, cy) = bb.center();
    out.extend([
        (bb.min_x, bb.min_y),
        (bb.max_x - w, bb.min_y),
        (bb.min_x, bb.max_y - h),
        (bb.max_x - w, bb.max_y - h),
        (cx - w / 2.0, cy - h / 2.0),
        (bb.max_x, bb.min_y),
        (bb.max_x, bb.max_y - h),
        (bb.min_x, bb.max_y),
        (bb.max_x - w, bb.max_y),
        (bb.min_x - w, bb.min_y),
        (bb.min_x - w, bb.max_y - h),
        (bb.min_x, bb.min_y - h),
        (bb.max_x - w, bb.min_y - h),
    ]);

    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    out.dedup();
    out
}

/// Candidate positions where the unit does not overlap anything.
pub fn valid_positions(plan: &FloorPlan, shape: &UnitShape) -> Vec<(f64, f64)> {
    candidate_positions(plan, shape)
        .into_iter()
        .filter(|&(x, y)| shape.fits_at(plan, x, y))
        .collect()
}

/// Ranking of one candidate position.
#[derive(Debug, Clone, Copy)]
struct Score {
    violations: usize,
    base_cost: f64,
    aspect_ratio: f64,
    x: f64,
    y: f64,
}

impl Score {
    fn compare(&self, other: &Self) -> Ordering {
        let close = |a: f64, b: f64| (a - b).abs() <= EPSILON * a.abs().max(b.abs());
        let by_float = |a: f64, b: f64| {
            if close(a, b) {
                Ordering::Equal
            } else {
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
        };

        self.violations
            .cmp(&other.violations)
            .then_with(|| by_float(self.base_cost, other.base_cost))
            .then_with(|| by_float(self.aspect_ratio, other.aspect_ratio))
            .then_with(|| by_float(self.y, other.y))
            .then_with(|| by_float(self.x, other.x))
    }
}

/// Finds the best non-overlapping position for an unplaced unit.
///
/// Ranks by fewest violations, then area plus aspect penalty, then squarer
/// aspect ratio, then top-most and left-most. The plan is left unchanged.
pub fn best_position(plan: &mut FloorPlan, shape: &UnitShape, model: &CostModel) -> Option<(f64, f64)> {
    let mut best: Option<Score> = None;

    for (x, y) in valid_positions(plan, shape) {
        shape.place_at(plan, x, y);
        let score = Score {
            violations: plan.violations(),
            base_cost: model.base_cost(plan),
            aspect_ratio: plan.aspect_ratio(),
            x,
            y,
        };
        shape.unplace(plan);

        if best.map_or(true, |b| score.compare(&b) == Ordering::Less) {
            best = Some(score);
        }
    }

    best.map(|s| (s.x, s.y))
}

/// Position flush right of the current layout, which never overlaps.
pub fn fallback_position(plan: &FloorPlan) -> (f64, f64) {
    plan.bounding_box()
        .map_or((0.0, 0.0), |bb| (bb.max_x, bb.min_y))
}

/// Order in which units are placed: groups by descending total area, then
/// singletons by descending area.
pub fn unit_order(blocks: &[Block], classification: &Classification) -> Vec<usize> {
    let unit_area = |u: usize| -> f64 {
        classification.units[u]
            .iter()
            .map(|&m| blocks[m].area())
            .sum()
    };
    let by_area_desc = |a: &usize, b: &usize| {
        unit_area(*b)
            .partial_cmp(&unit_area(*a))
            .unwrap_or(Ordering::Equal)
    };

    let group_count = classification.groups.len();
    let mut groups: Vec<usize> = (0..group_count).collect();
    groups.sort_by(by_area_desc);
    let mut singles: Vec<usize> = (group_count..classification.units.len()).collect();
    singles.sort_by(by_area_desc);

    groups.extend(singles);
    groups
}

/// Shape of a unit as used by the initial placement.
pub fn initial_shape(plan: &FloorPlan, classification: &Classification, unit: usize) -> UnitShape {
    match classification.group_of_unit(unit) {
        Some(group) => group_shape(plan.blocks(), group, &classification.graph),
        None => UnitShape::single(plan, classification.units[unit][0]),
    }
}

/// Direction in which a shelf layout fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShelfDirection {
    /// Left to right, wrapping downward.
    Rows,
    /// Top to bottom, wrapping rightward.
    Columns,
}

/// Shelf length that makes the packed shapes approach a `width / height` of `aspect`.
///
/// Never shorter than the longest shape along the shelf.
pub fn shelf_limit(shapes: &[UnitShape], direction: ShelfDirection, aspect: f64) -> f64 {
    let area: f64 = shapes.iter().map(|s| s.width * s.height).sum();
    let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
    let (target, longest) = match direction {
        ShelfDirection::Rows => (
            (area * aspect).sqrt(),
            shapes.iter().map(|s| s.width).fold(0.0, f64::max),
        ),
        ShelfDirection::Columns => (
            (area / aspect).sqrt(),
            shapes.iter().map(|s| s.height).fold(0.0, f64::max),
        ),
    };
    target.max(longest)
}

/// Packs shapes onto shelves in the given order and returns them as one rigid shape.
///
/// A new shelf starts when the next shape would run past `limit`.
pub fn shelf_shape(shapes: &[UnitShape], direction: ShelfDirection, limit: f64) -> UnitShape {
    let mut members = Vec::new();
    let mut offsets = Vec::new();
    let (mut width, mut height) = (0.0f64, 0.0f64);
    let (mut cursor, mut shelf, mut depth) = (0.0f64, 0.0f64, 0.0f64);

    for shape in shapes {
        let (along, across) = match direction {
            ShelfDirection::Rows => (shape.width, shape.height),
            ShelfDirection::Columns => (shape.height, shape.width),
        };
        if cursor > 0.0 && cursor + along > limit {
            shelf += depth;
            cursor = 0.0;
            depth = 0.0;
        }

        let (x, y) = match direction {
            ShelfDirection::Rows => (cursor, shelf),
            ShelfDirection::Columns => (shelf, cursor),
        };
        for (&m, &(dx, dy)) in shape.members.iter().zip(&shape.offsets) {
            members.push(m);
            offsets.push((x + dx, y + dy));
        }
        width = width.max(x + shape.width);
        height = height.max(y + shape.height);

        cursor += along;
        depth = depth.max(across);
    }

    UnitShape {
        members,
        offsets,
        width,
        height,
    }
}

/// Places every unit at its best candidate position, largest units first.
pub fn candidate_layout(blocks: Vec<Block>, classification: &Classification, model: &CostModel) -> FloorPlan {
    let mut plan = FloorPlan::new(blocks);

    for unit in unit_order(plan.blocks(), classification) {
        let shape = initial_shape(&plan, classification, unit);
        let (x, y) = best_position(&mut plan, &shape, model)
            .unwrap_or_else(|| fallback_position(&plan));
        shape.place_at(&mut plan, x, y);
    }

    plan.normalize();
    plan
}

/// Packs every unit onto shelves aiming for a square layout, largest units first.
pub fn shelf_layout(blocks: Vec<Block>, classification: &Classification, direction: ShelfDirection) -> FloorPlan {
    let mut plan = FloorPlan::new(blocks);
    let shapes: Vec<UnitShape> = unit_order(plan.blocks(), classification)
        .into_iter()
        .map(|unit| initial_shape(&plan, classification, unit))
        .collect();

    let limit = shelf_limit(&shapes, direction, 1.0);
    shelf_shape(&shapes, direction, limit).place_at(&mut plan, 0.0, 0.0);
    plan.normalize();
    plan
}

/// Builds the initial layout. The result is normalized and overlap-free.
///
/// Ties keep the candidate layout.
pub fn initial_placement(blocks: Vec<Block>, classification: &Classification, model: &CostModel) -> FloorPlan {
    let mut plan = candidate_layout(blocks.clone(), classification, model);
    let mut cost = model.cost(&plan);
    let mut source = "candidates";

    for (direction, name) in [(ShelfDirection::Rows, "rows"), (ShelfDirection::Columns, "columns")] {
        let shelves = shelf_layout(blocks.clone(), classification, direction);
        let shelves_cost = model.cost(&shelves);
        if shelves_cost < cost {
            plan = shelves;
            cost = shelves_cost;
            source = name;
        }
    }

    log::debug!(
        "Initial placement ({}): area={:.2}, violations={}",
        source,
        plan.area(),
        plan.violations()
    );
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{build_blocks, BlockSpec};
    use crate::constraint::classify;
    use approx::assert_relative_eq;

    fn build(specs: &[BlockSpec], max_aspect: f64) -> FloorPlan {
        let blocks = build_blocks(specs).unwrap();
        let classification = classify(&blocks).unwrap();
        initial_placement(blocks, &classification, &CostModel::new(max_aspect))
    }

    #[test]
    fn test_processor_memory_layout() {
        let plan = build(
            &[
                BlockSpec::new("Processor", 100.0, 80.0)
                    .with_location(LocationPreference::TopLeftCorner),
                BlockSpec::new("Memory", 60.0, 100.0).with_neighbor("Processor"),
            ],
            2.0,
        );

        assert_eq!((plan.block(0).x, plan.block(0).y), (0.0, 0.0));
        assert_eq!((plan.block(1).x, plan.block(1).y), (100.0, 0.0));
        assert_eq!(plan.violations(), 0);
        assert_relative_eq!(plan.area(), 16000.0);
    }

    #[test]
    fn test_group_mirrored_to_preferred_corner() {
        let plan = build(
            &[
                BlockSpec::new("A", 100.0, 80.0)
                    .with_location(LocationPreference::BottomRightCorner),
                BlockSpec::new("B", 60.0, 100.0).with_neighbor("A"),
            ],
            2.0,
        );

        assert_eq!(plan.violations(), 0);
        let bb = plan.bounding_box().unwrap();
        assert_relative_eq!(plan.rect(0).max_x, bb.max_x);
        assert_relative_eq!(plan.rect(0).max_y, bb.max_y);
    }

    #[test]
    fn test_centered_group() {
        let plan = build(
            &[
                BlockSpec::new("A", 100.0, 80.0).with_location(LocationPreference::Center),
                BlockSpec::new("B", 60.0, 100.0).with_neighbor("A"),
            ],
            2.0,
        );

        assert_eq!(plan.violations(), 0);
    }

    #[test]
    fn test_unconstrained_blocks_do_not_overlap() {
        let plan = build(
            &[
                BlockSpec::new("A", 40.0, 30.0),
                BlockSpec::new("B", 30.0, 20.0),
                BlockSpec::new("C", 50.0, 25.0),
                BlockSpec::new("D", 20.0, 20.0),
            ],
            2.0,
        );

        assert!(plan.all_placed());
        assert!(!plan.has_overlaps());
        let bb = plan.bounding_box().unwrap();
        assert_relative_eq!(bb.min_x, 0.0);
        assert_relative_eq!(bb.min_y, 0.0);
    }

    #[test]
    fn test_corner_block_placed_last() {
        let plan = build(
            &[
                BlockSpec::new("A", 40.0, 40.0),
                BlockSpec::new("B", 40.0, 40.0),
                BlockSpec::new("C", 40.0, 40.0),
                BlockSpec::new("D", 20.0, 20.0)
                    .with_location(LocationPreference::TopRightCorner),
            ],
            2.0,
        );

        assert!(!plan.has_overlaps());
        assert_eq!(plan.location_violations(), 0);
    }

    #[test]
    fn test_unit_order() {
        let blocks = build_blocks(&[
            BlockSpec::new("small", 1.0, 1.0),
            BlockSpec::new("big", 10.0, 10.0),
            BlockSpec::new("g1", 2.0, 2.0),
            BlockSpec::new("g2", 2.0, 2.0).with_neighbor("g1"),
        ])
        .unwrap();
        let c = classify(&blocks).unwrap();

        // Group first, then singletons by area.
        let order = unit_order(&blocks, &c);
        assert_eq!(order[0], 0);
        assert_eq!(c.units[order[1]], vec![1]);
        assert_eq!(c.units[order[2]], vec![0]);
    }

    #[test]
    fn test_attach_candidates_abut_partner() {
        let partner = Rect::from_origin_size(0.0, 0.0, 10.0, 10.0);
        let cands = attach_candidates(&partner, 4.0, 20.0, &[], &Side::ALL);
        assert!(!cands.is_empty());
        assert!(cands.iter().all(|r| r.abuts(&partner)));
    }

    #[test]
    fn test_capture_roundtrip() {
        let mut plan = build(
            &[
                BlockSpec::new("A", 10.0, 10.0),
                BlockSpec::new("B", 5.0, 5.0).with_neighbor("A"),
            ],
            2.0,
        );
        let shape = UnitShape::capture(&plan, &[0, 1]);
        shape.unplace(&mut plan);
        shape.place_at(&mut plan, 3.0, 4.0);

        assert_relative_eq!(plan.block(0).x, 3.0);
        assert_relative_eq!(plan.block(0).y, 4.0);
        assert_eq!(plan.neighbor_violations(), 0);
    }

    #[test]
    fn test_shelf_rows_wrap_at_limit() {
        let blocks = build_blocks(&[
            BlockSpec::new("A", 30.0, 10.0),
            BlockSpec::new("B", 30.0, 20.0),
            BlockSpec::new("C", 30.0, 10.0),
        ])
        .unwrap();
        let plan = FloorPlan::new(blocks);
        let shapes: Vec<UnitShape> = (0..3).map(|i| UnitShape::single(&plan, i)).collect();

        let rows = shelf_shape(&shapes, ShelfDirection::Rows, 60.0);
        assert_eq!(rows.offsets, vec![(0.0, 0.0), (30.0, 0.0), (0.0, 20.0)]);
        assert_relative_eq!(rows.width, 60.0);
        assert_relative_eq!(rows.height, 30.0);

        let columns = shelf_shape(&shapes, ShelfDirection::Columns, 20.0);
        assert_eq!(columns.offsets, vec![(0.0, 0.0), (30.0, 0.0), (60.0, 0.0)]);
        assert_relative_eq!(columns.height, 20.0);
    }

    #[test]
    fn test_shelf_limit_fits_longest_shape() {
        let blocks = build_blocks(&[
            BlockSpec::new("wide", 50.0, 2.0),
            BlockSpec::new("sq", 10.0, 10.0),
        ])
        .unwrap();
        let plan = FloorPlan::new(blocks);
        let shapes = vec![UnitShape::single(&plan, 0), UnitShape::single(&plan, 1)];

        assert_relative_eq!(shelf_limit(&shapes, ShelfDirection::Rows, 1.0), 50.0);
        assert_relative_eq!(shelf_limit(&shapes, ShelfDirection::Columns, 1.0), 200f64.sqrt());
    }

    #[test]
    fn test_shelf_layout_keeps_groups_rigid() {
        let specs = [
            BlockSpec::new("A", 40.0, 30.0),
            BlockSpec::new("B", 20.0, 30.0).with_neighbor("A"),
            BlockSpec::new("C", 35.0, 25.0),
            BlockSpec::new("D", 35.0, 15.0),
        ];
        let blocks = build_blocks(&specs).unwrap();
        let c = classify(&blocks).unwrap();

        for direction in [ShelfDirection::Rows, ShelfDirection::Columns] {
            let plan = shelf_layout(blocks.clone(), &c, direction);
            assert!(plan.all_placed());
            assert!(!plan.has_overlaps());
            assert_eq!(plan.neighbor_violations(), 0);
        }
    }

    #[test]
    fn test_initial_placement_keeps_cheapest_layout() {
        let specs = [
            BlockSpec::new("A", 30.0, 30.0),
            BlockSpec::new("B", 30.0, 30.0),
            BlockSpec::new("C", 30.0, 30.0),
            BlockSpec::new("D", 30.0, 30.0),
            BlockSpec::new("E", 60.0, 10.0),
        ];
        let blocks = build_blocks(&specs).unwrap();
        let c = classify(&blocks).unwrap();
        let model = CostModel::new(2.0);

        let chosen = model.cost(&initial_placement(blocks.clone(), &c, &model));
        let options = [
            candidate_layout(blocks.clone(), &c, &model),
            shelf_layout(blocks.clone(), &c, ShelfDirection::Rows),
            shelf_layout(blocks, &c, ShelfDirection::Columns),
        ];
        for plan in &options {
            assert!(chosen <= model.cost(plan));
        }
    }
}

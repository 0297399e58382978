//! The mutable layout state optimized by the planner.

use crate::block::Block;
use crate::constraint::satisfies;
use u_floorplan_core::placement::PlacedBlock;
use u_floorplan_core::rect::Rect;
use u_floorplan_core::sa::SaSolution;

/// All blocks with their current placements.
///
/// Blocks can be temporarily unplaced while a unit is being moved; unplaced
/// blocks are ignored by every geometric query.
#[derive(Debug, Clone)]
pub struct FloorPlan {
    blocks: Vec<Block>,
    placed: Vec<bool>,
    cost: f64,
}

impl FloorPlan {
    /// Creates a plan with every block unplaced.
    pub fn new(blocks: Vec<Block>) -> Self {
        let placed = vec![false; blocks.len()];
        Self {
            blocks,
            placed,
            cost: f64::INFINITY,
        }
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if the plan has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All blocks.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// One block.
    pub fn block(&self, i: usize) -> &Block {
        &self.blocks[i]
    }

    /// The rectangle a block occupies.
    pub fn rect(&self, i: usize) -> Rect {
        self.blocks[i].rect()
    }

    /// Whether a block currently has a position.
    pub fn is_placed(&self, i: usize) -> bool {
        self.placed[i]
    }

    /// Whether every block has a position.
    pub fn all_placed(&self) -> bool {
        self.placed.iter().all(|&p| p)
    }

    /// Puts a block at the given top-left position.
    pub fn place(&mut self, i: usize, x: f64, y: f64) {
        self.blocks[i].x = x;
        self.blocks[i].y = y;
        self.placed[i] = true;
    }

    /// Removes a block from the layout, keeping its last coordinates.
    pub fn unplace(&mut self, i: usize) {
        self.placed[i] = false;
    }

    /// Sets the rotation flag of a block.
    pub fn set_rotated(&mut self, i: usize, rotated: bool) {
        self.blocks[i].rotated = rotated;
    }

    /// Moves a set of blocks by the same offset.
    pub fn translate(&mut self, members: &[usize], dx: f64, dy: f64) {
        for &m in members {
            self.blocks[m].x += dx;
            self.blocks[m].y += dy;
        }
    }

    /// Rectangles of the placed blocks.
    pub fn placed_rects(&self) -> impl Iterator<Item = (usize, Rect)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(i, _)| self.placed[*i])
            .map(|(i, b)| (i, b.rect()))
    }

    /// Bounding box of a subset of blocks.
    pub fn members_bbox(&self, members: &[usize]) -> Option<Rect> {
        Rect::enclosing(members.iter().map(|&m| self.rect(m)))
    }

    /// Bounding box of all placed blocks.
    pub fn bounding_box(&self) -> Option<Rect> {
        Rect::enclosing(self.placed_rects().map(|(_, r)| r))
    }

    /// Bounding box area (0 when nothing is placed).
    pub fn area(&self) -> f64 {
        self.bounding_box().map_or(0.0, |b| b.area())
    }

    /// Bounding box aspect ratio (1 when nothing is placed).
    pub fn aspect_ratio(&self) -> f64 {
        self.bounding_box().map_or(1.0, |b| b.aspect_ratio())
    }

    /// Total area of all blocks.
    pub fn block_area(&self) -> f64 {
        self.blocks.iter().map(Block::area).sum()
    }

    /// Checks whether `rect` overlaps any placed block outside `ignore`.
    pub fn collides(&self, rect: &Rect, ignore: &[usize]) -> bool {
        self.placed_rects()
            .any(|(i, r)| !ignore.contains(&i) && r.intersects(rect))
    }

    /// Checks whether any member overlaps a placed block that is not a member.
    pub fn unit_collides(&self, members: &[usize]) -> bool {
        members
            .iter()
            .any(|&m| self.collides(&self.rect(m), members))
    }

    /// Checks every pair of placed blocks for positive-area overlap.
    pub fn has_overlaps(&self) -> bool {
        let rects: Vec<Rect> = self.placed_rects().map(|(_, r)| r).collect();
        rects
            .iter()
            .enumerate()
            .any(|(i, a)| rects[i + 1..].iter().any(|b| a.intersects(b)))
    }

    /// Translates the layout so its bounding box starts at the origin.
    pub fn normalize(&mut self) {
        if let Some(bb) = self.bounding_box() {
            if bb.min_x != 0.0 || bb.min_y != 0.0 {
                for b in &mut self.blocks {
                    b.x -= bb.min_x;
                    b.y -= bb.min_y;
                }
            }
        }
    }

    /// Whether a placed block's location preference currently holds.
    pub fn is_satisfied(&self, i: usize) -> bool {
        match self.bounding_box() {
            Some(bb) => self.placed[i] && satisfies(&self.blocks[i], &bb),
            None => false,
        }
    }

    /// Number of placed blocks whose location preference does not hold.
    pub fn location_violations(&self) -> usize {
        let bb = match self.bounding_box() {
            Some(bb) => bb,
            None => return 0,
        };
        self.blocks
            .iter()
            .enumerate()
            .filter(|(i, b)| self.placed[*i] && !satisfies(b, &bb))
            .count()
    }

    /// Number of neighbor pairs, both placed, that do not abut.
    pub fn neighbor_violations(&self) -> usize {
        self.blocks
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.neighbor.map(|n| (i, n)))
            .filter(|&(i, n)| self.placed[i] && self.placed[n])
            .filter(|&(i, n)| !self.rect(i).abuts(&self.rect(n)))
            .count()
    }

    /// Sum of location and neighbor violations.
    pub fn violations(&self) -> usize {
        self.location_violations() + self.neighbor_violations()
    }

    /// Exports the placements in block order.
    pub fn to_placements(&self) -> Vec<PlacedBlock> {
        self.blocks
            .iter()
            .map(|b| {
                PlacedBlock::new(
                    b.name.clone(),
                    b.x,
                    b.y,
                    b.effective_width(),
                    b.effective_height(),
                )
                .with_rotated(b.rotated)
            })
            .collect()
    }
}

impl SaSolution for FloorPlan {
    fn cost(&self) -> f64 {
        self.cost
    }

    fn set_cost(&mut self, value: f64) {
        self.cost = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{build_blocks, BlockSpec, LocationPreference};
    use approx::assert_relative_eq;

    fn processor_memory() -> FloorPlan {
        let blocks = build_blocks(&[
            BlockSpec::new("Processor", 100.0, 80.0)
                .with_location(LocationPreference::TopLeftCorner),
            BlockSpec::new("Memory", 60.0, 100.0).with_neighbor("Processor"),
        ])
        .unwrap();
        FloorPlan::new(blocks)
    }

    #[test]
    fn test_unplaced_blocks_are_ignored() {
        let mut plan = processor_memory();
        assert!(plan.bounding_box().is_none());
        assert_eq!(plan.area(), 0.0);

        plan.place(0, 0.0, 0.0);
        assert_relative_eq!(plan.area(), 8000.0);
        assert_eq!(plan.neighbor_violations(), 0);
        assert!(!plan.all_placed());
    }

    #[test]
    fn test_violation_counts() {
        let mut plan = processor_memory();
        plan.place(0, 0.0, 0.0);
        plan.place(1, 100.0, 0.0);
        assert_eq!(plan.violations(), 0);
        assert_relative_eq!(plan.area(), 16000.0);
        assert_relative_eq!(plan.aspect_ratio(), 1.6);

        plan.place(1, 120.0, 0.0);
        assert_eq!(plan.neighbor_violations(), 1);

        plan.place(0, 0.0, 30.0);
        assert_eq!(plan.location_violations(), 1);
    }

    #[test]
    fn test_overlap_detection() {
        let mut plan = processor_memory();
        plan.place(0, 0.0, 0.0);
        plan.place(1, 50.0, 0.0);
        assert!(plan.has_overlaps());
        assert!(plan.unit_collides(&[1]));

        plan.unplace(1);
        assert!(!plan.has_overlaps());
    }

    #[test]
    fn test_normalize() {
        let mut plan = processor_memory();
        plan.place(0, -10.0, 5.0);
        plan.place(1, 90.0, 5.0);
        plan.normalize();

        let bb = plan.bounding_box().unwrap();
        assert_relative_eq!(bb.min_x, 0.0);
        assert_relative_eq!(bb.min_y, 0.0);
        assert_relative_eq!(plan.block(1).x, 100.0);
    }

    #[test]
    fn test_export_uses_effective_size() {
        let mut plan = processor_memory();
        plan.place(0, 0.0, 0.0);
        plan.place(1, 100.0, 0.0);
        plan.set_rotated(1, true);

        let placements = plan.to_placements();
        assert_eq!(placements[1].width, 100.0);
        assert_eq!(placements[1].height, 60.0);
        assert!(placements[1].rotated);
    }
}

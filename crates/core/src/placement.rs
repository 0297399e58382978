//! Placement representation for positioned blocks.

use crate::rect::Rect;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Final position of one block in a layout.
///
/// `width` and `height` are the effective extents, already swapped when
/// `rotated` is set.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacedBlock {
    /// Name of the placed block.
    pub name: String,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Effective width.
    pub width: f64,
    /// Effective height.
    pub height: f64,
    /// Whether the block is rotated by 90 degrees.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rotated: bool,
}

impl PlacedBlock {
    /// Creates a new placement.
    pub fn new(name: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            width,
            height,
            rotated: false,
        }
    }

    /// Sets the rotated flag.
    pub fn with_rotated(mut self, rotated: bool) -> Self {
        self.rotated = rotated;
        self
    }

    /// Returns the occupied rectangle.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.x, self.y, self.width, self.height)
    }

    /// Returns the unrotated `(width, height)` of the block.
    pub fn original_size(&self) -> (f64, f64) {
        if self.rotated {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

/// Placement statistics for a set of placements.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementStats {
    /// Total number of placements.
    pub count: usize,
    /// Number of rotated placements.
    pub rotated_count: usize,
    /// Sum of block areas.
    pub block_area: f64,
    /// Bounding box of all placements.
    pub bounds: Option<Rect>,
}

impl PlacementStats {
    /// Computes statistics from a set of placements.
    pub fn from_placements(placements: &[PlacedBlock]) -> Self {
        let mut stats = Self {
            count: placements.len(),
            ..Default::default()
        };

        for p in placements {
            if p.rotated {
                stats.rotated_count += 1;
            }
            stats.block_area += p.width * p.height;
        }
        stats.bounds = Rect::enclosing(placements.iter().map(PlacedBlock::rect));

        stats
    }

    /// Fraction of the bounding box covered by blocks (0.0 when empty).
    pub fn density(&self) -> f64 {
        match self.bounds {
            Some(b) if b.area() > 0.0 => self.block_area / b.area(),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_placed_block_rect() {
        let p = PlacedBlock::new("mem", 100.0, 0.0, 100.0, 60.0).with_rotated(true);
        let r = p.rect();
        assert_relative_eq!(r.max_x, 200.0);
        assert_relative_eq!(r.max_y, 60.0);
        assert_eq!(p.original_size(), (60.0, 100.0));
    }

    #[test]
    fn test_placement_stats() {
        let placements = vec![
            PlacedBlock::new("a", 0.0, 0.0, 10.0, 10.0),
            PlacedBlock::new("b", 10.0, 0.0, 10.0, 5.0).with_rotated(true),
        ];

        let stats = PlacementStats::from_placements(&placements);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.rotated_count, 1);
        assert_relative_eq!(stats.block_area, 150.0);
        assert_relative_eq!(stats.density(), 0.75);
    }

    #[test]
    fn test_empty_stats() {
        let stats = PlacementStats::from_placements(&[]);
        assert!(stats.bounds.is_none());
        assert_eq!(stats.density(), 0.0);
    }
}

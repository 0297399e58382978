//! Block specifications and their resolved, placeable form.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use u_floorplan_core::rect::Rect;
use u_floorplan_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a block would like to sit relative to the layout bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum LocationPreference {
    /// No preference.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "don't care", alias = "dont-care"))]
    None,
    /// Block's top-left corner on the bounding box's top-left corner.
    #[cfg_attr(feature = "serde", serde(alias = "top-left"))]
    TopLeftCorner,
    /// Block's top-right corner on the bounding box's top-right corner.
    #[cfg_attr(feature = "serde", serde(alias = "top-right"))]
    TopRightCorner,
    /// Block's bottom-left corner on the bounding box's bottom-left corner.
    #[cfg_attr(feature = "serde", serde(alias = "bottom-left"))]
    BottomLeftCorner,
    /// Block's bottom-right corner on the bounding box's bottom-right corner.
    #[cfg_attr(feature = "serde", serde(alias = "bottom-right"))]
    BottomRightCorner,
    /// Block center inside the top-left quadrant.
    TopLeftQuad,
    /// Block center inside the top-right quadrant.
    TopRightQuad,
    /// Block center inside the bottom-left quadrant.
    BottomLeftQuad,
    /// Block center inside the bottom-right quadrant.
    BottomRightQuad,
    /// Block center near the bounding box center.
    Center,
}

impl LocationPreference {
    /// Every preference, in declaration order.
    pub const ALL: [LocationPreference; 10] = [
        LocationPreference::None,
        LocationPreference::TopLeftCorner,
        LocationPreference::TopRightCorner,
        LocationPreference::BottomLeftCorner,
        LocationPreference::BottomRightCorner,
        LocationPreference::TopLeftQuad,
        LocationPreference::TopRightQuad,
        LocationPreference::BottomLeftQuad,
        LocationPreference::BottomRightQuad,
        LocationPreference::Center,
    ];

    /// Canonical name used in documents and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationPreference::None => "none",
            LocationPreference::TopLeftCorner => "top-left-corner",
            LocationPreference::TopRightCorner => "top-right-corner",
            LocationPreference::BottomLeftCorner => "bottom-left-corner",
            LocationPreference::BottomRightCorner => "bottom-right-corner",
            LocationPreference::TopLeftQuad => "top-left-quad",
            LocationPreference::TopRightQuad => "top-right-quad",
            LocationPreference::BottomLeftQuad => "bottom-left-quad",
            LocationPreference::BottomRightQuad => "bottom-right-quad",
            LocationPreference::Center => "center",
        }
    }

    /// Corner preferences.
    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            LocationPreference::TopLeftCorner
                | LocationPreference::TopRightCorner
                | LocationPreference::BottomLeftCorner
                | LocationPreference::BottomRightCorner
        )
    }

    /// Quadrant preferences.
    pub fn is_quadrant(&self) -> bool {
        matches!(
            self,
            LocationPreference::TopLeftQuad
                | LocationPreference::TopRightQuad
                | LocationPreference::BottomLeftQuad
                | LocationPreference::BottomRightQuad
        )
    }

    /// Corner and center preferences pin a block to one spot.
    pub fn is_strict(&self) -> bool {
        self.is_corner() || *self == LocationPreference::Center
    }

    /// True for anything other than [`LocationPreference::None`].
    pub fn is_constrained(&self) -> bool {
        *self != LocationPreference::None
    }

    /// Whether the preference points at the right half of the layout.
    pub fn is_right(&self) -> bool {
        matches!(
            self,
            LocationPreference::TopRightCorner
                | LocationPreference::BottomRightCorner
                | LocationPreference::TopRightQuad
                | LocationPreference::BottomRightQuad
        )
    }

    /// Whether the preference points at the bottom half of the layout.
    pub fn is_bottom(&self) -> bool {
        matches!(
            self,
            LocationPreference::BottomLeftCorner
                | LocationPreference::BottomRightCorner
                | LocationPreference::BottomLeftQuad
                | LocationPreference::BottomRightQuad
        )
    }
}

impl fmt::Display for LocationPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationPreference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        let pref = match normalized.as_str() {
            "" | "none" | "don't-care" | "dont-care" => LocationPreference::None,
            "top-left-corner" | "top-left" => LocationPreference::TopLeftCorner,
            "top-right-corner" | "top-right" => LocationPreference::TopRightCorner,
            "bottom-left-corner" | "bottom-left" => LocationPreference::BottomLeftCorner,
            "bottom-right-corner" | "bottom-right" => LocationPreference::BottomRightCorner,
            "top-left-quad" => LocationPreference::TopLeftQuad,
            "top-right-quad" => LocationPreference::TopRightQuad,
            "bottom-left-quad" => LocationPreference::BottomLeftQuad,
            "bottom-right-quad" => LocationPreference::BottomRightQuad,
            "center" => LocationPreference::Center,
            _ => {
                return Err(Error::ConfigError(format!(
                    "unknown location preference '{}'",
                    s
                )))
            }
        };
        Ok(pref)
    }
}

/// A block as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlockSpec {
    /// Unique name.
    pub name: String,

    /// Unrotated width.
    pub width: f64,

    /// Unrotated height.
    pub height: f64,

    /// Location preference.
    #[cfg_attr(feature = "serde", serde(default, alias = "preferred_location"))]
    pub location: LocationPreference,

    /// Name of the block this one must abut.
    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "neighbor", skip_serializing_if = "Option::is_none")
    )]
    pub neighbor_of: Option<String>,
}

impl BlockSpec {
    /// Creates a new block specification without constraints.
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            location: LocationPreference::None,
            neighbor_of: None,
        }
    }

    /// Sets the location preference.
    pub fn with_location(mut self, location: LocationPreference) -> Self {
        self.location = location;
        self
    }

    /// Requires this block to abut another block.
    pub fn with_neighbor(mut self, neighbor: impl Into<String>) -> Self {
        self.neighbor_of = Some(neighbor.into());
        self
    }

    /// Returns the unrotated area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The neighbor reference, treating an empty name as no reference.
    fn neighbor_name(&self) -> Option<&str> {
        self.neighbor_of
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// A validated block with its neighbor reference resolved to an index.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Unique name.
    pub name: String,
    /// Unrotated width.
    pub width: f64,
    /// Unrotated height.
    pub height: f64,
    /// Location preference.
    pub location: LocationPreference,
    /// Index of the block this one must abut.
    pub neighbor: Option<usize>,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Whether width and height are swapped.
    pub rotated: bool,
}

impl Block {
    /// Width after rotation.
    pub fn effective_width(&self) -> f64 {
        if self.rotated {
            self.height
        } else {
            self.width
        }
    }

    /// Height after rotation.
    pub fn effective_height(&self) -> f64 {
        if self.rotated {
            self.width
        } else {
            self.height
        }
    }

    /// Block area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The rectangle currently occupied by the block.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(
            self.x,
            self.y,
            self.effective_width(),
            self.effective_height(),
        )
    }
}

/// Validates specifications and resolves neighbor names to indices.
///
/// Cycle detection is left to [`crate::constraint::classify`].
pub fn build_blocks(specs: &[BlockSpec]) -> Result<Vec<Block>> {
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();

    for (i, spec) in specs.iter().enumerate() {
        let name = spec.name.trim();
        if name.is_empty() {
            return Err(Error::EmptyBlockName(i));
        }
        if !(spec.width.is_finite() && spec.width > 0.0)
            || !(spec.height.is_finite() && spec.height > 0.0)
        {
            return Err(Error::InvalidDimension {
                name: name.to_string(),
                width: spec.width,
                height: spec.height,
            });
        }
        if index.insert(name, i).is_some() {
            return Err(Error::DuplicateBlockName(name.to_string()));
        }
    }

    specs
        .iter()
        .map(|spec| {
            let neighbor = match spec.neighbor_name() {
                Some(other) => Some(*index.get(other).ok_or_else(|| {
                    Error::UnknownNeighborReference {
                        block: spec.name.trim().to_string(),
                        neighbor: other.to_string(),
                    }
                })?),
                None => None,
            };

            Ok(Block {
                name: spec.name.trim().to_string(),
                width: spec.width,
                height: spec.height,
                location: spec.location,
                neighbor,
                x: 0.0,
                y: 0.0,
                rotated: false,
            })
        })
        .collect()
}

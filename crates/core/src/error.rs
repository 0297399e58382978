//! Error types for U-Floorplan.

use thiserror::Error;

/// Result type alias for U-Floorplan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating or solving a floorplan.
///
/// Every variant is a configuration error detected before any placement work
/// starts. Once validation passes, a solve always produces a layout.
#[derive(Debug, Error)]
pub enum Error {
    /// A block was given an empty name.
    #[error("Block #{0} has an empty name")]
    EmptyBlockName(usize),

    /// Two blocks share the same name.
    #[error("Duplicate block name: {0}")]
    DuplicateBlockName(String),

    /// A block has a non-positive or non-finite dimension.
    #[error("Invalid dimension for block '{name}': {width}x{height}")]
    InvalidDimension {
        /// Name of the offending block.
        name: String,
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },

    /// A block's `neighbor_of` points to a block that does not exist.
    #[error("Block '{block}' references unknown neighbor '{neighbor}'")]
    UnknownNeighborReference {
        /// Block carrying the reference.
        block: String,
        /// The missing neighbor name.
        neighbor: String,
    },

    /// Following `neighbor_of` edges revisits a block.
    #[error("Cyclic neighbor dependency: {}", .0.join(" -> "))]
    CyclicNeighborDependency(Vec<String>),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A prior layout handed to progressive refinement does not match the blocks.
    #[error("Invalid resume layout: {0}")]
    InvalidResume(String),

    /// Serialization error.
    #[cfg(feature = "serde")]
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

//! JSON documents for block lists, solver settings and results.
//!
//! A request is either a bare array of blocks or an object:
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "blocks": [
//!     { "name": "Processor", "width": 100, "height": 80, "location": "top-left-corner" },
//!     { "name": "Memory", "width": 60, "height": 100, "neighbor_of": "Processor" }
//!   ],
//!   "config": { "max_aspect_ratio": 2.0, "iterations": 5000, "seed": 42 }
//! }
//! ```

use crate::block::BlockSpec;
use serde::{Deserialize, Serialize};
use u_floorplan_core::solver::{Config, Strategy};
use u_floorplan_core::{Error, Result, SolveResult};

/// Document format version written by this crate.
pub const FORMAT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Solver settings carried by a request. Absent fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigRequest {
    /// Maximum bounding-box aspect ratio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_aspect_ratio: Option<f64>,

    /// Annealing iteration budget.
    #[serde(default, alias = "max_iterations", skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u64>,

    /// Random seed.
    #[serde(default, alias = "random_seed", skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Time limit in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_ms: Option<u64>,

    /// Optimization strategy (`greedy` or `sa`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    /// Starting temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_temp: Option<f64>,

    /// Cooling factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooling_rate: Option<f64>,

    /// Whether to run compaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compaction: Option<bool>,
}

impl ConfigRequest {
    /// Overlays the requested settings on `config`.
    pub fn apply(&self, mut config: Config) -> Result<Config> {
        if let Some(ratio) = self.max_aspect_ratio {
            config.max_aspect_ratio = ratio;
        }
        if let Some(iterations) = self.iterations {
            config.max_iterations = Some(iterations);
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(ms) = self.time_limit_ms {
            config.time_limit_ms = ms;
        }
        if let Some(strategy) = &self.strategy {
            config.strategy = strategy.parse::<Strategy>()?;
        }
        if let Some(temp) = self.initial_temp {
            config.initial_temp = Some(temp);
        }
        if let Some(rate) = self.cooling_rate {
            config.cooling_rate = rate;
        }
        if let Some(enabled) = self.compaction {
            config.compaction = enabled;
        }
        Ok(config)
    }
}

/// A floorplanning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorplanRequest {
    /// Document version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Blocks to place.
    pub blocks: Vec<BlockSpec>,

    /// Solver settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ConfigRequest>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Request(FloorplanRequest),
    Blocks(Vec<BlockSpec>),
}

impl FloorplanRequest {
    /// Wraps a block list without settings.
    pub fn new(blocks: Vec<BlockSpec>) -> Self {
        Self {
            version: Some(FORMAT_VERSION.to_string()),
            blocks,
            config: None,
        }
    }

    /// Attaches solver settings.
    pub fn with_config(mut self, config: ConfigRequest) -> Self {
        self.config = Some(config);
        self
    }

    /// The solver configuration this request asks for.
    pub fn to_config(&self) -> Result<Config> {
        match &self.config {
            Some(request) => request.apply(Config::default()),
            None => Ok(Config::default()),
        }
    }

    /// Parses a request or a bare block array.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Document = serde_json::from_str(json)
            .map_err(|e| Error::SerializationError(format!("Invalid JSON: {}", e)))?;
        Ok(match document {
            Document::Request(request) => request,
            Document::Blocks(blocks) => Self {
                version: None,
                blocks,
                config: None,
            },
        })
    }

    /// Serializes the request as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::SerializationError(e.to_string()))
    }
}

/// Serializes a result as pretty-printed JSON.
pub fn result_to_json(result: &SolveResult) -> Result<String> {
    serde_json::to_string_pretty(result).map_err(|e| Error::SerializationError(e.to_string()))
}

/// Parses a result previously written by [`result_to_json`], e.g. for resuming.
pub fn result_from_json(json: &str) -> Result<SolveResult> {
    serde_json::from_str(json)
        .map_err(|e| Error::SerializationError(format!("Invalid result JSON: {}", e)))
}

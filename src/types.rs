//! Shared value types used across BANDCLIP.
//! Includes `PathParts`, `BoundingBox`, `Hemisphere`, `KeyMatch`,
//! the parsed sidecar `MetadataRecord` and the per-file `ClipRequest`.
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A file path split on its last separator and last dot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParts {
    /// Parent directory (empty when the path has no separator)
    pub directory: String,
    /// File name with extension
    pub basename: String,
    /// File name without extension
    pub stem: String,
    /// Extension including the leading dot, empty if none
    pub extension: String,
}

/// Axis-aligned envelope in the mask file's native units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Grow the box by `margin` on every side.
    pub fn inflate(self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "minX={:.15}, minY={:.15}, maxX={:.15}, maxY={:.15}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    #[default]
    North,
    South,
}

impl std::fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hemisphere::North => write!(f, "North"),
            Hemisphere::South => write!(f, "South"),
        }
    }
}

/// How sidecar metadata keys are matched against a line.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMatch {
    /// Key text appears anywhere in the line
    #[default]
    Substring,
    /// Text left of the first `=` equals the key after trimming
    Exact,
}

impl std::fmt::Display for KeyMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyMatch::Substring => write!(f, "Substring"),
            KeyMatch::Exact => write!(f, "Exact"),
        }
    }
}

/// Projection fields extracted from an `_MTL.txt` sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    pub projection: String,
    pub utm_zone: i32,
}

/// A single raster crop handed to the geospatial backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub bbox: BoundingBox,
    pub epsg: u32,
}

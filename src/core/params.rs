//! Tunable clipping parameters and JSON preset loading.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Hemisphere, KeyMatch};

/// Default number of leading filename characters shared with the MTL sidecar,
/// e.g. `LC08_L2SP_021047_20250923_20251001_02_T1`.
pub const DEFAULT_METADATA_PREFIX_LEN: usize = 40;

/// Default bounding-box inflation applied to the mask extent.
pub const DEFAULT_MARGIN: f64 = 31.0;

/// Tunable clipping parameters suitable for preset files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipParams {
    /// Inflation added on every side of the mask envelope
    pub margin: f64,
    /// Characters of the raster filename kept when deriving the sidecar name
    pub metadata_prefix_len: usize,
    /// Suffix appended to the truncated name to form the sidecar name
    pub metadata_suffix: String,
    /// Only files with this extension (leading dot included) are clipped
    pub raster_extension: String,
    pub key_match: KeyMatch,
    /// Hemisphere used when turning a UTM zone into an EPSG code
    pub hemisphere: Hemisphere,
}

impl Default for ClipParams {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            metadata_prefix_len: DEFAULT_METADATA_PREFIX_LEN,
            metadata_suffix: "_MTL.txt".to_string(),
            raster_extension: ".tif".to_string(),
            key_match: KeyMatch::Substring,
            hemisphere: Hemisphere::North,
        }
    }
}

impl ClipParams {
    /// Load parameters from a JSON preset. Fields absent from the file keep
    /// their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| Error::Params {
            path: path.to_path_buf(),
            source,
        })
    }
}

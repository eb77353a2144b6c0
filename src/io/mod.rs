//! I/O layer: the MTL sidecar reader and the geospatial backend.
//! `GeoBackend` is the seam between the batch driver and GDAL; the
//! `gdal` module provides the production implementation.
use std::path::Path;

use crate::error::Result;
use crate::types::{BoundingBox, ClipRequest};

pub mod metadata;
pub use metadata::{extract_projection_info, locate_metadata_file};

pub mod gdal;
pub use gdal::{GdalBackend, GdalError};

/// Geospatial capabilities the driver needs: a mask extent and a raster crop.
pub trait GeoBackend {
    /// Envelope of the first feature in the first layer of `mask`.
    fn extent(&self, mask: &Path) -> Result<BoundingBox>;

    /// Write `request.output`, cropped to `request.bbox` and tagged with
    /// `request.epsg`.
    fn clip(&self, request: &ClipRequest) -> Result<()>;
}

//! GDAL-backed mask extent reader and raster clipper.
use std::ffi::{CString, c_char, c_int};
use std::path::Path;
use std::ptr;

use gdal::spatial_ref::SpatialRef;
use gdal::vector::LayerAccess;
use gdal::{Dataset, errors::GdalError as GdalCrateError};
use thiserror::Error;
use tracing::{debug, info};

use crate::io::GeoBackend;
use crate::types::{BoundingBox, ClipRequest};

/// Errors encountered when reading masks or clipping rasters through GDAL
#[derive(Debug, Error)]
pub enum GdalError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] GdalCrateError),
    #[error("Cannot read mask file {0}")]
    MaskOpen(String),
    #[error("Expected a single layer in mask file {0}")]
    NoLayer(String),
    #[error("No features in mask file {0}")]
    NoFeature(String),
    #[error("No geometry in first feature of mask file {0}")]
    NoGeometry(String),
    #[error("Invalid path or option string: {0}")]
    InvalidString(String),
    #[error("GDALTranslate produced no output for {0}")]
    TranslateFailed(String),
}

/// `GeoBackend` implemented with the system GDAL library.
#[derive(Debug, Clone, Copy, Default)]
pub struct GdalBackend;

impl GdalBackend {
    pub fn new() -> Self {
        Self
    }

    /// Envelope of the first feature's geometry in the first layer of `mask`.
    pub fn mask_extent(&self, mask: &Path) -> Result<BoundingBox, GdalError> {
        let name = mask.display().to_string();
        let dataset = Dataset::open(mask).map_err(|_| GdalError::MaskOpen(name.clone()))?;
        if dataset.layer_count() == 0 {
            return Err(GdalError::NoLayer(name));
        }
        let mut layer = dataset.layer(0)?;
        layer.reset_feature_reading();
        let feature = layer
            .features()
            .next()
            .ok_or_else(|| GdalError::NoFeature(name.clone()))?;
        let geometry = feature
            .geometry()
            .ok_or_else(|| GdalError::NoGeometry(name.clone()))?;

        let env = geometry.envelope();
        let bbox = BoundingBox::new(env.MinX, env.MinY, env.MaxX, env.MaxY);
        info!(
            "xmin: {}, ymin: {}, xmax: {}, ymax: {}",
            bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y
        );
        Ok(bbox)
    }

    /// Crop `request.input` to `request.bbox` and assign the EPSG reference,
    /// writing `request.output` with GDALTranslate.
    pub fn clip_raster(&self, request: &ClipRequest) -> Result<(), GdalError> {
        let src = Dataset::open(&request.input)?;

        let srs = SpatialRef::from_epsg(request.epsg)?;
        let wkt = srs.to_wkt()?;

        // -projwin takes the upper-left then lower-right corner.
        let bbox = request.bbox;
        let args = [
            "-projwin".to_string(),
            bbox.min_x.to_string(),
            bbox.max_y.to_string(),
            bbox.max_x.to_string(),
            bbox.min_y.to_string(),
            "-a_srs".to_string(),
            wkt,
        ];
        debug!("GDALTranslate options: {:?}", &args[..5]);

        let c_args = args
            .iter()
            .map(|a| CString::new(a.as_str()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| GdalError::InvalidString(e.to_string()))?;
        let mut argv: Vec<*mut c_char> = c_args
            .iter()
            .map(|a| a.as_ptr() as *mut c_char)
            .collect();
        argv.push(ptr::null_mut());

        let out_name = request.output.to_string_lossy().into_owned();
        let c_out =
            CString::new(out_name.as_str()).map_err(|e| GdalError::InvalidString(e.to_string()))?;

        // SAFETY: `argv` is a null-terminated array of strings owned by
        // `c_args`, which outlives both calls. `src` stays open until the
        // returned handle is closed.
        let out_handle = unsafe {
            let options = gdal_sys::GDALTranslateOptionsNew(argv.as_mut_ptr(), ptr::null_mut());
            if options.is_null() {
                return Err(GdalError::InvalidString(format!("{:?}", &args[..5])));
            }
            let mut usage_error: c_int = 0;
            let handle =
                gdal_sys::GDALTranslate(c_out.as_ptr(), src.c_dataset(), options, &mut usage_error);
            gdal_sys::GDALTranslateOptionsFree(options);
            handle
        };

        if out_handle.is_null() {
            return Err(GdalError::TranslateFailed(out_name));
        }
        // Closing the output flushes it to disk.
        drop(unsafe { Dataset::from_c_dataset(out_handle) });
        Ok(())
    }
}

impl GeoBackend for GdalBackend {
    fn extent(&self, mask: &Path) -> crate::Result<BoundingBox> {
        Ok(self.mask_extent(mask)?)
    }

    fn clip(&self, request: &ClipRequest) -> crate::Result<()> {
        Ok(self.clip_raster(request)?)
    }
}

//! EPSG helpers for UTM zones and the run-wide source CRS.
use tracing::info;

use crate::error::{Error, Result};
use crate::types::Hemisphere;

const EPSG_PREFIX: &str = "EPSG:";

/// EPSG identifier (`EPSG:326zz` / `EPSG:327zz`) for a WGS 84 UTM zone.
/// Returns `None` outside zones 1..=60.
pub fn epsg_from_utm_zone(zone: i32, hemisphere: Hemisphere) -> Option<String> {
    if !(1..=60).contains(&zone) {
        return None;
    }
    let code = match hemisphere {
        Hemisphere::North => 32600 + zone,
        Hemisphere::South => 32700 + zone,
    };
    Some(format!("{EPSG_PREFIX}{code}"))
}

/// Parse `EPSG:<code>` into its numeric code.
pub fn parse_epsg(value: &str) -> Result<u32> {
    value
        .strip_prefix(EPSG_PREFIX)
        .and_then(|code| code.parse::<u32>().ok())
        .ok_or_else(|| Error::InvalidEpsg {
            value: value.to_string(),
        })
}

/// Source CRS carried across files of one run.
///
/// A metadata-derived CRS that differs from the current one replaces it and
/// stays in effect for every later file, including files without metadata.
#[derive(Debug, Clone)]
pub struct CrsResolver {
    current: String,
    updates: usize,
}

impl CrsResolver {
    pub fn new(source_crs: impl Into<String>) -> Self {
        Self {
            current: source_crs.into(),
            updates: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Number of times the source CRS has been replaced.
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Adopt `derived` when present and different, then return the CRS to
    /// use for the current file.
    pub fn resolve(&mut self, derived: Option<&str>) -> &str {
        if let Some(candidate) = derived {
            if candidate != self.current {
                info!("***Updating CRS {} with {}", self.current, candidate);
                self.current = candidate.to_string();
                self.updates += 1;
            }
        }
        &self.current
    }
}

//! Landsat MTL sidecar lookup and projection field extraction.
//!
//! The sidecar is a plain `KEY = value` text file sitting next to the band
//! rasters. Only two fields are read: `MAP_PROJECTION` and `UTM_ZONE`.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::paths::join_dir;
use crate::types::{KeyMatch, MetadataRecord};

pub const MAP_PROJECTION_KEY: &str = "MAP_PROJECTION";
pub const UTM_ZONE_KEY: &str = "UTM_ZONE";

/// Path of the sidecar for `raster_name`: the first `prefix_len` characters
/// of the name followed by `suffix`, inside `dir`. `None` if no such file.
pub fn locate_metadata_file(
    dir: &Path,
    raster_name: &str,
    prefix_len: usize,
    suffix: &str,
) -> Option<PathBuf> {
    let base: String = raster_name.chars().take(prefix_len).collect();
    let path = join_dir(dir, &format!("{base}{suffix}"));
    debug!("Looking for metadata at {}", path.display());
    path.is_file().then_some(path)
}

/// Trim whitespace, then one surrounding double quote on each side.
pub fn strip_value(value: &str) -> &str {
    let value = value.trim();
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

/// Text after the first `=` when `line` matches `key` under `mode`.
fn match_value<'a>(line: &'a str, key: &str, mode: KeyMatch) -> Option<&'a str> {
    let (name, value) = line.split_once('=')?;
    let hit = match mode {
        KeyMatch::Substring => line.contains(key),
        KeyMatch::Exact => name.trim() == key,
    };
    hit.then_some(value)
}

/// Scan `path` for the projection name and UTM zone, stopping once both are
/// known. Returns `None` when the file is unreadable or either field is
/// missing, empty or zero.
pub fn extract_projection_info(path: &Path, mode: KeyMatch) -> Option<MetadataRecord> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!("Failed to open metadata file {}: {}", path.display(), e);
            return None;
        }
    };

    let mut projection = String::new();
    let mut utm_zone = 0;

    // Decoded lossily: a non-UTF-8 byte must not end the scan.
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to read metadata file {}: {}", path.display(), e);
                break;
            }
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();

        if let Some(value) = match_value(line, MAP_PROJECTION_KEY, mode) {
            projection = strip_value(value).to_string();
        }

        if let Some(value) = match_value(line, UTM_ZONE_KEY, mode) {
            match strip_value(value).parse::<i32>() {
                Ok(zone) => utm_zone = zone,
                Err(_) => debug!("Ignoring malformed {} line: {}", UTM_ZONE_KEY, line),
            }
        }

        if !projection.is_empty() && utm_zone != 0 {
            break;
        }
    }

    (!projection.is_empty() && utm_zone != 0).then_some(MetadataRecord {
        projection,
        utm_zone,
    })
}

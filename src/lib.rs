#![doc = r#"
BANDCLIP — batch clipping of Landsat scene bands to a vector mask extent.

This crate clips every band raster of a scene directory to the (inflated)
bounding box of the first feature in a mask file, assigning each output the
UTM coordinate reference system recorded in the scene's `_MTL.txt` sidecar.
It powers the `bandclip` CLI and can be embedded in your own Rust tools.

Requirements
------------
- GDAL development headers and runtime available on your system.
- Rust 2024 edition toolchain.

Quick start
-----------
```rust,no_run
use std::path::PathBuf;
use bandclip::{run_clip_job, ClipJob, ClipParams, GdalBackend};

fn main() -> bandclip::Result<()> {
    let job = ClipJob {
        input_dir: PathBuf::from("/data/LC08_L2SP_021047_20250923_20251001_02_T1"),
        output_dir: PathBuf::from("/out"),
        source_crs: "EPSG:32615".to_string(),
        mask: PathBuf::from("/data/site.shp"),
        datasets: vec!["B4".to_string(), "B5".to_string()],
        pattern: None,
        label: "_clip".to_string(),
        debug: false,
        params: ClipParams::default(),
    };

    let report = run_clip_job(&job, &GdalBackend::new())?;
    println!("clipped={} final_crs={}", report.clipped, report.final_crs);
    Ok(())
}
```

CRS carry-over
--------------
The source CRS is run-wide state. When a sidecar yields a UTM zone whose EPSG
code differs from the current source CRS, that code replaces it for the
current file *and every later file* of the run, including files that have no
sidecar of their own.

Error handling
--------------
All public functions return `bandclip::Result<T>`. The first clip failure
stops the run:

```rust,no_run
use std::path::PathBuf;
use bandclip::{run_clip_job, ClipJob, ClipParams, Error, GdalBackend};

fn main() {
    let job = ClipJob {
        input_dir: PathBuf::from("/data/scene"),
        output_dir: PathBuf::from("/out"),
        source_crs: "EPSG:32615".to_string(),
        mask: PathBuf::from("/data/site.shp"),
        datasets: vec!["B4".to_string()],
        pattern: None,
        label: String::new(),
        debug: false,
        params: ClipParams::default(),
    };

    match run_clip_job(&job, &GdalBackend::new()) {
        Ok(_) => {}
        Err(Error::Clip { file, source }) => eprintln!("{file}: {source}"),
        Err(Error::Gdal(e)) => eprintln!("Mask error: {e}"),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`] — `ClipJob` and the `run_clip_job` driver.
- [`core`] — parameters, path helpers and CRS resolution.
- [`io`] — MTL sidecar parsing and the GDAL-backed `GeoBackend`.
- [`types`] — shared value types (`PathParts`, `BoundingBox`, ...).
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use core::params::ClipParams;
pub use error::{Error, Result};
pub use types::{BoundingBox, ClipRequest, Hemisphere, KeyMatch, MetadataRecord, PathParts};

// Backends
pub use io::gdal::{GdalBackend, GdalError};
pub use io::GeoBackend;

// High-level API re-exports
pub use api::{ClipJob, ClipReport, output_file_name, run_clip_job};

//! High-level library API: describe a run as a `ClipJob` and execute it with
//! `run_clip_job` against any `GeoBackend`. Prefer these entrypoints over the
//! lower-level `core` and `io` helpers when embedding BANDCLIP.
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::crs::{CrsResolver, epsg_from_utm_zone, parse_epsg};
use crate::core::params::ClipParams;
use crate::core::paths::{
    directory_exists, find_pattern, join_dir, list_files_in_directory, split_path,
};
use crate::error::{Error, Result};
use crate::io::GeoBackend;
use crate::io::metadata::{extract_projection_info, locate_metadata_file};
use crate::types::{ClipRequest, PathParts};

/// Everything one batch run needs
#[derive(Debug, Clone)]
pub struct ClipJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Initial source CRS as `EPSG:<code>`
    pub source_crs: String,
    /// Vector file whose first feature defines the clip extent
    pub mask: PathBuf,
    /// Band names; a file matches band `B4` when its name contains `_B4`
    pub datasets: Vec<String>,
    /// Optional free-text filter on file names
    pub pattern: Option<String>,
    /// Appended to the output file stem
    pub label: String,
    /// Log the split path of every candidate file
    pub debug: bool,
    pub params: ClipParams,
}

/// Summary of a completed run
#[derive(Debug, Clone, Default)]
pub struct ClipReport {
    pub clipped: usize,
    /// Files matching pattern and band but with the wrong extension
    pub skipped: usize,
    /// Files clipped with the carried-over CRS because no usable sidecar was found
    pub metadata_fallbacks: usize,
    pub crs_updates: usize,
    /// Source CRS in effect after the last file
    pub final_crs: String,
    pub outputs: Vec<PathBuf>,
}

/// Output file name: `<stem><label><extension>`.
pub fn output_file_name(parts: &PathParts, label: &str) -> String {
    format!("{}{}{}", parts.stem, label, parts.extension)
}

/// Output name for a listed entry. Names that are not valid UTF-8 keep
/// their raw stem bytes instead of the lossy form held in `parts`.
fn output_os_name(name: &OsStr, parts: &PathParts, label: &str) -> OsString {
    if name.to_str().is_some() {
        return output_file_name(parts, label).into();
    }
    let mut out = Path::new(name).file_stem().unwrap_or(name).to_os_string();
    out.push(label);
    out.push(&parts.extension);
    out
}

fn log_path_parts(parts: &PathParts) {
    info!("Input filename:");
    info!("  Directory: {}", parts.directory);
    info!("  Basename:  {}", parts.basename);
    info!("  Stem:      {}", parts.stem);
    info!("  Extension: {}", parts.extension);
}

/// Look up the sidecar for `fname` and turn its UTM zone into an EPSG string.
fn metadata_crs(job: &ClipJob, fname: &str) -> Option<String> {
    let params = &job.params;
    let path = locate_metadata_file(
        &job.input_dir,
        fname,
        params.metadata_prefix_len,
        &params.metadata_suffix,
    )?;
    let record = extract_projection_info(&path, params.key_match)?;
    info!(
        "Metadata={}, Proj={}, Zone={}",
        path.display(),
        record.projection,
        record.utm_zone
    );
    let derived = epsg_from_utm_zone(record.utm_zone, params.hemisphere);
    if derived.is_none() {
        warn!("UTM zone {} out of range, ignoring", record.utm_zone);
    }
    derived
}

/// Validate the job, then clip every matching raster in the input directory.
///
/// Files are visited once per dataset, in sorted name order. The first clip
/// failure or unparseable CRS stops the run and is returned as the error.
pub fn run_clip_job<B: GeoBackend + ?Sized>(job: &ClipJob, backend: &B) -> Result<ClipReport> {
    check_directory("Input", &job.input_dir)?;
    check_directory("Output", &job.output_dir)?;
    if job.datasets.is_empty() {
        return Err(Error::NoDatasets);
    }
    info!("Datasets: {}", job.datasets.join(" "));

    let bbox = backend.extent(&job.mask)?.inflate(job.params.margin);
    info!("Extent: {}", bbox);

    let files = list_files_in_directory(&job.input_dir)?;
    let mut resolver = CrsResolver::new(job.source_crs.clone());
    let mut report = ClipReport::default();

    for band in &job.datasets {
        info!("======Processing {}======", band);
        let band_pattern = format!("_{band}");

        for name in &files {
            let fname = name.to_string_lossy();
            if let Some(pattern) = job.pattern.as_deref() {
                if !pattern.is_empty() && !find_pattern(&fname, pattern) {
                    continue;
                }
            }
            if !find_pattern(&fname, &band_pattern) {
                continue;
            }
            info!("File={}", fname);

            let parts = split_path(&fname);
            if job.debug {
                log_path_parts(&parts);
            }
            if parts.extension != job.params.raster_extension {
                info!(
                    "\"{}\" extension expected. Skipping.",
                    job.params.raster_extension
                );
                report.skipped += 1;
                continue;
            }

            let derived = metadata_crs(job, &fname);
            if derived.is_none() {
                warn!(
                    "Metadata not found or extraction failed! Using source CRS={}",
                    resolver.current()
                );
                report.metadata_fallbacks += 1;
            }
            let crs = resolver.resolve(derived.as_deref()).to_string();
            let epsg = parse_epsg(&crs)?;

            let request = ClipRequest {
                input: join_dir(&job.input_dir, name),
                output: join_dir(&job.output_dir, output_os_name(name, &parts, &job.label)),
                bbox,
                epsg,
            };
            info!("inFile: {}", request.input.display());
            info!("outFile: {}", request.output.display());
            info!("epsgCode: {}", epsg);

            backend.clip(&request).map_err(|e| Error::Clip {
                file: fname.to_string(),
                source: Box::new(e),
            })?;
            report.clipped += 1;
            report.outputs.push(request.output);
        }
    }

    report.crs_updates = resolver.updates();
    report.final_crs = resolver.current().to_string();
    info!(
        "Clipped {} file(s), skipped {}, final CRS {}",
        report.clipped, report.skipped, report.final_crs
    );
    Ok(report)
}

fn check_directory(kind: &'static str, path: &Path) -> Result<()> {
    info!("{} directory: {}", kind, path.display());
    if directory_exists(path) {
        Ok(())
    } else {
        Err(Error::DirectoryNotFound {
            kind,
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::GdalError;
    use crate::types::{BoundingBox, Hemisphere};
    use std::cell::RefCell;
    use std::fs;

    const SCENE_A: &str = "LC08_L2SP_021047_20250923_20251001_02_T1";
    const SCENE_B: &str = "LC08_L2SP_021048_20250923_20251001_02_T1";
    const SCENE_C: &str = "LC08_L2SP_021049_20250923_20251001_02_T1";

    /// Records every clip request; fails the `fail_on`-th call (1-based).
    struct FakeBackend {
        extent: BoundingBox,
        fail_on: Option<usize>,
        calls: RefCell<Vec<ClipRequest>>,
    }

    impl FakeBackend {
        fn new() -> Self {
            Self {
                extent: BoundingBox::new(100.0, 100.0, 200.0, 200.0),
                fail_on: None,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                fail_on: Some(call),
                ..Self::new()
            }
        }
    }

    impl GeoBackend for FakeBackend {
        fn extent(&self, _mask: &Path) -> Result<BoundingBox> {
            Ok(self.extent)
        }

        fn clip(&self, request: &ClipRequest) -> Result<()> {
            let mut calls = self.calls.borrow_mut();
            calls.push(request.clone());
            if self.fail_on == Some(calls.len()) {
                return Err(GdalError::TranslateFailed(request.output.display().to_string()).into());
            }
            Ok(())
        }
    }

    struct Fixture {
        _input: tempfile::TempDir,
        _output: tempfile::TempDir,
        job: ClipJob,
    }

    fn fixture<N: AsRef<str>>(files: &[(N, &str)]) -> Fixture {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(input.path().join(name.as_ref()), content).unwrap();
        }
        let job = ClipJob {
            input_dir: input.path().to_path_buf(),
            output_dir: output.path().to_path_buf(),
            source_crs: "EPSG:32615".to_string(),
            mask: input.path().join("mask.shp"),
            datasets: vec!["B4".to_string()],
            pattern: None,
            label: "_clip".to_string(),
            debug: true,
            params: ClipParams::default(),
        };
        Fixture {
            _input: input,
            _output: output,
            job,
        }
    }

    fn mtl(zone: i32) -> String {
        format!("GROUP = PROJECTION_ATTRIBUTES\n    MAP_PROJECTION = \"UTM\"\n    UTM_ZONE = {zone}\n")
    }

    #[test]
    fn metadata_zone_overrides_source_crs_and_extent_is_inflated() {
        let meta = mtl(12);
        let fx = fixture(&[
            (format!("{SCENE_A}_SR_B4.tif"), ""),
            (format!("{SCENE_A}_SR_B5.tif"), ""),
            (format!("{SCENE_A}_MTL.txt"), meta.as_str()),
        ]);
        let mut job = fx.job.clone();
        job.pattern = Some("L2SP".to_string());
        let backend = FakeBackend::new();

        let report = run_clip_job(&job, &backend).unwrap();

        let calls = backend.calls.borrow();
        assert_eq!(calls.len(), 1);
        let request = &calls[0];
        assert_eq!(request.bbox, BoundingBox::new(69.0, 69.0, 231.0, 231.0));
        assert_eq!(request.epsg, 32612);
        assert_eq!(
            request.input,
            job.input_dir.join(format!("{SCENE_A}_SR_B4.tif"))
        );
        assert_eq!(
            request.output,
            job.output_dir.join(format!("{SCENE_A}_SR_B4_clip.tif"))
        );
        assert_eq!(report.clipped, 1);
        assert_eq!(report.crs_updates, 1);
        assert_eq!(report.final_crs, "EPSG:32612");
        assert_eq!(report.metadata_fallbacks, 0);
    }

    #[test]
    fn second_failure_aborts_before_third_file() {
        let fx = fixture(&[
            (format!("{SCENE_A}_SR_B4.tif"), ""),
            (format!("{SCENE_B}_SR_B4.tif"), ""),
            (format!("{SCENE_C}_SR_B4.tif"), ""),
        ]);
        let backend = FakeBackend::failing_on(2);

        let err = run_clip_job(&fx.job, &backend).unwrap_err();

        match err {
            Error::Clip { file, source } => {
                assert_eq!(file, format!("{SCENE_B}_SR_B4.tif"));
                assert!(matches!(
                    *source,
                    Error::Gdal(GdalError::TranslateFailed(_))
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(backend.calls.borrow().len(), 2);
    }

    #[test]
    fn overridden_crs_carries_over_to_files_without_metadata() {
        let meta = mtl(12);
        let fx = fixture(&[
            (format!("{SCENE_A}_SR_B4.tif"), ""),
            (format!("{SCENE_A}_MTL.txt"), meta.as_str()),
            (format!("{SCENE_B}_SR_B4.tif"), ""),
        ]);
        let backend = FakeBackend::new();

        let report = run_clip_job(&fx.job, &backend).unwrap();

        let epsgs: Vec<u32> = backend.calls.borrow().iter().map(|c| c.epsg).collect();
        assert_eq!(epsgs, vec![32612, 32612]);
        assert_eq!(report.metadata_fallbacks, 1);
        assert_eq!(report.crs_updates, 1);
    }

    #[test]
    fn without_metadata_the_configured_crs_is_used() {
        let fx = fixture(&[(format!("{SCENE_A}_SR_B4.tif"), "")]);
        let backend = FakeBackend::new();

        let report = run_clip_job(&fx.job, &backend).unwrap();

        assert_eq!(backend.calls.borrow()[0].epsg, 32615);
        assert_eq!(report.final_crs, "EPSG:32615");
        assert_eq!(report.crs_updates, 0);
    }

    #[test]
    fn southern_hemisphere_uses_327_codes() {
        let meta = mtl(12);
        let fx = fixture(&[
            (format!("{SCENE_A}_SR_B4.tif"), ""),
            (format!("{SCENE_A}_MTL.txt"), meta.as_str()),
        ]);
        let mut job = fx.job.clone();
        job.params.hemisphere = Hemisphere::South;
        let backend = FakeBackend::new();

        run_clip_job(&job, &backend).unwrap();
        assert_eq!(backend.calls.borrow()[0].epsg, 32712);
    }

    #[test]
    fn out_of_range_zone_keeps_current_crs() {
        let meta = mtl(75);
        let fx = fixture(&[
            (format!("{SCENE_A}_SR_B4.tif"), ""),
            (format!("{SCENE_A}_MTL.txt"), meta.as_str()),
        ]);
        let backend = FakeBackend::new();

        let report = run_clip_job(&fx.job, &backend).unwrap();
        assert_eq!(backend.calls.borrow()[0].epsg, 32615);
        assert_eq!(report.metadata_fallbacks, 1);
    }

    #[test]
    fn datasets_are_processed_in_order_and_wrong_extensions_skipped() {
        let fx = fixture(&[
            (format!("{SCENE_A}_SR_B4.tif"), ""),
            (format!("{SCENE_A}_SR_B4.xml"), ""),
            (format!("{SCENE_A}_SR_B5.tif"), ""),
        ]);
        let mut job = fx.job.clone();
        job.datasets = vec!["B5".to_string(), "B4".to_string()];
        job.label = String::new();
        let backend = FakeBackend::new();

        let report = run_clip_job(&job, &backend).unwrap();

        let names: Vec<String> = backend
            .calls
            .borrow()
            .iter()
            .map(|c| c.output.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                format!("{SCENE_A}_SR_B5.tif"),
                format!("{SCENE_A}_SR_B4.tif")
            ]
        );
        assert_eq!(report.skipped, 1);
        assert_eq!(report.outputs.len(), 2);
    }

    #[test]
    fn pattern_filters_file_names() {
        let fx = fixture(&[
            (format!("{SCENE_A}_SR_B4.tif"), ""),
            (format!("{SCENE_B}_SR_B4.tif"), ""),
        ]);
        let mut job = fx.job.clone();
        job.pattern = Some("021048".to_string());
        let backend = FakeBackend::new();

        run_clip_job(&job, &backend).unwrap();
        let calls = backend.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].input.ends_with(format!("{SCENE_B}_SR_B4.tif")));
    }

    #[test]
    fn invalid_source_crs_fails_before_clipping() {
        let fx = fixture(&[(format!("{SCENE_A}_SR_B4.tif"), "")]);
        let mut job = fx.job.clone();
        job.source_crs = "32615".to_string();
        let backend = FakeBackend::new();

        let err = run_clip_job(&job, &backend).unwrap_err();
        assert!(matches!(err, Error::InvalidEpsg { .. }));
        assert!(backend.calls.borrow().is_empty());
    }

    #[test]
    fn validation_errors() {
        let fx = fixture::<String>(&[]);
        let backend = FakeBackend::new();

        let mut job = fx.job.clone();
        job.input_dir = job.input_dir.join("missing");
        assert!(matches!(
            run_clip_job(&job, &backend),
            Err(Error::DirectoryNotFound { kind: "Input", .. })
        ));

        let mut job = fx.job.clone();
        job.output_dir = job.output_dir.join("missing");
        assert!(matches!(
            run_clip_job(&job, &backend),
            Err(Error::DirectoryNotFound { kind: "Output", .. })
        ));

        let mut job = fx.job.clone();
        job.datasets.clear();
        assert!(matches!(run_clip_job(&job, &backend), Err(Error::NoDatasets)));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_input_directory_resolves_metadata_and_input_path() {
        use std::os::unix::ffi::OsStrExt;

        let fx = fixture::<String>(&[]);
        let scenes = fx
            .job
            .input_dir
            .join(OsStr::from_bytes(b"scenes_\xff"));
        fs::create_dir(&scenes).unwrap();
        fs::write(scenes.join(format!("{SCENE_A}_SR_B4.tif")), "").unwrap();
        fs::write(scenes.join(format!("{SCENE_A}_MTL.txt")), mtl(12)).unwrap();
        let mut job = fx.job.clone();
        job.input_dir = scenes;
        let backend = FakeBackend::new();

        let report = run_clip_job(&job, &backend).unwrap();

        let calls = backend.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].epsg, 32612);
        assert!(calls[0].input.exists());
        assert_eq!(report.metadata_fallbacks, 0);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_file_name_keeps_raw_bytes_in_both_paths() {
        use std::os::unix::ffi::OsStrExt;

        let fx = fixture(&[(format!("{SCENE_A}_MTL.txt"), mtl(12).as_str())]);
        let raw = [SCENE_A.as_bytes(), &b"_SR_B4_\xfe.tif"[..]].concat();
        fs::write(fx.job.input_dir.join(OsStr::from_bytes(&raw)), "").unwrap();
        let backend = FakeBackend::new();

        run_clip_job(&fx.job, &backend).unwrap();

        let calls = backend.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].input.exists());
        assert_eq!(calls[0].epsg, 32612);
        let expected = [SCENE_A.as_bytes(), &b"_SR_B4_\xfe_clip.tif"[..]].concat();
        assert_eq!(
            calls[0].output.file_name().unwrap().as_bytes(),
            expected.as_slice()
        );
    }

    #[test]
    fn output_name_inserts_label_before_extension() {
        let parts = split_path("LC08_SR_B4.tif");
        assert_eq!(output_file_name(&parts, "_clip"), "LC08_SR_B4_clip.tif");
        assert_eq!(output_file_name(&parts, ""), "LC08_SR_B4.tif");
    }
}

use tracing::info;
use tracing_subscriber::EnvFilter;

use bandclip::core::paths::split_by_commas;
use bandclip::{ClipJob, ClipParams, GdalBackend, Hemisphere, run_clip_job};

use super::args::CliArgs;
use super::errors::AppError;

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

fn require(arg: &str, missing: bool) -> Result<(), AppError> {
    if missing {
        return Err(AppError::MissingArgument {
            arg: arg.to_string(),
        });
    }
    Ok(())
}

/// Turn parsed flags into a `ClipJob`, applying preset and override flags.
pub fn build_job(args: CliArgs) -> Result<ClipJob, AppError> {
    require("--idir", args.idir.as_os_str().is_empty())?;
    require("--odir", args.odir.as_os_str().is_empty())?;
    require("--source_crs", args.source_crs.is_empty())?;
    require("--mask", args.mask.as_os_str().is_empty())?;
    require("--datasets", args.datasets.is_empty())?;

    let mut params = match &args.params {
        Some(path) => ClipParams::from_json_file(path)?,
        None => ClipParams::default(),
    };
    if let Some(key_match) = args.key_match {
        params.key_match = key_match;
    }
    if args.southern {
        params.hemisphere = Hemisphere::South;
    }

    Ok(ClipJob {
        input_dir: args.idir,
        output_dir: args.odir,
        source_crs: args.source_crs,
        mask: args.mask,
        datasets: split_by_commas(&args.datasets),
        pattern: args.pattern.filter(|p| !p.is_empty()),
        label: args.label,
        debug: args.debug,
        params,
    })
}

pub fn run(args: CliArgs) -> Result<(), AppError> {
    init_logging(args.debug);
    info!("bandclip - Clip TIF file bands from a single Landsat scene.");

    let job = build_job(args)?;
    info!("Source CRS: {}", job.source_crs);
    info!("Mask: {}", job.mask.display());
    info!("Label: {}", job.label);
    info!("Pattern: {}", job.pattern.as_deref().unwrap_or(""));
    info!("Debug: {}", job.debug);
    info!(
        "Margin: {}, metadata prefix: {}, key match: {}, hemisphere: {}",
        job.params.margin, job.params.metadata_prefix_len, job.params.key_match, job.params.hemisphere
    );

    let report = run_clip_job(&job, &GdalBackend::new())?;
    info!(
        "Done: {} clipped, {} skipped, {} without metadata",
        report.clipped, report.skipped, report.metadata_fallbacks
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::parse_args_from;
    use bandclip::KeyMatch;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec![
            "bandclip", "-i", "/in/", "-o", "/out", "-c", "EPSG:32615", "-m", "mask.shp", "-d",
            "B4,,B5",
        ];
        argv.extend_from_slice(extra);
        parse_args_from(argv).unwrap()
    }

    #[test]
    fn builds_job_with_defaults() {
        let job = build_job(args(&["-p", ""])).unwrap();
        assert_eq!(job.datasets, vec!["B4", "B5"]);
        assert_eq!(job.pattern, None);
        assert_eq!(job.params, ClipParams::default());
        assert_eq!(job.input_dir.to_str(), Some("/in/"));
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let dir = tempfile::tempdir().unwrap();
        let preset = dir.path().join("preset.json");
        std::fs::write(&preset, r#"{ "margin": 5.0, "key_match": "exact" }"#).unwrap();
        let preset_arg = preset.to_string_lossy().into_owned();

        let job = build_job(args(&["--params", &preset_arg, "--key-match", "substring", "--southern"]))
            .unwrap();
        assert_eq!(job.params.margin, 5.0);
        assert_eq!(job.params.key_match, KeyMatch::Substring);
        assert_eq!(job.params.hemisphere, Hemisphere::South);
    }

    #[test]
    fn empty_required_value_is_rejected() {
        let mut cli = args(&[]);
        cli.source_crs.clear();
        assert!(matches!(
            build_job(cli),
            Err(AppError::MissingArgument { arg }) if arg == "--source_crs"
        ));
    }
}

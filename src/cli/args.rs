//! Command-line argument definitions for the bandclip binary.
use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, CommandFactory, FromArgMatches, Parser};

use bandclip::KeyMatch;

#[derive(Parser, Debug)]
#[command(
    name = "bandclip",
    version,
    about = "Clip TIF file bands from a single Landsat scene"
)]
pub struct CliArgs {
    /// Input directory to scan for *.tif files
    #[arg(short = 'i', long = "idir", value_name = "DIR")]
    pub idir: PathBuf,

    /// Output directory to write clipped *.tif files
    #[arg(short = 'o', long = "odir", value_name = "DIR")]
    pub odir: PathBuf,

    /// Source coordinate reference system (e.g. "EPSG:32615")
    #[arg(short = 'c', long = "source_crs", value_name = "STR")]
    pub source_crs: String,

    /// Mask file (*.shp) whose first feature defines the clip extent
    #[arg(short = 'm', long, value_name = "FILE")]
    pub mask: PathBuf,

    /// Comma separated list of datasets (bands), e.g. "B4,B5"
    #[arg(short = 'd', long, value_name = "LIST")]
    pub datasets: String,

    /// Only process files whose name contains this text
    #[arg(short = 'p', long, value_name = "STR")]
    pub pattern: Option<String>,

    /// Label appended to output file names, before the extension
    #[arg(short = 'n', long, value_name = "STR", default_value = "")]
    pub label: String,

    /// Verbose path diagnostics and debug-level logging
    #[arg(short = 'g', long, default_value_t = false)]
    pub debug: bool,

    /// JSON file with clipping parameters (margin, metadata naming, ...)
    #[arg(long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// How MTL keys are matched (overrides the parameters file)
    #[arg(long, value_enum)]
    pub key_match: Option<KeyMatch>,

    /// Derive southern-hemisphere (EPSG:327xx) codes from UTM zones
    #[arg(long, default_value_t = false)]
    pub southern: bool,
}

/// Full command definition, with `-v/--version` in place of clap's `-V`.
pub fn command() -> Command {
    CliArgs::command().disable_version_flag(true).arg(
        Arg::new("version")
            .short('v')
            .long("version")
            .action(ArgAction::Version)
            .help("Show version information"),
    )
}

pub fn parse_args() -> Result<CliArgs, clap::Error> {
    parse_args_from(std::env::args_os())
}

pub fn parse_args_from<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;
    CliArgs::from_arg_matches(&matches)
}

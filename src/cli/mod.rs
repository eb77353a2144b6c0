//! Command Line Interface (CLI) layer for BANDCLIP.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) that turns flags into a
//! `bandclip::ClipJob` and runs it against GDAL.
//!
//! If you are embedding BANDCLIP into another application, prefer using
//! the high-level `bandclip::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::parse_args;
pub use runner::run;

//! Core building blocks: run parameters, path/string helpers and CRS
//! resolution. These are internal primitives consumed by the `api` driver.
pub mod crs;
pub mod params;
pub mod paths;

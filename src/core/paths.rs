//! String and path helpers: comma lists, path splitting, pattern filters
//! and directory listing. None of these fail on malformed input; they
//! return empty values or `false` instead.
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::PathParts;

/// Split on commas, dropping empty tokens. Surviving tokens are not trimmed.
pub fn split_by_commas(input: &str) -> Vec<String> {
    input
        .split(',')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Convert every token to an integer; any failure yields an empty vector.
pub fn string_to_int(tokens: &[String]) -> Vec<i32> {
    tokens
        .iter()
        .map(|s| s.parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_default()
}

/// Split a path on its last `/` or `\` and the basename on its last `.`.
pub fn split_path(path: &str) -> PathParts {
    let (directory, basename) = match path.rfind(['/', '\\']) {
        Some(pos) => (&path[..pos], &path[pos + 1..]),
        None => ("", path),
    };
    let (stem, extension) = match basename.rfind('.') {
        Some(pos) => (&basename[..pos], &basename[pos..]),
        None => (basename, ""),
    };
    PathParts {
        directory: directory.to_string(),
        basename: basename.to_string(),
        stem: stem.to_string(),
        extension: extension.to_string(),
    }
}

pub fn directory_exists(path: &Path) -> bool {
    path.is_dir()
}

pub fn ends_with(s: &str, suffix: &str) -> bool {
    s.ends_with(suffix)
}

/// True if `pattern` occurs anywhere inside `filename`.
pub fn find_pattern(filename: &str, pattern: &str) -> bool {
    filename.contains(pattern)
}

/// Join a directory and a file name, adding `/` only when the directory
/// does not already end with one. Names are joined as raw OS strings.
pub fn join_dir(dir: &Path, name: impl AsRef<OsStr>) -> PathBuf {
    let mut joined = dir.as_os_str().to_os_string();
    if !joined.is_empty() && joined.as_encoded_bytes().last() != Some(&b'/') {
        joined.push("/");
    }
    joined.push(name);
    PathBuf::from(joined)
}

/// Names of every entry in `dir`, sorted by their raw bytes.
pub fn list_files_in_directory(dir: &Path) -> std::io::Result<Vec<OsString>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        names.push(entry?.file_name());
    }
    names.sort();
    Ok(names)
}

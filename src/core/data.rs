//! Shared helpers for reading RON data files and resolving optional fields.

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::world::DataLoadError;

/// Root directory for all data files.
pub const DATA_ROOT: &str = "assets/data";

/// Read and parse one RON file.
pub fn read_ron_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(path.display().to_string()));
    }

    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;

    ron::from_str::<T>(&contents).map_err(|e| DataLoadError::ParseError {
        path: path.display().to_string(),
        details: e.to_string(),
    })
}

/// Parse every `.ron` file in `dir`, keyed by file stem.
///
/// Files that fail to read or parse are logged and skipped. A missing
/// directory is an error so callers can fall back to built-in data.
pub fn load_ron_directory<T: DeserializeOwned>(
    dir: &Path,
) -> Result<Vec<(String, T)>, DataLoadError> {
    if !dir.exists() {
        return Err(DataLoadError::FileNotFound(dir.display().to_string()));
    }

    let entries = fs::read_dir(dir).map_err(|e| DataLoadError::ReadError {
        path: dir.display().to_string(),
        details: e.to_string(),
    })?;

    let mut paths: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    paths.sort();

    let mut loaded = Vec::with_capacity(paths.len());
    for path in paths {
        let key = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        match read_ron_file::<T>(&path) {
            Ok(value) => loaded.push((key, value)),
            Err(e) => error!("{}", e),
        }
    }

    Ok(loaded)
}

/// Pick a configured number, or the built-in value when it is missing,
/// non-finite or outside `min..=max`.
pub fn resolve_f32(
    owner: &str,
    field: &str,
    value: Option<f32>,
    fallback: f32,
    min: f32,
    max: f32,
) -> f32 {
    match value {
        Some(v) if v.is_finite() && v >= min && v <= max => v,
        Some(v) => {
            warn!(
                "{}: {} = {} is out of range [{}, {}], using {}",
                owner, field, v, min, max, fallback
            );
            fallback
        }
        None => {
            warn!("{}: {} not set, using {}", owner, field, fallback);
            fallback
        }
    }
}

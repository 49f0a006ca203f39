//! Export destination resolution.

use crate::errors::AppResult;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const EXPORT_PATH_ENV: &str = "TIME_CLOCK_EXPORT_PATH";

/// Where exports land, in priority order:
/// 1. an explicit override (CLI flag or config),
/// 2. the `TIME_CLOCK_EXPORT_PATH` environment variable,
/// 3. `./exports`.
///
/// Deployments that want exports on removable media point the environment
/// variable at the mount; the core does not go looking for USB drives.
pub fn resolve_export_dir(explicit: Option<&str>) -> AppResult<PathBuf> {
    let dir = match explicit.filter(|s| !s.is_empty()) {
        Some(p) => PathBuf::from(p),
        None => match env::var(EXPORT_PATH_ENV) {
            Ok(p) if !p.is_empty() => PathBuf::from(p),
            _ => env::current_dir()?.join("exports"),
        },
    };

    fs::create_dir_all(&dir)?;
    Ok(dir)
}

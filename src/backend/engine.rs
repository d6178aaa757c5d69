//! Simulation engine detection.
//!
//! Resolves the engine executable from an explicit path, the `SST_BIN`
//! environment variable, or the `PATH` search list, and checks that it
//! exists and is executable.

use std::env;
use std::ffi::OsStr;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use log::debug;

use crate::backend::BackendError;

/// Name of the engine executable searched on `PATH`
pub const ENGINE_BINARY: &str = "sst";

/// Environment variable naming the engine executable
pub const ENGINE_ENV_VAR: &str = "SST_BIN";

/// Expand a leading `~/` to the user's home directory
fn expand_home(path: &str) -> Result<PathBuf, BackendError> {
    match path.strip_prefix("~/") {
        Some(rest) => env::var("HOME")
            .map(|home| PathBuf::from(home).join(rest))
            .map_err(|_| BackendError::EngineUnavailable {
                reason: format!("cannot expand '{}': HOME is not set", path),
            }),
        None => Ok(PathBuf::from(path)),
    }
}

/// Check that a file exists and has any execute bit set
pub fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Search a `PATH`-style list of directories for an executable
pub fn search_path(name: &str, path_list: &OsStr) -> Option<PathBuf> {
    env::split_paths(path_list)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

/// Locate the simulation engine executable
///
/// Resolution order:
/// 1. `explicit`, when given (a leading `~/` is expanded)
/// 2. The `SST_BIN` environment variable
/// 3. `sst` on `PATH`
///
/// # Returns
/// * `Ok(PathBuf)` - path of an existing executable
/// * `Err(BackendError::EngineUnavailable)` - nothing usable was found
pub fn locate_engine(explicit: Option<&str>) -> Result<PathBuf, BackendError> {
    let requested = explicit
        .map(str::to_string)
        .or_else(|| env::var(ENGINE_ENV_VAR).ok().filter(|v| !v.is_empty()));

    if let Some(requested) = requested {
        let path = expand_home(&requested)?;
        debug!("Checking engine at {:?}", path);
        return if is_executable(&path) {
            Ok(path)
        } else {
            Err(BackendError::EngineUnavailable {
                reason: format!("'{}' is not an executable file", path.display()),
            })
        };
    }

    let path_list = env::var_os("PATH").unwrap_or_default();
    search_path(ENGINE_BINARY, &path_list).ok_or_else(|| BackendError::EngineUnavailable {
        reason: format!("'{}' not found on PATH", ENGINE_BINARY),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_file(dir: &Path, name: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn test_explicit_executable() {
        let dir = TempDir::new().unwrap();
        let sst = make_file(dir.path(), "sst", 0o755);
        let found = locate_engine(Some(sst.to_str().unwrap())).unwrap();
        assert_eq!(found, sst);
    }

    #[test]
    fn test_explicit_not_executable() {
        let dir = TempDir::new().unwrap();
        let sst = make_file(dir.path(), "sst", 0o644);
        let err = locate_engine(Some(sst.to_str().unwrap())).unwrap_err();
        assert!(matches!(err, BackendError::EngineUnavailable { .. }));
    }

    #[test]
    fn test_explicit_missing() {
        let err = locate_engine(Some("/nonexistent/bin/sst")).unwrap_err();
        assert!(err.to_string().contains("not an executable file"));
    }

    #[test]
    fn test_search_path() {
        let empty = TempDir::new().unwrap();
        let bin = TempDir::new().unwrap();
        let sst = make_file(bin.path(), "sst", 0o755);
        make_file(empty.path(), "other", 0o755);

        let list = env::join_paths([empty.path(), bin.path()]).unwrap();
        assert_eq!(search_path("sst", &list), Some(sst));

        let list = env::join_paths([empty.path()]).unwrap();
        assert_eq!(search_path("sst", &list), None);
    }

    #[test]
    fn test_directory_is_not_executable() {
        let dir = TempDir::new().unwrap();
        assert!(!is_executable(dir.path()));
    }
}

//! Executable lookup on `PATH`

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Locate `tool` the way a shell would.
///
/// A name containing a path separator is checked as-is; a bare name is
/// searched in every `PATH` entry (with `PATHEXT` suffixes on Windows).
pub fn find_executable(tool: &str) -> Option<PathBuf> {
    find_executable_in(tool, std::env::var_os("PATH"))
}

pub(crate) fn find_executable_in(tool: &str, path_var: Option<OsString>) -> Option<PathBuf> {
    if tool.is_empty() {
        return None;
    }

    let direct = Path::new(tool);
    if direct.components().count() > 1 {
        return is_executable(direct).then(|| direct.to_path_buf());
    }

    let extensions: Vec<String> = if cfg!(windows) {
        std::env::var("PATHEXT")
            .unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string())
            .split(';')
            .map(|s| s.to_ascii_lowercase())
            .collect()
    } else {
        vec![String::new()]
    };

    let path_var = path_var.unwrap_or_default();
    for dir in std::env::split_paths(&path_var) {
        for ext in &extensions {
            let candidate = if ext.is_empty() {
                dir.join(tool)
            } else {
                dir.join(format!("{}{}", tool, ext))
            };
            if is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }

    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

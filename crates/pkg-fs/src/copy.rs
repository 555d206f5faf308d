//! Recursive merge-copy of source trees
//!
//! The destination is not cleared first: files already present in the
//! destination survive unless a same-named source file replaces them.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::{Error, Result};

/// Counts of what [`copy_tree`] touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub directories: usize,
    pub files: usize,
}

/// Copy every entry under `src` into `dst`, overwriting conflicts.
///
/// `dst` is created if missing. Symlinked files are copied by content.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<CopyStats> {
    if !src.is_dir() {
        return Err(Error::SourceNotFound {
            path: src.to_path_buf(),
        });
    }

    let mut stats = CopyStats::default();

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| Error::Walk {
            path: src.to_path_buf(),
            message: e.to_string(),
        })?;

        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| Error::Walk {
                path: entry.path().to_path_buf(),
                message: e.to_string(),
            })?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            stats.directories += 1;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            fs::copy(entry.path(), &target).map_err(|e| Error::io(&target, e))?;
            stats.files += 1;
        }
    }

    tracing::debug!(
        src = %src.display(),
        dst = %dst.display(),
        files = stats.files,
        directories = stats.directories,
        "Copied source tree"
    );

    Ok(stats)
}

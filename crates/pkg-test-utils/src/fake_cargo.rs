//! Shell scripts standing in for `cargo`.
//!
//! The fake appends its arguments, working directory and selected
//! environment variables to a log next to itself, then exits with a fixed
//! code. Unix only.

use std::fs;
use std::path::{Path, PathBuf};

/// A fake `cargo` executable inside a directory.
pub struct FakeCargo {
    path: PathBuf,
    log: PathBuf,
}

impl FakeCargo {
    /// Install a fake cargo into `dir` that exits with `exit_code`.
    #[cfg(unix)]
    pub fn install(dir: &Path, exit_code: i32) -> Self {
        use std::os::unix::fs::PermissionsExt;

        fs::create_dir_all(dir).unwrap();
        let path = dir.join("cargo");
        let log = dir.join("cargo.log");
        let script = format!(
            "#!/bin/sh\n\
             echo \"args=$*\" >> \"{log}\"\n\
             echo \"cwd=$(pwd)\" >> \"{log}\"\n\
             echo \"CARGO_TARGET_DIR=$CARGO_TARGET_DIR\" >> \"{log}\"\n\
             echo \"RUSTFLAGS=$RUSTFLAGS\" >> \"{log}\"\n\
             echo \"PATH=$PATH\" >> \"{log}\"\n\
             exit {code}\n",
            log = log.display(),
            code = exit_code
        );
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        Self { path, log }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the fake was ever run.
    pub fn was_invoked(&self) -> bool {
        self.log.exists()
    }

    /// Value of `key` from the last invocation's log.
    pub fn logged(&self, key: &str) -> Option<String> {
        let content = fs::read_to_string(&self.log).ok()?;
        let prefix = format!("{}=", key);
        content
            .lines()
            .rev()
            .find_map(|line| line.strip_prefix(&prefix).map(str::to_string))
    }
}

//! Filesystem helpers for staging and installing Cargo packages
//!
//! Provides merge-copy of source trees, atomic text writes and executable
//! lookup on `PATH`.

pub mod copy;
pub mod error;
pub mod io;
pub mod which;

pub use copy::{CopyStats, copy_tree};
pub use error::{Error, Result};
pub use io::{read_text, write_atomic, write_text};
pub use which::find_executable;

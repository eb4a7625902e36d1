//! Process-exclusivity lock backed by a PID file.
//!
//! Prevents two daemon instances from managing the same routing table.
//! The lock is an atomically created PID file: creation fails if the file
//! already exists, and the file is removed when the lock is released or
//! dropped. A stale file left by a crashed instance must be removed
//! manually before the daemon can start again.

use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Held process lock. Removing it releases the lock.
#[derive(Debug)]
pub struct ProcessLock {
    path: PathBuf,
    released: bool,
}

impl ProcessLock {
    /// Acquire the process lock by creating the PID file.
    ///
    /// # Security
    ///
    /// - Uses `create_new(true)` to atomically create the file (prevents
    ///   TOCTOU races)
    /// - Verifies the created file is a regular file (prevents symlink
    ///   attacks)
    /// - Creates the parent directory with restrictive permissions (0o700)
    ///   and the PID file with 0o600
    ///
    /// # Errors
    ///
    /// Returns an error if the PID file already exists or cannot be written.
    pub fn acquire(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            #[cfg(unix)]
            {
                use std::os::unix::fs::DirBuilderExt;
                let mut builder = fs::DirBuilder::new();
                builder.mode(0o700).recursive(true);
                builder.create(parent)?;
            }
            #[cfg(not(unix))]
            {
                fs::create_dir_all(parent)?;
            }
        }

        let pid = std::process::id();

        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let existing_pid =
                    fs::read_to_string(path).unwrap_or_else(|_| "unknown".to_owned());
                return Err(io::Error::new(
                    ErrorKind::AlreadyExists,
                    format!(
                        "PID file {} already exists with PID: {}. Is another instance running?",
                        path.display(),
                        existing_pid.trim()
                    ),
                ));
            }
            Err(e) => return Err(e),
        };

        let metadata = file.metadata()?;
        if !metadata.is_file() {
            let _ = fs::remove_file(path);
            return Err(io::Error::other(format!(
                "PID file {} is not a regular file (possible symlink attack)",
                path.display()
            )));
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            file.set_permissions(permissions)?;
        }

        writeln!(file, "{}", pid)?;

        tracing::info!(pid = pid, path = %path.display(), "process lock acquired");
        Ok(Self {
            path: path.to_path_buf(),
            released: false,
        })
    }

    /// Path of the PID file backing this lock.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock and remove the PID file.
    ///
    /// Logs a warning but does not fail if the file cannot be removed.
    pub fn release(mut self) {
        self.remove_file();
        self.released = true;
    }

    fn remove_file(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove PID file"
            );
        } else {
            tracing::info!(path = %self.path.display(), "process lock released");
        }
    }
}

impl Drop for ProcessLock {
    fn drop(&mut self) {
        if !self.released {
            self.remove_file();
            self.released = true;
        }
    }
}

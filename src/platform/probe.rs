//! Read-only host probing
//!
//! Every question the installer asks about the host goes through
//! [`HostProbe`]. None of these calls may change host state.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

/// Read-only view of the host
pub trait HostProbe {
    /// Whether a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Whether a path exists and is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Locate an executable on PATH
    fn find_executable(&self, name: &str) -> Option<PathBuf>;

    /// Read a small text file, `None` if unreadable
    fn read_to_string(&self, path: &Path) -> Option<String>;

    /// Run a side-effect-free command and report whether it exited successfully
    fn check(&self, program: &str, args: &[&str]) -> bool;

    /// Whether the installer runs with root privileges
    fn is_privileged(&self) -> bool;

    fn has_executable(&self, name: &str) -> bool {
        self.find_executable(name).is_some()
    }

    fn user_exists(&self, name: &str) -> bool {
        self.check("id", &["-u", name])
    }

    fn group_exists(&self, name: &str) -> bool {
        self.check("getent", &["group", name])
    }
}

/// Probe backed by the real host
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl HostProbe for SystemProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }

    fn read_to_string(&self, path: &Path) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }

    fn check(&self, program: &str, args: &[&str]) -> bool {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        debug!(program, ?args, ?status, "probe");
        status.map(|s| s.success()).unwrap_or(false)
    }

    fn is_privileged(&self) -> bool {
        Command::new("id")
            .arg("-u")
            .stderr(Stdio::null())
            .output()
            .ok()
            .filter(|out| out.status.success())
            .is_some_and(|out| String::from_utf8_lossy(&out.stdout).trim() == "0")
    }
}

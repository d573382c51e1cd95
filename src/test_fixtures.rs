//! Test fixtures and utilities for reducing test setup duplication.
//!
//! This module provides a scripted host and a recording command runner so
//! that every component can be exercised without root and without touching
//! the machine running the tests.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{FakeHost, RecordingRunner, Sandbox};
//!
//! #[test]
//! fn my_test() {
//!     let sandbox = Sandbox::new();
//!     let host = FakeHost::new().backed_by_fs().with_executable("python3");
//!     let runner = RecordingRunner::new();
//!     let request = sandbox.request();
//! }
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::domain::{BehaviorFlags, InstallPaths, InstallationRequest, SERVICE_NAME};
use crate::error::{InstallerError, Result};
use crate::exec::{CommandRunner, render_command};
use crate::platform::{
    DetectedEnvironment, Firewall, HostProbe, InitSystem, OsInfo, PackageManager, SystemPaths,
};

pub const UNIT_TEMPLATE: &str = "\
[Unit]
Description=SSH Bastion Server
After=network-online.target
Wants=network-online.target

[Service]
Type=simple
User=bastion
Group=bastion
WorkingDirectory=/opt/bastion
ExecStart=/opt/bastion/venv/bin/python -m bastion.main start
Restart=on-failure
ProtectSystem=strict
ReadWritePaths=/var/log/bastion /var/lib/bastion

[Install]
WantedBy=multi-user.target
";

/// Scripted host probe
#[derive(Debug, Default, Clone)]
pub struct FakeHost {
    dirs: HashSet<PathBuf>,
    files: HashMap<PathBuf, String>,
    executables: HashSet<String>,
    users: HashSet<String>,
    groups: HashSet<String>,
    passing_checks: HashSet<String>,
    privileged: bool,
    real_fs: bool,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also consult the real file system for path queries (for tempdir sandboxes)
    pub fn backed_by_fs(mut self) -> Self {
        self.real_fs = true;
        self
    }

    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dirs.insert(path.into());
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files.insert(path.into(), content.to_string());
        self
    }

    pub fn with_executable(mut self, name: &str) -> Self {
        self.executables.insert(name.to_string());
        self
    }

    pub fn with_user(mut self, name: &str) -> Self {
        self.users.insert(name.to_string());
        self
    }

    pub fn with_group(mut self, name: &str) -> Self {
        self.groups.insert(name.to_string());
        self
    }

    /// Make a read-only command check succeed
    pub fn with_passing_check(mut self, program: &str, args: &[&str]) -> Self {
        self.passing_checks.insert(check_key(program, args));
        self
    }

    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }
}

fn check_key(program: &str, args: &[&str]) -> String {
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    render_command(program, &args)
}

impl HostProbe for FakeHost {
    fn exists(&self, path: &Path) -> bool {
        self.dirs.contains(path)
            || self.files.contains_key(path)
            || (self.real_fs && path.exists())
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path) || (self.real_fs && path.is_dir())
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        self.executables
            .contains(name)
            .then(|| PathBuf::from("/usr/bin").join(name))
    }

    fn read_to_string(&self, path: &Path) -> Option<String> {
        self.files.get(path).cloned().or_else(|| {
            if self.real_fs {
                std::fs::read_to_string(path).ok()
            } else {
                None
            }
        })
    }

    fn check(&self, program: &str, args: &[&str]) -> bool {
        self.passing_checks.contains(&check_key(program, args))
    }

    fn is_privileged(&self) -> bool {
        self.privileged
    }

    fn user_exists(&self, name: &str) -> bool {
        self.users.contains(name)
    }

    fn group_exists(&self, name: &str) -> bool {
        self.groups.contains(name)
    }
}

/// Command runner that records instead of spawning
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: RefCell<Vec<String>>,
    failing_programs: HashSet<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command whose program is `program` fails
    pub fn failing_on(mut self, program: &str) -> Self {
        self.failing_programs.insert(program.to_string());
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    pub fn ran(&self, needle: &str) -> bool {
        self.commands.borrow().iter().any(|c| c.contains(needle))
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<()> {
        let line = render_command(program, args);
        self.commands.borrow_mut().push(line.clone());
        if self.failing_programs.contains(program) {
            return Err(InstallerError::CommandFailed {
                command: line,
                reason: "exit status: 1".to_string(),
            });
        }
        if program == "ssh-keygen" {
            emulate_keygen(args);
        }
        Ok(())
    }
}

/// Create the key files ssh-keygen would have written, so later mode changes apply
fn emulate_keygen(args: &[String]) {
    let Some(index) = args.iter().position(|a| a == "-f") else {
        return;
    };
    if let Some(private) = args.get(index + 1) {
        std::fs::write(private, "PRIVATE KEY\n").unwrap();
        std::fs::write(format!("{private}.pub"), "PUBLIC KEY\n").unwrap();
    }
}

/// A temporary directory standing in for the host root and the source tree
pub struct Sandbox {
    pub temp: TempDir,
    pub root: PathBuf,
    pub source: PathBuf,
}

impl Sandbox {
    /// Sandbox with a complete payload source tree
    pub fn new() -> Self {
        let sandbox = Self::without_payload();
        let pkg = sandbox.source.join("bastion");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(pkg.join("__init__.py"), "").unwrap();
        std::fs::write(pkg.join("main.py"), "def main():\n    pass\n").unwrap();
        std::fs::write(sandbox.source.join("requirements.txt"), "paramiko\n").unwrap();
        std::fs::write(sandbox.source.join("setup.py"), "from setuptools import setup\n").unwrap();
        std::fs::create_dir_all(sandbox.source.join("deploy")).unwrap();
        std::fs::write(
            sandbox.source.join("deploy").join(format!("{SERVICE_NAME}.service")),
            UNIT_TEMPLATE,
        )
        .unwrap();
        sandbox
    }

    /// Sandbox whose source tree has no payload package
    pub fn without_payload() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("host");
        let source = temp.path().join("src");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::create_dir_all(&source).unwrap();
        Self { temp, root, source }
    }

    /// Request with every path re-rooted into the sandbox
    pub fn request(&self) -> InstallationRequest {
        self.request_with(BehaviorFlags::default())
    }

    pub fn request_with(&self, flags: BehaviorFlags) -> InstallationRequest {
        InstallationRequest {
            user: "bastion".to_string(),
            group: "bastion".to_string(),
            service_name: SERVICE_NAME.to_string(),
            runtime_version: "3".to_string(),
            port: 2222,
            source_dir: self.source.clone(),
            paths: InstallPaths::derive_with(
                &self.root.join("opt/bastion"),
                &self.root.join("etc/bastion"),
                &self.root.join("var/log/bastion"),
                &self.root.join("var/lib/bastion"),
                &self.root.join("run/bastion"),
            ),
            flags,
        }
    }

    /// Environment with system paths re-rooted into the sandbox
    pub fn environment(&self, init: InitSystem, package_manager: PackageManager) -> DetectedEnvironment {
        let paths = SystemPaths::rooted_at(&self.root);
        for dir in [
            &paths.systemd_unit_dir,
            &paths.init_d_dir,
            &paths.conf_d_dir,
            &paths.lock_dir,
        ] {
            std::fs::create_dir_all(dir).unwrap();
        }
        DetectedEnvironment {
            os: OsInfo::unknown(),
            init,
            package_manager,
            firewall: Firewall::None,
            paths,
        }
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

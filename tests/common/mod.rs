//! Common test utilities for bastion-installer integration tests

use std::ffi::OsString;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// A source checkout plus an install target, both in a temporary directory
#[allow(dead_code)]
pub struct TestCheckout {
    pub temp: TempDir,
    /// Source tree holding the payload package
    pub source: PathBuf,
    /// Install root passed as --directory
    pub target: PathBuf,
    /// Directory prepended to PATH holding a stand-in interpreter
    pub bin: PathBuf,
}

impl TestCheckout {
    /// Checkout with a complete payload and unit template
    pub fn new() -> Self {
        let checkout = Self::empty();
        checkout.write_file("bastion/__init__.py", "");
        checkout.write_file("bastion/main.py", "def main():\n    pass\n");
        checkout.write_file("requirements.txt", "paramiko\n");
        checkout.write_file("setup.py", "from setuptools import setup\n");
        checkout.write_file(
            "deploy/bastion.service",
            "[Unit]\nDescription=SSH Bastion Server\n\n[Service]\nType=simple\n\
             ExecStart=/opt/bastion/venv/bin/python -m bastion.main start\n\n\
             [Install]\nWantedBy=multi-user.target\n",
        );
        checkout
    }

    /// Checkout with no payload package
    pub fn empty() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let source = temp.path().join("src");
        let target = temp.path().join("opt/bastion");
        let bin = temp.path().join("bin");
        std::fs::create_dir_all(&source).expect("Failed to create source directory");
        std::fs::create_dir_all(&bin).expect("Failed to create bin directory");

        // the runtime lookup only needs an executable on PATH
        let python = bin.join("python3");
        std::fs::write(&python, "#!/bin/sh\nexit 0\n").expect("Failed to write stand-in python");
        std::fs::set_permissions(&python, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to mark stand-in python executable");

        Self {
            temp,
            source,
            target,
            bin,
        }
    }

    /// Write a file in the source tree
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.source.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// PATH with the stand-in interpreter first
    pub fn path_env(&self) -> OsString {
        let mut paths = vec![self.bin.clone()];
        if let Some(existing) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&existing));
        }
        std::env::join_paths(paths).expect("Failed to join PATH")
    }

    /// Installer command pointed at this checkout, always a dry run
    pub fn dry_run_cmd(&self) -> Command {
        let mut cmd = installer_cmd();
        cmd.env("PATH", self.path_env())
            .current_dir(self.temp.path())
            .arg("--source")
            .arg(&self.source)
            .arg("--directory")
            .arg(&self.target)
            .arg("--dry-run");
        cmd
    }
}

/// The installer binary with logging left at its defaults
#[allow(deprecated)]
pub fn installer_cmd() -> Command {
    let mut cmd = Command::cargo_bin("bastion-installer").expect("binary is built for tests");
    cmd.env_remove("RUST_LOG");
    cmd
}

//! Host platform model
//!
//! This module handles:
//! - Operating system identity (via os-release)
//! - Init system classification (a closed set of four kinds)
//! - Package manager profiles (via packages module)
//! - Host probing seam (via probe module)
//! - Detection order and priority (via detection module)

use std::fmt;
use std::path::{Path, PathBuf};

pub mod detection;
pub mod packages;
pub mod probe;

pub use packages::{PackageGroup, PackageManager};
pub use probe::{HostProbe, SystemProbe};

/// Operating system identity read from os-release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsInfo {
    /// Machine-readable identifier (e.g. "debian", "alpine")
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Version identifier, empty when the release file has none
    pub version: String,
}

impl OsInfo {
    /// Sentinel for hosts without a readable os-release
    pub fn unknown() -> Self {
        Self {
            id: "unknown".to_string(),
            name: "Unknown Linux".to_string(),
            version: String::new(),
        }
    }
}

impl fmt::Display for OsInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.name, self.version)
        }
    }
}

/// Tool used to register a legacy init script with the default runlevels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyRegistrar {
    UpdateRcD,
    Chkconfig,
}

impl LegacyRegistrar {
    /// Executables probed, in fallback order
    pub const ALL: [LegacyRegistrar; 2] = [LegacyRegistrar::UpdateRcD, LegacyRegistrar::Chkconfig];

    pub fn executable(self) -> &'static str {
        match self {
            LegacyRegistrar::UpdateRcD => "update-rc.d",
            LegacyRegistrar::Chkconfig => "chkconfig",
        }
    }
}

/// The host's process supervisor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitSystem {
    /// systemd with an active control plane
    Systemd,
    /// OpenRC: init script plus conf.d variables
    OpenRc,
    /// SysV-style /etc/init.d scripts; registrars listed in fallback order
    SysV { registrars: Vec<LegacyRegistrar> },
    /// Nothing recognised; service registration is skipped
    Unsupported,
}

impl fmt::Display for InitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitSystem::Systemd => write!(f, "systemd"),
            InitSystem::OpenRc => write!(f, "OpenRC"),
            InitSystem::SysV { .. } => write!(f, "SysV init"),
            InitSystem::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Host firewall front-end able to open the daemon port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Firewall {
    Ufw,
    Firewalld,
    None,
}

/// System locations used by the service strategies
///
/// Kept on the detected environment so tests can re-root them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPaths {
    pub systemd_unit_dir: PathBuf,
    pub init_d_dir: PathBuf,
    pub conf_d_dir: PathBuf,
    pub lock_dir: PathBuf,
}

impl Default for SystemPaths {
    fn default() -> Self {
        Self::rooted_at(Path::new("/"))
    }
}

impl SystemPaths {
    /// Standard locations below `root`
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            systemd_unit_dir: root.join("etc/systemd/system"),
            init_d_dir: root.join("etc/init.d"),
            conf_d_dir: root.join("etc/conf.d"),
            lock_dir: root.join("var/lock/subsys"),
        }
    }
}

/// Everything detected about the host, computed once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedEnvironment {
    pub os: OsInfo,
    pub init: InitSystem,
    pub package_manager: PackageManager,
    pub firewall: Firewall,
    pub paths: SystemPaths,
}

impl DetectedEnvironment {
    /// Whether detection fell back to any unknown sentinel
    pub fn is_ambiguous(&self) -> bool {
        self.init == InitSystem::Unsupported || self.package_manager == PackageManager::Unknown
    }
}

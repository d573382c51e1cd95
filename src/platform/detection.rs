//! Environment detection
//!
//! Detection never fails: anything unrecognised maps to an explicit sentinel
//! and callers decide whether that is fatal.

use std::path::Path;

use tracing::debug;

use super::{
    DetectedEnvironment, Firewall, HostProbe, InitSystem, LegacyRegistrar, OsInfo,
    PackageManager, SystemPaths,
};

const OS_RELEASE: &str = "/etc/os-release";

/// Runtime directory that only exists while systemd is PID 1
const SYSTEMD_RUNTIME_DIR: &str = "/run/systemd/system";

const OPENRC_RUNTIME_DIR: &str = "/run/openrc";

/// Detect the host using standard system locations
pub fn detect(probe: &dyn HostProbe) -> DetectedEnvironment {
    detect_at(probe, Path::new("/"))
}

/// Detect the host with every probed path resolved below `root`
pub fn detect_at(probe: &dyn HostProbe, root: &Path) -> DetectedEnvironment {
    let paths = SystemPaths::rooted_at(root);
    let env = DetectedEnvironment {
        os: detect_os(probe, root),
        init: detect_init_system(probe, root, &paths),
        package_manager: detect_package_manager(probe),
        firewall: detect_firewall(probe),
        paths,
    };
    debug!(?env, "detected environment");
    env
}

/// Read OS identity from os-release
pub fn detect_os(probe: &dyn HostProbe, root: &Path) -> OsInfo {
    probe
        .read_to_string(&root.join(OS_RELEASE.trim_start_matches('/')))
        .map_or_else(OsInfo::unknown, |content| parse_os_release(&content))
}

/// Parse the KEY=value format of os-release
pub fn parse_os_release(content: &str) -> OsInfo {
    let mut info = OsInfo::unknown();
    let mut pretty = None;

    for line in content.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').trim_matches('\'').to_string();
        match key {
            "ID" => info.id = value,
            "NAME" => info.name = value,
            "VERSION_ID" => info.version = value,
            "PRETTY_NAME" => pretty = Some(value),
            _ => {}
        }
    }

    if info.name == OsInfo::unknown().name {
        if let Some(pretty) = pretty {
            info.name = pretty;
        }
    }
    info
}

/// Classify the active init system
///
/// Checks the systemd runtime directory rather than the systemctl binary:
/// hosts often ship systemd tooling while running a different init.
pub fn detect_init_system(
    probe: &dyn HostProbe,
    root: &Path,
    paths: &SystemPaths,
) -> InitSystem {
    if probe.is_dir(&root.join(SYSTEMD_RUNTIME_DIR.trim_start_matches('/'))) {
        return InitSystem::Systemd;
    }

    if probe.exists(&root.join(OPENRC_RUNTIME_DIR.trim_start_matches('/')))
        || probe.has_executable("openrc-run")
    {
        return InitSystem::OpenRc;
    }

    if probe.is_dir(&paths.init_d_dir) {
        let registrars = LegacyRegistrar::ALL
            .into_iter()
            .filter(|r| probe.has_executable(r.executable()))
            .collect();
        return InitSystem::SysV { registrars };
    }

    InitSystem::Unsupported
}

/// First known package manager present on PATH
pub fn detect_package_manager(probe: &dyn HostProbe) -> PackageManager {
    PackageManager::DETECTION_ORDER
        .into_iter()
        .find(|pm| pm.executable().is_some_and(|exe| probe.has_executable(exe)))
        .unwrap_or(PackageManager::Unknown)
}

/// Firewall front-end able to open the daemon port
pub fn detect_firewall(probe: &dyn HostProbe) -> Firewall {
    if probe.has_executable("ufw") {
        Firewall::Ufw
    } else if probe.has_executable("firewall-cmd") {
        Firewall::Firewalld
    } else {
        Firewall::None
    }
}

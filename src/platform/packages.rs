//! Package manager profiles
//!
//! Each known manager carries an index refresh command, an install command
//! prefix, and the concrete package names for every logical group the
//! managed application needs.

use std::fmt;

/// Logical dependency groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageGroup {
    BuildToolchain,
    CryptoHeaders,
    Runtime,
    DatabaseClient,
}

impl PackageGroup {
    pub const ALL: [PackageGroup; 4] = [
        PackageGroup::BuildToolchain,
        PackageGroup::CryptoHeaders,
        PackageGroup::Runtime,
        PackageGroup::DatabaseClient,
    ];
}

/// Known package managers; `Unknown` is the detection sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
    Yum,
    Zypper,
    Pacman,
    Apk,
    Unknown,
}

impl PackageManager {
    /// Detection order; the first executable found wins
    pub const DETECTION_ORDER: [PackageManager; 6] = [
        PackageManager::Apt,
        PackageManager::Dnf,
        PackageManager::Yum,
        PackageManager::Zypper,
        PackageManager::Pacman,
        PackageManager::Apk,
    ];

    /// Executable whose presence identifies this manager
    pub fn executable(self) -> Option<&'static str> {
        match self {
            PackageManager::Apt => Some("apt-get"),
            PackageManager::Dnf => Some("dnf"),
            PackageManager::Yum => Some("yum"),
            PackageManager::Zypper => Some("zypper"),
            PackageManager::Pacman => Some("pacman"),
            PackageManager::Apk => Some("apk"),
            PackageManager::Unknown => None,
        }
    }

    /// Command refreshing the package index
    pub fn update_command(self) -> Option<(&'static str, &'static [&'static str])> {
        let args: &'static [&'static str] = match self {
            PackageManager::Apt => &["update"],
            PackageManager::Dnf | PackageManager::Yum => &["makecache"],
            PackageManager::Zypper => &["--non-interactive", "refresh"],
            PackageManager::Pacman => &["-Sy"],
            PackageManager::Apk => &["update"],
            PackageManager::Unknown => return None,
        };
        self.executable().map(|exe| (exe, args))
    }

    /// Command prefix installing packages non-interactively
    pub fn install_command(self) -> Option<(&'static str, &'static [&'static str])> {
        let args: &'static [&'static str] = match self {
            PackageManager::Apt | PackageManager::Dnf | PackageManager::Yum => &["install", "-y"],
            PackageManager::Zypper => &["--non-interactive", "install"],
            PackageManager::Pacman => &["-S", "--noconfirm", "--needed"],
            PackageManager::Apk => &["add", "--no-cache"],
            PackageManager::Unknown => return None,
        };
        self.executable().map(|exe| (exe, args))
    }

    /// Concrete package names for a logical group
    pub fn packages(self, group: PackageGroup) -> &'static [&'static str] {
        use PackageGroup::{BuildToolchain, CryptoHeaders, DatabaseClient, Runtime};
        match (self, group) {
            (PackageManager::Apt, BuildToolchain) => &["build-essential"],
            (PackageManager::Apt, CryptoHeaders) => &["libssl-dev", "libffi-dev"],
            (PackageManager::Apt, Runtime) => &["python3", "python3-venv", "python3-dev", "python3-pip"],
            (PackageManager::Apt, DatabaseClient) => &["sqlite3"],

            (PackageManager::Dnf | PackageManager::Yum, BuildToolchain) => &["gcc", "make"],
            (PackageManager::Dnf | PackageManager::Yum, CryptoHeaders) => {
                &["openssl-devel", "libffi-devel"]
            }
            (PackageManager::Dnf | PackageManager::Yum, Runtime) => {
                &["python3", "python3-devel", "python3-pip"]
            }
            (PackageManager::Dnf | PackageManager::Yum, DatabaseClient) => &["sqlite"],

            (PackageManager::Zypper, BuildToolchain) => &["gcc", "make"],
            (PackageManager::Zypper, CryptoHeaders) => &["libopenssl-devel", "libffi-devel"],
            (PackageManager::Zypper, Runtime) => &["python3", "python3-devel", "python3-pip"],
            (PackageManager::Zypper, DatabaseClient) => &["sqlite3"],

            (PackageManager::Pacman, BuildToolchain) => &["base-devel"],
            (PackageManager::Pacman, CryptoHeaders) => &["openssl", "libffi"],
            (PackageManager::Pacman, Runtime) => &["python", "python-pip"],
            (PackageManager::Pacman, DatabaseClient) => &["sqlite"],

            (PackageManager::Apk, BuildToolchain) => &["build-base"],
            (PackageManager::Apk, CryptoHeaders) => &["openssl-dev", "libffi-dev"],
            (PackageManager::Apk, Runtime) => &["python3", "python3-dev", "py3-pip"],
            (PackageManager::Apk, DatabaseClient) => &["sqlite"],

            (PackageManager::Unknown, _) => &[],
        }
    }

    /// Full bundle across all groups, in group order
    pub fn bundle(self) -> Vec<&'static str> {
        PackageGroup::ALL
            .iter()
            .flat_map(|group| self.packages(*group).iter().copied())
            .collect()
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.executable() {
            Some(exe) => write!(f, "{exe}"),
            None => write!(f, "unknown"),
        }
    }
}

//! Installation request
//!
//! The single immutable description of what to install and where. It is
//! resolved once from CLI flags before any mutation and passed explicitly to
//! every component; nothing downstream reads process state.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::common::string_utils::shell_quote;
use crate::error::Result;
use crate::error::preflight::invalid_request;

/// Fixed service name the daemon is registered under
pub const SERVICE_NAME: &str = "bastion";

/// Python module providing the daemon entry point
pub const APP_MODULE: &str = "bastion.main";

/// Python package that must be importable after installation
pub const APP_PACKAGE: &str = "bastion";

const CONFIG_DIR: &str = "/etc/bastion";
const LOG_DIR: &str = "/var/log/bastion";
const DATA_DIR: &str = "/var/lib/bastion";
const RUN_DIR: &str = "/run/bastion";

/// Behaviour switches taken from the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BehaviorFlags {
    pub skip_deps: bool,
    pub skip_service: bool,
    pub force: bool,
    pub dry_run: bool,
    pub verbose: bool,
    pub assume_yes: bool,
}

/// Every path the installer touches, derived once from the install root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPaths {
    pub install_root: PathBuf,
    pub venv: PathBuf,
    pub keys_dir: PathBuf,
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub env_file: PathBuf,
    pub log_dir: PathBuf,
    pub log_file: PathBuf,
    pub data_dir: PathBuf,
    pub database_file: PathBuf,
    pub run_dir: PathBuf,
    pub pid_file: PathBuf,
}

impl InstallPaths {
    /// Derive the layout from an install root using the standard system locations
    pub fn derive(install_root: &Path) -> Self {
        Self::derive_with(
            install_root,
            Path::new(CONFIG_DIR),
            Path::new(LOG_DIR),
            Path::new(DATA_DIR),
            Path::new(RUN_DIR),
        )
    }

    /// Derive the layout with explicit system directories
    pub fn derive_with(
        install_root: &Path,
        config_dir: &Path,
        log_dir: &Path,
        data_dir: &Path,
        run_dir: &Path,
    ) -> Self {
        Self {
            install_root: install_root.to_path_buf(),
            venv: install_root.join("venv"),
            keys_dir: install_root.join("keys"),
            config_dir: config_dir.to_path_buf(),
            config_file: config_dir.join("config.yaml"),
            env_file: config_dir.join(format!("{SERVICE_NAME}.env")),
            log_dir: log_dir.to_path_buf(),
            log_file: log_dir.join(format!("{SERVICE_NAME}.log")),
            data_dir: data_dir.to_path_buf(),
            database_file: data_dir.join(format!("{SERVICE_NAME}.db")),
            run_dir: run_dir.to_path_buf(),
            pid_file: run_dir.join(format!("{SERVICE_NAME}.pid")),
        }
    }

    /// Interpreter inside the virtual environment
    pub fn venv_python(&self) -> PathBuf {
        self.venv.join("bin").join("python")
    }

    /// Pip inside the virtual environment
    pub fn venv_pip(&self) -> PathBuf {
        self.venv.join("bin").join("pip")
    }

    /// Directories owned by the service account, with their mode bits
    ///
    /// Log and data directories may hold audit and routing records and are
    /// never world-readable.
    pub fn owned_directories(&self) -> [(&Path, u32); 4] {
        [
            (self.install_root.as_path(), 0o755),
            (self.config_dir.as_path(), 0o755),
            (self.log_dir.as_path(), 0o750),
            (self.data_dir.as_path(), 0o750),
        ]
    }
}

/// Immutable installation parameters
#[derive(Debug, Clone)]
pub struct InstallationRequest {
    pub user: String,
    pub group: String,
    pub service_name: String,
    pub runtime_version: String,
    pub port: u16,
    pub source_dir: PathBuf,
    pub paths: InstallPaths,
    pub flags: BehaviorFlags,
}

impl InstallationRequest {
    /// Resolve a request from parsed CLI arguments
    ///
    /// `cwd` supplies the payload source when `--source` is not given.
    pub fn from_cli(cli: &Cli, cwd: &Path) -> Result<Self> {
        let source_dir = cli.source.clone().unwrap_or_else(|| cwd.to_path_buf());
        let source_dir = if source_dir.is_absolute() {
            source_dir
        } else {
            cwd.join(source_dir)
        };

        let request = Self {
            user: cli.user.clone(),
            group: cli.group.clone(),
            service_name: SERVICE_NAME.to_string(),
            runtime_version: cli.runtime_version.clone(),
            port: cli.port,
            source_dir,
            paths: InstallPaths::derive(&cli.directory),
            flags: BehaviorFlags {
                skip_deps: cli.skip_deps,
                skip_service: cli.skip_service,
                force: cli.force,
                dry_run: cli.dry_run,
                verbose: cli.verbose,
                assume_yes: cli.yes,
            },
        };
        request.validate()?;
        Ok(request)
    }

    /// Check the invariants every later step relies on
    pub fn validate(&self) -> Result<()> {
        if !self.paths.install_root.is_absolute() {
            return Err(invalid_request(format!(
                "install directory must be absolute, got {}",
                self.paths.install_root.display()
            )));
        }
        if self.paths.install_root == Path::new("/") {
            return Err(invalid_request("install directory cannot be /"));
        }
        // the root is embedded unquoted in unit files and init scripts
        let root = self.paths.install_root.to_str().unwrap_or_default();
        if root.is_empty() || shell_quote(root) != root {
            return Err(invalid_request(format!(
                "install directory {} may only contain letters, digits and -_./:=@%+,",
                self.paths.install_root.display()
            )));
        }
        for (label, value) in [("user", &self.user), ("group", &self.group)] {
            if value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == ':') {
                return Err(invalid_request(format!("invalid {label} name '{value}'")));
            }
        }
        if self.port == 0 {
            return Err(invalid_request("port must be between 1 and 65535"));
        }
        Ok(())
    }

    /// `user:group` as accepted by chown
    pub fn owner(&self) -> String {
        format!("{}:{}", self.user, self.group)
    }

    /// Whether the daemon runs as a dedicated account rather than root
    pub fn runs_unprivileged(&self) -> bool {
        self.user != "root"
    }

    /// Command line the init system uses to start the daemon
    pub fn start_command(&self) -> String {
        format!(
            "{} -m {APP_MODULE} start",
            self.paths.venv_python().display()
        )
    }

    /// Directory holding the payload package
    pub fn payload_dir(&self) -> PathBuf {
        self.source_dir.join(APP_PACKAGE)
    }

    /// Interpreter names to try, most specific first
    pub fn runtime_candidates(&self) -> Vec<String> {
        let mut candidates = Vec::new();
        let version = self.runtime_version.trim();
        if !version.is_empty() {
            candidates.push(format!("python{version}"));
        }
        for generic in ["python3", "python"] {
            if !candidates.iter().any(|c| c == generic) {
                candidates.push(generic.to_string());
            }
        }
        candidates
    }
}

//! Generated runtime configuration
//!
//! This module produces the two artifacts the daemon reads at startup:
//! - `config.yaml` - structured configuration document
//! - `bastion.env` - flat key=value environment file
//!
//! Both are rendered from one [`GeneratedConfig`] value, itself derived from
//! the installation request, so shared facts cannot disagree.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::InstallationRequest;
use crate::error::Result;
use crate::exec::{ExecutionAction, Executor};
use crate::installer::keys::{HOST_KEYS, PRIMARY_HOST_KEY};
use crate::platform::HostProbe;
use crate::ui::display;

const BIND_ADDRESS: &str = "0.0.0.0";
const LOG_LEVEL: &str = "INFO";
const LOG_MAX_BYTES: u64 = 10 * 1024 * 1024;
const LOG_BACKUP_COUNT: u32 = 5;
const MAX_CONNECTIONS_PER_IP: u32 = 5;
const CONNECTION_TIMEOUT_SECS: u32 = 300;
const RESTRICTED_NETWORKS: &[&str] = &["10.10.254.0/24"];
const PROXY_BUFFER_SIZE: u32 = 4096;
const AUTH_TIMEOUT_SECS: u32 = 30;
const CHANNEL_TIMEOUT_SECS: u32 = 30;

/// Mode for generated configuration; may hold credentials
const CONFIG_MODE: u32 = 0o640;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshSection {
    /// Key the daemon loads
    pub host_key: String,
    pub host_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSection {
    pub level: String,
    pub file: String,
    pub max_bytes: u64,
    pub backup_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySection {
    pub max_connections_per_ip: u32,
    pub connection_timeout: u32,
    pub restricted_networks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySection {
    pub buffer_size: u32,
    pub auth_timeout: u32,
    pub channel_timeout: u32,
}

/// Runtime configuration of the managed daemon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedConfig {
    pub server: ServerSection,
    pub ssh: SshSection,
    pub database: DatabaseSection,
    pub logging: LoggingSection,
    pub security: SecuritySection,
    pub proxy: ProxySection,
}

fn path_string(path: &Path) -> String {
    path.display().to_string()
}

impl GeneratedConfig {
    pub fn from_request(request: &InstallationRequest) -> Self {
        let paths = &request.paths;
        Self {
            server: ServerSection {
                bind: BIND_ADDRESS.to_string(),
                port: request.port,
            },
            ssh: SshSection {
                host_key: path_string(&paths.keys_dir.join(PRIMARY_HOST_KEY)),
                host_keys: HOST_KEYS
                    .iter()
                    .map(|spec| path_string(&spec.private_path(request)))
                    .collect(),
            },
            database: DatabaseSection {
                url: format!("sqlite:///{}", paths.database_file.display()),
            },
            logging: LoggingSection {
                level: LOG_LEVEL.to_string(),
                file: path_string(&paths.log_file),
                max_bytes: LOG_MAX_BYTES,
                backup_count: LOG_BACKUP_COUNT,
            },
            security: SecuritySection {
                max_connections_per_ip: MAX_CONNECTIONS_PER_IP,
                connection_timeout: CONNECTION_TIMEOUT_SECS,
                restricted_networks: RESTRICTED_NETWORKS.iter().map(ToString::to_string).collect(),
            },
            proxy: ProxySection {
                buffer_size: PROXY_BUFFER_SIZE,
                auth_timeout: AUTH_TIMEOUT_SECS,
                channel_timeout: CHANNEL_TIMEOUT_SECS,
            },
        }
    }

    /// Serialize the structured document
    pub fn to_yaml(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("# Generated by bastion-installer\n{yaml}"))
    }

    /// The same facts as environment variables, in file order
    pub fn env_entries(&self, config_file: &Path) -> Vec<(&'static str, String)> {
        vec![
            ("BASTION_BIND", self.server.bind.clone()),
            ("BASTION_PORT", self.server.port.to_string()),
            ("DB_URL", self.database.url.clone()),
            ("LOG_LEVEL", self.logging.level.clone()),
            ("LOG_FILE", self.logging.file.clone()),
            (
                "MAX_CONNECTIONS_PER_IP",
                self.security.max_connections_per_ip.to_string(),
            ),
            (
                "CONNECTION_TIMEOUT",
                self.security.connection_timeout.to_string(),
            ),
            ("HOST_KEY_FILE", self.ssh.host_key.clone()),
            (
                "RESTRICTED_NETWORKS",
                self.security.restricted_networks.join(","),
            ),
            ("BASTION_CONFIG", path_string(config_file)),
        ]
    }

    pub fn to_env(&self, config_file: &Path) -> String {
        let mut out = String::from("# Generated by bastion-installer\n");
        for (key, value) in self.env_entries(config_file) {
            out.push_str(&format!("{key}={value}\n"));
        }
        out
    }
}

/// Write `config.yaml` unless it exists and force is unset
pub fn write_config(
    request: &InstallationRequest,
    probe: &dyn HostProbe,
    exec: &mut Executor<'_>,
) -> Result<()> {
    let contents = GeneratedConfig::from_request(request).to_yaml()?;
    write_protected(request, probe, exec, &request.paths.config_file, contents)
}

/// Write the environment file unless it exists and force is unset
pub fn write_env(
    request: &InstallationRequest,
    probe: &dyn HostProbe,
    exec: &mut Executor<'_>,
) -> Result<()> {
    let contents = GeneratedConfig::from_request(request).to_env(&request.paths.config_file);
    write_protected(request, probe, exec, &request.paths.env_file, contents)
}

fn write_protected(
    request: &InstallationRequest,
    probe: &dyn HostProbe,
    exec: &mut Executor<'_>,
    path: &Path,
    contents: String,
) -> Result<()> {
    if probe.exists(path) && !request.flags.force {
        display::info(&format!(
            "{} exists; keeping it (use --force to regenerate)",
            path.display()
        ));
        return Ok(());
    }

    exec.execute(ExecutionAction::write_file(
        format!("Write {}", path.display()),
        path,
        contents,
        CONFIG_MODE,
    ))?;
    exec.execute(ExecutionAction::chown(
        format!("Set owner of {}", path.display()),
        &request.owner(),
        path,
        false,
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests;

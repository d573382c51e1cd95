//! Error types and handling for the installer
//!
//! Uses `thiserror` for error definitions and `miette` for diagnostic codes.
//!
//! This module is organized into sub-modules by error domain:
//! - [`preflight`]: Privilege, host and request validation errors
//! - [`provision`]: Account and directory errors
//! - [`deploy`]: Payload, runtime and dependency errors
//! - [`service`]: Init-system registration errors
//! - [`fs`]: File system errors
//!
//! Only fatal conditions are represented here. Detection ambiguity and
//! verification failures are reported as warnings and never become an `Err`.

pub mod deploy;
pub mod fs;
pub mod preflight;
pub mod provision;
pub mod service;

use miette::Diagnostic;
use thiserror::Error;

/// Coarse classification used to report which pipeline stage failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Preflight,
    Provisioning,
    Deployment,
    ServiceRegistration,
    Execution,
    Io,
}

/// Main error type for installer operations
#[derive(Error, Diagnostic, Debug)]
pub enum InstallerError {
    // Preflight errors
    #[error("This installer must be run as root")]
    #[diagnostic(
        code(installer::preflight::not_privileged),
        help("Re-run with sudo, or use --dry-run to preview the installation")
    )]
    NotPrivileged,

    #[error("Unsupported host operating system: {os}")]
    #[diagnostic(code(installer::preflight::unsupported_host))]
    UnsupportedHost { os: String },

    #[error("Invalid installation request: {message}")]
    #[diagnostic(code(installer::preflight::invalid_request))]
    InvalidRequest { message: String },

    #[error("Failed to read confirmation: {reason}")]
    #[diagnostic(
        code(installer::preflight::confirmation_failed),
        help("Pass --yes to skip the confirmation prompt in non-interactive sessions")
    )]
    ConfirmationFailed { reason: String },

    // Provisioning errors
    #[error("Failed to create account '{name}': {reason}")]
    #[diagnostic(code(installer::provision::account_failed))]
    AccountCreationFailed { name: String, reason: String },

    #[error("Failed to prepare directory {path}: {reason}")]
    #[diagnostic(code(installer::provision::directory_failed))]
    DirectoryFailed { path: String, reason: String },

    // Deployment errors
    #[error("Application payload not found: {path}")]
    #[diagnostic(
        code(installer::deploy::payload_missing),
        help("Run the installer from the source checkout, or point --source at it")
    )]
    PayloadMissing { path: String },

    #[error("No usable Python runtime found (tried: {candidates})")]
    #[diagnostic(
        code(installer::deploy::runtime_not_found),
        help("Install Python 3 or pass --runtime-version to match an installed interpreter")
    )]
    RuntimeNotFound { candidates: String },

    #[error("Package installation with {manager} failed: {reason}")]
    #[diagnostic(code(installer::deploy::packages_failed))]
    PackageInstallFailed { manager: String, reason: String },

    #[error("Deployment step '{step}' failed: {reason}")]
    #[diagnostic(code(installer::deploy::step_failed))]
    DeploymentFailed { step: String, reason: String },

    // Service errors
    #[error("Service template not found: {path}")]
    #[diagnostic(
        code(installer::service::template_missing),
        help("The source tree must ship deploy/bastion.service for systemd hosts")
    )]
    TemplateMissing { path: String },

    #[error("Service registration failed: {reason}")]
    #[diagnostic(code(installer::service::registration_failed))]
    ServiceRegistrationFailed { reason: String },

    // Execution errors
    #[error("Command failed: {command}: {reason}")]
    #[diagnostic(code(installer::exec::command_failed))]
    CommandFailed { command: String, reason: String },

    // File system errors
    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(installer::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to render configuration: {reason}")]
    #[diagnostic(code(installer::fs::config_render_failed))]
    ConfigRenderFailed { reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(installer::fs::io_error))]
    IoError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl InstallerError {
    /// Stage classification for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotPrivileged
            | Self::UnsupportedHost { .. }
            | Self::InvalidRequest { .. }
            | Self::ConfirmationFailed { .. } => ErrorKind::Preflight,
            Self::AccountCreationFailed { .. } | Self::DirectoryFailed { .. } => {
                ErrorKind::Provisioning
            }
            Self::PayloadMissing { .. }
            | Self::RuntimeNotFound { .. }
            | Self::PackageInstallFailed { .. }
            | Self::DeploymentFailed { .. } => ErrorKind::Deployment,
            Self::TemplateMissing { .. } | Self::ServiceRegistrationFailed { .. } => {
                ErrorKind::ServiceRegistration
            }
            Self::CommandFailed { .. } => ErrorKind::Execution,
            Self::FileWriteFailed { .. }
            | Self::ConfigRenderFailed { .. }
            | Self::IoError { .. } => ErrorKind::Io,
        }
    }

    /// Preflight errors abort before the rollback guard is armed
    pub fn triggers_rollback(&self) -> bool {
        self.kind() != ErrorKind::Preflight
    }
}

impl From<std::io::Error> for InstallerError {
    fn from(err: std::io::Error) -> Self {
        InstallerError::IoError {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for InstallerError {
    fn from(err: serde_yaml::Error) -> Self {
        InstallerError::ConfigRenderFailed {
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for InstallerError {
    fn from(err: inquire::InquireError) -> Self {
        InstallerError::ConfirmationFailed {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, InstallerError>;

#[cfg(test)]
mod tests;

//! Deployment errors

use super::InstallerError;

/// Creates a payload missing error
pub fn payload_missing(path: impl Into<String>) -> InstallerError {
    InstallerError::PayloadMissing { path: path.into() }
}

/// Creates a runtime not found error from the list of tried names
pub fn runtime_not_found(candidates: &[String]) -> InstallerError {
    InstallerError::RuntimeNotFound {
        candidates: candidates.join(", "),
    }
}

/// Creates a package installation failed error
pub fn packages_failed(manager: impl Into<String>, reason: impl ToString) -> InstallerError {
    InstallerError::PackageInstallFailed {
        manager: manager.into(),
        reason: reason.to_string(),
    }
}

/// Creates a deployment step failed error
pub fn step_failed(step: impl Into<String>, reason: impl ToString) -> InstallerError {
    InstallerError::DeploymentFailed {
        step: step.into(),
        reason: reason.to_string(),
    }
}

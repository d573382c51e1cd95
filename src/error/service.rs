//! Service registration errors

use super::InstallerError;

/// Creates a template missing error
pub fn template_missing(path: impl Into<String>) -> InstallerError {
    InstallerError::TemplateMissing { path: path.into() }
}

/// Creates a registration failed error
pub fn registration_failed(reason: impl ToString) -> InstallerError {
    InstallerError::ServiceRegistrationFailed {
        reason: reason.to_string(),
    }
}

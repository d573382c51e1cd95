//! Account and directory provisioning errors

use super::InstallerError;

/// Creates an account creation failed error
pub fn account_failed(name: impl Into<String>, reason: impl ToString) -> InstallerError {
    InstallerError::AccountCreationFailed {
        name: name.into(),
        reason: reason.to_string(),
    }
}

/// Creates a directory preparation failed error
pub fn directory_failed(path: impl Into<String>, reason: impl ToString) -> InstallerError {
    InstallerError::DirectoryFailed {
        path: path.into(),
        reason: reason.to_string(),
    }
}

//! Preflight errors

use super::InstallerError;

/// Creates an unsupported host error
pub fn unsupported_host(os: impl Into<String>) -> InstallerError {
    InstallerError::UnsupportedHost { os: os.into() }
}

/// Creates an invalid request error
pub fn invalid_request(message: impl Into<String>) -> InstallerError {
    InstallerError::InvalidRequest {
        message: message.into(),
    }
}

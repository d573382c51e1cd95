//! File system errors

use std::path::Path;

use super::InstallerError;

/// Creates a file write failed error
pub fn write_failed(path: impl Into<String>, reason: impl ToString) -> InstallerError {
    InstallerError::FileWriteFailed {
        path: path.into(),
        reason: reason.to_string(),
    }
}

/// Creates an IO error naming the path it happened on
pub fn io_error(path: &Path, err: std::io::Error) -> InstallerError {
    InstallerError::IoError {
        message: format!("{}: {err}", path.display()),
        source: Some(Box::new(err)),
    }
}

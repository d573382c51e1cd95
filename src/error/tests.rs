//! Error type tests
//!
//! Tests for InstallerError, its classification and conversions.

#![allow(clippy::unwrap_used)]

use super::{ErrorKind, InstallerError};
use crate::error::deploy::{packages_failed, payload_missing, runtime_not_found, step_failed};
use crate::error::fs::{io_error, write_failed};
use crate::error::preflight::{invalid_request, unsupported_host};
use crate::error::provision::{account_failed, directory_failed};
use crate::error::service::{registration_failed, template_missing};
use miette::Diagnostic;

macro_rules! test_error_contains {
    ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
        #[test]
        fn $test_name() {
            let err = $err;
            let error_string = err.to_string();
            $(
                assert!(error_string.contains($contains),
                    "Error message should contain '{}', got: {}",
                    $contains,
                    error_string
                );
            )+
        }
    };
}

#[test]
fn test_error_display() {
    let err = payload_missing("/src/bastion");
    assert_eq!(err.to_string(), "Application payload not found: /src/bastion");
}

#[test]
fn test_error_code() {
    let err = InstallerError::NotPrivileged;
    assert_eq!(
        err.code().map(|c| c.to_string()),
        Some("installer::preflight::not_privileged".to_string())
    );
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: InstallerError = io_err.into();
    assert!(matches!(err, InstallerError::IoError { .. }));
    assert_eq!(err.kind(), ErrorKind::Io);
}

test_error_contains!(
    test_not_privileged_message,
    InstallerError::NotPrivileged,
    "must be run as root"
);

test_error_contains!(
    test_runtime_not_found_lists_candidates,
    runtime_not_found(&["python3.11".to_string(), "python3".to_string()]),
    "python3.11, python3"
);

test_error_contains!(
    test_packages_failed_names_manager,
    packages_failed("apt-get", "exit status 100"),
    "apt-get",
    "exit status 100"
);

test_error_contains!(
    test_template_missing_names_path,
    template_missing("/src/deploy/bastion.service"),
    "deploy/bastion.service"
);

#[test]
fn test_kinds_follow_taxonomy() {
    assert_eq!(unsupported_host("darwin").kind(), ErrorKind::Preflight);
    assert_eq!(invalid_request("relative").kind(), ErrorKind::Preflight);
    assert_eq!(account_failed("bastion", "x").kind(), ErrorKind::Provisioning);
    assert_eq!(directory_failed("/opt", "x").kind(), ErrorKind::Provisioning);
    assert_eq!(payload_missing("/x").kind(), ErrorKind::Deployment);
    assert_eq!(step_failed("venv", "x").kind(), ErrorKind::Deployment);
    assert_eq!(
        template_missing("/x").kind(),
        ErrorKind::ServiceRegistration
    );
    assert_eq!(
        registration_failed("x").kind(),
        ErrorKind::ServiceRegistration
    );
    assert_eq!(write_failed("/x", "disk full").kind(), ErrorKind::Io);
    let err = io_error(
        std::path::Path::new("/opt/bastion"),
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    );
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.to_string(), "IO error: /opt/bastion: denied");
}

#[test]
fn test_only_preflight_skips_rollback() {
    assert!(!InstallerError::NotPrivileged.triggers_rollback());
    assert!(!invalid_request("x").triggers_rollback());
    assert!(payload_missing("/x").triggers_rollback());
    assert!(template_missing("/x").triggers_rollback());
    assert!(
        InstallerError::CommandFailed {
            command: "useradd".to_string(),
            reason: "exit status 9".to_string(),
        }
        .triggers_rollback()
    );
}

#[test]
fn test_inquire_error_conversion() {
    let err: InstallerError = inquire::InquireError::NotTTY.into();
    assert!(matches!(err, InstallerError::ConfirmationFailed { .. }));
    assert!(err.help().is_some());
}

//! Installation pipeline components
//!
//! This module handles:
//! - Service account and directory provisioning (via provision module)
//! - OS package installation (via deps module)
//! - Payload deployment and runtime environment (via deploy module)
//! - Host key generation (via keys module)
//! - Firewall port opening (via firewall module)
//! - Post-install verification (via verify module)
//!
//! Every component takes the installation request explicitly and routes all
//! mutation through the executor it is handed.

pub mod deploy;
pub mod deps;
pub mod firewall;
pub mod keys;
pub mod provision;
pub mod verify;

pub use deploy::deploy;
pub use deps::install_os_packages;
pub use firewall::open_port;
pub use provision::{ensure_account, ensure_directories};
pub use verify::{VerificationReport, verify};

use std::path::Path;

use crate::domain::InstallationRequest;
use crate::platform::HostProbe;

/// Whether `path` below the install root is still there once directories are
/// provisioned
///
/// Force recreates the install root empty, so what the host holds now is only
/// relevant without it. Dry and live runs plan from the same answer.
pub(crate) fn survives_provisioning(
    request: &InstallationRequest,
    probe: &dyn HostProbe,
    path: &Path,
) -> bool {
    !request.flags.force && probe.exists(path)
}

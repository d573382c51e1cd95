//! Preflight checks and confirmation for the install operation
//!
//! Preflight failures abort before anything is touched, so they never
//! trigger rollback.

use inquire::Confirm;

use crate::domain::InstallationRequest;
use crate::error::Result;
use crate::error::preflight::unsupported_host;
use crate::error::InstallerError;
use crate::platform::HostProbe;
use crate::ui::display;

/// Reject hosts the installer cannot manage
///
/// Root is required for a live run. A dry run only warns, since it changes
/// nothing.
pub fn check_host(
    target_os: &str,
    probe: &dyn HostProbe,
    request: &InstallationRequest,
) -> Result<()> {
    if target_os != "linux" {
        return Err(unsupported_host(target_os));
    }

    request.validate()?;

    if !probe.is_privileged() {
        if request.flags.dry_run {
            display::warn("Not running as root; a live run would need sudo");
        } else {
            return Err(InstallerError::NotPrivileged);
        }
    }
    Ok(())
}

/// Whether the confirmation prompt applies to this run
pub fn needs_confirmation(request: &InstallationRequest) -> bool {
    !request.flags.dry_run && !request.flags.assume_yes
}

/// Ask the operator to confirm the plan
pub fn confirm(_request: &InstallationRequest) -> Result<bool> {
    println!();
    let answer = Confirm::new("Proceed with installation?")
        .with_default(true)
        .with_help_message("Press Enter to confirm, or 'n' to cancel")
        .prompt()?;
    Ok(answer)
}

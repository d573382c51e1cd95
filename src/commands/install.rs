//! Install command implementation
//!
//! The installation process:
//! 1. Resolve the request from the command line
//! 2. Check the host and privileges
//! 3. Detect init system, package manager and firewall
//! 4. Confirm the plan (unless --yes or --dry-run)
//! 5. Run the pipeline, rolling back on error
//! 6. Verify the result

use crate::cli::Cli;
use crate::domain::InstallationRequest;
use crate::error::Result;
use crate::exec::SystemRunner;
use crate::operations::install::preflight;
use crate::operations::{InstallOperation, InstallOutcome};
use crate::platform::SystemProbe;
use crate::ui::display;

/// Run the install command
pub fn run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let request = InstallationRequest::from_cli(cli, &cwd)?;
    tracing::debug!(?request, "resolved installation request");

    let probe = SystemProbe;
    let runner = SystemRunner::new(request.flags.verbose);

    match InstallOperation::new(&request, &probe, &runner).run(preflight::confirm)? {
        InstallOutcome::Completed(_) => Ok(()),
        InstallOutcome::Declined => {
            display::info("Installation cancelled");
            Ok(())
        }
    }
}

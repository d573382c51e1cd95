//! OS package installation

use crate::domain::InstallationRequest;
use crate::error::{InstallerError, Result};
use crate::error::deploy::packages_failed;
use crate::exec::{ExecutionAction, Executor};
use crate::platform::{DetectedEnvironment, PackageGroup, PackageManager};
use crate::ui::display;

/// Refresh the package index and install the dependency bundle
///
/// An unknown package manager only warns, listing what to install by hand.
/// A known manager failing is fatal.
pub fn install_os_packages(
    env: &DetectedEnvironment,
    request: &InstallationRequest,
    exec: &mut Executor<'_>,
) -> Result<()> {
    if request.flags.skip_deps {
        display::info("Skipping OS package installation (--skip-deps)");
        return Ok(());
    }

    let manager = env.package_manager;
    let (Some((update, update_args)), Some((install, install_args))) =
        (manager.update_command(), manager.install_command())
    else {
        warn_manual_install();
        return Ok(());
    };

    let failed = |e: InstallerError| packages_failed(manager.to_string(), e);

    exec.execute(ExecutionAction::run(
        "Refresh package index",
        update,
        update_args.iter().copied(),
    ))
    .map_err(failed)?;

    let bundle = manager.bundle();
    tracing::debug!(%manager, packages = ?bundle, "installing OS packages");
    exec.execute(ExecutionAction::run(
        "Install OS packages",
        install,
        install_args.iter().chain(bundle.iter()).copied(),
    ))
    .map_err(failed)?;
    Ok(())
}

fn warn_manual_install() {
    display::warn("Unknown package manager; install these dependencies manually:");
    for group in PackageGroup::ALL {
        let examples = PackageManager::Apt.packages(group).join(" ");
        display::info(&format!("{group:?}: {examples} (Debian names)"));
    }
}

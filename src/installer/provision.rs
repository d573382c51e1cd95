//! Service account and directory provisioning

use crate::domain::InstallationRequest;
use crate::error::provision::{account_failed, directory_failed};
use crate::error::{InstallerError, Result};
use crate::exec::{ExecutionAction, Executor};
use crate::platform::HostProbe;
use crate::ui::display;

/// Create the service group and account unless they already exist
///
/// Accounts are never recreated, force or not. The `root` account is always
/// assumed to exist.
pub fn ensure_account(
    request: &InstallationRequest,
    probe: &dyn HostProbe,
    exec: &mut Executor<'_>,
) -> Result<()> {
    if !request.runs_unprivileged() {
        display::info("Running as root; no service account needed");
        return Ok(());
    }

    if probe.group_exists(&request.group) {
        display::info(&format!("Group '{}' already exists", request.group));
    } else {
        exec.execute(ExecutionAction::run(
            "Create service group",
            "groupadd",
            ["--system", request.group.as_str()],
        ))
        .map_err(|e| account_failed(&request.group, e))?;
    }

    if probe.user_exists(&request.user) {
        display::info(&format!("User '{}' already exists", request.user));
        return Ok(());
    }

    let home = request.paths.install_root.display().to_string();
    exec.execute(ExecutionAction::run(
        "Create service account",
        "useradd",
        [
            "--system",
            "--gid",
            request.group.as_str(),
            "--home-dir",
            home.as_str(),
            "--no-create-home",
            "--shell",
            "/usr/sbin/nologin",
            request.user.as_str(),
        ],
    ))
    .map_err(|e| account_failed(&request.user, e))?;
    Ok(())
}

/// Create the install, config, log and data directories
///
/// Existing directories are left alone unless force is set, in which case
/// they are removed and recreated. Ownership and mode are applied to every
/// directory that is (re)created.
pub fn ensure_directories(
    request: &InstallationRequest,
    probe: &dyn HostProbe,
    exec: &mut Executor<'_>,
) -> Result<()> {
    let owner = request.owner();

    for (dir, mode) in request.paths.owned_directories() {
        let wrap = |e: InstallerError| directory_failed(dir.display().to_string(), e);

        if probe.exists(dir) {
            if !request.flags.force {
                display::info(&format!("{} already exists", dir.display()));
                continue;
            }
            exec.execute(ExecutionAction::remove_tree(
                format!("Remove existing {}", dir.display()),
                dir,
            ))
            .map_err(wrap)?;
        }

        exec.execute(ExecutionAction::create_dir(
            format!("Create {}", dir.display()),
            dir,
            mode,
        ))
        .map_err(wrap)?;
        exec.execute(ExecutionAction::chown(
            format!("Set owner of {}", dir.display()),
            &owner,
            dir,
            false,
        ))
        .map_err(wrap)?;
    }
    Ok(())
}

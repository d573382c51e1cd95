//! Application deployment
//!
//! Copies the payload into the install root, builds the isolated runtime
//! environment, installs the application into it and generates host keys.

use std::path::PathBuf;

use crate::common::fs::CopyOptions;
use crate::domain::{APP_PACKAGE, InstallationRequest};
use crate::error::deploy::{payload_missing, runtime_not_found, step_failed};
use crate::error::{InstallerError, Result};
use crate::exec::{ExecutionAction, Executor};
use crate::platform::HostProbe;
use crate::ui::display;

use super::{keys, survives_provisioning};

/// Optional files copied next to the payload when the source has them
const MANIFESTS: [&str; 3] = ["requirements.txt", "setup.py", "README.md"];

/// Deploy the application into the install root
pub fn deploy(
    request: &InstallationRequest,
    probe: &dyn HostProbe,
    exec: &mut Executor<'_>,
) -> Result<()> {
    let paths = &request.paths;

    let payload = request.payload_dir();
    if !probe.is_dir(&payload) {
        return Err(payload_missing(payload.display().to_string()));
    }
    exec.execute(ExecutionAction::copy_tree(
        "Copy application payload",
        &payload,
        paths.install_root.join(APP_PACKAGE),
        CopyOptions::exclude_build_artifacts(),
    ))
    .map_err(|e| step_failed("copy payload", e))?;

    let copied = copy_manifests(request, probe, exec)?;

    let runtime = find_runtime(request, probe)?;
    tracing::debug!(runtime = %runtime.display(), "selected runtime");

    create_runtime_env(request, probe, exec, &runtime)?;
    install_application(request, exec, &copied)?;

    exec.execute(ExecutionAction::chown(
        "Set ownership of install root",
        &request.owner(),
        &paths.install_root,
        true,
    ))
    .map_err(|e| step_failed("set ownership", e))?;

    keys::generate_host_keys(request, probe, exec).map_err(|e| match e {
        InstallerError::CommandFailed { .. } => step_failed("generate host keys", e),
        other => other,
    })
}

/// Copy the manifests present in the source, returning their names
fn copy_manifests(
    request: &InstallationRequest,
    probe: &dyn HostProbe,
    exec: &mut Executor<'_>,
) -> Result<Vec<&'static str>> {
    let mut copied = Vec::new();
    for name in MANIFESTS {
        let source = request.source_dir.join(name);
        if !probe.exists(&source) {
            tracing::debug!(file = name, "optional manifest absent");
            continue;
        }
        exec.execute(ExecutionAction::copy_file(
            format!("Copy {name}"),
            &source,
            request.paths.install_root.join(name),
        ))
        .map_err(|e| step_failed(format!("copy {name}"), e))?;
        copied.push(name);
    }
    Ok(copied)
}

/// First runtime candidate found on PATH
pub fn find_runtime(request: &InstallationRequest, probe: &dyn HostProbe) -> Result<PathBuf> {
    let candidates = request.runtime_candidates();
    candidates
        .iter()
        .find_map(|name| probe.find_executable(name))
        .ok_or_else(|| runtime_not_found(&candidates))
}

fn create_runtime_env(
    request: &InstallationRequest,
    probe: &dyn HostProbe,
    exec: &mut Executor<'_>,
    runtime: &std::path::Path,
) -> Result<()> {
    let venv = &request.paths.venv;
    if survives_provisioning(request, probe, &request.paths.venv_python()) {
        display::info(&format!("Runtime environment {} already exists", venv.display()));
        return Ok(());
    }

    let args = vec![
        "-m".to_string(),
        "venv".to_string(),
        venv.display().to_string(),
    ];
    exec.execute(ExecutionAction::run(
        "Create runtime environment",
        runtime.display().to_string(),
        args,
    ))
    .map_err(|e| step_failed("create runtime environment", e))?;
    Ok(())
}

fn install_application(
    request: &InstallationRequest,
    exec: &mut Executor<'_>,
    manifests: &[&str],
) -> Result<()> {
    let pip = request.paths.venv_pip().display().to_string();
    let root = &request.paths.install_root;

    exec.execute(ExecutionAction::run(
        "Upgrade pip",
        pip.as_str(),
        ["install", "--quiet", "--upgrade", "pip"],
    ))
    .map_err(|e| step_failed("upgrade pip", e))?;

    if manifests.contains(&"requirements.txt") {
        let requirements = root.join("requirements.txt").display().to_string();
        exec.execute(ExecutionAction::run(
            "Install application dependencies",
            pip.as_str(),
            ["install", "--quiet", "-r", requirements.as_str()],
        ))
        .map_err(|e| step_failed("install dependencies", e))?;
    }

    if manifests.contains(&"setup.py") {
        let root = root.display().to_string();
        exec.execute(ExecutionAction::run(
            "Install application (editable)",
            pip.as_str(),
            ["install", "--quiet", "-e", root.as_str()],
        ))
        .map_err(|e| step_failed("install application", e))?;
    } else {
        display::warn("No setup.py in source; the application is importable from the install root only");
    }
    Ok(())
}

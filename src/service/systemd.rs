//! systemd strategy
//!
//! The unit template shipped with the source tree is parsed into a
//! [`UnitFile`] and its fields rewritten by name:
//! - `WorkingDirectory` → install root
//! - `ExecStart` → start command inside the runtime environment
//! - `ReadWritePaths` → log and data directories
//! - `EnvironmentFile` → generated env file
//! - `User`/`Group` → service account (root runs drop both)

use std::path::PathBuf;

use crate::domain::InstallationRequest;
use crate::error::Result;
use crate::error::service::template_missing;
use crate::exec::{ExecutionAction, Executor};

use super::unit_file::UnitFile;
use super::{ServiceContext, ServiceDescriptor};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SystemdService;

impl SystemdService {
    fn unit_path(ctx: &ServiceContext<'_>) -> PathBuf {
        ctx.paths
            .systemd_unit_dir
            .join(format!("{}.service", ctx.request.service_name))
    }

    fn template_path(request: &InstallationRequest) -> PathBuf {
        request
            .source_dir
            .join("deploy")
            .join(format!("{}.service", request.service_name))
    }

    /// Rewrite a unit template for this installation
    pub fn render_unit(template: &str, request: &InstallationRequest) -> UnitFile {
        let paths = &request.paths;
        let mut unit = UnitFile::parse(template);

        unit.set(
            "Service",
            "WorkingDirectory",
            paths.install_root.display().to_string(),
        );
        unit.set("Service", "ExecStart", request.start_command());
        unit.set(
            "Service",
            "ReadWritePaths",
            format!("{} {}", paths.log_dir.display(), paths.data_dir.display()),
        );
        unit.set(
            "Service",
            "EnvironmentFile",
            format!("-{}", paths.env_file.display()),
        );

        if request.runs_unprivileged() {
            unit.set("Service", "User", request.user.as_str());
            unit.set("Service", "Group", request.group.as_str());
        } else {
            unit.remove("Service", "User");
            unit.remove("Service", "Group");
        }
        // `systemctl enable` needs an install target to link into
        if unit.get("Install", "WantedBy").is_none() {
            unit.set("Install", "WantedBy", "multi-user.target");
        }
        unit
    }

    fn systemctl(description: &str, args: &[&str]) -> ExecutionAction {
        ExecutionAction::run(description, "systemctl", args.iter().copied())
    }
}

impl ServiceDescriptor for SystemdService {
    fn init_id(&self) -> &str {
        "systemd"
    }

    fn install(&self, ctx: &ServiceContext<'_>, exec: &mut Executor<'_>) -> Result<()> {
        let template_path = Self::template_path(ctx.request);
        let template = ctx
            .probe
            .read_to_string(&template_path)
            .ok_or_else(|| template_missing(template_path.display().to_string()))?;

        let unit = Self::render_unit(&template, ctx.request);
        exec.execute(ExecutionAction::write_file(
            "Install systemd unit",
            Self::unit_path(ctx),
            unit.to_string(),
            0o644,
        ))?;
        exec.execute(Self::systemctl("Reload systemd units", &["daemon-reload"]))?;
        Ok(())
    }

    fn enable(&self, ctx: &ServiceContext<'_>, exec: &mut Executor<'_>) -> Result<()> {
        exec.execute(Self::systemctl(
            "Enable service at boot",
            &["enable", ctx.request.service_name.as_str()],
        ))?;
        Ok(())
    }

    fn is_enabled(&self, ctx: &ServiceContext<'_>) -> bool {
        ctx.probe
            .check("systemctl", &["is-enabled", "--quiet", ctx.request.service_name.as_str()])
    }

    fn stop(&self, ctx: &ServiceContext<'_>, exec: &mut Executor<'_>) {
        exec.execute_best_effort(Self::systemctl(
            "Stop service",
            &["stop", ctx.request.service_name.as_str()],
        ));
    }

    fn unregister(&self, ctx: &ServiceContext<'_>, exec: &mut Executor<'_>) {
        exec.execute_best_effort(Self::systemctl(
            "Disable service",
            &["disable", ctx.request.service_name.as_str()],
        ));
        exec.execute_best_effort(ExecutionAction::remove_tree(
            "Remove systemd unit",
            Self::unit_path(ctx),
        ));
        exec.execute_best_effort(Self::systemctl("Reload systemd units", &["daemon-reload"]));
    }

    fn start_hint(&self, ctx: &ServiceContext<'_>) -> Option<String> {
        Some(format!("systemctl start {}", ctx.request.service_name))
    }
}

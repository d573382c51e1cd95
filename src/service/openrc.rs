//! OpenRC strategy
//!
//! Installs `/etc/init.d/<service>` and `/etc/conf.d/<service>`. Every
//! installation-specific value lives in the conf.d file; the init script only
//! references those variables, so it is the same text for every install.

use std::fmt;
use std::path::PathBuf;

use crate::domain::{APP_MODULE, APP_PACKAGE, InstallationRequest};
use crate::error::Result;
use crate::exec::{ExecutionAction, Executor};

use super::{ServiceContext, ServiceDescriptor};

const RUNLEVEL: &str = "default";

/// Variables written to conf.d and read by the init script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRcConf {
    entries: Vec<(&'static str, String)>,
}

impl OpenRcConf {
    pub fn from_request(request: &InstallationRequest) -> Self {
        let paths = &request.paths;
        let path = |p: &std::path::Path| p.display().to_string();
        Self {
            entries: vec![
                ("BASTION_USER", request.user.clone()),
                ("BASTION_GROUP", request.group.clone()),
                ("BASTION_HOME", path(&paths.install_root)),
                ("BASTION_VENV", path(&paths.venv)),
                ("BASTION_CONFIG", path(&paths.config_file)),
                ("BASTION_ENV_FILE", path(&paths.env_file)),
                ("BASTION_PIDFILE", path(&paths.pid_file)),
                ("BASTION_LOGFILE", path(&paths.log_file)),
            ],
        }
    }
}

impl fmt::Display for OpenRcConf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Settings for the bastion init script")?;
        for (key, value) in &self.entries {
            writeln!(f, "{key}=\"{value}\"")?;
        }
        Ok(())
    }
}

/// Render the init script
///
/// - `depend` requires the network
/// - `start_pre` checks the runtime can import the application and creates
///   the PID and log directories owned by the service account
/// - `start_post` fails unless the daemon wrote a PID file for a live process
/// - `reload` sends SIGHUP, `status` reports PID liveness
pub fn render_init_script(service_name: &str) -> String {
    format!(
        r#"#!/sbin/openrc-run

name="{service_name}"
description="SSH bastion daemon"

command="${{BASTION_VENV}}/bin/python"
command_args="-m {APP_MODULE} start"
command_user="${{BASTION_USER}}:${{BASTION_GROUP}}"
command_background="yes"
directory="${{BASTION_HOME}}"
pidfile="${{BASTION_PIDFILE}}"
output_log="${{BASTION_LOGFILE}}"
error_log="${{BASTION_LOGFILE}}"

extra_started_commands="reload"

depend() {{
	need net
	after firewall
}}

start_pre() {{
	if [ -f "${{BASTION_ENV_FILE}}" ]; then
		set -a
		. "${{BASTION_ENV_FILE}}"
		set +a
	fi

	if [ ! -x "${{BASTION_VENV}}/bin/python" ]; then
		eerror "Runtime environment missing: ${{BASTION_VENV}}"
		return 1
	fi

	if ! "${{BASTION_VENV}}/bin/python" -c "import {APP_PACKAGE}" >/dev/null 2>&1; then
		eerror "Cannot import {APP_PACKAGE} from ${{BASTION_VENV}}"
		return 1
	fi

	checkpath --directory --owner "${{BASTION_USER}}:${{BASTION_GROUP}}" --mode 0755 \
		"$(dirname "${{BASTION_PIDFILE}}")"
	checkpath --directory --owner "${{BASTION_USER}}:${{BASTION_GROUP}}" --mode 0750 \
		"$(dirname "${{BASTION_LOGFILE}}")"
}}

start_post() {{
	sleep 1
	if [ ! -f "${{pidfile}}" ]; then
		eerror "${{name}} did not write ${{pidfile}}"
		return 1
	fi
	if ! kill -0 "$(cat "${{pidfile}}")" 2>/dev/null; then
		eerror "${{name}} exited during startup"
		return 1
	fi
}}

reload() {{
	ebegin "Reloading ${{name}}"
	start-stop-daemon --signal HUP --pidfile "${{pidfile}}"
	eend $?
}}

status() {{
	if [ -f "${{pidfile}}" ] && kill -0 "$(cat "${{pidfile}}")" 2>/dev/null; then
		einfo "status: started"
		return 0
	fi
	einfo "status: stopped"
	return 3
}}
"#
    )
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OpenRcService;

impl OpenRcService {
    fn script_path(ctx: &ServiceContext<'_>) -> PathBuf {
        ctx.paths.init_d_dir.join(&ctx.request.service_name)
    }

    fn conf_path(ctx: &ServiceContext<'_>) -> PathBuf {
        ctx.paths.conf_d_dir.join(&ctx.request.service_name)
    }
}

impl ServiceDescriptor for OpenRcService {
    fn init_id(&self) -> &str {
        "openrc"
    }

    fn install(&self, ctx: &ServiceContext<'_>, exec: &mut Executor<'_>) -> Result<()> {
        exec.execute(ExecutionAction::write_file(
            "Install OpenRC init script",
            Self::script_path(ctx),
            render_init_script(&ctx.request.service_name),
            0o755,
        ))?;
        exec.execute(ExecutionAction::write_file(
            "Install OpenRC conf.d settings",
            Self::conf_path(ctx),
            OpenRcConf::from_request(ctx.request).to_string(),
            0o644,
        ))?;
        Ok(())
    }

    fn enable(&self, ctx: &ServiceContext<'_>, exec: &mut Executor<'_>) -> Result<()> {
        exec.execute(ExecutionAction::run(
            "Add service to default runlevel",
            "rc-update",
            ["add", ctx.request.service_name.as_str(), RUNLEVEL],
        ))?;
        Ok(())
    }

    fn is_enabled(&self, ctx: &ServiceContext<'_>) -> bool {
        let runlevel_link = ctx
            .paths
            .init_d_dir
            .with_file_name("runlevels")
            .join(RUNLEVEL)
            .join(&ctx.request.service_name);
        ctx.probe.exists(&runlevel_link)
    }

    fn stop(&self, ctx: &ServiceContext<'_>, exec: &mut Executor<'_>) {
        exec.execute_best_effort(ExecutionAction::run(
            "Stop service",
            "rc-service",
            [ctx.request.service_name.as_str(), "stop"],
        ));
    }

    fn unregister(&self, ctx: &ServiceContext<'_>, exec: &mut Executor<'_>) {
        exec.execute_best_effort(ExecutionAction::run(
            "Remove service from default runlevel",
            "rc-update",
            ["del", ctx.request.service_name.as_str(), RUNLEVEL],
        ));
        exec.execute_best_effort(ExecutionAction::remove_tree(
            "Remove OpenRC init script",
            Self::script_path(ctx),
        ));
        exec.execute_best_effort(ExecutionAction::remove_tree(
            "Remove OpenRC conf.d settings",
            Self::conf_path(ctx),
        ));
    }

    fn start_hint(&self, ctx: &ServiceContext<'_>) -> Option<String> {
        Some(format!("rc-service {} start", ctx.request.service_name))
    }
}

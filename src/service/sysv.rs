//! SysV init strategy
//!
//! Synthesizes a minimal LSB-style script with start/stop/status/restart
//! built on a PID file and a lock file, then registers it with the first
//! registrar tool the host provides.

use std::path::{Path, PathBuf};

use crate::common::string_utils::shell_quote;
use crate::domain::{APP_MODULE, InstallationRequest};
use crate::error::Result;
use crate::exec::{ExecutionAction, Executor};
use crate::platform::{LegacyRegistrar, SystemPaths};
use crate::ui::display;

use super::{ServiceContext, ServiceDescriptor};

/// Fields substituted into the legacy init script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitScript {
    pub service_name: String,
    pub user: String,
    pub install_root: String,
    pub python: String,
    pub env_file: String,
    pub pid_file: String,
    pub log_file: String,
    pub lock_file: String,
}

impl InitScript {
    pub fn from_request(request: &InstallationRequest, paths: &SystemPaths) -> Self {
        let p = &request.paths;
        Self {
            service_name: request.service_name.clone(),
            user: request.user.clone(),
            install_root: p.install_root.display().to_string(),
            python: p.venv_python().display().to_string(),
            env_file: p.env_file.display().to_string(),
            pid_file: p.pid_file.display().to_string(),
            log_file: p.log_file.display().to_string(),
            lock_file: paths
                .lock_dir
                .join(&request.service_name)
                .display()
                .to_string(),
        }
    }

    pub fn render(&self) -> String {
        let Self {
            service_name,
            user,
            install_root,
            python,
            env_file,
            pid_file,
            log_file,
            lock_file,
        } = self;
        let [name, user, install_root, python, env_file, pid_file, log_file, lock_file] = [
            service_name,
            user,
            install_root,
            python,
            env_file,
            pid_file,
            log_file,
            lock_file,
        ]
        .map(|value| shell_quote(value));

        format!(
            r#"#!/bin/sh
### BEGIN INIT INFO
# Provides:          {service_name}
# Required-Start:    $network $remote_fs $syslog
# Required-Stop:     $network $remote_fs $syslog
# Default-Start:     2 3 4 5
# Default-Stop:      0 1 6
# Short-Description: SSH bastion daemon
### END INIT INFO

NAME={name}
USER={user}
HOME_DIR={install_root}
PYTHON={python}
ENV_FILE={env_file}
PIDFILE={pid_file}
LOGFILE={log_file}
LOCKFILE={lock_file}

if [ -f "$ENV_FILE" ]; then
    set -a
    . "$ENV_FILE"
    set +a
fi

is_running() {{
    [ -f "$PIDFILE" ] && kill -0 "$(cat "$PIDFILE")" 2>/dev/null
}}

start() {{
    if is_running; then
        echo "$NAME is already running"
        return 0
    fi
    mkdir -p "$(dirname "$PIDFILE")"
    chown "$USER" "$(dirname "$PIDFILE")"
    echo "Starting $NAME"
    cd "$HOME_DIR" || return 1
    su -s /bin/sh -c "$PYTHON -m {APP_MODULE} start >>$LOGFILE 2>&1 & echo \$! >$PIDFILE" "$USER"
    sleep 1
    if is_running; then
        mkdir -p "$(dirname "$LOCKFILE")" && touch "$LOCKFILE"
        return 0
    fi
    echo "$NAME failed to start"
    return 1
}}

stop() {{
    if ! is_running; then
        echo "$NAME is not running"
        rm -f "$PIDFILE" "$LOCKFILE"
        return 0
    fi
    echo "Stopping $NAME"
    kill "$(cat "$PIDFILE")"
    rm -f "$PIDFILE" "$LOCKFILE"
}}

status() {{
    if is_running; then
        echo "$NAME is running (pid $(cat "$PIDFILE"))"
        return 0
    fi
    echo "$NAME is stopped"
    return 3
}}

case "$1" in
    start) start ;;
    stop) stop ;;
    status) status ;;
    restart) stop; start ;;
    *)
        echo "Usage: $0 {{start|stop|status|restart}}"
        exit 2
        ;;
esac
exit $?
"#
        )
    }
}

/// Legacy init strategy carrying the registrars found on the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysVService {
    registrars: Vec<LegacyRegistrar>,
}

impl SysVService {
    pub fn new(registrars: Vec<LegacyRegistrar>) -> Self {
        Self { registrars }
    }

    fn script_path(ctx: &ServiceContext<'_>) -> PathBuf {
        ctx.paths.init_d_dir.join(&ctx.request.service_name)
    }

    fn register_action(registrar: LegacyRegistrar, service: &str) -> ExecutionAction {
        match registrar {
            LegacyRegistrar::UpdateRcD => ExecutionAction::run(
                "Register init script (update-rc.d)",
                "update-rc.d",
                [service, "defaults"],
            ),
            LegacyRegistrar::Chkconfig => ExecutionAction::run(
                "Register init script (chkconfig)",
                "chkconfig",
                ["--add", service],
            ),
        }
    }

    fn unregister_action(registrar: LegacyRegistrar, service: &str) -> ExecutionAction {
        match registrar {
            LegacyRegistrar::UpdateRcD => ExecutionAction::run(
                "Unregister init script (update-rc.d)",
                "update-rc.d",
                ["-f", service, "remove"],
            ),
            LegacyRegistrar::Chkconfig => ExecutionAction::run(
                "Unregister init script (chkconfig)",
                "chkconfig",
                ["--del", service],
            ),
        }
    }
}

impl ServiceDescriptor for SysVService {
    fn init_id(&self) -> &str {
        "sysv"
    }

    fn install(&self, ctx: &ServiceContext<'_>, exec: &mut Executor<'_>) -> Result<()> {
        let script = InitScript::from_request(ctx.request, ctx.paths);
        exec.execute(ExecutionAction::write_file(
            "Install init script",
            Self::script_path(ctx),
            script.render(),
            0o755,
        ))?;
        Ok(())
    }

    /// Try each registrar in order; the first that succeeds wins
    fn enable(&self, ctx: &ServiceContext<'_>, exec: &mut Executor<'_>) -> Result<()> {
        let service = ctx.request.service_name.as_str();
        for registrar in &self.registrars {
            if exec.execute_best_effort(Self::register_action(*registrar, service)) {
                return Ok(());
            }
        }
        display::warn(&format!(
            "No init script registrar succeeded; link {} into your runlevels manually",
            Self::script_path(ctx).display()
        ));
        Ok(())
    }

    fn is_enabled(&self, ctx: &ServiceContext<'_>) -> bool {
        let etc = ctx.paths.init_d_dir.parent().unwrap_or(Path::new("/"));
        let start_links = format!(
            "ls {}/rc[2345].d/S[0-9][0-9]{} >/dev/null 2>&1",
            etc.display(),
            ctx.request.service_name
        );
        ctx.probe.check("sh", &["-c", start_links.as_str()])
            || (self.registrars.contains(&LegacyRegistrar::Chkconfig)
                && ctx
                    .probe
                    .check("chkconfig", &[ctx.request.service_name.as_str()]))
    }

    fn stop(&self, ctx: &ServiceContext<'_>, exec: &mut Executor<'_>) {
        exec.execute_best_effort(ExecutionAction::run(
            "Stop service",
            Self::script_path(ctx).display().to_string(),
            ["stop"],
        ));
    }

    fn unregister(&self, ctx: &ServiceContext<'_>, exec: &mut Executor<'_>) {
        let service = ctx.request.service_name.as_str();
        for registrar in &self.registrars {
            exec.execute_best_effort(Self::unregister_action(*registrar, service));
        }
        exec.execute_best_effort(ExecutionAction::remove_tree(
            "Remove init script",
            Self::script_path(ctx),
        ));
    }

    fn start_hint(&self, ctx: &ServiceContext<'_>) -> Option<String> {
        Some(format!("{} start", Self::script_path(ctx).display()))
    }
}

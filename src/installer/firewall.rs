//! Opening the daemon port in the host firewall
//!
//! Best-effort: failures warn and the pipeline continues. Rollback leaves
//! the port open.

use crate::domain::InstallationRequest;
use crate::exec::{ExecutionAction, Executor};
use crate::platform::{DetectedEnvironment, Firewall};
use crate::ui::display;

pub fn open_port(env: &DetectedEnvironment, request: &InstallationRequest, exec: &mut Executor<'_>) {
    let port = format!("{}/tcp", request.port);

    match env.firewall {
        Firewall::Ufw => {
            exec.execute_best_effort(ExecutionAction::run(
                format!("Allow port {port} through ufw"),
                "ufw",
                ["allow", port.as_str()],
            ));
        }
        Firewall::Firewalld => {
            let rule = format!("--add-port={port}");
            let added = exec.execute_best_effort(ExecutionAction::run(
                format!("Allow port {port} through firewalld"),
                "firewall-cmd",
                ["--permanent", rule.as_str()],
            ));
            if added {
                exec.execute_best_effort(ExecutionAction::run(
                    "Reload firewalld",
                    "firewall-cmd",
                    ["--reload"],
                ));
            }
        }
        Firewall::None => {
            display::info(&format!(
                "No firewall tooling found; make sure port {port} is reachable"
            ));
        }
    }
}

//! Display and output functions for install operation
//! Handles printing the installation plan and the run summary

use crate::domain::InstallationRequest;
use crate::platform::{DetectedEnvironment, InitSystem, PackageManager};
use crate::ui::display;

use super::orchestrator::InstallSummary;

/// Print what is about to be installed and what was detected
pub fn print_plan(request: &InstallationRequest, env: &DetectedEnvironment) {
    let paths = &request.paths;
    display::step("Installation plan");
    display::field("Host:", &env.os);
    display::field("Init system:", &env.init);
    display::field("Package manager:", env.package_manager);
    display::field("Account:", request.owner());
    display::field("Install root:", paths.install_root.display());
    display::field("Config:", paths.config_dir.display());
    display::field("Logs:", paths.log_dir.display());
    display::field("Data:", paths.data_dir.display());
    display::field("Port:", request.port);

    for warning in plan_warnings(request, env) {
        display::warn(warning);
    }
    if request.flags.dry_run {
        display::info("Dry run: nothing will be changed");
    }
}

/// Detection gaps that matter for the stages this request runs
pub fn plan_warnings(request: &InstallationRequest, env: &DetectedEnvironment) -> Vec<&'static str> {
    let mut warnings = Vec::new();
    if !env.is_ambiguous() {
        return warnings;
    }
    if env.init == InitSystem::Unsupported && !request.flags.skip_service {
        warnings.push("No supported init system detected; the service will not be registered");
    }
    if env.package_manager == PackageManager::Unknown && !request.flags.skip_deps {
        warnings.push("No supported package manager detected; OS packages must be installed manually");
    }
    warnings
}

/// Print the outcome of a completed pipeline
pub fn print_summary(request: &InstallationRequest, summary: &InstallSummary) {
    let count = summary.actions.len();
    if summary.dry_run {
        println!();
        println!("[DRY RUN] Would perform {count} action(s)");
        return;
    }

    display::step("Installation complete");
    display::success(&format!("{count} action(s) performed"));
    display::field("Installed to:", request.paths.install_root.display());
    display::field("Configuration:", request.paths.config_file.display());
    display::field("Environment:", request.paths.env_file.display());
    display::field("Host keys:", request.paths.keys_dir.display());
    display::field("Service:", &request.service_name);

    if let Some(hint) = &summary.start_hint {
        display::info(&format!("Start the daemon with: {hint}"));
    }
    if let Some(report) = &summary.verification {
        if !report.all_passed() {
            display::warn("Review the failed verification checks above before starting");
        }
    }
}

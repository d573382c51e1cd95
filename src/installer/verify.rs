//! Post-install smoke tests
//!
//! Every check is read-only and independent. Failures are reported, never
//! returned as errors.

use crate::domain::{APP_PACKAGE, InstallationRequest};
use crate::service::{ServiceContext, ServiceStrategy};
use crate::ui::display;

/// Outcome of one verification check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub checks: Vec<CheckResult>,
}

impl VerificationReport {
    fn record(&mut self, name: impl Into<String>, passed: bool) {
        let name = name.into();
        display::check(passed, &name);
        self.checks.push(CheckResult { name, passed });
    }

    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failures(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }
}

pub fn verify(strategy: &ServiceStrategy, ctx: &ServiceContext<'_>) -> VerificationReport {
    let request: &InstallationRequest = ctx.request;
    let probe = ctx.probe;
    let mut report = VerificationReport::default();

    let python = request.paths.venv_python().display().to_string();
    let import = format!("import {APP_PACKAGE}");
    report.record(
        format!("{APP_PACKAGE} is importable from the runtime environment"),
        probe.check(&python, &["-c", import.as_str()]),
    );

    if request.flags.skip_service {
        tracing::debug!("service registration skipped; not checking enablement");
    } else {
        let descriptor = strategy.descriptor();
        report.record(
            format!(
                "{} service enabled ({})",
                request.service_name,
                descriptor.init_id()
            ),
            descriptor.is_enabled(ctx),
        );
    }

    let root = request.paths.install_root.display().to_string();
    let readable = probe.check("test", &["-r", root.as_str()]);
    let searchable = probe.check("test", &["-x", root.as_str()]);
    report.record(format!("{root} is readable and searchable"), readable && searchable);

    if !report.all_passed() {
        display::warn(&format!(
            "{} verification check(s) failed; the installation may need attention",
            report.failures()
        ));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BehaviorFlags;
    use crate::platform::{InitSystem, PackageManager};
    use crate::test_fixtures::{FakeHost, Sandbox};

    #[test]
    fn test_all_checks_pass() {
        let sandbox = Sandbox::new();
        let env = sandbox.environment(InitSystem::Systemd, PackageManager::Apt);
        let request = sandbox.request();
        let python = request.paths.venv_python().display().to_string();
        let root = request.paths.install_root.display().to_string();
        let host = FakeHost::new()
            .with_passing_check(&python, &["-c", "import bastion"])
            .with_passing_check("systemctl", &["is-enabled", "--quiet", "bastion"])
            .with_passing_check("test", &["-r", root.as_str()])
            .with_passing_check("test", &["-x", root.as_str()]);

        let strategy = ServiceStrategy::for_environment(&env);
        let ctx = ServiceContext {
            request: &request,
            paths: &env.paths,
            probe: &host,
        };
        let report = verify(&strategy, &ctx);
        assert_eq!(report.checks.len(), 3);
        assert!(report.all_passed());
    }

    #[test]
    fn test_failures_are_reported_not_raised() {
        let sandbox = Sandbox::new();
        let env = sandbox.environment(InitSystem::Unsupported, PackageManager::Unknown);
        let request = sandbox.request();
        let host = FakeHost::new();

        let strategy = ServiceStrategy::for_environment(&env);
        let ctx = ServiceContext {
            request: &request,
            paths: &env.paths,
            probe: &host,
        };
        let report = verify(&strategy, &ctx);
        assert_eq!(report.failures(), 3);
    }

    #[test]
    fn test_skip_service_omits_enablement_check() {
        let sandbox = Sandbox::new();
        let env = sandbox.environment(InitSystem::Systemd, PackageManager::Apt);
        let request = sandbox.request_with(BehaviorFlags {
            skip_service: true,
            ..BehaviorFlags::default()
        });
        let host = FakeHost::new();

        let strategy = ServiceStrategy::for_environment(&env);
        let ctx = ServiceContext {
            request: &request,
            paths: &env.paths,
            probe: &host,
        };
        assert_eq!(verify(&strategy, &ctx).checks.len(), 2);
    }
}

//! Install pipeline orchestration
//!
//! Stages run strictly in order, each through the same executor. Every
//! mutating stage runs under a [`RollbackGuard`]; verification runs after the
//! guard is committed and never fails the run.

use tracing::{debug, info_span};

use crate::config;
use crate::domain::InstallationRequest;
use crate::error::Result;
use crate::exec::{CommandRunner, ExecMode, Executor};
use crate::installer::{self, VerificationReport};
use crate::platform::{DetectedEnvironment, HostProbe, detection};
use crate::service::{self, ServiceContext, ServiceStrategy};
use crate::transaction::RollbackGuard;
use crate::ui::{self, ProgressReporter};

use super::{display, preflight};

/// Ordered mutating stages of an install
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Account,
    Directories,
    Packages,
    Deploy,
    Service,
    Config,
    Firewall,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Account,
        Stage::Directories,
        Stage::Packages,
        Stage::Deploy,
        Stage::Service,
        Stage::Config,
        Stage::Firewall,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Stage::Account => "Creating service account",
            Stage::Directories => "Creating directories",
            Stage::Packages => "Installing OS packages",
            Stage::Deploy => "Deploying application",
            Stage::Service => "Registering service",
            Stage::Config => "Writing configuration",
            Stage::Firewall => "Configuring firewall",
        }
    }
}

/// What a finished pipeline did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSummary {
    /// Journal lines, in execution order
    pub actions: Vec<String>,
    pub dry_run: bool,
    /// `None` for dry runs
    pub verification: Option<VerificationReport>,
    pub start_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Completed(InstallSummary),
    /// The operator declined the confirmation prompt; nothing was changed
    Declined,
}

/// One install run against one host
pub struct InstallOperation<'a> {
    request: &'a InstallationRequest,
    probe: &'a dyn HostProbe,
    runner: &'a dyn CommandRunner,
}

impl<'a> InstallOperation<'a> {
    pub fn new(
        request: &'a InstallationRequest,
        probe: &'a dyn HostProbe,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            request,
            probe,
            runner,
        }
    }

    /// Preflight, detect, confirm, then run the pipeline
    pub fn run<F>(&self, confirm: F) -> Result<InstallOutcome>
    where
        F: FnOnce(&InstallationRequest) -> Result<bool>,
    {
        preflight::check_host(std::env::consts::OS, self.probe, self.request)?;
        let env = detection::detect(self.probe);
        self.run_detected(&env, confirm)
    }

    /// Run against an already detected environment
    pub fn run_detected<F>(&self, env: &DetectedEnvironment, confirm: F) -> Result<InstallOutcome>
    where
        F: FnOnce(&InstallationRequest) -> Result<bool>,
    {
        display::print_plan(self.request, env);

        if preflight::needs_confirmation(self.request) && !confirm(self.request)? {
            return Ok(InstallOutcome::Declined);
        }

        let summary = self.execute(env)?;
        display::print_summary(self.request, &summary);
        Ok(InstallOutcome::Completed(summary))
    }

    /// Run every stage, rolling back if one fails
    pub fn execute(&self, env: &DetectedEnvironment) -> Result<InstallSummary> {
        let request = self.request;
        let flags = request.flags;
        let mode = if flags.dry_run {
            ExecMode::DryRun
        } else {
            ExecMode::Live
        };

        let mut exec = Executor::new(mode, flags.verbose, self.runner);
        let strategy = ServiceStrategy::for_environment(env);
        let ctx = ServiceContext {
            request,
            paths: &env.paths,
            probe: self.probe,
        };
        let mut progress = ui::reporter_for(flags.dry_run || flags.verbose, Stage::ALL.len() as u64);

        let mut guard = RollbackGuard::new(&mut exec, ctx, &strategy);
        debug!(rollback_armed = guard.is_armed(), init = strategy.descriptor().init_id(), "starting pipeline");
        for stage in Stage::ALL {
            progress.start_stage(stage.title());
            let _span = info_span!("stage", ?stage).entered();
            ui::display::step(stage.title());

            if let Err(e) = self.run_stage(stage, env, &strategy, &ctx, guard.executor()) {
                debug!(?stage, error = %e, rollback = e.triggers_rollback(), "stage failed");
                progress.abandon();
                if e.triggers_rollback() {
                    drop(guard);
                } else {
                    guard.commit();
                }
                return Err(e);
            }
            progress.finish_stage();
        }
        guard.commit();
        progress.finish();

        let actions = exec.journal().iter().map(ToString::to_string).collect();

        let verification = if flags.dry_run {
            None
        } else {
            ui::display::step("Verifying installation");
            Some(installer::verify(&strategy, &ctx))
        };

        let start_hint = if flags.skip_service {
            Some(request.start_command())
        } else {
            strategy.descriptor().start_hint(&ctx)
        };

        Ok(InstallSummary {
            actions,
            dry_run: flags.dry_run,
            verification,
            start_hint,
        })
    }

    fn run_stage(
        &self,
        stage: Stage,
        env: &DetectedEnvironment,
        strategy: &ServiceStrategy,
        ctx: &ServiceContext<'_>,
        exec: &mut Executor<'_>,
    ) -> Result<()> {
        let request = self.request;
        let probe = self.probe;
        match stage {
            Stage::Account => installer::ensure_account(request, probe, exec),
            Stage::Directories => installer::ensure_directories(request, probe, exec),
            Stage::Packages => installer::install_os_packages(env, request, exec),
            Stage::Deploy => installer::deploy(request, probe, exec),
            Stage::Service => service::install_service(strategy, ctx, exec),
            Stage::Config => {
                config::write_config(request, probe, exec)?;
                config::write_env(request, probe, exec)
            }
            Stage::Firewall => {
                installer::open_port(env, request, exec);
                Ok(())
            }
        }
    }
}

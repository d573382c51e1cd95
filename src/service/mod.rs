//! Service registration strategies
//!
//! One [`ServiceDescriptor`] implementation per init-system kind. The active
//! strategy is chosen once from the detected environment by an exhaustive
//! match in [`ServiceStrategy::for_environment`], so a new init system is a
//! compile-checked addition.
//!
//! ## Strategies
//!
//! - **systemd**: unit template rewritten field by field, daemon-reload, enable
//! - **openrc**: init script with lifecycle checks plus a conf.d file, rc-update
//! - **sysv**: synthesized init script, registered with update-rc.d or chkconfig
//! - **unsupported**: warns and does nothing

pub mod openrc;
pub mod systemd;
pub mod sysv;
pub mod unit_file;

use crate::domain::InstallationRequest;
use crate::error::{InstallerError, Result};
use crate::error::service::registration_failed;
use crate::exec::Executor;
use crate::platform::{DetectedEnvironment, HostProbe, InitSystem, SystemPaths};
use crate::ui::display;

pub use openrc::OpenRcService;
pub use systemd::SystemdService;
pub use sysv::SysVService;

/// Everything a strategy reads while registering the service
#[derive(Clone, Copy)]
pub struct ServiceContext<'a> {
    pub request: &'a InstallationRequest,
    pub paths: &'a SystemPaths,
    pub probe: &'a dyn HostProbe,
}

/// Init-system specific registration of the managed daemon
///
/// `install` and `enable` are invoked by the installer. `stop` and
/// `unregister` are best-effort and used by rollback; `is_enabled` backs the
/// post-install verifier.
pub trait ServiceDescriptor {
    /// Short identifier used in log lines
    fn init_id(&self) -> &str;

    /// Write the init-system artifacts
    fn install(&self, ctx: &ServiceContext<'_>, exec: &mut Executor<'_>) -> Result<()>;

    /// Mark the service to start at boot (never starts it)
    fn enable(&self, ctx: &ServiceContext<'_>, exec: &mut Executor<'_>) -> Result<()>;

    /// Whether the init system reports the service as enabled
    fn is_enabled(&self, ctx: &ServiceContext<'_>) -> bool;

    /// Stop the running service, ignoring failure
    fn stop(&self, ctx: &ServiceContext<'_>, exec: &mut Executor<'_>);

    /// Remove every artifact `install` and `enable` produced, ignoring failure
    fn unregister(&self, ctx: &ServiceContext<'_>, exec: &mut Executor<'_>);

    /// Command an operator runs to start the service
    fn start_hint(&self, ctx: &ServiceContext<'_>) -> Option<String>;
}

/// Fallback for hosts without a recognised init system
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedService;

impl ServiceDescriptor for UnsupportedService {
    fn init_id(&self) -> &str {
        "unsupported"
    }

    fn install(&self, ctx: &ServiceContext<'_>, _exec: &mut Executor<'_>) -> Result<()> {
        display::warn("No supported init system detected; skipping service registration");
        display::info(&format!(
            "Start the daemon manually: {}",
            ctx.request.start_command()
        ));
        Ok(())
    }

    fn enable(&self, _ctx: &ServiceContext<'_>, _exec: &mut Executor<'_>) -> Result<()> {
        Ok(())
    }

    fn is_enabled(&self, _ctx: &ServiceContext<'_>) -> bool {
        false
    }

    fn stop(&self, _ctx: &ServiceContext<'_>, _exec: &mut Executor<'_>) {}

    fn unregister(&self, _ctx: &ServiceContext<'_>, _exec: &mut Executor<'_>) {}

    fn start_hint(&self, ctx: &ServiceContext<'_>) -> Option<String> {
        Some(ctx.request.start_command())
    }
}

/// The single active strategy for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStrategy {
    Systemd(SystemdService),
    OpenRc(OpenRcService),
    SysV(SysVService),
    Unsupported(UnsupportedService),
}

impl ServiceStrategy {
    pub fn for_environment(env: &DetectedEnvironment) -> Self {
        match &env.init {
            InitSystem::Systemd => ServiceStrategy::Systemd(SystemdService),
            InitSystem::OpenRc => ServiceStrategy::OpenRc(OpenRcService),
            InitSystem::SysV { registrars } => {
                ServiceStrategy::SysV(SysVService::new(registrars.clone()))
            }
            InitSystem::Unsupported => ServiceStrategy::Unsupported(UnsupportedService),
        }
    }

    pub fn descriptor(&self) -> &dyn ServiceDescriptor {
        match self {
            ServiceStrategy::Systemd(s) => s,
            ServiceStrategy::OpenRc(s) => s,
            ServiceStrategy::SysV(s) => s,
            ServiceStrategy::Unsupported(s) => s,
        }
    }
}

/// Register and enable the daemon with the active strategy
///
/// Command failures are reported as registration errors; a missing template
/// keeps its own error.
pub fn install_service(
    strategy: &ServiceStrategy,
    ctx: &ServiceContext<'_>,
    exec: &mut Executor<'_>,
) -> Result<()> {
    let descriptor = strategy.descriptor();
    if ctx.request.flags.skip_service {
        display::info("Skipping service registration (--skip-service)");
        return Ok(());
    }

    tracing::debug!(init = descriptor.init_id(), "registering service");
    descriptor
        .install(ctx, exec)
        .and_then(|()| descriptor.enable(ctx, exec))
        .map_err(|e| match e {
            InstallerError::CommandFailed { .. } | InstallerError::FileWriteFailed { .. } => {
                registration_failed(e)
            }
            other => other,
        })
}

/// Stop and unregister the daemon, every sub-step independent of the others
pub fn remove_service(strategy: &ServiceStrategy, ctx: &ServiceContext<'_>, exec: &mut Executor<'_>) {
    let descriptor = strategy.descriptor();
    descriptor.stop(ctx, exec);
    descriptor.unregister(ctx, exec);
}

//! Tests for rollback support

#![allow(clippy::unwrap_used)]

use std::fs;

use super::*;
use crate::domain::{BehaviorFlags, InstallationRequest};
use crate::exec::ExecMode;
use crate::platform::{DetectedEnvironment, InitSystem, PackageManager};
use crate::test_fixtures::{FakeHost, RecordingRunner, Sandbox};

struct Installed {
    sandbox: Sandbox,
    env: DetectedEnvironment,
    request: InstallationRequest,
}

/// A sandbox with a registered systemd unit and an install root on disk
fn installed(flags: BehaviorFlags) -> Installed {
    let sandbox = Sandbox::new();
    let env = sandbox.environment(InitSystem::Systemd, PackageManager::Apt);
    let request = sandbox.request_with(flags);
    fs::create_dir_all(request.paths.install_root.join("bastion")).unwrap();
    fs::create_dir_all(&request.paths.config_dir).unwrap();
    fs::write(env.paths.systemd_unit_dir.join("bastion.service"), "[Service]\n").unwrap();
    Installed {
        sandbox,
        env,
        request,
    }
}

fn force() -> BehaviorFlags {
    BehaviorFlags {
        force: true,
        ..BehaviorFlags::default()
    }
}

#[test]
fn test_drop_without_commit_unregisters_service() {
    let state = installed(BehaviorFlags::default());
    let host = FakeHost::new();
    let runner = RecordingRunner::new();
    let mut exec = Executor::new(ExecMode::Live, false, &runner);
    let strategy = ServiceStrategy::for_environment(&state.env);
    let ctx = ServiceContext {
        request: &state.request,
        paths: &state.env.paths,
        probe: &host,
    };

    {
        let guard = RollbackGuard::new(&mut exec, ctx, &strategy);
        assert!(guard.is_armed());
    }

    assert!(!state.env.paths.systemd_unit_dir.join("bastion.service").exists());
    assert!(runner.ran("systemctl disable bastion"));
    // without force the install root survives
    assert!(state.request.paths.install_root.exists());
    assert!(state.sandbox.root.exists());
}

#[test]
fn test_commit_disarms() {
    let state = installed(force());
    let host = FakeHost::new();
    let runner = RecordingRunner::new();
    let mut exec = Executor::new(ExecMode::Live, false, &runner);
    let strategy = ServiceStrategy::for_environment(&state.env);
    let ctx = ServiceContext {
        request: &state.request,
        paths: &state.env.paths,
        probe: &host,
    };

    let guard = RollbackGuard::new(&mut exec, ctx, &strategy);
    guard.commit();

    assert!(state.env.paths.systemd_unit_dir.join("bastion.service").exists());
    assert!(state.request.paths.install_root.exists());
    assert!(runner.commands().is_empty());
}

#[test]
fn test_force_removes_install_root_and_config() {
    let state = installed(force());
    let host = FakeHost::new();
    let runner = RecordingRunner::new().failing_on("systemctl");
    let mut exec = Executor::new(ExecMode::Live, false, &runner);
    let strategy = ServiceStrategy::for_environment(&state.env);
    let ctx = ServiceContext {
        request: &state.request,
        paths: &state.env.paths,
        probe: &host,
    };

    drop(RollbackGuard::new(&mut exec, ctx, &strategy));

    assert!(!state.request.paths.install_root.exists());
    assert!(!state.request.paths.config_dir.exists());
    assert!(!state.env.paths.systemd_unit_dir.join("bastion.service").exists());
}

#[test]
fn test_dry_run_guard_is_never_armed() {
    let state = installed(force());
    let host = FakeHost::new();
    let runner = RecordingRunner::new();
    let mut exec = Executor::new(ExecMode::DryRun, false, &runner);
    let strategy = ServiceStrategy::for_environment(&state.env);
    let ctx = ServiceContext {
        request: &state.request,
        paths: &state.env.paths,
        probe: &host,
    };

    let guard = RollbackGuard::new(&mut exec, ctx, &strategy);
    assert!(!guard.is_armed());
    drop(guard);

    assert!(exec.journal().is_empty());
    assert!(state.request.paths.install_root.exists());
}

#[test]
fn test_skip_service_leaves_init_artifacts() {
    let state = installed(BehaviorFlags {
        skip_service: true,
        ..BehaviorFlags::default()
    });
    let host = FakeHost::new();
    let runner = RecordingRunner::new();
    let mut exec = Executor::new(ExecMode::Live, false, &runner);
    let strategy = ServiceStrategy::for_environment(&state.env);
    let ctx = ServiceContext {
        request: &state.request,
        paths: &state.env.paths,
        probe: &host,
    };

    drop(RollbackGuard::new(&mut exec, ctx, &strategy));

    assert!(state.env.paths.systemd_unit_dir.join("bastion.service").exists());
    assert!(runner.commands().is_empty());
}

#[test]
fn test_rollback_runs_once() {
    let state = installed(BehaviorFlags::default());
    let host = FakeHost::new();
    let runner = RecordingRunner::new();
    let mut exec = Executor::new(ExecMode::Live, false, &runner);
    let strategy = ServiceStrategy::for_environment(&state.env);
    let ctx = ServiceContext {
        request: &state.request,
        paths: &state.env.paths,
        probe: &host,
    };

    {
        let mut guard = RollbackGuard::new(&mut exec, ctx, &strategy);
        guard.rollback();
        assert!(!guard.is_armed());
    }

    let stops = runner
        .commands()
        .iter()
        .filter(|c| c.as_str() == "systemctl stop bastion")
        .count();
    assert_eq!(stops, 1);
}

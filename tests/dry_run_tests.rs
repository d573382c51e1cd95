//! Dry-run tests against the real host
//!
//! Detection runs for real, but every action is only printed.

mod common;

use predicates::prelude::*;

#[test]
fn test_dry_run_does_not_create_files() {
    let checkout = common::TestCheckout::new();

    checkout
        .dry_run_cmd()
        .args(["--skip-deps"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN] Would execute:"))
        .stdout(predicate::str::contains("Installation plan"))
        .stdout(predicate::str::contains("action(s)"));

    assert!(!checkout.target.exists());
}

#[test]
fn test_dry_run_plans_payload_copy_and_keys() {
    let checkout = common::TestCheckout::new();
    let payload = checkout.source.join("bastion").display().to_string();

    checkout
        .dry_run_cmd()
        .args(["--skip-deps", "--skip-service"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("cp -R {payload}/.")))
        .stdout(predicate::str::contains("ssh-keygen"))
        .stdout(predicate::str::contains("config.yaml"));

    assert!(!checkout.target.exists());
}

#[test]
fn test_dry_run_never_prompts() {
    let checkout = common::TestCheckout::new();

    checkout
        .dry_run_cmd()
        .args(["--skip-deps", "--skip-service"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Proceed with installation?").not());
}

#[test]
fn test_dry_run_with_missing_payload_fails() {
    let checkout = common::TestCheckout::empty();

    checkout
        .dry_run_cmd()
        .args(["--skip-deps", "--skip-service"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Application payload not found"))
        .stderr(predicate::str::contains("help:"))
        .stderr(predicate::str::contains("point --source at it"));

    assert!(!checkout.target.exists());
}

#[test]
fn test_verbose_dry_run_echoes_actions() {
    let checkout = common::TestCheckout::new();

    checkout
        .dry_run_cmd()
        .args(["--skip-deps", "--skip-service", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("→"));
}

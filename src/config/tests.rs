//! Tests for generated configuration

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;

use super::*;
use crate::common::fs::mode_of;
use crate::domain::BehaviorFlags;
use crate::exec::ExecMode;
use crate::test_fixtures::{FakeHost, RecordingRunner, Sandbox};

fn env_map(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter(|l| !l.starts_with('#'))
        .filter_map(|l| l.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_yaml_and_env_agree() {
    let sandbox = Sandbox::new();
    let mut request = sandbox.request();
    request.port = 2200;

    let config = GeneratedConfig::from_request(&request);
    let parsed: GeneratedConfig = serde_yaml::from_str(&config.to_yaml().unwrap()).unwrap();
    let env = env_map(&config.to_env(&request.paths.config_file));

    assert_eq!(parsed, config);
    assert_eq!(env["BASTION_PORT"], parsed.server.port.to_string());
    assert_eq!(env["BASTION_BIND"], parsed.server.bind);
    assert_eq!(env["LOG_FILE"], parsed.logging.file);
    assert_eq!(env["DB_URL"], parsed.database.url);
    assert_eq!(env["HOST_KEY_FILE"], parsed.ssh.host_key);
    assert_eq!(
        env["BASTION_CONFIG"],
        request.paths.config_file.display().to_string()
    );
}

#[test]
fn test_document_content() {
    let sandbox = Sandbox::new();
    let request = sandbox.request();
    let config = GeneratedConfig::from_request(&request);

    assert_eq!(config.server.port, 2222);
    assert_eq!(config.ssh.host_keys.len(), 3);
    assert!(config.ssh.host_key.ends_with("keys/ssh_host_rsa_key"));
    assert_eq!(
        config.database.url,
        format!("sqlite:///{}", request.paths.database_file.display())
    );
    assert_eq!(config.logging.max_bytes, 10 * 1024 * 1024);
    assert_eq!(config.logging.backup_count, 5);
    assert_eq!(config.security.restricted_networks, vec!["10.10.254.0/24"]);
    assert_eq!(config.proxy.buffer_size, 4096);
}

#[test]
fn test_files_written_with_restricted_mode() {
    let sandbox = Sandbox::new();
    let request = sandbox.request();
    std::fs::create_dir_all(&request.paths.config_dir).unwrap();
    let host = FakeHost::new().backed_by_fs();
    let runner = RecordingRunner::new();
    let mut exec = Executor::new(ExecMode::Live, false, &runner);

    write_config(&request, &host, &mut exec).unwrap();
    write_env(&request, &host, &mut exec).unwrap();

    assert_eq!(mode_of(&request.paths.config_file).unwrap(), 0o640);
    assert_eq!(mode_of(&request.paths.env_file).unwrap(), 0o640);
    let chowns = runner
        .commands()
        .iter()
        .filter(|c| c.starts_with("chown bastion:bastion"))
        .count();
    assert_eq!(chowns, 2);
}

#[test]
fn test_existing_files_preserved_without_force() {
    let sandbox = Sandbox::new();
    let request = sandbox.request();
    std::fs::create_dir_all(&request.paths.config_dir).unwrap();
    std::fs::write(&request.paths.config_file, "hand: edited\n").unwrap();
    let host = FakeHost::new().backed_by_fs();
    let runner = RecordingRunner::new();
    let mut exec = Executor::new(ExecMode::Live, false, &runner);

    write_config(&request, &host, &mut exec).unwrap();

    assert_eq!(
        std::fs::read_to_string(&request.paths.config_file).unwrap(),
        "hand: edited\n"
    );
    assert!(exec.journal().is_empty());
}

#[test]
fn test_force_overwrites() {
    let sandbox = Sandbox::new();
    let request = sandbox.request_with(BehaviorFlags {
        force: true,
        ..BehaviorFlags::default()
    });
    std::fs::create_dir_all(&request.paths.config_dir).unwrap();
    std::fs::write(&request.paths.env_file, "OLD=1\n").unwrap();
    let host = FakeHost::new().backed_by_fs();
    let runner = RecordingRunner::new();
    let mut exec = Executor::new(ExecMode::Live, false, &runner);

    write_env(&request, &host, &mut exec).unwrap();

    let content = std::fs::read_to_string(&request.paths.env_file).unwrap();
    assert!(content.contains("BASTION_PORT=2222"));
    assert!(!content.contains("OLD=1"));
}

//! Host identity keys
//!
//! Three key pairs are generated with `ssh-keygen` under `<root>/keys`. The
//! RSA key is the one the daemon loads as its primary host key.

use std::path::PathBuf;

use crate::domain::InstallationRequest;
use crate::error::Result;
use crate::exec::{ExecutionAction, Executor};
use crate::platform::HostProbe;
use crate::ui::display;

use super::survives_provisioning;

/// One host key pair to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostKeySpec {
    pub algorithm: &'static str,
    pub file_name: &'static str,
    pub bits: Option<u32>,
}

pub const HOST_KEYS: [HostKeySpec; 3] = [
    HostKeySpec {
        algorithm: "ed25519",
        file_name: "ssh_host_ed25519_key",
        bits: None,
    },
    HostKeySpec {
        algorithm: "ecdsa",
        file_name: "ssh_host_ecdsa_key",
        bits: Some(521),
    },
    HostKeySpec {
        algorithm: "rsa",
        file_name: "ssh_host_rsa_key",
        bits: Some(4096),
    },
];

/// File name of the key the daemon loads
pub const PRIMARY_HOST_KEY: &str = "ssh_host_rsa_key";

impl HostKeySpec {
    pub fn private_path(&self, request: &InstallationRequest) -> PathBuf {
        request.paths.keys_dir.join(self.file_name)
    }

    pub fn public_path(&self, request: &InstallationRequest) -> PathBuf {
        request
            .paths
            .keys_dir
            .join(format!("{}.pub", self.file_name))
    }

    fn keygen_args(&self, private: &std::path::Path) -> Vec<String> {
        let mut args = vec!["-q".to_string(), "-t".to_string(), self.algorithm.to_string()];
        if let Some(bits) = self.bits {
            args.push("-b".to_string());
            args.push(bits.to_string());
        }
        args.extend([
            "-N".to_string(),
            String::new(),
            "-C".to_string(),
            format!("bastion-{}", self.algorithm),
            "-f".to_string(),
            private.display().to_string(),
        ]);
        args
    }
}

/// Generate missing host keys, or all of them under force
///
/// Under force the install root has just been recreated empty, so every key
/// is generated into a fresh directory. Private keys end 0600 and public keys
/// 0644; the whole key directory is then handed to the service account.
pub fn generate_host_keys(
    request: &InstallationRequest,
    probe: &dyn HostProbe,
    exec: &mut Executor<'_>,
) -> Result<()> {
    let keys_dir = &request.paths.keys_dir;
    if request.flags.force || !probe.is_dir(keys_dir) {
        exec.execute(ExecutionAction::create_dir(
            "Create host key directory",
            keys_dir,
            0o700,
        ))?;
    }

    for spec in HOST_KEYS {
        let private = spec.private_path(request);
        let public = spec.public_path(request);

        if survives_provisioning(request, probe, &private) {
            display::info(&format!("Host key {} already present", spec.file_name));
            continue;
        }

        exec.execute(ExecutionAction::run(
            format!("Generate {} host key", spec.algorithm),
            "ssh-keygen",
            spec.keygen_args(&private),
        ))?;
        exec.execute(ExecutionAction::set_mode(
            format!("Restrict {} private key", spec.algorithm),
            &private,
            0o600,
        ))?;
        exec.execute(ExecutionAction::set_mode(
            format!("Publish {} public key", spec.algorithm),
            &public,
            0o644,
        ))?;
    }

    exec.execute(ExecutionAction::chown(
        "Hand host keys to service account",
        &request.owner(),
        keys_dir,
        true,
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BehaviorFlags;
    use crate::exec::{ExecMode, render_command};
    use crate::test_fixtures::{FakeHost, RecordingRunner, Sandbox};

    #[test]
    fn test_keygen_command_line() {
        let rsa = HOST_KEYS[2];
        let args = rsa.keygen_args(std::path::Path::new("/k/ssh_host_rsa_key"));
        assert_eq!(
            render_command("ssh-keygen", &args),
            "ssh-keygen -q -t rsa -b 4096 -N '' -C bastion-rsa -f /k/ssh_host_rsa_key"
        );

        let ed25519 = HOST_KEYS[0];
        let args = ed25519.keygen_args(std::path::Path::new("/k/ssh_host_ed25519_key"));
        assert!(!args.contains(&"-b".to_string()));
    }

    #[test]
    fn test_primary_key_is_generated() {
        assert!(HOST_KEYS.iter().any(|k| k.file_name == PRIMARY_HOST_KEY));
    }

    #[test]
    fn test_dry_run_plans_every_key() {
        let sandbox = Sandbox::new();
        let request = sandbox.request_with(BehaviorFlags {
            dry_run: true,
            ..BehaviorFlags::default()
        });
        let runner = RecordingRunner::new();
        let mut exec = Executor::new(ExecMode::DryRun, false, &runner);

        generate_host_keys(&request, &FakeHost::new(), &mut exec).unwrap();

        let keygens = exec
            .journal()
            .iter()
            .filter(|a| a.program() == Some("ssh-keygen"))
            .count();
        assert_eq!(keygens, HOST_KEYS.len());
        assert!(runner.commands().is_empty());
        assert!(!request.paths.keys_dir.exists());
    }
}

//! External process execution
//!
//! [`CommandRunner`] is the only place the installer spawns processes that
//! may change host state. The executor decides whether a command runs at all;
//! the runner only runs it.

use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{InstallerError, Result};

/// Spawns mutating commands on behalf of the executor
pub trait CommandRunner {
    /// Run `program` with `args` to completion, failing on non-zero exit
    fn run(&self, program: &str, args: &[String]) -> Result<()>;
}

/// Runner backed by real processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner {
    /// Let child output through to the terminal instead of capturing it
    stream_output: bool,
}

impl SystemRunner {
    pub fn new(stream_output: bool) -> Self {
        Self { stream_output }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<()> {
        let command_line = super::render_command(program, args);
        debug!(command = %command_line, "spawning");

        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null());

        if self.stream_output {
            let status = cmd.status().map_err(|e| spawn_failed(&command_line, &e))?;
            if status.success() {
                return Ok(());
            }
            return Err(InstallerError::CommandFailed {
                command: command_line,
                reason: status.to_string(),
            });
        }

        let output = cmd.output().map_err(|e| spawn_failed(&command_line, &e))?;
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .map(str::trim)
            .unwrap_or_default();
        let reason = if detail.is_empty() {
            output.status.to_string()
        } else {
            format!("{}: {detail}", output.status)
        };
        Err(InstallerError::CommandFailed {
            command: command_line,
            reason,
        })
    }
}

fn spawn_failed(command_line: &str, err: &std::io::Error) -> InstallerError {
    InstallerError::CommandFailed {
        command: command_line.to_string(),
        reason: format!("failed to start: {err}. Is it installed?"),
    }
}

//! Execution engine
//!
//! Every mutating operation in the installer is an [`ExecutionAction`] handed
//! to [`Executor::execute`]. In dry-run mode the executor prints the action's
//! rendered line and returns [`Outcome::Simulated`] without touching the host,
//! so what dry-run prints is exactly what a live run performs.
//!
//! ## Usage
//!
//! ```ignore
//! let mut exec = Executor::new(ExecMode::Live, false, &runner);
//! exec.execute(ExecutionAction::create_dir("Create log directory", "/var/log/bastion", 0o750))?;
//! ```

pub mod runner;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::common::fs::{self as cfs, CopyOptions};
use crate::common::string_utils::{octal_mode, shell_join};
use crate::error::fs::{io_error, write_failed};
use crate::error::Result;
use crate::ui::display;

pub use runner::{CommandRunner, SystemRunner};

/// Whether actions are performed or only described
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    Live,
    DryRun,
}

/// What executing an action did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action ran against the host
    Applied,
    /// Dry-run: the action was printed, not performed
    Simulated,
}

/// The concrete mutation an action performs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    Run {
        program: String,
        args: Vec<String>,
    },
    CreateDir {
        path: PathBuf,
        mode: u32,
    },
    RemoveTree {
        path: PathBuf,
    },
    WriteFile {
        path: PathBuf,
        contents: String,
        mode: u32,
    },
    CopyTree {
        from: PathBuf,
        to: PathBuf,
        options: CopyOptions,
    },
    CopyFile {
        from: PathBuf,
        to: PathBuf,
    },
    SetMode {
        path: PathBuf,
        mode: u32,
    },
}

/// One mutating operation plus a human-readable description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionAction {
    pub description: String,
    pub kind: ActionKind,
}

impl ExecutionAction {
    pub fn run<I, S>(description: impl Into<String>, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            description: description.into(),
            kind: ActionKind::Run {
                program: program.into(),
                args: args.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn create_dir(description: impl Into<String>, path: impl Into<PathBuf>, mode: u32) -> Self {
        Self {
            description: description.into(),
            kind: ActionKind::CreateDir {
                path: path.into(),
                mode,
            },
        }
    }

    pub fn remove_tree(description: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            description: description.into(),
            kind: ActionKind::RemoveTree { path: path.into() },
        }
    }

    pub fn write_file(
        description: impl Into<String>,
        path: impl Into<PathBuf>,
        contents: impl Into<String>,
        mode: u32,
    ) -> Self {
        Self {
            description: description.into(),
            kind: ActionKind::WriteFile {
                path: path.into(),
                contents: contents.into(),
                mode,
            },
        }
    }

    pub fn copy_tree(
        description: impl Into<String>,
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
        options: CopyOptions,
    ) -> Self {
        Self {
            description: description.into(),
            kind: ActionKind::CopyTree {
                from: from.into(),
                to: to.into(),
                options,
            },
        }
    }

    pub fn copy_file(
        description: impl Into<String>,
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
    ) -> Self {
        Self {
            description: description.into(),
            kind: ActionKind::CopyFile {
                from: from.into(),
                to: to.into(),
            },
        }
    }

    pub fn set_mode(description: impl Into<String>, path: impl Into<PathBuf>, mode: u32) -> Self {
        Self {
            description: description.into(),
            kind: ActionKind::SetMode {
                path: path.into(),
                mode,
            },
        }
    }

    /// `chown` of a path, recursive when requested
    pub fn chown(description: impl Into<String>, owner: &str, path: &Path, recursive: bool) -> Self {
        let mut args = Vec::new();
        if recursive {
            args.push("-R".to_string());
        }
        args.push(owner.to_string());
        args.push(path.display().to_string());
        Self::run(description, "chown", args)
    }

    /// Program name for `Run` actions
    pub fn program(&self) -> Option<&str> {
        match &self.kind {
            ActionKind::Run { program, .. } => Some(program),
            _ => None,
        }
    }
}

/// Render a command the way it is echoed to the user
pub fn render_command(program: &str, args: &[String]) -> String {
    shell_join(std::iter::once(program).chain(args.iter().map(String::as_str)))
}

impl fmt::Display for ExecutionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ActionKind::Run { program, args } => write!(f, "{}", render_command(program, args)),
            ActionKind::CreateDir { path, mode } => {
                write!(f, "install -d -m {} {}", octal_mode(*mode), path.display())
            }
            ActionKind::RemoveTree { path } => write!(f, "rm -rf {}", path.display()),
            ActionKind::WriteFile {
                path,
                contents,
                mode,
            } => write!(
                f,
                "write {} (mode {}, {} bytes)",
                path.display(),
                octal_mode(*mode),
                contents.len()
            ),
            ActionKind::CopyTree { from, to, options } => {
                write!(f, "cp -R {}/. {}", from.display(), to.display())?;
                if !options.exclude.is_empty() {
                    write!(f, " (excluding {})", options.exclude.join(", "))?;
                }
                Ok(())
            }
            ActionKind::CopyFile { from, to } => {
                write!(f, "cp {} {}", from.display(), to.display())
            }
            ActionKind::SetMode { path, mode } => {
                write!(f, "chmod {} {}", octal_mode(*mode), path.display())
            }
        }
    }
}

/// Routes every mutation through one place
pub struct Executor<'a> {
    mode: ExecMode,
    verbose: bool,
    runner: &'a dyn CommandRunner,
    journal: Vec<ExecutionAction>,
}

impl<'a> Executor<'a> {
    pub fn new(mode: ExecMode, verbose: bool, runner: &'a dyn CommandRunner) -> Self {
        Self {
            mode,
            verbose,
            runner,
            journal: Vec::new(),
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.mode == ExecMode::DryRun
    }

    /// Actions performed (or simulated) so far, in order
    pub fn journal(&self) -> &[ExecutionAction] {
        &self.journal
    }

    /// Perform `action`, or describe it in dry-run mode
    pub fn execute(&mut self, action: ExecutionAction) -> Result<Outcome> {
        let line = action.to_string();
        debug!(description = %action.description, action = %line, mode = ?self.mode, "execute");

        if self.verbose {
            display::verbose(&line);
        }

        let outcome = match self.mode {
            ExecMode::DryRun => {
                display::dry_run(&line);
                Outcome::Simulated
            }
            ExecMode::Live => {
                self.apply(&action)?;
                Outcome::Applied
            }
        };

        self.journal.push(action);
        Ok(outcome)
    }

    /// Execute, downgrading failure to a warning
    ///
    /// Used where one failing sub-step must not block the ones after it.
    pub fn execute_best_effort(&mut self, action: ExecutionAction) -> bool {
        let description = action.description.clone();
        match self.execute(action) {
            Ok(_) => true,
            Err(e) => {
                display::warn(&format!("{description}: {e}"));
                false
            }
        }
    }

    fn apply(&self, action: &ExecutionAction) -> Result<()> {
        let io_context = |path: &Path| {
            let path = path.to_path_buf();
            move |e: std::io::Error| io_error(&path, e)
        };

        match &action.kind {
            ActionKind::Run { program, args } => self.runner.run(program, args),
            ActionKind::CreateDir { path, mode } => {
                std::fs::create_dir_all(path).map_err(io_context(path))?;
                cfs::set_mode(path, *mode).map_err(io_context(path))
            }
            ActionKind::RemoveTree { path } => cfs::remove_path(path).map_err(io_context(path)),
            ActionKind::WriteFile {
                path,
                contents,
                mode,
            } => cfs::write_atomic(path, contents.as_bytes(), *mode)
                .map_err(|e| write_failed(path.display().to_string(), e)),
            ActionKind::CopyTree { from, to, options } => {
                cfs::copy_dir_recursive(from, to, options).map_err(io_context(from))
            }
            ActionKind::CopyFile { from, to } => std::fs::copy(from, to)
                .map(|_| ())
                .map_err(io_context(from)),
            ActionKind::SetMode { path, mode } => {
                cfs::set_mode(path, *mode).map_err(io_context(path))
            }
        }
    }
}

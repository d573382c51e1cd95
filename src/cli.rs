//! CLI definitions using clap derive API

use clap::Parser;
use clap::builder::{Styles, styling::AnsiColor};
use std::path::PathBuf;

/// bastion-installer - provision and register the bastion SSH daemon
///
/// Prepares the service account, directories, dependencies, host keys and
/// configuration, then registers the daemon with the host's init system.
#[derive(Parser, Debug)]
#[command(
    name = "bastion-installer",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install the bastion SSH daemon as a system service",
    long_about = "Installs the bastion SSH daemon: creates the service account and directory \
                  tree, installs OS packages and a Python virtual environment, generates host \
                  keys and configuration, and registers the daemon with systemd, OpenRC or a \
                  SysV init script. Safe to re-run; a failed run rolls back service registration.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  sudo bastion-installer\n    \
                  sudo bastion-installer --user ssh-proxy --directory /srv/bastion\n    \
                  bastion-installer --dry-run --verbose\n    \
                  sudo bastion-installer --force --yes\n    \
                  sudo bastion-installer --skip-deps --skip-service"
)]
pub struct Cli {
    /// Service account that runs the daemon
    #[arg(long, value_name = "NAME", default_value = "bastion")]
    pub user: String,

    /// Group owning the installation
    #[arg(long, value_name = "NAME", default_value = "bastion")]
    pub group: String,

    /// Installation root directory
    #[arg(long, value_name = "DIR", default_value = "/opt/bastion")]
    pub directory: PathBuf,

    /// Source tree holding the bastion package (defaults to current directory)
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Python version to prefer when locating the interpreter (e.g. 3.11)
    #[arg(long, value_name = "VERSION", default_value = "3")]
    pub runtime_version: String,

    /// Port the daemon listens on
    #[arg(long, value_name = "PORT", default_value_t = 2222)]
    pub port: u16,

    /// Skip installing OS packages
    #[arg(long)]
    pub skip_deps: bool,

    /// Skip registering the init-system service
    #[arg(long)]
    pub skip_service: bool,

    /// Recreate directories, keys and configuration even if they exist
    #[arg(long)]
    pub force: bool,

    /// Print what would be done without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print every action before it runs
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

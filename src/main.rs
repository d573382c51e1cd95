//! bastion-installer - installer for the bastion SSH daemon
//!
//! Provisions the service account and directory layout, deploys the
//! application into a private runtime environment, generates host keys and
//! configuration, and registers the daemon with the host's init system.

use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod common;
mod config;
mod domain;
mod error;
mod exec;
mod installer;
mod operations;
mod platform;
mod service;
mod transaction;
mod ui;

#[cfg(test)]
mod test_fixtures;

use cli::Cli;

/// Log filter for the run; `RUST_LOG` wins over `--verbose`
fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,bastion_installer=debug")
        } else {
            EnvFilter::new("warn")
        }
    })
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .with_target(cli.verbose)
        .init();

    match commands::install::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(kind = ?e.kind(), error = ?e, "installation failed");
            ui::display::error(&e.to_string());
            if let Some(help) = e.help() {
                ui::display::help(&help.to_string());
            }
            ExitCode::FAILURE
        }
    }
}

//! Operations module for installing the bastion daemon
//!
//! This module provides high-level operations that coordinate:
//! - Preflight: host and privilege checks before anything is touched
//! - Detection: the host environment (from platform module)
//! - Installer: provisioning, deployment and verification (from installer module)
//! - Service: init-system registration (from service module)
//! - Transaction: rollback on error (from transaction module)
//! - UI: progress reporting (from ui module)

pub mod install;

pub use install::{InstallOperation, InstallOutcome};

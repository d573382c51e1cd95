//! Domain models for the installer
//!
//! This module contains the pure value types the pipeline is driven by.

pub mod request;

pub use request::{
    APP_MODULE, APP_PACKAGE, BehaviorFlags, InstallPaths, InstallationRequest, SERVICE_NAME,
};

//! Install operation submodules
//! Modularity for install operation

pub mod display;
pub mod orchestrator;
pub mod preflight;

pub use orchestrator::{InstallOperation, InstallOutcome, InstallSummary, Stage};

//! Command implementations for the bastion installer CLI

pub mod install;

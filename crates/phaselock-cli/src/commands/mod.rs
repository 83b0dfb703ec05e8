//! CLI command implementations.

pub mod common;
pub mod init_config;
pub mod run;
pub mod signal;
pub mod version;

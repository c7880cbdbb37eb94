//! CLI command implementations.

pub mod init_config;
pub mod scan;
pub mod strategies;
pub mod trace;
pub mod validate;

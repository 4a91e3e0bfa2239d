//! CLI subcommands.

pub mod calibrate;
pub mod config;
pub mod scan;

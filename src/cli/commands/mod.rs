//! CLI Commands Module
//!
//! This module contains all CLI subcommand implementations.

pub mod compat;
pub mod reports;
pub mod summary;

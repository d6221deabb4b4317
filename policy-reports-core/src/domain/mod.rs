//! Domain Layer - Report data model and ports
//!
//! Pure types describing policy reports, their outcomes and link targets,
//! plus the trait the engine uses to reach the remote report source.

pub mod reports;

pub use reports::*;

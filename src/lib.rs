//! Policy Reports - cached, aggregated view over Kubewarden policy reports
//!
//! Thin application layer over [`policy_reports_core`]: engine wiring against a
//! live cluster and the `policy-reports` command-line interface.

pub mod app;
pub mod cli;

pub use app::create_engine;
pub use policy_reports_core::{Config, ReportEngine, init_tracing};

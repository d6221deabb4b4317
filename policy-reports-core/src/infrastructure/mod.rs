//! Infrastructure Layer - External concerns and implementations
//!
//! This module handles the Kubernetes API server that serves policy reports.

pub mod kube;

pub use kube::KubeApiGateway;

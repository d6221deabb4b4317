//! Kubernetes API access for policy reports

mod client;
mod wire;

pub use client::KubeApiGateway;

//! kubectl-secretdata
//!
//! Finds Kubernetes Secrets across one or more namespaces, decodes their
//! data and prints it as YAML or JSON.

pub mod adapters;
pub mod aggregator;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod namespace;
pub mod render;

pub use error::{Error, Result};

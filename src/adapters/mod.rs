//! Adapters between the Kubernetes API and plain secret data

pub mod kube_source;
pub mod secrets;

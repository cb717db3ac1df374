//! Command-line interface

use std::path::PathBuf;

use clap::Parser;

use crate::config::{DEFAULT_CONCURRENCY, DEFAULT_OUTPUT};

const EXAMPLES: &str = r#"Examples:
  # List all secrets in json format
  kubectl secretdata -A -o json

  # List secrets in the given namespaces in yaml form (default)
  kubectl secretdata -m "ns1,ns2,ns3"

  # List secrets matching a regex in one namespace
  kubectl secretdata -n ns1 --regex "^secret[0-9]"

  # List secrets matching labels in all namespaces
  kubectl secretdata -A --selector "key1=value1,key2=value2""#;

/// Display decoded secret data
///
/// Prints the decoded data of the secrets found. Narrow the list with a label
/// selector (--selector) or a name pattern (--regex). A namespace must always
/// be chosen explicitly with --namespace, --all-namespaces or
/// --multi-namespaces.
#[derive(Parser, Debug, Clone)]
#[command(name = "kubectl-secretdata", version, after_help = EXAMPLES)]
pub struct Cli {
    /// Name of a single secret to show
    pub name: Option<String>,

    /// Namespace to search
    #[arg(short = 'n', long)]
    pub namespace: Option<String>,

    /// Search every namespace
    #[arg(short = 'A', long)]
    pub all_namespaces: bool,

    /// Comma-separated namespaces to search
    #[arg(short = 'm', long)]
    pub multi_namespaces: Option<String>,

    /// Output format: yaml or json
    #[arg(short = 'o', long, default_value_t = DEFAULT_OUTPUT.to_string())]
    pub output: String,

    /// Label selector passed to the API (e.g. -l key1=value1,key2=value2)
    #[arg(short = 'l', long)]
    pub selector: Option<String>,

    /// Regular expression the secret name must match
    #[arg(long)]
    pub regex: Option<String>,

    /// Path to the kubeconfig file
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Kubeconfig cluster to use
    #[arg(long)]
    pub cluster: Option<String>,

    /// Kubeconfig user to use
    #[arg(long)]
    pub user: Option<String>,

    /// Maximum number of namespaces fetched at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub request_timeout: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

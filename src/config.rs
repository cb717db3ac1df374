//! Per-invocation configuration
//!
//! Built once from the parsed command line. Every flag check happens here so
//! that bad input fails before the cluster is contacted.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cli::Cli;
use crate::filter::{FilterSpec, MATCH_ALL};
use crate::namespace::NamespaceSelection;
use crate::{Error, Result};

/// Default output format
pub const DEFAULT_OUTPUT: OutputFormat = OutputFormat::Yaml;

/// Default number of namespaces fetched at once
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(Error::Config(format!(
                r#"{} is invalid: --output must be "yaml", or "json""#,
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Kubeconfig selection handed to the kube client loader
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KubeOptions {
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    pub cluster: Option<String>,
    pub user: Option<String>,
}

impl KubeOptions {
    /// True when no kubeconfig flag was given
    pub fn is_default(&self) -> bool {
        self == &KubeOptions::default()
    }
}

/// Everything one run needs
#[derive(Clone, Debug)]
pub struct Config {
    pub secret_name: Option<String>,
    pub output: OutputFormat,
    pub filter: FilterSpec,
    pub kube: KubeOptions,
    pub concurrency: usize,
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Validate the command line and build the run configuration
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let selection = NamespaceSelection::resolve(
            cli.namespace.as_deref(),
            cli.all_namespaces,
            cli.multi_namespaces.as_deref(),
        )?;

        let secret_name = cli.name.clone().filter(|n| !n.is_empty());
        if let (Some(name), NamespaceSelection::All) = (&secret_name, &selection) {
            return Err(Error::Config(format!(
                "cannot look up secret {} across all namespaces",
                name
            )));
        }

        let output: OutputFormat = cli.output.parse()?;
        let filter = FilterSpec::new(
            cli.regex.as_deref().unwrap_or(MATCH_ALL),
            selection,
            cli.selector.clone(),
        )?;

        if cli.concurrency == 0 {
            return Err(Error::Config("--concurrency must be at least 1".to_string()));
        }

        Ok(Config {
            secret_name,
            output,
            filter,
            kube: KubeOptions {
                kubeconfig: cli.kubeconfig.clone(),
                context: cli.context.clone(),
                cluster: cli.cluster.clone(),
                user: cli.user.clone(),
            },
            concurrency: cli.concurrency,
            request_timeout: cli.request_timeout.map(Duration::from_secs),
        })
    }
}

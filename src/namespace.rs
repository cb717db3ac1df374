//! Namespace selection
//!
//! The three namespace flags are mutually exclusive. This module turns them
//! into a single [`NamespaceSelection`] or rejects them.

use tracing::debug;

use crate::{Error, Result};

/// Which namespaces a run looks at
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NamespaceSelection {
    /// Exactly one namespace
    Single(String),
    /// Every namespace in the cluster
    All,
    /// An explicit whitelist of two or more namespaces
    Multi(Vec<String>),
}

impl NamespaceSelection {
    /// Resolve the namespace flags into a selection
    ///
    /// Empty strings count as unset. A multi-namespace list that holds a
    /// single entry is the same as passing that namespace on its own. The
    /// kubeconfig context namespace is not an input here: only an explicit
    /// `--namespace` scopes a query.
    pub fn resolve(
        namespace: Option<&str>,
        all_namespaces: bool,
        multi_namespaces: Option<&str>,
    ) -> Result<Self> {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        let multi_namespaces = multi_namespaces.filter(|ns| !ns.is_empty());

        let selected = [namespace.is_some(), all_namespaces, multi_namespaces.is_some()]
            .iter()
            .filter(|set| **set)
            .count();
        match selected {
            0 => {
                return Err(Error::Config(
                    "must select at least a namespace".to_string(),
                ))
            }
            1 => {}
            _ => {
                return Err(Error::Config(
                    "must choose one option to use for selecting namespace".to_string(),
                ))
            }
        }

        if let Some(ns) = namespace {
            return Ok(NamespaceSelection::Single(ns.to_string()));
        }
        if all_namespaces {
            return Ok(NamespaceSelection::All);
        }

        let list = split_namespaces(multi_namespaces.unwrap_or_default());
        debug!("Resolved multi-namespace list {:?}", list);
        match list.len() {
            0 => Err(Error::Config(
                "--multi-namespaces must name at least one namespace".to_string(),
            )),
            1 => Ok(NamespaceSelection::Single(list[0].clone())),
            _ => Ok(NamespaceSelection::Multi(list)),
        }
    }

    /// Whether a secret in `namespace` falls inside this selection
    pub fn contains(&self, namespace: &str) -> bool {
        match self {
            NamespaceSelection::Single(ns) => ns == namespace,
            NamespaceSelection::Multi(list) => list.iter().any(|ns| ns == namespace),
            NamespaceSelection::All => true,
        }
    }
}

/// Split a comma-separated namespace list, dropping blanks and repeats
fn split_namespaces(raw: &str) -> Vec<String> {
    let mut list: Vec<String> = Vec::new();
    for ns in raw.split(',').map(str::trim).filter(|ns| !ns.is_empty()) {
        if !list.iter().any(|seen| seen == ns) {
            list.push(ns.to_string());
        }
    }
    list
}

//! Name and namespace filtering

use regex::Regex;

use crate::namespace::NamespaceSelection;
use crate::{Error, Result};

/// Pattern that matches every secret name
pub const MATCH_ALL: &str = ".*";

/// Decides which fetched secrets end up in the output
#[derive(Clone, Debug)]
pub struct FilterSpec {
    pub pattern: Regex,
    pub selection: NamespaceSelection,
    /// Passed to the API as-is, never evaluated here
    pub label_selector: Option<String>,
}

impl FilterSpec {
    /// Compile `pattern` and build a filter for `selection`
    pub fn new(
        pattern: &str,
        selection: NamespaceSelection,
        label_selector: Option<String>,
    ) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| Error::Config(format!("invalid --regex {:?}: {}", pattern, e)))?;
        Ok(Self {
            pattern,
            selection,
            label_selector: label_selector.filter(|l| !l.is_empty()),
        })
    }

    /// Whether the secret `name` in `namespace` is kept
    ///
    /// The name test is an unanchored search and runs first.
    pub fn matches(&self, namespace: &str, name: &str) -> bool {
        self.pattern.is_match(name) && self.selection.contains(namespace)
    }
}

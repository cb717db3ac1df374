//! Error types for kubectl-secretdata

use thiserror::Error;

/// Result type for the plugin
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the plugin
///
/// Every variant is terminal: nothing is retried, and the binary prints the
/// message and exits non-zero.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad or contradictory flags, raised before any cluster contact
    #[error("{0}")]
    Config(String),

    /// A call to the Kubernetes API failed
    #[error("failed to get {target}: {source}")]
    Fetch {
        target: String,
        #[source]
        source: kube::Error,
    },

    /// A secret value is not valid base64
    #[error("decode {key}={value:?}: {reason}")]
    Decode {
        key: String,
        value: String,
        reason: String,
    },

    /// The API returned something that is not a Secret
    #[error("{kind} is unexpected type")]
    TypeMismatch { kind: String },

    /// The query was valid but nothing matched
    #[error("no secrets found")]
    NotFound,

    /// The run was interrupted or timed out
    #[error("operation cancelled")]
    Cancelled,

    /// Serializing the result failed
    #[error("failed to render output: {0}")]
    Render(String),
}

impl Error {
    /// Wrap a kube error, naming what was being fetched
    pub fn fetch(target: impl Into<String>, source: kube::Error) -> Self {
        Error::Fetch {
            target: target.into(),
            source,
        }
    }
}

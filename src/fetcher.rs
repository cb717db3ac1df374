//! Secret retrieval
//!
//! [`SecretSource`] is the seam to the cluster. [`fetch_secrets`] turns a
//! namespace selection into source calls, runs the per-namespace ones through
//! a bounded pool and collects the records on a single task.

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::adapters::secrets::SecretRecord;
use crate::namespace::NamespaceSelection;
use crate::{Error, Result};

/// Where secrets come from
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// Fetch one secret by name through the typed API
    async fn get_secret(&self, namespace: &str, name: &str) -> kube::Result<SecretRecord>;

    /// List secrets in a namespace through the untyped API
    async fn list_secrets(
        &self,
        namespace: &str,
        name: Option<&str>,
        label_selector: Option<&str>,
    ) -> kube::Result<Vec<SecretRecord>>;

    /// Names of every namespace in the cluster
    async fn list_namespaces(&self) -> kube::Result<Vec<String>>;
}

/// What to fetch
#[derive(Clone, Debug)]
pub struct FetchRequest<'a> {
    pub selection: &'a NamespaceSelection,
    pub secret_name: Option<&'a str>,
    pub label_selector: Option<&'a str>,
    /// Maximum number of namespaces fetched at once
    pub concurrency: usize,
}

/// Fetch every raw secret record the request covers
///
/// Any failed call aborts the whole fetch. Cancelling `cancel` drops the
/// in-flight calls and returns [`Error::Cancelled`].
#[instrument(skip(source, request, cancel), fields(selection = ?request.selection))]
pub async fn fetch_secrets<S>(
    source: &S,
    request: &FetchRequest<'_>,
    cancel: &CancellationToken,
) -> Result<Vec<SecretRecord>>
where
    S: SecretSource + ?Sized,
{
    let namespaces = match (request.selection, request.secret_name) {
        (NamespaceSelection::Single(ns), Some(name)) if request.label_selector.is_none() => {
            debug!("Getting secret {} in {}", name, ns);
            let record = cancellable(cancel, source.get_secret(ns, name))
                .await?
                .map_err(|e| Error::fetch(format!("{} in {}", name, ns), e))?;
            return Ok(vec![record]);
        }
        // A label selector only applies to list calls
        (NamespaceSelection::Single(ns), _) => vec![ns.clone()],
        (NamespaceSelection::Multi(list), _) => list.clone(),
        (NamespaceSelection::All, Some(name)) => {
            return Err(Error::Config(format!(
                "cannot look up secret {} across all namespaces",
                name
            )))
        }
        (NamespaceSelection::All, None) => {
            let namespaces = cancellable(cancel, source.list_namespaces())
                .await?
                .map_err(|e| Error::fetch("namespaces", e))?;
            debug!("Discovered {} namespace(s)", namespaces.len());
            namespaces
        }
    };

    let concurrency = request.concurrency.max(1);
    debug!(
        "Listing secrets in {} namespace(s), {} at a time",
        namespaces.len(),
        concurrency
    );

    let batches: Vec<Vec<SecretRecord>> = stream::iter(namespaces)
        .map(|ns| async move {
            let listed = cancellable(
                cancel,
                source.list_secrets(&ns, request.secret_name, request.label_selector),
            )
            .await?;
            let records = listed.map_err(|e| Error::fetch(describe_list(&ns, request), e))?;
            debug!("Listed {} secret(s) in {}", records.len(), ns);
            Ok::<_, Error>(records)
        })
        .buffered(concurrency)
        .try_collect()
        .await?;

    Ok(batches.into_iter().flatten().collect())
}

fn describe_list(namespace: &str, request: &FetchRequest<'_>) -> String {
    match request.secret_name {
        Some(name) => format!("{} in {}", name, namespace),
        None => format!("secrets in {}", namespace),
    }
}

async fn cancellable<F, T>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        out = fut => Ok(out),
    }
}

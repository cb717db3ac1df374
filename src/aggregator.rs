//! Fetch, decode and filter secrets into one result set

use std::collections::BTreeMap;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::adapters::secrets::{decode, SecretData, SecretRecord};
use crate::config::Config;
use crate::fetcher::{fetch_secrets, FetchRequest, SecretSource};
use crate::filter::FilterSpec;
use crate::{Error, Result};

/// namespace -> secret name -> decoded data (`None` when the secret has none)
pub type ResultSet = BTreeMap<String, BTreeMap<String, Option<SecretData>>>;

/// Decode and filter fetched records
///
/// A record that fails to decode aborts the whole run, even if the filter
/// would have dropped it. An empty result is [`Error::NotFound`].
pub fn aggregate<I>(records: I, filter: &FilterSpec) -> Result<ResultSet>
where
    I: IntoIterator<Item = SecretRecord>,
{
    let mut result = ResultSet::new();
    let mut skipped = 0usize;

    for record in records {
        let secret = decode(&record)?;
        if !filter.matches(&secret.namespace, &secret.name) {
            skipped += 1;
            continue;
        }
        result
            .entry(secret.namespace)
            .or_default()
            .insert(secret.name, secret.data);
    }

    debug!("Filtered out {} secret(s)", skipped);

    if result.is_empty() {
        return Err(Error::NotFound);
    }
    Ok(result)
}

/// Run a whole lookup against `source`
pub async fn find_secrets<S>(
    source: &S,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<ResultSet>
where
    S: SecretSource + ?Sized,
{
    let request = FetchRequest {
        selection: &config.filter.selection,
        secret_name: config.secret_name.as_deref(),
        label_selector: config.filter.label_selector.as_deref(),
        concurrency: config.concurrency,
    };

    let records = fetch_secrets(source, &request, cancel).await?;
    let fetched = records.len();
    let result = aggregate(records, &config.filter)?;

    info!(
        "Found {} secret(s) in {} namespace(s) out of {} fetched",
        result.values().map(BTreeMap::len).sum::<usize>(),
        result.len(),
        fetched
    );
    Ok(result)
}

//! Shared fixtures for the integration tests
//!
//! `FakeSource` serves a fixed set of secrets from memory, the way the API
//! server would answer the typed `get` and untyped `list` calls.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use kube::core::ErrorResponse;
use kubectl_secretdata::adapters::secrets::{RawData, SecretRecord, SECRET_KIND};
use kubectl_secretdata::fetcher::SecretSource;

/// Build a secret as it arrives from a list call (base64 values)
pub fn encoded_secret(namespace: &str, name: &str, data: &[(&str, &str)]) -> SecretRecord {
    let map = data
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(STANDARD.encode(v))))
        .collect();
    SecretRecord {
        namespace: namespace.to_string(),
        name: name.to_string(),
        kind: SECRET_KIND.to_string(),
        data: RawData::Encoded(map),
    }
}

/// Build a secret without any data
pub fn empty_secret(namespace: &str, name: &str) -> SecretRecord {
    SecretRecord {
        namespace: namespace.to_string(),
        name: name.to_string(),
        kind: SECRET_KIND.to_string(),
        data: RawData::Absent,
    }
}

/// The same secret as the typed API would return it
pub fn to_typed(record: &SecretRecord) -> SecretRecord {
    let data = match &record.data {
        RawData::Encoded(map) => RawData::Bytes(
            map.iter()
                .map(|(k, v)| {
                    let bytes = STANDARD.decode(v.as_str().unwrap()).unwrap();
                    (k.clone(), bytes)
                })
                .collect(),
        ),
        other => other.clone(),
    };
    SecretRecord {
        data,
        ..record.clone()
    }
}

/// Secrets spread over four namespaces
pub fn cluster_secrets() -> Vec<SecretRecord> {
    vec![
        encoded_secret(
            "kube-system",
            "konnectivity-agent-token",
            &[("ca.crt", "value1"), ("token", "value2"), ("namespace", "value3")],
        ),
        encoded_secret(
            "kube-system",
            "hoge",
            &[("somthing-secret", "value1"), ("private-value", "value2")],
        ),
        encoded_secret(
            "kube-system",
            "foo",
            &[
                ("dictionary", "value1"),
                ("banana", "value2"),
                ("dangerous-0138033", "value2"),
            ],
        ),
        encoded_secret(
            "test1",
            "secret1",
            &[("key1", "value1"), ("key2", "value2"), ("key3", "value3")],
        ),
        encoded_secret(
            "test2",
            "secret2",
            &[("key1", "value1"), ("key2", "value2"), ("key3", "value3")],
        ),
        encoded_secret("test2", "privatevalue2", &[("key1", "value1")]),
        empty_secret("test2", "nodata"),
        encoded_secret(
            "international",
            "greeding",
            &[("english", "hello"), ("japanese", "konnichiwa"), ("spanish", "hola")],
        ),
    ]
}

pub fn api_error(code: u16, reason: &str, message: &str) -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: message.to_string(),
        reason: reason.to_string(),
        code,
    })
}

/// In-memory secret source
#[derive(Default)]
pub struct FakeSource {
    secrets: Vec<SecretRecord>,
    extra_namespaces: Vec<String>,
    failing_namespaces: Vec<String>,
    delay: Option<Duration>,
    hang: bool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new(secrets: Vec<SecretRecord>) -> Self {
        Self {
            secrets,
            ..Default::default()
        }
    }

    pub fn cluster() -> Self {
        Self::new(cluster_secrets()).with_namespaces(&["default"])
    }

    /// Namespaces that exist but hold no secrets
    pub fn with_namespaces(mut self, namespaces: &[&str]) -> Self {
        self.extra_namespaces = namespaces.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn failing_in(mut self, namespace: &str) -> Self {
        self.failing_namespaces.push(namespace.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Never answer any call
    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, call: String) {
        self.calls.lock().unwrap().push(call);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if self.hang {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SecretSource for FakeSource {
    async fn get_secret(&self, namespace: &str, name: &str) -> kube::Result<SecretRecord> {
        self.enter(format!("get {}/{}", namespace, name)).await;
        self.leave();

        if self.failing_namespaces.iter().any(|ns| ns == namespace) {
            return Err(api_error(500, "InternalError", "boom"));
        }

        // Unknown names come back as some other object, like a confused
        // aggregated API would answer.
        let record = self
            .secrets
            .iter()
            .find(|s| s.namespace == namespace && s.name == name)
            .map(to_typed)
            .unwrap_or_else(|| SecretRecord {
                namespace: namespace.to_string(),
                name: name.to_string(),
                kind: "Pod".to_string(),
                data: RawData::Absent,
            });
        Ok(record)
    }

    async fn list_secrets(
        &self,
        namespace: &str,
        name: Option<&str>,
        label_selector: Option<&str>,
    ) -> kube::Result<Vec<SecretRecord>> {
        self.enter(format!(
            "list {} name={} labels={}",
            namespace,
            name.unwrap_or(""),
            label_selector.unwrap_or("")
        ))
        .await;
        self.leave();

        if self.failing_namespaces.iter().any(|ns| ns == namespace) {
            return Err(api_error(403, "Forbidden", "secrets is forbidden"));
        }

        Ok(self
            .secrets
            .iter()
            .filter(|s| s.namespace == namespace)
            .filter(|s| name.map_or(true, |n| s.name == n))
            .cloned()
            .collect())
    }

    async fn list_namespaces(&self) -> kube::Result<Vec<String>> {
        self.enter("namespaces".to_string()).await;
        self.leave();

        let namespaces: BTreeSet<String> = self
            .secrets
            .iter()
            .map(|s| s.namespace.clone())
            .chain(self.extra_namespaces.iter().cloned())
            .collect();
        Ok(namespaces.into_iter().collect())
    }
}

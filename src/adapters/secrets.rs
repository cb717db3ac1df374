//! Secret records and their decoding

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use k8s_openapi::api::core::v1::Secret;
use kube::api::DynamicObject;
use kube::ResourceExt;

use crate::{Error, Result};

/// Kind every decoded record must carry
pub const SECRET_KIND: &str = "Secret";

/// Decoded key/value pairs of one secret
pub type SecretData = BTreeMap<String, String>;

/// Secret payload as it came off the wire
#[derive(Clone, Debug, PartialEq)]
pub enum RawData {
    /// Typed path: the API layer already undid the base64
    Bytes(BTreeMap<String, Vec<u8>>),
    /// Untyped path: values are still base64 strings
    Encoded(serde_json::Map<String, serde_json::Value>),
    /// The secret has no `data` field
    Absent,
}

/// One object returned by the secret source
#[derive(Clone, Debug, PartialEq)]
pub struct SecretRecord {
    pub namespace: String,
    pub name: String,
    /// Observed resource kind
    pub kind: String,
    pub data: RawData,
}

/// A secret with plain-text data
///
/// `data` is `None` when the secret carries no data at all, which is not the
/// same thing as an empty map.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedSecret {
    pub namespace: String,
    pub name: String,
    pub data: Option<SecretData>,
}

impl SecretRecord {
    /// Build a record from a strongly-typed Secret
    pub fn from_typed(secret: Secret, fallback_namespace: &str) -> Self {
        let namespace = secret
            .namespace()
            .unwrap_or_else(|| fallback_namespace.to_string());
        let name = secret.name_any();
        let data = match secret.data {
            Some(data) => RawData::Bytes(data.into_iter().map(|(k, v)| (k, v.0)).collect()),
            None => RawData::Absent,
        };

        SecretRecord {
            namespace,
            name,
            kind: SECRET_KIND.to_string(),
            data,
        }
    }

    /// Build a record from an untyped object
    ///
    /// List responses usually omit `kind` on their items, in which case the
    /// requested kind is assumed.
    pub fn from_dynamic(obj: DynamicObject, fallback_namespace: &str) -> Self {
        let namespace = obj
            .namespace()
            .unwrap_or_else(|| fallback_namespace.to_string());
        let name = obj.name_any();
        let kind = obj
            .types
            .as_ref()
            .map(|t| t.kind.clone())
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| SECRET_KIND.to_string());
        let data = match obj.data.get("data") {
            Some(serde_json::Value::Object(map)) => RawData::Encoded(map.clone()),
            _ => RawData::Absent,
        };

        SecretRecord {
            namespace,
            name,
            kind,
            data,
        }
    }
}

/// Normalize a record into plain-text data
pub fn decode(record: &SecretRecord) -> Result<DecodedSecret> {
    if record.kind != SECRET_KIND {
        return Err(Error::TypeMismatch {
            kind: record.kind.clone(),
        });
    }

    let data = match &record.data {
        RawData::Bytes(map) => Some(
            map.iter()
                .map(|(k, v)| (k.clone(), String::from_utf8_lossy(v).into_owned()))
                .collect(),
        ),
        RawData::Encoded(map) => Some(decode_encoded(map)?),
        RawData::Absent => None,
    };

    Ok(DecodedSecret {
        namespace: record.namespace.clone(),
        name: record.name.clone(),
        data,
    })
}

fn decode_encoded(map: &serde_json::Map<String, serde_json::Value>) -> Result<SecretData> {
    let mut data = SecretData::new();
    for (key, value) in map {
        let encoded = value.as_str().ok_or_else(|| Error::Decode {
            key: key.clone(),
            value: value.to_string(),
            reason: "value is not a string".to_string(),
        })?;
        let bytes = STANDARD.decode(encoded).map_err(|e| Error::Decode {
            key: key.clone(),
            value: encoded.to_string(),
            reason: e.to_string(),
        })?;
        data.insert(key.clone(), String::from_utf8_lossy(&bytes).into_owned());
    }
    Ok(data)
}

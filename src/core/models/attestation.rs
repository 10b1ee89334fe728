//! Attestation model
//!
//! An attestation is a claim about a subject identifier. Only `data.id` and the
//! presence of `data.ok` are inspected; the submitted object is kept verbatim,
//! field order included.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::core::error::ValidationError;

/// A single attestation about a subject identifier
///
/// Holds the submitted JSON object unchanged. `data` is always an object with
/// a non-empty string `id` and an `ok` key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Attestation {
    id: String,
    fields: Map<String, Value>,
}

impl Attestation {
    /// Create an attestation with no payload beyond `id` and `ok`
    pub fn new(id: impl Into<String>, ok: impl Into<Value>) -> Self {
        let id = id.into();
        let mut fields = Map::new();
        fields.insert("data".to_string(), json!({"id": id.clone(), "ok": ok.into()}));
        Self { id, fields }
    }

    /// Subject identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The verdict stored under `data.ok`
    #[must_use]
    pub fn ok(&self) -> Option<&Value> {
        self.data_field("ok")
    }

    /// A field inside `data`
    #[must_use]
    pub fn data_field(&self, name: &str) -> Option<&Value> {
        self.fields.get("data")?.get(name)
    }

    /// A top-level field beside `data` (signatures, signer keys, ...)
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Shape-check one untyped element of a submitted batch
    ///
    /// `index` is only used to describe the failure.
    pub fn from_value(index: usize, value: Value) -> Result<Self, ValidationError> {
        let Value::Object(fields) = value else {
            return Err(ValidationError::MissingData { index });
        };
        let Some(Value::Object(data)) = fields.get("data") else {
            return Err(ValidationError::MissingData { index });
        };

        let id = match data.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            _ => return Err(ValidationError::MissingId { index }),
        };
        if !data.contains_key("ok") {
            return Err(ValidationError::MissingOk { index });
        }

        Ok(Self { id, fields })
    }

    /// Shape-check a whole `{"attestations": [...]}` body
    ///
    /// All-or-nothing: the first malformed element rejects the batch.
    pub fn batch_from_value(body: Value) -> Result<Vec<Self>, ValidationError> {
        let Value::Object(mut body) = body else {
            return Err(ValidationError::BodyNotObject);
        };
        match body.remove("attestations") {
            None | Some(Value::Null) => Err(ValidationError::MissingAttestations),
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| Self::from_value(index, item))
                .collect(),
            Some(_) => Err(ValidationError::AttestationsNotArray),
        }
    }
}

impl TryFrom<Value> for Attestation {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(0, value)
    }
}

impl Serialize for Attestation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

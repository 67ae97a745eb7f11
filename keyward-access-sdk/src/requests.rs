//! Caller-facing request objects.
//!
//! Recognized options are exactly the public fields; string fields left
//! empty are treated as unset.

use keyward_access_spec::{Error, Result, SecretKind, TargetSetKind};
use serde::Serialize;
use serde_json::{Map, Value};

/// Options for creating a secret. Required fields depend on the kind:
/// `ProvisionerUser` takes a username, password and name; `PCloudAccount`
/// takes a safe and account name, and the name is derived, never supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct AddSecretRequest {
    pub secret_type: SecretKind,
    pub secret_name: String,
    pub username: String,
    pub password: String,
    pub safe: String,
    pub account_name: String,
    pub secret_details: Option<Map<String, Value>>,
}

impl AddSecretRequest {
    pub fn new(secret_type: SecretKind) -> Self {
        Self {
            secret_type,
            secret_name: String::new(),
            username: String::new(),
            password: String::new(),
            safe: String::new(),
            account_name: String::new(),
            secret_details: None,
        }
    }
}

/// Partial update of an existing secret. Unset fields keep their stored
/// values; details merge over the stored document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSecretRequest {
    pub secret_id: String,
    pub secret_name: String,
    pub is_active: Option<bool>,
    pub username: String,
    pub password: String,
    pub safe: String,
    pub account_name: String,
    pub secret_details: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AddTargetSetRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TargetSetKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provision_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_certificate_validation: Option<bool>,
}

/// Sparse update of a target set, addressed by name. An empty string means
/// "no change", not "clear the field".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateTargetSetRequest {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TargetSetKind>,
    pub secret_id: String,
    pub secret_type: String,
    pub description: String,
    pub provision_format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_certificate_validation: Option<bool>,
}

impl UpdateTargetSetRequest {
    /// Outbound document: the identifier and every empty-string field are
    /// dropped before the write.
    pub(crate) fn sparse_body(&self) -> Result<Value> {
        let value = crate::wire::to_json(self)?;
        let Value::Object(mut doc) = value else {
            return Err(Error::Decode {
                reason: "update request did not serialize to an object".to_string(),
            });
        };
        doc.remove("name");
        doc.retain(|_, value| value.as_str() != Some(""));
        Ok(Value::Object(doc))
    }
}

/// One group of a bulk create: target sets provisioned under a single
/// strong account.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TargetSetMapping {
    pub strong_account_id: String,
    pub target_sets: Vec<AddTargetSetRequest>,
}

/// Server-side listing options, passed through as query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTargetSetsOptions {
    /// Base64 continuation key from a previous page.
    pub b64_start_key: String,
    /// Server-side name wildcard.
    pub name: String,
    /// Restrict to target sets backed by this strong account.
    pub strong_account_id: String,
}

impl ListTargetSetsOptions {
    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if !self.b64_start_key.is_empty() {
            query.push(("b64_start_key", self.b64_start_key.clone()));
        }
        if !self.name.is_empty() {
            query.push(("name", self.name.clone()));
        }
        if !self.strong_account_id.is_empty() {
            query.push(("strong_account_id", self.strong_account_id.clone()));
        }
        query
    }
}

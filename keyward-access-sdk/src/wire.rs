//! Request and response shapes for the secrets-management endpoints.

use keyward_access_spec::{Error, Result, Secret, SecretKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|err| Error::Decode {
        reason: err.to_string(),
    })
}

/// Type-specific credential payload.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Credentials {
    ProvisionerUser { username: String, password: String },
    PCloudAccount { safe: String, account_name: String },
}

/// Envelope the credential pair travels under on every write.
#[derive(Debug, Clone, Serialize)]
pub struct SecretEnvelope {
    #[serde(flatten)]
    pub credentials: Credentials,
    pub tenant_encrypted: bool,
}

impl SecretEnvelope {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            tenant_encrypted: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AddSecretBody {
    pub secret_type: SecretKind,
    pub secret_name: String,
    pub secret_details: Map<String, Value>,
    pub secret: SecretEnvelope,
}

/// The update API requires the immutable type and the full detail document
/// even for unrelated changes.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeSecretBody {
    pub secret_type: SecretKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    pub secret_details: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<SecretEnvelope>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecretsList {
    #[serde(default)]
    pub secrets: Vec<Secret>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkAddBody {
    pub target_sets_mapping: Vec<crate::requests::TargetSetMapping>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteBody {
    pub target_set_names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

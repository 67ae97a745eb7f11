use crate::error::{Error, Result};
use crate::serde_util::null_as_empty_map;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Validate that a required request field carries a value.
pub fn validate_required(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::EmptyField { field });
    }
    Ok(())
}

/// Kind of credential backing a strong account. Closed set; immutable once
/// a secret is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecretKind {
    ProvisionerUser,
    PCloudAccount,
}

impl SecretKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProvisionerUser => "ProvisionerUser",
            Self::PCloudAccount => "PCloudAccount",
        }
    }
}

impl fmt::Display for SecretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecretKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ProvisionerUser" => Ok(Self::ProvisionerUser),
            "PCloudAccount" => Ok(Self::PCloudAccount),
            other => Err(Error::UnknownSecretType(other.to_string())),
        }
    }
}

/// A stored credential record used to provision ephemeral access.
///
/// `secret_details` is the open, partner-extensible metadata document; it is
/// never null on the read path — absent or `null` wire values decode to `{}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    pub secret_id: String,
    pub secret_type: SecretKind,
    #[serde(default)]
    pub secret_name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_empty_map")]
    pub secret_details: Map<String, Value>,
}

/// Shape of a target set pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetSetKind {
    #[default]
    Domain,
    Suffix,
    Target,
}

impl TargetSetKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Domain => "Domain",
            Self::Suffix => "Suffix",
            Self::Target => "Target",
        }
    }
}

impl fmt::Display for TargetSetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetSetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Domain" => Ok(Self::Domain),
            "Suffix" => Ok(Self::Suffix),
            "Target" => Ok(Self::Target),
            other => Err(Error::UnknownTargetSetKind(other.to_string())),
        }
    }
}

/// A named host/domain/suffix pattern authorized for provisioning with a
/// given strong account.
///
/// The remote representation carries no identifier of its own; the name is
/// the natural key and [`TargetSet::id`] aliases it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetSet {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: TargetSetKind,
    #[serde(default)]
    pub secret_id: String,
    #[serde(default)]
    pub secret_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub provision_format: String,
    #[serde(default)]
    pub enable_certificate_validation: bool,
}

impl TargetSet {
    /// Derived identifier; always equal to the name.
    pub fn id(&self) -> &str {
        &self.name
    }
}

/// One page of a target set listing, with the service's continuation key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TargetSetsPage {
    #[serde(default)]
    pub target_sets: Vec<TargetSet>,
    #[serde(default)]
    pub b64_last_evaluated_key: Option<String>,
}

/// Result of a multi-get: the target sets that were found together with the
/// requested ids that were not. Callers must check both channels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetSetBatch {
    pub target_sets: Vec<TargetSet>,
    pub missing: Vec<String>,
}

impl TargetSetBatch {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Error enumerating the missing ids, if any.
    pub fn error(&self) -> Option<Error> {
        if self.missing.is_empty() {
            None
        } else {
            Some(Error::TargetSetsMissing {
                names: self.missing.clone(),
            })
        }
    }
}

/// Per-item outcome of a bulk target set operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItemOutcome {
    pub name: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Decoded results of a bulk create, or locally synthesized results of a
/// bulk delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
    pub results: Vec<BulkItemOutcome>,
}

/// Aggregate counts over a full secret listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SecretsStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub by_kind: BTreeMap<String, usize>,
}

/// Aggregate counts over a full target set listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetSetsStats {
    pub total: usize,
    pub per_secret_type: BTreeMap<String, usize>,
}

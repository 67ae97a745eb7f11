use thiserror::Error;

/// Result alias for access-platform operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Canonical error surface for the access platform client.
///
/// Validation and referential variants are raised before any mutating call
/// reaches the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("secret_name must not be set for PCloudAccount secrets")]
    NameForbidden,
    #[error("unknown secret type: {0}")]
    UnknownSecretType(String),
    #[error("unknown target set type: {0}")]
    UnknownTargetSetKind(String),
    #[error("invalid {field} token: {value}")]
    InvalidBoolToken { field: &'static str, value: String },
    #[error("invalid {field} pattern: {reason}")]
    InvalidPattern { field: &'static str, reason: String },
    #[error("target set {name} references secret {actual}, expected strong account {expected}")]
    StrongAccountMismatch {
        name: String,
        expected: String,
        actual: String,
    },
    #[error("strong account {secret_id} does not exist")]
    SecretMissing { secret_id: String },
    #[error("target sets do not exist: {}", .names.join(", "))]
    TargetSetsMissing { names: Vec<String> },
    #[error("{entity} not found")]
    NotFound { entity: String },
    #[error("unexpected status {status}: {body}")]
    Remote { status: u16, body: String },
    #[error("codec error: {reason}")]
    Decode { reason: String },
    #[error("transport error: {reason}")]
    Transport { reason: String },
}

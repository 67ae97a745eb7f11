//! Client for the strong-account secret registry.

use crate::requests::{AddSecretRequest, ChangeSecretRequest};
use crate::transport::Transport;
use crate::wire;
use keyward_access_spec::{
    default_secret_details, merge_details, validate_required, Error, Result, Secret, SecretKind,
    SecretsFilter, SecretsStats,
};
use std::sync::Arc;
use tracing::{debug, info};

pub(crate) const SECRETS_PATH: &str = "api/secretsmgmt/secrets";

#[derive(Clone)]
pub struct SecretsClient {
    transport: Arc<dyn Transport>,
}

impl SecretsClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create a secret. Validation happens before any network call; the
    /// detail document starts from the declared defaults with the caller's
    /// entries merged over them.
    #[tracing::instrument(skip_all)]
    pub async fn add_secret(&self, request: &AddSecretRequest) -> Result<Secret> {
        let body = build_add_body(request)?;
        let reply = self
            .transport
            .post(SECRETS_PATH, &wire::to_json(&body)?)
            .await?;
        if reply.status != 201 {
            return Err(reply.into_remote_error());
        }
        let secret: Secret = reply.decode()?;
        info!(secret_id = %secret.secret_id, secret_type = %secret.secret_type, "secret created");
        Ok(secret)
    }

    /// Partial update with read-modify-write semantics: the current record
    /// supplies the immutable type and the base detail document, and the
    /// post-write state is re-fetched rather than trusting the update
    /// response body.
    #[tracing::instrument(skip_all, fields(secret_id = %request.secret_id))]
    pub async fn change_secret(&self, request: &ChangeSecretRequest) -> Result<Secret> {
        validate_required(&request.secret_id, "secret_id")?;
        let current = self.secret(&request.secret_id).await?;

        let secret_details = match &request.secret_details {
            Some(overlay) => merge_details(current.secret_details.clone(), overlay),
            None => current.secret_details.clone(),
        };

        let body = wire::ChangeSecretBody {
            secret_type: current.secret_type,
            secret_name: non_empty(&request.secret_name),
            is_active: request.is_active,
            secret_details,
            secret: complete_credentials(current.secret_type, request).map(wire::SecretEnvelope::new),
        };

        let path = format!("{SECRETS_PATH}/{}", request.secret_id);
        let reply = self.transport.put(&path, &wire::to_json(&body)?).await?;
        if reply.status != 200 {
            return Err(reply.into_remote_error());
        }

        let updated = self.secret(&request.secret_id).await?;
        info!(
            secret_id = %updated.secret_id,
            changed = ?diff_fields(&current, &updated),
            "secret updated"
        );
        Ok(updated)
    }

    /// Hard delete; the service has no soft-delete state.
    pub async fn delete_secret(&self, secret_id: &str) -> Result<()> {
        let path = format!("{SECRETS_PATH}/{secret_id}");
        let reply = self.transport.delete(&path, None).await?;
        if reply.status != 204 {
            return Err(reply.into_remote_error());
        }
        Ok(())
    }

    pub async fn secret(&self, secret_id: &str) -> Result<Secret> {
        let path = format!("{SECRETS_PATH}/{secret_id}");
        let reply = self.transport.get(&path, &[]).await?;
        match reply.status {
            200 => reply.decode(),
            404 => Err(Error::NotFound {
                entity: format!("secret {secret_id}"),
            }),
            _ => Err(reply.into_remote_error()),
        }
    }

    /// Full unpaginated fetch.
    pub async fn list_secrets(&self) -> Result<Vec<Secret>> {
        let reply = self.transport.get(SECRETS_PATH, &[]).await?;
        if reply.status != 200 {
            return Err(reply.into_remote_error());
        }
        let list: wire::SecretsList = reply.decode()?;
        debug!(count = list.secrets.len(), "listed secrets");
        Ok(list.secrets)
    }

    /// Filtered listing. The filter is compiled first, so malformed input
    /// costs zero network calls; matching is a full client-side scan.
    pub async fn list_secrets_by(&self, filter: &SecretsFilter) -> Result<Vec<Secret>> {
        let compiled = filter.compile()?;
        let secrets = self.list_secrets().await?;
        Ok(secrets
            .into_iter()
            .filter(|secret| compiled.matches(secret))
            .collect())
    }

    /// Single pass over [`Self::list_secrets`].
    pub async fn secrets_stats(&self) -> Result<SecretsStats> {
        let secrets = self.list_secrets().await?;
        let mut stats = SecretsStats {
            total: secrets.len(),
            ..Default::default()
        };
        for secret in &secrets {
            if secret.is_active {
                stats.active += 1;
            } else {
                stats.inactive += 1;
            }
            *stats
                .by_kind
                .entry(secret.secret_type.to_string())
                .or_default() += 1;
        }
        Ok(stats)
    }
}

fn build_add_body(request: &AddSecretRequest) -> Result<wire::AddSecretBody> {
    let (secret_name, credentials) = match request.secret_type {
        SecretKind::ProvisionerUser => {
            validate_required(&request.username, "username")?;
            validate_required(&request.password, "password")?;
            validate_required(&request.secret_name, "secret_name")?;
            (
                request.secret_name.clone(),
                wire::Credentials::ProvisionerUser {
                    username: request.username.clone(),
                    password: request.password.clone(),
                },
            )
        }
        SecretKind::PCloudAccount => {
            validate_required(&request.safe, "safe")?;
            validate_required(&request.account_name, "account_name")?;
            if !request.secret_name.is_empty() {
                return Err(Error::NameForbidden);
            }
            (
                format!("{}_{}", request.account_name, request.safe),
                wire::Credentials::PCloudAccount {
                    safe: request.safe.clone(),
                    account_name: request.account_name.clone(),
                },
            )
        }
    };

    let mut secret_details = default_secret_details();
    if let Some(overlay) = &request.secret_details {
        secret_details = merge_details(secret_details, overlay);
    }

    Ok(wire::AddSecretBody {
        secret_type: request.secret_type,
        secret_name,
        secret_details,
        secret: wire::SecretEnvelope::new(credentials),
    })
}

// A half-supplied credential pair is ignored rather than rejected.
fn complete_credentials(
    kind: SecretKind,
    request: &ChangeSecretRequest,
) -> Option<wire::Credentials> {
    match kind {
        SecretKind::ProvisionerUser => {
            if request.username.is_empty() || request.password.is_empty() {
                return None;
            }
            Some(wire::Credentials::ProvisionerUser {
                username: request.username.clone(),
                password: request.password.clone(),
            })
        }
        SecretKind::PCloudAccount => {
            if request.safe.is_empty() || request.account_name.is_empty() {
                return None;
            }
            Some(wire::Credentials::PCloudAccount {
                safe: request.safe.clone(),
                account_name: request.account_name.clone(),
            })
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn diff_fields(before: &Secret, after: &Secret) -> Vec<&'static str> {
    let mut changed = Vec::new();
    if before.secret_name != after.secret_name {
        changed.push("secret_name");
    }
    if before.is_active != after.is_active {
        changed.push("is_active");
    }
    if before.secret_details != after.secret_details {
        changed.push("secret_details");
    }
    changed
}

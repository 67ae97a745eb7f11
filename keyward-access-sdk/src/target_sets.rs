//! Client for the target set registry.
//!
//! Target sets reference strong accounts by `secret_id`; every create path
//! checks the reference against the live secret registry before the write.

use crate::requests::{
    AddTargetSetRequest, ListTargetSetsOptions, TargetSetMapping, UpdateTargetSetRequest,
};
use crate::secrets::SecretsClient;
use crate::transport::Transport;
use crate::wire;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use keyward_access_spec::{
    validate_required, BulkItemOutcome, BulkOutcome, Error, Result, TargetSet, TargetSetBatch,
    TargetSetsFilter, TargetSetsPage, TargetSetsStats,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

pub(crate) const TARGET_SETS_PATH: &str = "api/secretsmgmt/targetsets";
const BULK_PATH: &str = "api/secretsmgmt/targetsets/bulk";
const COUNT_PATH: &str = "api/secretsmgmt/targetsets/count";

#[derive(Clone)]
pub struct TargetSetsClient {
    transport: Arc<dyn Transport>,
    secrets: SecretsClient,
}

impl TargetSetsClient {
    /// Build a client over the given transport; the embedded secret
    /// registry handle shares the same credentials.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let secrets = SecretsClient::new(transport.clone());
        Self { transport, secrets }
    }

    /// Live referential check. Any lookup failure, transport included, is
    /// reported as a missing strong account, never silently ignored.
    async fn ensure_secret_exists(&self, secret_id: &str) -> Result<()> {
        if let Err(err) = self.secrets.secret(secret_id).await {
            debug!(secret_id, %err, "strong account lookup failed");
            return Err(Error::SecretMissing {
                secret_id: secret_id.to_string(),
            });
        }
        Ok(())
    }

    /// Create a target set. A supplied `secret_id` is validated first; the
    /// create call is never issued against a dangling reference.
    pub async fn add_target_set(&self, request: &AddTargetSetRequest) -> Result<TargetSet> {
        validate_required(&request.name, "name")?;
        if let Some(secret_id) = request.secret_id.as_deref().filter(|id| !id.is_empty()) {
            self.ensure_secret_exists(secret_id).await?;
        }
        let reply = self
            .transport
            .post(TARGET_SETS_PATH, &wire::to_json(request)?)
            .await?;
        if reply.status != 201 {
            return Err(reply.into_remote_error());
        }
        reply.decode()
    }

    /// Bulk create with all-or-nothing pre-validation: every group and every
    /// member must validate before a single request is sent. The remote's
    /// Multi-Status per-item results are returned as-is.
    #[tracing::instrument(skip_all, fields(groups = mappings.len()))]
    pub async fn bulk_add_target_sets(&self, mappings: &[TargetSetMapping]) -> Result<BulkOutcome> {
        for mapping in mappings {
            validate_required(&mapping.strong_account_id, "strong_account_id")?;
            self.ensure_secret_exists(&mapping.strong_account_id).await?;
            for target_set in &mapping.target_sets {
                let secret_id = target_set.secret_id.clone().unwrap_or_default();
                if secret_id != mapping.strong_account_id {
                    return Err(Error::StrongAccountMismatch {
                        name: target_set.name.clone(),
                        expected: mapping.strong_account_id.clone(),
                        actual: secret_id,
                    });
                }
                self.ensure_secret_exists(&secret_id).await?;
            }
        }

        let body = wire::BulkAddBody {
            target_sets_mapping: mappings.to_vec(),
        };
        let reply = self.transport.post(BULK_PATH, &wire::to_json(&body)?).await?;
        if reply.status != 207 {
            return Err(reply.into_remote_error());
        }
        let outcome: BulkOutcome = reply.decode()?;
        info!(results = outcome.results.len(), "bulk create accepted");
        Ok(outcome)
    }

    pub async fn delete_target_set(&self, name: &str) -> Result<()> {
        let path = format!("{TARGET_SETS_PATH}/{name}");
        let reply = self.transport.delete(&path, None).await?;
        if reply.status != 204 {
            return Err(reply.into_remote_error());
        }
        Ok(())
    }

    /// Bulk delete by name, all-or-nothing: if any requested name is absent
    /// from the tenant, nothing is deleted and the missing names are
    /// enumerated. Per-name success results are synthesized locally.
    #[tracing::instrument(skip_all, fields(names = names.len()))]
    pub async fn bulk_delete_target_sets(&self, names: &[String]) -> Result<BulkOutcome> {
        let trimmed: Vec<String> = names.iter().map(|name| name.trim().to_string()).collect();
        let existing: HashSet<String> = self
            .list_target_sets()
            .await?
            .into_iter()
            .map(|target_set| target_set.name)
            .collect();
        let missing: Vec<String> = trimmed
            .iter()
            .filter(|name| !existing.contains(*name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(Error::TargetSetsMissing { names: missing });
        }

        let body = wire::BulkDeleteBody {
            target_set_names: trimmed.clone(),
        };
        let reply = self
            .transport
            .delete(BULK_PATH, Some(&wire::to_json(&body)?))
            .await?;
        if reply.status != 204 {
            return Err(reply.into_remote_error());
        }
        Ok(BulkOutcome {
            results: trimmed
                .into_iter()
                .map(|name| BulkItemOutcome {
                    name,
                    success: true,
                    error: None,
                })
                .collect(),
        })
    }

    /// Sparse update addressed by name; empty-string fields mean "no change"
    /// and are dropped from the outbound document.
    pub async fn update_target_set(&self, request: &UpdateTargetSetRequest) -> Result<TargetSet> {
        validate_required(&request.name, "name")?;
        let path = format!("{TARGET_SETS_PATH}/{}", request.name);
        let reply = self.transport.put(&path, &request.sparse_body()?).await?;
        if reply.status != 200 {
            return Err(reply.into_remote_error());
        }
        reply.decode()
    }

    /// Single page with no options.
    pub async fn list_target_sets(&self) -> Result<Vec<TargetSet>> {
        let page = self
            .list_target_sets_with_options(&ListTargetSetsOptions::default())
            .await?;
        Ok(page.target_sets)
    }

    /// Server-side pagination, name wildcard and strong-account filter are
    /// passed through as query parameters. The core never auto-paginates;
    /// the returned continuation key is the caller's to feed back.
    pub async fn list_target_sets_with_options(
        &self,
        options: &ListTargetSetsOptions,
    ) -> Result<TargetSetsPage> {
        let reply = self
            .transport
            .get(TARGET_SETS_PATH, &options.query())
            .await?;
        if reply.status != 200 {
            return Err(reply.into_remote_error());
        }
        reply.decode()
    }

    /// Client-side regex filtering over the unfiltered listing. A pattern
    /// that fails to compile excludes the item rather than aborting.
    pub async fn list_target_sets_by(&self, filter: &TargetSetsFilter) -> Result<Vec<TargetSet>> {
        let target_sets = self.list_target_sets().await?;
        Ok(target_sets
            .into_iter()
            .filter(|target_set| filter.matches(target_set))
            .collect())
    }

    pub async fn target_set(&self, id: &str) -> Result<TargetSet> {
        let path = format!("{TARGET_SETS_PATH}/{id}");
        let reply = self.transport.get(&path, &[]).await?;
        match reply.status {
            200 => reply.decode(),
            404 => Err(Error::NotFound {
                entity: format!("target set {id}"),
            }),
            _ => Err(reply.into_remote_error()),
        }
    }

    /// Multi-get by id list. Returns the found target sets together with the
    /// ids the service did not return; both channels must be checked.
    pub async fn bulk_target_sets(&self, ids: &[String]) -> Result<TargetSetBatch> {
        let requested: Vec<String> = ids.iter().map(|id| id.trim().to_string()).collect();
        let path = format!("{TARGET_SETS_PATH}/ids/{}", encode_id_list(&requested)?);
        let reply = self.transport.get(&path, &[]).await?;
        if reply.status != 200 {
            return Err(reply.into_remote_error());
        }
        let page: TargetSetsPage = reply.decode()?;
        let returned: HashSet<&str> = page
            .target_sets
            .iter()
            .map(|target_set| target_set.id())
            .collect();
        let missing = requested
            .iter()
            .filter(|id| !returned.contains(id.as_str()))
            .cloned()
            .collect();
        Ok(TargetSetBatch {
            target_sets: page.target_sets,
            missing,
        })
    }

    /// Server-computed count; shares the listing query parameters and does
    /// no client-side filtering.
    pub async fn target_sets_count(&self, options: &ListTargetSetsOptions) -> Result<u64> {
        let reply = self.transport.get(COUNT_PATH, &options.query()).await?;
        if reply.status != 200 {
            return Err(reply.into_remote_error());
        }
        let count: wire::CountResponse = reply.decode()?;
        Ok(count.count)
    }

    /// Single pass over [`Self::list_target_sets`].
    pub async fn target_sets_stats(&self) -> Result<TargetSetsStats> {
        let target_sets = self.list_target_sets().await?;
        let mut stats = TargetSetsStats {
            total: target_sets.len(),
            ..Default::default()
        };
        for target_set in &target_sets {
            *stats
                .per_secret_type
                .entry(target_set.secret_type.clone())
                .or_default() += 1;
        }
        Ok(stats)
    }
}

// The multi-get endpoint takes the id list as a path parameter: JSON, then
// base64, then wrapped in literal quote characters.
fn encode_id_list(ids: &[String]) -> Result<String> {
    let json = serde_json::to_string(ids).map_err(|err| Error::Decode {
        reason: err.to_string(),
    })?;
    Ok(format!("\"{}\"", STANDARD.encode(json)))
}

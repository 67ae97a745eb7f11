//! Create a strong account, authorize a target set under it, and print
//! tenant stats. Expects `KEYWARD_API_URL`, `KEYWARD_API_TOKEN` and
//! `KEYWARD_DEMO_PASSWORD` in the environment.

use anyhow::{Context, Result};
use keyward_access_sdk::{
    AddSecretRequest, AddTargetSetRequest, RestTransport, SecretsClient, TargetSetsClient,
};
use keyward_access_spec::SecretKind;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let base_url = std::env::var("KEYWARD_API_URL").context("KEYWARD_API_URL is not set")?;
    let token = std::env::var("KEYWARD_API_TOKEN").context("KEYWARD_API_TOKEN is not set")?;
    let transport = Arc::new(RestTransport::new(base_url)?.with_token(token));

    let secrets = SecretsClient::new(transport.clone());
    let mut request = AddSecretRequest::new(SecretKind::ProvisionerUser);
    request.secret_name = "demo-provisioner".to_string();
    request.username = "svc-demo".to_string();
    request.password =
        std::env::var("KEYWARD_DEMO_PASSWORD").context("KEYWARD_DEMO_PASSWORD is not set")?;
    let secret = secrets.add_secret(&request).await?;
    println!("created secret {}", secret.secret_id);

    let target_sets = TargetSetsClient::new(transport);
    let created = target_sets
        .add_target_set(&AddTargetSetRequest {
            name: "demo.example.com".to_string(),
            secret_id: Some(secret.secret_id.clone()),
            ..Default::default()
        })
        .await?;
    println!("authorized target set {}", created.id());

    let stats = secrets.secrets_stats().await?;
    println!("{} secrets in tenant ({} active)", stats.total, stats.active);
    Ok(())
}

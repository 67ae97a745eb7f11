use async_trait::async_trait;
use httpmock::prelude::*;
use keyward_access_sdk::{CredentialSource, RestTransport, Transport};
use keyward_access_spec::Result;
use serde_json::json;
use std::sync::Arc;

struct StaticSource(String);

#[async_trait]
impl CredentialSource for StaticSource {
    async fn bearer_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[tokio::test]
async fn sends_bearer_token_and_returns_raw_reply() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/secretsmgmt/secrets")
                .header("authorization", "Bearer t0");
            then.status(200).json_body(json!({"secrets": []}));
        })
        .await;

    let transport = RestTransport::new(server.base_url())
        .unwrap()
        .with_token("t0");
    let reply = transport.get("api/secretsmgmt/secrets", &[]).await.unwrap();
    assert_eq!(reply.status, 200);
    mock.assert_async().await;
}

#[tokio::test]
async fn refreshes_credentials_once_on_unauthorized() {
    let server = MockServer::start_async().await;
    let stale = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/secretsmgmt/secrets")
                .header("authorization", "Bearer stale");
            then.status(401).body("token expired");
        })
        .await;
    let fresh = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/secretsmgmt/secrets")
                .header("authorization", "Bearer fresh");
            then.status(200).json_body(json!({"secrets": []}));
        })
        .await;

    let transport = RestTransport::new(server.base_url())
        .unwrap()
        .with_token("stale")
        .with_credentials(Arc::new(StaticSource("fresh".to_string())));
    let reply = transport.get("api/secretsmgmt/secrets", &[]).await.unwrap();
    assert_eq!(reply.status, 200);
    stale.assert_hits_async(1).await;
    fresh.assert_hits_async(1).await;
}

#[tokio::test]
async fn unauthorized_without_credential_source_is_returned_as_is() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/secretsmgmt/secrets");
            then.status(401).body("token expired");
        })
        .await;

    let transport = RestTransport::new(server.base_url()).unwrap();
    let reply = transport.get("api/secretsmgmt/secrets", &[]).await.unwrap();
    assert_eq!(reply.status, 401);
    assert_eq!(reply.body, "token expired");
}

//! The authenticated RPC seam between the registries and the remote service.
//!
//! Registries never manage tokens or retries themselves; the single
//! 401-refresh retry lives here.

use async_trait::async_trait;
use keyward_access_spec::{Error, Result};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Status code and raw body handed back by a [`Transport`].
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as JSON.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|err| Error::Decode {
            reason: err.to_string(),
        })
    }

    /// Consume an unexpected reply into a remote error carrying the raw body.
    pub fn into_remote_error(self) -> Error {
        Error::Remote {
            status: self.status,
            body: self.body,
        }
    }
}

/// Opaque RPC client the registries issue calls through.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Reply>;
    async fn post(&self, path: &str, body: &Value) -> Result<Reply>;
    async fn put(&self, path: &str, body: &Value) -> Result<Reply>;
    async fn delete(&self, path: &str, body: Option<&Value>) -> Result<Reply>;
}

pub type DynTransport = Arc<dyn Transport>;

/// Issues fresh bearer tokens when the current one expires.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn bearer_token(&self) -> Result<String>;
}

/// [`Transport`] backed by reqwest over HTTPS.
pub struct RestTransport {
    base_url: Url,
    client: reqwest::Client,
    token: RwLock<Option<String>>,
    credentials: Option<Arc<dyn CredentialSource>>,
    timeout: Duration,
}

impl RestTransport {
    /// Build a transport for the provided base URL. The URL must end with a
    /// trailing slash for relative paths to join underneath it.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("keyward-access-sdk/", env!("CARGO_PKG_VERSION")))
            .use_rustls_tls()
            .build()
            .map_err(transport_error)?;
        Self::from_client(client, base_url)
    }

    /// Build a transport around a caller-configured reqwest client
    /// (proxies, custom TLS and the like).
    pub fn from_client(client: reqwest::Client, base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref()).map_err(|err| Error::Transport {
            reason: err.to_string(),
        })?;
        Ok(Self {
            base_url,
            client,
            token: RwLock::new(None),
            credentials: None,
            timeout: Duration::from_secs(30),
        })
    }

    /// Attach a bearer token sent with each request.
    pub fn with_token(self, token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
            ..self
        }
    }

    /// Attach a refresh hook invoked when the service reports an expired
    /// credential.
    pub fn with_credentials(mut self, source: Arc<dyn CredentialSource>) -> Self {
        self.credentials = Some(source);
        self
    }

    /// Override the per-request timeout (default 30 seconds).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Reply> {
        let url = self.base_url.join(path).map_err(|err| Error::Transport {
            reason: err.to_string(),
        })?;
        let token = self.token.read().await.clone();
        let reply = self
            .send_once(method.clone(), url.clone(), query, body, token)
            .await?;
        if reply.status != 401 {
            return Ok(reply);
        }
        let Some(source) = &self.credentials else {
            return Ok(reply);
        };
        let token = source.bearer_token().await?;
        *self.token.write().await = Some(token.clone());
        self.send_once(method, url, query, body, Some(token)).await
    }

    async fn send_once(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, String)],
        body: Option<&Value>,
        token: Option<String>,
    ) -> Result<Reply> {
        let mut builder = self.client.request(method, url).timeout(self.timeout);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        Ok(Reply { status, body })
    }
}

#[async_trait]
impl Transport for RestTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Reply> {
        self.execute(Method::GET, path, query, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Reply> {
        self.execute(Method::POST, path, &[], Some(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Reply> {
        self.execute(Method::PUT, path, &[], Some(body)).await
    }

    async fn delete(&self, path: &str, body: Option<&Value>) -> Result<Reply> {
        self.execute(Method::DELETE, path, &[], body).await
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    Error::Transport {
        reason: err.to_string(),
    }
}

//! In-memory transport double for registry tests.

use async_trait::async_trait;
use keyward_access_sdk::{Reply, Transport};
use keyward_access_spec::{Error, Result};
use serde_json::Value;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Clone)]
enum Outcome {
    Reply(u16, Value),
    Fail(String),
}

#[derive(Clone)]
struct Route {
    method: &'static str,
    path: String,
    outcome: Outcome,
}

/// Routes are matched by method and full path (query string included). A
/// route registered once replays forever; registering the same key again
/// queues replies that are consumed in order.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, method: &'static str, path: &str, status: u16, body: Value) {
        self.routes.lock().unwrap().push(Route {
            method,
            path: path.to_string(),
            outcome: Outcome::Reply(status, body),
        });
    }

    #[allow(dead_code)]
    pub fn fail(&self, method: &'static str, path: &str, reason: &str) {
        self.routes.lock().unwrap().push(Route {
            method,
            path: path.to_string(),
            outcome: Outcome::Fail(reason.to_string()),
        });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn requests_with_method(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.method == method)
            .count()
    }

    fn dispatch(&self, method: &'static str, path: &str, body: Option<Value>) -> Result<Reply> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body,
        });
        let mut routes = self.routes.lock().unwrap();
        let matching = routes
            .iter()
            .filter(|route| route.method == method && route.path == path)
            .count();
        let index = routes
            .iter()
            .position(|route| route.method == method && route.path == path)
            .unwrap_or_else(|| panic!("no mock route for {method} {path}"));
        let outcome = if matching > 1 {
            routes.remove(index).outcome
        } else {
            routes[index].outcome.clone()
        };
        match outcome {
            Outcome::Reply(status, body) => Ok(Reply::new(status, body.to_string())),
            Outcome::Fail(reason) => Err(Error::Transport { reason }),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Reply> {
        let path = if query.is_empty() {
            path.to_string()
        } else {
            let encoded: Vec<String> = query
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            format!("{path}?{}", encoded.join("&"))
        };
        self.dispatch("GET", &path, None)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Reply> {
        self.dispatch("POST", path, Some(body.clone()))
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Reply> {
        self.dispatch("PUT", path, Some(body.clone()))
    }

    async fn delete(&self, path: &str, body: Option<&Value>) -> Result<Reply> {
        self.dispatch("DELETE", path, body.cloned())
    }
}

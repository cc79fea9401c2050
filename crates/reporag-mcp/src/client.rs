use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::error::{Result, RpcError};
use crate::protocol::{Request, Response, JSONRPC_VERSION};

/// Blocking JSON-RPC client over HTTP POST. Request ids start at 1 and
/// increase by one per call.
pub struct RpcClient {
    http: reqwest::blocking::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_http(reqwest::blocking::Client::new(), url)
    }

    pub fn with_http(http: reqwest::blocking::Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into(), next_id: AtomicU64::new(1) }
    }

    pub fn url(&self) -> &str { &self.url }

    /// Send one request and return its `result` member, which may be absent.
    pub fn call(&self, method: &str, params: Option<Value>) -> Result<Option<Value>> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = Request { jsonrpc: JSONRPC_VERSION, id, method, params };
        tracing::debug!(id, method, url = %self.url, "rpc request");

        let response = self.http.post(&self.url).json(&request).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RpcError::Status { status: status.as_u16(), body });
        }
        let body: Response = serde_json::from_str(&response.text()?)?;
        if let Some(err) = body.error {
            return Err(RpcError::Server { code: err.code, message: err.message });
        }
        if body.id.as_ref().and_then(Value::as_u64).is_some_and(|rid| rid != id) {
            tracing::warn!(id, response_id = ?body.id, method, "rpc response id mismatch");
        }
        Ok(body.result)
    }
}

//! Wire types for the resource server.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

pub const METHOD_INITIALIZE: &str = "initialize";
pub const METHOD_LIST: &str = "resources/list";
pub const METHOD_FETCH: &str = "resources/fetch";

#[derive(Debug, Serialize)]
pub struct Request<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<ErrorObject>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct InitializeParams<'a> {
    pub owner: &'a str,
    pub repo: &'a str,
    pub branch: &'a str,
}

#[derive(Debug, Serialize)]
pub struct FetchParams<'a> {
    pub uri: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct FetchResult {
    #[serde(rename = "mimeType", default)]
    pub mime_type: Option<String>,
    pub content: String,
}

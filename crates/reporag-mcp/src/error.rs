use thiserror::Error;

pub type Result<T> = std::result::Result<T, RpcError>;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON-RPC error {code}: {message}")]
    Server { code: i64, message: String },

    #[error("malformed response to '{method}': {reason}")]
    Malformed { method: String, reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

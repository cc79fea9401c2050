//! reporag-mcp
//!
//! JSON-RPC 2.0 client for a resource server that exposes a repository as
//! `resources/list` + `resources/fetch`, and the `ResourceFetcher` built on it.

pub mod client;
pub mod error;
pub mod fetcher;
pub mod protocol;

pub use client::RpcClient;
pub use error::RpcError;
pub use fetcher::McpFetcher;

use reporag_core::traits::ResourceFetcher;
use reporag_core::types::{FileDescriptor, RepoTarget};

use crate::client::RpcClient;
use crate::error::{Result, RpcError};
use crate::protocol::{FetchParams, FetchResult, InitializeParams, METHOD_FETCH, METHOD_INITIALIZE, METHOD_LIST};

/// Resource fetcher backed by the JSON-RPC resource server.
pub struct McpFetcher { client: RpcClient }

impl McpFetcher {
    pub fn new(server_url: impl Into<String>) -> Self { Self { client: RpcClient::new(server_url) } }

    pub fn with_client(client: RpcClient) -> Self { Self { client } }

    pub fn initialize_session(&self, target: &RepoTarget) -> Result<()> {
        let params = InitializeParams { owner: &target.owner, repo: &target.repo, branch: &target.branch };
        self.client.call(METHOD_INITIALIZE, Some(serde_json::to_value(params)?))?;
        tracing::info!(target = %target, server = self.client.url(), "resource session initialized");
        Ok(())
    }

    /// A response without `result` means the server has no resources.
    pub fn list_resources(&self) -> Result<Vec<FileDescriptor>> {
        match self.client.call(METHOD_LIST, None)? {
            None | Some(serde_json::Value::Null) => Ok(Vec::new()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    pub fn fetch_content(&self, uri: &str) -> Result<String> {
        let result = self.client.call(METHOD_FETCH, Some(serde_json::to_value(FetchParams { uri })?))?
            .ok_or_else(|| RpcError::Malformed { method: METHOD_FETCH.into(), reason: format!("no result for {uri}") })?;
        let fetched: FetchResult = serde_json::from_value(result)?;
        tracing::debug!(uri, mime = fetched.mime_type.as_deref().unwrap_or("?"), bytes = fetched.content.len(), "fetched resource");
        Ok(fetched.content)
    }
}

impl ResourceFetcher for McpFetcher {
    fn initialize(&self, target: &RepoTarget) -> anyhow::Result<()> { Ok(self.initialize_session(target)?) }
    fn list(&self) -> anyhow::Result<Vec<FileDescriptor>> { Ok(self.list_resources()?) }
    fn fetch(&self, uri: &str) -> anyhow::Result<String> { Ok(self.fetch_content(uri)?) }
}

//! Configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`APP_RAG__TOP_K=5` sets `rag.top_k`). `Settings` is the typed view used by
//! the binaries.
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::chunker::ChunkingConfig;
use crate::error::Error;

pub const DEFAULT_EXTENSIONS: [&str; 5] = [".py", ".js", ".ts", ".jsx", ".tsx"];

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        tracing::debug!(env = %env_name, "configuration loaded");

        Ok(Self { figment })
    }

    /// Load a single TOML file without environment layering.
    pub fn from_file(path: &Path) -> Self {
        Self { figment: Figment::new().merge(Toml::file(path)) }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Typed view of every section; missing keys take their defaults.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rpc: RpcSettings,
    pub repo: RepoSettings,
    pub rag: RagSettings,
    pub llm: LlmSettings,
    pub embed: EmbedSettings,
}

impl Settings {
    pub fn validate(&self) -> crate::Result<()> {
        self.rag.chunking().validate()?;
        if self.rag.top_k == 0 {
            return Err(Error::InvalidConfiguration("top_k must be greater than 0".into()));
        }
        if self.rag.embed_batch_size == 0 {
            return Err(Error::InvalidConfiguration("embed_batch_size must be greater than 0".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcSettings {
    pub server_url: String,
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self { server_url: "http://localhost:4000/rpc".into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoSettings {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: String,
}

impl Default for RepoSettings {
    fn default() -> Self {
        Self { owner: None, repo: None, branch: "main".into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    pub chunk_size: usize,
    pub overlap: usize,
    pub top_k: usize,
    pub extensions: Vec<String>,
    pub embed_batch_size: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        let chunking = ChunkingConfig::default();
        Self {
            chunk_size: chunking.size,
            overlap: chunking.overlap,
            top_k: 3,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            embed_batch_size: 32,
        }
    }
}

impl RagSettings {
    pub fn chunking(&self) -> ChunkingConfig {
        ChunkingConfig { size: self.chunk_size, overlap: self.overlap }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub model: String,
    pub api_key_env: String,
    pub base_url: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".into(),
            api_key_env: "GEMINI_API_KEY".into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedSettings {
    pub model_dir: Option<String>,
    pub max_len: usize,
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self { model_dir: None, max_len: 256 }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

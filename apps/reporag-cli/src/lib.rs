//! Shared plumbing for the `reporag` binaries: flag overrides on top of the
//! figment configuration, logging setup and error reporting.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use reporag_core::config::{resolve_with_base, Config, Settings};
use reporag_core::types::RepoTarget;
use reporag_core::Error;

/// Flags shared by every binary. Unset flags keep the configured value.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// JSON-RPC endpoint of the resource server
    #[arg(long)]
    pub server_url: Option<String>,
    #[arg(long)]
    pub owner: Option<String>,
    #[arg(long)]
    pub repo: Option<String>,
    #[arg(long)]
    pub branch: Option<String>,
    /// Words per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,
    /// Words shared by consecutive chunks
    #[arg(long)]
    pub overlap: Option<usize>,
    #[arg(long)]
    pub top_k: Option<usize>,
    /// Eligible file suffix, repeatable (replaces the configured list)
    #[arg(long = "ext")]
    pub extensions: Vec<String>,
    /// Gemini model name
    #[arg(long)]
    pub model: Option<String>,
}

impl CommonArgs {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(v) = &self.server_url { settings.rpc.server_url = v.clone(); }
        if let Some(v) = &self.owner { settings.repo.owner = Some(v.clone()); }
        if let Some(v) = &self.repo { settings.repo.repo = Some(v.clone()); }
        if let Some(v) = &self.branch { settings.repo.branch = v.clone(); }
        if let Some(v) = self.chunk_size { settings.rag.chunk_size = v; }
        if let Some(v) = self.overlap { settings.rag.overlap = v; }
        if let Some(v) = self.top_k { settings.rag.top_k = v; }
        if !self.extensions.is_empty() { settings.rag.extensions = self.extensions.clone(); }
        if let Some(v) = &self.model { settings.llm.model = v.clone(); }
    }
}

/// Configuration files and `APP_*` variables, then flags, then validation.
pub fn load_settings(args: &CommonArgs) -> anyhow::Result<Settings> {
    let config = Config::load()?;
    let mut settings = config.settings()?;
    args.apply(&mut settings);
    settings.validate()?;
    Ok(settings)
}

pub fn repo_target(settings: &Settings) -> Result<RepoTarget, Error> {
    let owner = settings.repo.owner.clone().ok_or_else(|| Error::InvalidConfiguration("repository owner is required (--owner or repo.owner)".into()))?;
    let repo = settings.repo.repo.clone().ok_or_else(|| Error::InvalidConfiguration("repository name is required (--repo or repo.repo)".into()))?;
    Ok(RepoTarget::new(owner, repo, settings.repo.branch.clone()))
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Write `text` to `output` (expanded, relative to `base`), creating parent
/// directories. Returns the final path.
pub fn write_output(base: &Path, output: &str, text: &str) -> anyhow::Result<PathBuf> {
    let path = resolve_with_base(base, output);
    if let Some(parent) = path.parent() { fs::create_dir_all(parent)?; }
    fs::write(&path, text)?;
    Ok(path)
}

/// One-line report naming the error kind and, for upstream failures, the stage.
pub fn describe_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<Error>() {
        Some(e) => match e.stage() {
            Some(stage) => format!("{} [{}]: {}", e.kind(), stage, e),
            None => format!("{}: {}", e.kind(), e),
        },
        None => format!("{err:#}"),
    }
}

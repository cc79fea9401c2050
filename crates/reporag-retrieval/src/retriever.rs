use reporag_core::chunker::{chunk_file, ChunkingConfig};
use reporag_core::config::RagSettings;
use reporag_core::traits::{EmbeddingModel, ResourceFetcher};
use reporag_core::types::{Chunk, RepoTarget, RetrievalResult, Vector};
use reporag_core::{Error, Result, Stage};
use reporag_embed::Embedder;

use crate::filter::ExtensionFilter;
use crate::index::Index;

#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    pub chunking: ChunkingConfig,
    pub top_k: usize,
    pub filter: ExtensionFilter,
    pub embed_batch_size: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { chunking: ChunkingConfig::default(), top_k: 3, filter: ExtensionFilter::default(), embed_batch_size: 32 }
    }
}

impl RetrievalConfig {
    pub fn from_settings(rag: &RagSettings) -> Result<Self> {
        let config = Self {
            chunking: rag.chunking(),
            top_k: rag.top_k,
            filter: ExtensionFilter::new(rag.extensions.iter().cloned()),
            embed_batch_size: rag.embed_batch_size,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        if self.top_k == 0 {
            return Err(Error::InvalidConfiguration("top_k must be greater than 0".into()));
        }
        if self.embed_batch_size == 0 {
            return Err(Error::InvalidConfiguration("embed_batch_size must be greater than 0".into()));
        }
        Ok(())
    }
}

/// Index lifecycle within one session.
enum IndexState {
    /// Initialized, nothing fetched yet.
    Uninitialized,
    /// Built on the first query; reused until the next `initialize`.
    Ready(Index),
}

struct Session {
    target: RepoTarget,
    state: IndexState,
}

impl Session {
    fn index<F: ResourceFetcher, M: EmbeddingModel>(&mut self, fetcher: &F, embedder: &Embedder<M>, config: &RetrievalConfig) -> Result<&Index> {
        if let IndexState::Uninitialized = self.state {
            let index = build_index(fetcher, embedder, config, &self.target)?;
            self.state = IndexState::Ready(index);
        }
        match &self.state {
            IndexState::Ready(index) => Ok(index),
            IndexState::Uninitialized => Err(Error::NoContentAvailable(format!("index for {} was not built", self.target))),
        }
    }
}

/// One repository session: `initialize` binds it, the first query builds the
/// index. Not shareable across threads without external serialization.
pub struct Retriever<F, M = Box<dyn EmbeddingModel>> {
    fetcher: F,
    embedder: Embedder<M>,
    config: RetrievalConfig,
    session: Option<Session>,
}

impl<F: ResourceFetcher, M: EmbeddingModel> Retriever<F, M> {
    pub fn new(fetcher: F, embedder: Embedder<M>, config: RetrievalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { fetcher, embedder, config, session: None })
    }

    pub fn fetcher(&self) -> &F { &self.fetcher }

    pub fn target(&self) -> Option<&RepoTarget> { self.session.as_ref().map(|s| &s.target) }

    /// True once the current session's index has been built.
    pub fn is_ready(&self) -> bool {
        matches!(self.session, Some(Session { state: IndexState::Ready(_), .. }))
    }

    /// Number of indexed chunks, if the index is built.
    pub fn indexed_chunks(&self) -> Option<usize> {
        match &self.session {
            Some(Session { state: IndexState::Ready(index), .. }) => Some(index.len()),
            _ => None,
        }
    }

    /// Bind to a repository, discarding any index built for a previous one.
    pub fn initialize(&mut self, owner: &str, repo: &str, branch: &str) -> Result<()> {
        let target = RepoTarget::new(owner, repo, branch);
        self.session = None;
        self.fetcher
            .initialize(&target)
            .map_err(|e| Error::upstream(Stage::Initialize, target.to_string(), e))?;
        tracing::info!(target = %target, "session initialized");
        self.session = Some(Session { target, state: IndexState::Uninitialized });
        Ok(())
    }

    /// Top-k with the configured `k`.
    pub fn retrieve(&mut self, query: &str) -> Result<Vec<RetrievalResult>> {
        let k = self.config.top_k;
        self.retrieve_topk(query, k)
    }

    pub fn retrieve_topk(&mut self, query: &str, k: usize) -> Result<Vec<RetrievalResult>> {
        if k == 0 {
            return Err(Error::InvalidConfiguration("k must be greater than 0".into()));
        }
        let Self { fetcher, embedder, config, session } = self;
        let session = session
            .as_mut()
            .ok_or_else(|| Error::InvalidConfiguration("retriever used before initialize".into()))?;
        let index = session.index(fetcher, embedder, config)?;
        let query_vec = embedder.embed_one(query)?;
        let hits = index.search(&query_vec, k)?;
        tracing::debug!(k, hits = hits.len(), best = hits.first().map(|h| h.score), "query answered");
        Ok(hits)
    }
}

fn build_index<F: ResourceFetcher, M: EmbeddingModel>(
    fetcher: &F,
    embedder: &Embedder<M>,
    config: &RetrievalConfig,
    target: &RepoTarget,
) -> Result<Index> {
    let listed = fetcher.list().map_err(|e| Error::upstream(Stage::List, target.to_string(), e))?;
    let total = listed.len();
    let files = config.filter.apply(listed);
    tracing::info!(target = %target, listed = total, eligible = files.len(), "building index");
    if files.is_empty() {
        return Err(Error::NoContentAvailable(format!(
            "no files matching {:?} in {} ({} listed)",
            config.filter.extensions(),
            target,
            total
        )));
    }

    let mut chunks: Vec<Chunk> = Vec::new();
    for file in &files {
        let content = fetcher.fetch(&file.uri).map_err(|e| Error::upstream(Stage::Fetch, file.uri.clone(), e))?;
        let file_chunks = chunk_file(file, &content, &config.chunking)?;
        tracing::debug!(name = %file.name, chunks = file_chunks.len(), "chunked file");
        chunks.extend(file_chunks);
    }
    if chunks.is_empty() {
        return Err(Error::NoContentAvailable(format!("all {} eligible files in {} are empty", files.len(), target)));
    }

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let mut vectors: Vec<Vector> = Vec::with_capacity(texts.len());
    for batch in texts.chunks(config.embed_batch_size) {
        vectors.extend(embedder.embed_batch(batch)?);
    }
    let index = Index::new(chunks, vectors)?;
    tracing::info!(target = %target, files = files.len(), chunks = index.len(), dim = embedder.dim(), "index ready");
    Ok(index)
}

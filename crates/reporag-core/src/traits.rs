//! Seams to the external collaborators. Implementations report failures as
//! `anyhow::Error`; the retrieval core attaches stage and resource context.

use crate::types::{FileDescriptor, RepoTarget};

/// Lists and fetches text resources of one repository session.
pub trait ResourceFetcher: Send + Sync {
    /// Bind the fetcher to a repository. Called once per session.
    fn initialize(&self, target: &RepoTarget) -> anyhow::Result<()>;
    fn list(&self) -> anyhow::Result<Vec<FileDescriptor>>;
    fn fetch(&self, uri: &str) -> anyhow::Result<String>;
}

/// Raw sentence-embedding model. Outputs need not be normalized but must all
/// have `dim()` components.
pub trait EmbeddingModel: Send + Sync {
    fn dim(&self) -> usize;
    fn encode_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// The LLM completion call.
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

impl<T: ResourceFetcher + ?Sized> ResourceFetcher for Box<T> {
    fn initialize(&self, target: &RepoTarget) -> anyhow::Result<()> { (**self).initialize(target) }
    fn list(&self) -> anyhow::Result<Vec<FileDescriptor>> { (**self).list() }
    fn fetch(&self, uri: &str) -> anyhow::Result<String> { (**self).fetch(uri) }
}

impl<T: EmbeddingModel + ?Sized> EmbeddingModel for Box<T> {
    fn dim(&self) -> usize { (**self).dim() }
    fn encode_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> { (**self).encode_batch(texts) }
}

impl<T: Generator + ?Sized> Generator for Box<T> {
    fn generate(&self, prompt: &str) -> anyhow::Result<String> { (**self).generate(prompt) }
}

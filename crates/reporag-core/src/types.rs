//! Domain types shared by the fetcher, embedder, index and composer.

use serde::{Deserialize, Serialize};

/// Embedding vector. Stored vectors are unit length, or all zeros when the
/// model produced a zero-norm output.
pub type Vector = Vec<f32>;

/// The repository a session is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoTarget {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl RepoTarget {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, branch: impl Into<String>) -> Self {
        Self { owner: owner.into(), repo: repo.into(), branch: branch.into() }
    }
}

impl std::fmt::Display for RepoTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.branch)
    }
}

/// A fetchable resource as returned by `resources/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub uri: String,
    pub name: String,
}

/// A word window extracted from one source file.
///
/// - `uri`/`name`: the resource the window came from
/// - `index`: position of the window within that resource, starting at 0
/// - `text`: the window's tokens joined by single spaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub uri: String,
    pub name: String,
    pub index: usize,
    pub text: String,
}

/// One scored hit of a top-k query. `score` is cosine similarity in [-1, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub chunk: Chunk,
    pub score: f32,
}

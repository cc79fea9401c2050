use reporag_core::types::{Chunk, RetrievalResult, Vector};
use reporag_core::{Error, Result, Stage};

/// Chunks with their parallel unit vectors, in indexing order.
#[derive(Debug, Clone)]
pub struct Index {
    chunks: Vec<Chunk>,
    vectors: Vec<Vector>,
}

impl Index {
    pub fn new(chunks: Vec<Chunk>, vectors: Vec<Vector>) -> Result<Self> {
        if chunks.len() != vectors.len() {
            return Err(Error::upstream(
                Stage::Embed,
                "index",
                anyhow::anyhow!("{} chunks but {} vectors", chunks.len(), vectors.len()),
            ));
        }
        if chunks.is_empty() {
            return Err(Error::NoContentAvailable("index has no chunks".into()));
        }
        Ok(Self { chunks, vectors })
    }

    pub fn len(&self) -> usize { self.chunks.len() }

    pub fn is_empty(&self) -> bool { self.chunks.is_empty() }

    /// Score every stored vector against `query` and return the best `k`,
    /// highest first. Equal scores keep indexing order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievalResult>> {
        if k == 0 {
            return Err(Error::InvalidConfiguration("k must be greater than 0".into()));
        }
        if let Some(stored) = self.vectors.first() {
            if stored.len() != query.len() {
                return Err(Error::upstream(
                    Stage::Embed,
                    "query",
                    anyhow::anyhow!("query has {} dimensions, index has {}", query.len(), stored.len()),
                ));
            }
        }
        let scores: Vec<f32> = self.vectors.iter().map(|v| dot(v, query)).collect();
        Ok(rank_top_k(&scores, k)
            .into_iter()
            .map(|(i, score)| RetrievalResult { chunk: self.chunks[i].clone(), score })
            .collect())
    }
}

/// Cosine similarity of unit vectors.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Positions and scores of the `k` best scores, descending. The sort is
/// stable, so ties favor the earlier position.
pub fn rank_top_k(scores: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(k);
    ranked
}

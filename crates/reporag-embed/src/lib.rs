//! Embedding for the retrieval pipeline.
//!
//! `Embedder` wraps any `EmbeddingModel` and owns normalization: every vector
//! it returns has unit L2 norm, except zero-norm model outputs which stay
//! all-zero (similarity 0 against any query).

pub mod device;
pub mod fake;
pub mod model;
pub mod pool;
pub mod tokenize;

pub use fake::FakeModel;
pub use model::{resolve_model_dir, SentenceModel};
pub use pool::masked_mean;

use reporag_core::config::EmbedSettings;
use reporag_core::traits::EmbeddingModel;
use reporag_core::types::Vector;
use reporag_core::{Error, Result, Stage};

pub const FAKE_DIM: usize = 384;

pub struct Embedder<M = Box<dyn EmbeddingModel>> { model: M }

impl<M: EmbeddingModel> Embedder<M> {
    pub fn new(model: M) -> Self { Self { model } }

    pub fn dim(&self) -> usize { self.model.dim() }

    /// Embed and normalize a batch. Fails with `EmptyInput` on an empty batch.
    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        self.embed_labeled(texts, format!("batch of {} texts", texts.len()))
    }

    /// Embed the query text. Failures name the resource `query`.
    pub fn embed_one(&self, text: &str) -> Result<Vector> {
        let mut vs = self.embed_labeled(&[text.to_string()], "query".to_string())?;
        vs.pop().ok_or(Error::EmptyInput)
    }

    fn embed_labeled(&self, texts: &[String], resource: String) -> Result<Vec<Vector>> {
        if texts.is_empty() { return Err(Error::EmptyInput); }
        let raw = self.model.encode_batch(texts).map_err(|e| Error::upstream(Stage::Embed, resource.clone(), e))?;
        if raw.len() != texts.len() {
            return Err(Error::upstream(Stage::Embed, resource, anyhow::anyhow!("model returned {} vectors for {} inputs", raw.len(), texts.len())));
        }
        let dim = self.model.dim();
        raw.into_iter().enumerate().map(|(i, v)| {
            if v.len() != dim {
                return Err(Error::upstream(Stage::Embed, format!("{resource}, input #{i}"), anyhow::anyhow!("expected {} dimensions, got {}", dim, v.len())));
            }
            normalize(v).map_err(|e| Error::upstream(Stage::Embed, format!("{resource}, input #{i}"), e))
        }).collect()
    }
}

/// Divide by the Euclidean norm. A zero vector is returned unchanged.
///
/// The norm is accumulated in f64 after scaling by the largest magnitude, so
/// tiny or huge finite outputs still come back unit length.
pub fn normalize(mut v: Vec<f32>) -> anyhow::Result<Vector> {
    if v.iter().any(|x| !x.is_finite()) { anyhow::bail!("vector contains non-finite components"); }
    let max = v.iter().fold(0f64, |m, x| m.max(f64::from(x.abs())));
    if max == 0.0 {
        tracing::warn!(dim = v.len(), "zero-norm embedding kept as zero vector");
        return Ok(v);
    }
    let norm = max * v.iter().map(|x| { let s = f64::from(*x) / max; s * s }).sum::<f64>().sqrt();
    for x in &mut v { *x = (f64::from(*x) / norm) as f32; }
    Ok(v)
}

/// Fake model when `APP_USE_FAKE_EMBEDDINGS` is set, the local sentence model otherwise.
pub fn get_default_model(settings: &EmbedSettings) -> anyhow::Result<Box<dyn EmbeddingModel>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false);
    if use_fake { tracing::info!("using FakeModel"); return Ok(Box::new(FakeModel::new(FAKE_DIM))); }
    let dir = resolve_model_dir(settings.model_dir.as_deref())?;
    Ok(Box::new(SentenceModel::load(&dir, settings.max_len)?))
}

pub fn get_default_embedder(settings: &EmbedSettings) -> anyhow::Result<Embedder> {
    Ok(Embedder::new(get_default_model(settings)?))
}

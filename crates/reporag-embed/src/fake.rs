use anyhow::Result;
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use reporag_core::traits::EmbeddingModel;

/// Deterministic bag-of-tokens model for tests and offline development.
/// Outputs are raw (not unit length); text without tokens maps to zeros.
/// With `dim == 0` every text maps to an empty vector.
pub struct FakeModel { dim: usize }

impl FakeModel { pub fn new(dim: usize) -> Self { Self { dim } } }

impl EmbeddingModel for FakeModel {
    fn dim(&self) -> usize { self.dim }
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| {
            let mut v = vec![0f32; self.dim];
            if self.dim == 0 { return v; }
            for (i, token) in text.split_whitespace().enumerate() {
                let mut hasher = XxHash64::with_seed(0); token.hash(&mut hasher); let h = hasher.finish();
                let idx = (h as usize) % self.dim; let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
                v[idx] += 1.0 + val + (i as f32 % 3.0) * 0.01;
            }
            v
        }).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dim_yields_empty_vectors() {
        let out = FakeModel::new(0).encode_batch(&["some tokens here".to_string()]).unwrap();
        assert_eq!(out, vec![Vec::<f32>::new()]);
    }

    #[test]
    fn same_text_same_vector() {
        let m = FakeModel::new(8);
        let out = m.encode_batch(&["a b".to_string(), "a b".to_string()]).unwrap();
        assert_eq!(out[0], out[1]);
        assert_eq!(out[0].len(), 8);
    }
}

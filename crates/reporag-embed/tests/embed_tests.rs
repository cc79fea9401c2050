use reporag_core::config::EmbedSettings;
use reporag_core::traits::EmbeddingModel;
use reporag_core::{Error, Stage};
use reporag_embed::{get_default_embedder, Embedder, FakeModel, FAKE_DIM};

fn dot(a: &[f32], b: &[f32]) -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() }

fn norm(v: &[f32]) -> f32 { dot(v, v).sqrt() }

#[test]
fn fake_embedder_shapes_and_determinism() {
    // Force fake model to avoid loading weights
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");

    let embedder = get_default_embedder(&EmbedSettings::default()).expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), FAKE_DIM);
    assert!((norm(v1) - 1.0).abs() <= 1e-6, "vector is L2-normalized (norm={})", norm(v1));
    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn every_vector_is_unit_length_or_zero() {
    let embedder = Embedder::new(FakeModel::new(64));
    let texts: Vec<String> = vec![
        "def main(): pass".into(),
        "   ".into(),
        "import numpy as np".into(),
        "x".into(),
    ];
    let raw = FakeModel::new(64).encode_batch(&texts).unwrap();
    assert!(raw.iter().any(|v| (norm(v) - 1.0).abs() > 1e-3), "fake model output is not pre-normalized");

    let vs = embedder.embed_batch(&texts).unwrap();
    assert_eq!(vs.len(), texts.len());
    for (text, v) in texts.iter().zip(&vs) {
        if text.trim().is_empty() {
            assert!(v.iter().all(|x| *x == 0.0));
        } else {
            assert!((norm(v) - 1.0).abs() <= 1e-6, "text={text:?}");
        }
    }
}

#[test]
fn self_similarity_is_one() {
    let embedder = Embedder::new(FakeModel::new(128));
    let a = embedder.embed_one("fn retrieve_topk(query, k)").unwrap();
    let b = embedder.embed_one("fn retrieve_topk(query, k)").unwrap();
    assert!((dot(&a, &b) - 1.0).abs() <= 1e-6);
}

#[test]
fn zero_vector_scores_zero() {
    let embedder = Embedder::new(FakeModel::new(32));
    let zero = embedder.embed_one("\n\t").unwrap();
    let q = embedder.embed_one("anything at all").unwrap();
    assert_eq!(dot(&zero, &q), 0.0);
}

#[test]
fn empty_batch_is_rejected() {
    let embedder = Embedder::new(FakeModel::new(8));
    assert!(matches!(embedder.embed_batch(&[]), Err(Error::EmptyInput)));
}

struct BrokenModel;

impl EmbeddingModel for BrokenModel {
    fn dim(&self) -> usize { 4 }
    fn encode_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        if texts[0] == "fail" { anyhow::bail!("model server unavailable"); }
        Ok(texts.iter().map(|_| vec![1.0, 2.0]).collect())
    }
}

#[test]
fn model_failures_surface_as_embed_stage_errors() {
    let embedder = Embedder::new(BrokenModel);
    let err = embedder.embed_one("fail").unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Embed));
    assert!(err.to_string().contains("model server unavailable"));
    assert!(err.to_string().contains("(query)"), "{err}");

    let err = embedder.embed_one("wrong dims").unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Embed));
    assert!(err.to_string().contains("expected 4 dimensions"));

    let err = embedder.embed_batch(&["fail".to_string(), "x".to_string()]).unwrap_err();
    assert!(err.to_string().contains("(batch of 2 texts)"), "{err}");
}

#[test]
#[ignore = "requires local model weights (APP_MODEL_DIR)"]
fn sentence_model_embeds_unit_vectors() {
    std::env::remove_var("APP_USE_FAKE_EMBEDDINGS");
    let embedder = get_default_embedder(&EmbedSettings::default()).expect("embedder");
    let v = embedder.embed_one("hello world").expect("embed");
    assert_eq!(v.len(), embedder.dim());
    assert!((norm(&v) - 1.0).abs() <= 1e-5);
}

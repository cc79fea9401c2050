//! In-memory retrieval over one repository session.
//!
//! `Retriever` fetches eligible files, chunks and embeds them on the first
//! query, then answers top-k cosine queries against the resulting `Index`.

pub mod filter;
pub mod index;
pub mod retriever;

pub use filter::ExtensionFilter;
pub use index::{dot, rank_top_k, Index};
pub use retriever::{RetrievalConfig, Retriever};

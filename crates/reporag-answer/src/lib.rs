//! Prompt construction and the LLM call.
//!
//! `compose` turns retrieval results into a question-answering prompt,
//! `readme` builds the repository documentation prompt, and `gemini` is the
//! HTTP `Generator` used by the binaries.

pub mod compose;
pub mod gemini;
pub mod readme;

pub use compose::{answer, build_prompt, compose_context, CONTEXT_SEPARATOR};
pub use gemini::{GeminiClient, GenerateError};
pub use readme::{build_readme_prompt, collect_sources, generate_readme};

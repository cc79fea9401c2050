use reporag_core::traits::Generator;
use reporag_core::types::RetrievalResult;
use reporag_core::{Error, Result, Stage};

/// Placed between consecutive chunks in the context block.
pub const CONTEXT_SEPARATOR: &str = "\n\n----\n\n";

/// Instruction preamble of the question-answering prompt.
pub const SYSTEM_PROMPT: &str = "You are an AI Engineer helping answer questions about a software repository based on the following code context.";

/// Join chunk texts in the order given.
pub fn compose_context(results: &[RetrievalResult]) -> String {
    results.iter().map(|r| r.chunk.text.as_str()).collect::<Vec<_>>().join(CONTEXT_SEPARATOR)
}

/// Build the complete prompt sent to the LLM
pub fn build_prompt(query: &str, results: &[RetrievalResult]) -> String {
    format!(
        "{system}\n\nContext (top {n} chunks):\n{context}\n\nUser question:\n{query}\n\nAnswer:",
        system = SYSTEM_PROMPT,
        n = results.len(),
        context = compose_context(results),
        query = query
    )
}

/// Ask the generator and return its trimmed reply. Failures are not retried.
pub fn answer<G: Generator + ?Sized>(generator: &G, query: &str, results: &[RetrievalResult]) -> Result<String> {
    let prompt = build_prompt(query, results);
    tracing::debug!(chunks = results.len(), prompt_chars = prompt.len(), "generating answer");
    let reply = generator.generate(&prompt).map_err(|e| Error::upstream(Stage::Generate, "answer", e))?;
    Ok(reply.trim().to_string())
}

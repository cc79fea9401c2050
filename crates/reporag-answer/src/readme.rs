//! Whole-repository README generation.

use reporag_core::traits::{Generator, ResourceFetcher};
use reporag_core::types::{FileDescriptor, RepoTarget};
use reporag_core::{Error, Result, Stage};

const README_INSTRUCTION: &str = "Generate a comprehensive README in Markdown format for this repository. Use the following file contents as reference:";

/// Fetch every listed resource, unfiltered, in listing order.
pub fn collect_sources<F: ResourceFetcher + ?Sized>(fetcher: &F, target: &RepoTarget) -> Result<Vec<(FileDescriptor, String)>> {
    fetcher.initialize(target).map_err(|e| Error::upstream(Stage::Initialize, target.to_string(), e))?;
    let files = fetcher.list().map_err(|e| Error::upstream(Stage::List, target.to_string(), e))?;
    if files.is_empty() {
        return Err(Error::NoContentAvailable(format!("no resources listed for {target}")));
    }
    let mut sources = Vec::with_capacity(files.len());
    for file in files {
        let content = fetcher.fetch(&file.uri).map_err(|e| Error::upstream(Stage::Fetch, file.uri.clone(), e))?;
        tracing::debug!(name = %file.name, bytes = content.len(), "collected source");
        sources.push((file, content));
    }
    Ok(sources)
}

pub fn build_readme_prompt(sources: &[(FileDescriptor, String)]) -> String {
    let mut combined = String::new();
    for (file, content) in sources {
        combined.push_str(&format!("\n\n### {}\n\n{}", file.name, content));
    }
    format!("{README_INSTRUCTION}\n{combined}")
}

pub fn generate_readme<F, G>(fetcher: &F, generator: &G, target: &RepoTarget) -> Result<String>
where
    F: ResourceFetcher + ?Sized,
    G: Generator + ?Sized,
{
    let sources = collect_sources(fetcher, target)?;
    let prompt = build_readme_prompt(&sources);
    tracing::info!(target = %target, files = sources.len(), prompt_chars = prompt.len(), "generating README");
    let text = generator.generate(&prompt).map_err(|e| Error::upstream(Stage::Generate, "readme", e))?;
    Ok(text.trim().to_string())
}

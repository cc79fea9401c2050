use clap::{Parser, Subcommand};

use reporag_answer::{answer, GeminiClient};
use reporag_cli::{describe_error, init_tracing, load_settings, repo_target, spinner, CommonArgs};
use reporag_embed::get_default_embedder;
use reporag_mcp::McpFetcher;
use reporag_retrieval::{RetrievalConfig, Retriever};

#[derive(Debug, Parser)]
#[command(name = "reporag", about = "Ask questions about a remote repository")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Answer a question from the top-k retrieved chunks
    Ask { question: String },
    /// Print the top-k chunks for a query without calling the LLM
    Search { query: String },
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings(&cli.common)?;
    let target = repo_target(&settings)?;
    let embedder = get_default_embedder(&settings.embed)?;
    let config = RetrievalConfig::from_settings(&settings.rag)?;
    let mut retriever = Retriever::new(McpFetcher::new(&settings.rpc.server_url), embedder, config)?;
    retriever.initialize(&target.owner, &target.repo, &target.branch)?;
    tracing::debug!(target = %target, top_k = settings.rag.top_k, "retriever ready");

    match cli.command {
        Command::Search { query } => {
            let pb = spinner(&format!("Indexing {target}"));
            let results = retriever.retrieve(&query);
            pb.finish_and_clear();
            let results = results?;
            println!("Found {} results for: \"{}\"", results.len(), query);
            for (i, r) in results.iter().enumerate() {
                println!("\n  {}. score={:.4}  {}#{}", i + 1, r.score, r.chunk.name, r.chunk.index);
                println!("     {}", r.chunk.text);
            }
        }
        Command::Ask { question } => {
            let generator = GeminiClient::from_settings(&settings.llm)?;
            let pb = spinner(&format!("Indexing {target}"));
            let results = retriever.retrieve(&question);
            pb.set_message(format!("Asking {}", generator.model()));
            let reply = results.and_then(|results| answer(&generator, &question, &results));
            pb.finish_and_clear();
            println!("{}", reply?);
        }
    }
    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {}", describe_error(&err));
        std::process::exit(1);
    }
}

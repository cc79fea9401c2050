use clap::Parser;

use reporag_answer::{generate_readme, GeminiClient};
use reporag_cli::{describe_error, init_tracing, load_settings, repo_target, spinner, write_output, CommonArgs};
use reporag_mcp::McpFetcher;

#[derive(Debug, Parser)]
#[command(name = "reporag-readme", about = "Generate a README for a remote repository")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
    /// Output file, relative to the current directory
    #[arg(long, short, default_value = "GENERATED_README.md")]
    output: String,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings(&cli.common)?;
    let target = repo_target(&settings)?;
    let generator = GeminiClient::from_settings(&settings.llm)?;
    let fetcher = McpFetcher::new(&settings.rpc.server_url);
    tracing::debug!(target = %target, server = %settings.rpc.server_url, "collecting sources");

    let pb = spinner(&format!("Reading {target}"));
    let readme = generate_readme(&fetcher, &generator, &target);
    pb.finish_and_clear();
    let path = write_output(&std::env::current_dir()?, &cli.output, &readme?)?;
    println!("README written to {}", path.display());
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

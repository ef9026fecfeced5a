//! Counsel - Legal Drafting Assistant
//!
//! Main entry point for the CLI application.

use std::path::PathBuf;

use clap::Parser;
use counsel::agent::PromptKind;
use counsel::{Agent, Config, Repl};
use tracing_subscriber::EnvFilter;

/// Counsel - Legal Drafting Assistant
#[derive(Parser, Debug)]
#[command(name = "counsel")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Model as provider/model, e.g. anthropic/claude-3-5-haiku-latest
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Maximum graph steps per user message
    #[arg(long)]
    max_steps: Option<usize>,

    /// Maximum results returned by a web search
    #[arg(long)]
    max_search_results: Option<usize>,

    /// System prompt template
    #[arg(long, short = 't', value_enum)]
    template: Option<PromptKind>,

    /// Custom system prompt text (may contain {system_time})
    #[arg(long, conflicts_with = "template")]
    system_prompt: Option<String>,

    /// Directory drafted documents are written to
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,

    /// Single prompt mode (non-interactive)
    #[arg(long, short = 'p')]
    prompt: Option<String>,
}

fn init_tracing(debug: bool) {
    let default = if debug { "counsel=debug" } else { "counsel=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(model) = args.model {
        config.model.model = model;
    }
    if let Some(max_steps) = args.max_steps {
        config.agent.max_steps = max_steps;
    }
    if let Some(max_results) = args.max_search_results {
        config.search.max_search_results = max_results;
    }
    if let Some(template) = args.template {
        config.agent.prompt_template = template;
        config.agent.system_prompt = None;
    }
    if let Some(system_prompt) = args.system_prompt {
        config.agent.system_prompt = Some(system_prompt);
    }
    if let Some(output_dir) = args.output_dir {
        config.documents.output_dir = output_dir;
    }

    // Single prompt mode
    if let Some(prompt) = args.prompt {
        let mut agent = Agent::with_config(&config)?;
        let response = agent.process(&prompt).await?;
        println!("{}", response);
        return Ok(());
    }

    // Interactive REPL mode
    let mut repl = Repl::with_config(config)?;
    repl.run().await?;

    Ok(())
}

//! ragloom CLI binary: index the configured sources, then answer questions.

mod logging;
mod repl;

use clap::Parser;
use cli::display::{render_answer, render_ready};
use cli::{apply_options, ask, RunError, RunOptions};
use ragloom::{RagConfig, RagSystem, RespondStrategy};
use repl::run_repl_loop;

#[derive(Parser, Debug)]
#[command(name = "ragloom")]
#[command(about = "ragloom: ask questions against an indexed document corpus")]
struct Args {
    /// Question (or pass as positional arguments)
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Positional args: question when -m/--message is not used
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,

    /// How the answer is produced: direct (one LLM call) or agentic (tool loop)
    #[arg(long, value_name = "STRATEGY", value_parser = parse_strategy)]
    strategy: Option<RespondStrategy>,

    /// Source to ingest: URL, .txt file or directory of .txt files. Repeatable; replaces RAG_SOURCES
    #[arg(long = "source", value_name = "S")]
    sources: Vec<String>,

    /// Verbose: log to stderr (unless LOG_FILE is set)
    #[arg(short, long)]
    verbose: bool,

    /// Interactive REPL: after the first answer (if any), keep asking
    #[arg(short, long)]
    interactive: bool,

    /// Print each result as one JSON object
    #[arg(long)]
    json: bool,
}

fn parse_strategy(s: &str) -> Result<RespondStrategy, String> {
    s.parse()
}

fn question_from(args: &Args) -> Option<String> {
    args.message
        .clone()
        .or_else(|| (!args.rest.is_empty()).then(|| args.rest.join(" ")))
        .filter(|q| !q.trim().is_empty())
}

async fn run(args: Args) -> Result<(), RunError> {
    let opts = RunOptions {
        strategy: args.strategy,
        sources: args.sources.clone(),
        verbose: args.verbose,
        output_json: args.json,
    };
    let config = apply_options(RagConfig::from_env()?, &opts);
    tracing::info!(
        model = %config.model,
        strategy = %config.strategy,
        sources = config.sources.len(),
        "starting"
    );

    let system = RagSystem::from_config(config);
    eprintln!("Initializing RAG system...");
    let ready = system.initialize().await.map_err(RunError::Init)?;
    eprintln!("{}", render_ready(ready.num_chunks()));

    let question = question_from(&args);
    if let Some(q) = &question {
        let result = ask(&system, q).await?;
        if opts.output_json {
            println!("{}", serde_json::to_string(&result)?);
        } else {
            println!("{}", render_answer(&result));
        }
    }
    if args.interactive || question.is_none() {
        run_repl_loop(&system, &opts).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = config::load_and_apply("ragloom", None) {
        eprintln!("warning: {}", e);
    }
    if let Err(e) = logging::init(args.verbose) {
        eprintln!("warning: logging disabled: {}", e);
    }

    if let Err(e) = run(args).await {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}

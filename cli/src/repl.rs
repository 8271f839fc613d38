//! Interactive loop: read a question, answer it, show recent searches.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use cli::display::render_answer;
use cli::{ask, History, RunError, RunOptions};
use ragloom::RagSystem;

fn is_quit_command(line: &str) -> bool {
    matches!(line, "quit" | "exit" | "/quit")
}

/// Runs until EOF or a quit command. Per-question failures are printed and the loop continues.
pub async fn run_repl_loop(system: &RagSystem, opts: &RunOptions) -> Result<(), RunError> {
    let mut history = History::new();
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut stdout = tokio::io::stdout();

    eprintln!("Ask a question (quit, exit or /quit to leave).");
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if is_quit_command(question) {
            break;
        }

        match ask(system, question).await {
            Ok(result) => {
                if opts.output_json {
                    println!("{}", serde_json::to_string(&result)?);
                } else {
                    println!("{}\n", render_answer(&result));
                }
                history.push(&result);
                if !opts.output_json {
                    println!("{}", history.render());
                }
            }
            Err(e) => eprintln!("{}", e),
        }
    }
    eprintln!("Bye.");
    Ok(())
}

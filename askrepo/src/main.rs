//! Ask a question about a source tree.
//!
//! Scans the project, lets a reasoning service pick the files it needs round
//! by round, then answers from the collected contents. Every failure is
//! reported on stdout and the process still exits normally.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use askrepo::answer::synthesize_answer;
use askrepo::io::config::load_config_from_env;
use askrepo::io::service::{HttpReasoningService, ReasoningService};
use askrepo::logging;
use askrepo::looping::{SessionEvent, SessionOutcome, SessionStop, SkipReason, run_session};

#[derive(Parser)]
#[command(
    name = "askrepo",
    version,
    about = "Answer questions about a source tree by iterative file retrieval"
)]
struct Cli {
    /// Root directory of the project to analyze.
    #[arg(long = "project-dir", alias = "project_dir", value_name = "PATH")]
    project_dir: PathBuf,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        println!("error: {:#}", err);
    }
}

fn run(cli: &Cli) -> Result<()> {
    println!("project directory: {}", cli.project_dir.display());
    let config = load_config_from_env()?;
    let question = read_question(io::stdin().lock(), io::stdout())?;

    let service = HttpReasoningService::from_config(&config.service)?;
    println!("scanning project structure...");
    let outcome = run_session(&service, &question, &cli.project_dir, &config, print_event)?;
    report(&service, &question, &outcome)
}

/// Prompt for the question and read one line.
fn read_question<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<String> {
    write!(output, "question: ").context("write prompt")?;
    output.flush().context("flush prompt")?;
    let mut line = String::new();
    input.read_line(&mut line).context("read question")?;
    let question = line.trim();
    if question.is_empty() {
        bail!("question must not be empty");
    }
    Ok(question.to_string())
}

fn print_event(event: &SessionEvent<'_>) {
    match event {
        SessionEvent::Scanned { files } => {
            println!("project scan complete: {files} files");
        }
        SessionEvent::Requesting { round } => {
            println!("round {round}: asking which files are needed...");
        }
        SessionEvent::Selected { files, .. } => {
            println!("selected files: {}", files.join(", "));
            println!("collecting file contents...");
        }
        SessionEvent::Fetched { path, bytes } => {
            println!("  collected {path} ({bytes} bytes)");
        }
        SessionEvent::Skipped {
            path,
            reason: SkipReason::AlreadyCollected,
        } => println!("  {path} already collected"),
        SessionEvent::Skipped {
            path,
            reason: SkipReason::Unreadable,
        } => println!("  {path} contributed no content"),
    }
}

/// Print the outcome, synthesizing an answer when the session allows one.
fn report<S: ReasoningService>(
    service: &S,
    question: &str,
    outcome: &SessionOutcome,
) -> Result<()> {
    match &outcome.stop {
        SessionStop::Insufficient { max_iterations } => {
            println!(
                "could not collect enough information to answer the question ({max_iterations} rounds without convergence)"
            );
            return Ok(());
        }
        SessionStop::SelectionExhausted { .. } => {
            println!("no valid file selection; answering from the files collected so far");
        }
        SessionStop::Converged => {
            println!("no further files needed");
        }
    }

    if outcome.collected.is_empty() {
        println!("no file content available to generate an answer");
        return Ok(());
    }

    let answer = synthesize_answer(service, question, &outcome.collected)?;
    println!("answer: {answer}");
    Ok(())
}

//! Guided API tester CLI
//!
//! - `list` prints the scenario
//! - `auto` runs every step from a given one with pacing and prints a summary
//! - `step` runs a single step, optionally with an edited payload
//! - `reset` forgets the persisted token and email
//! - `interactive` reads runner commands from stdin

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use shared::logging::{init_tracing_with_level, log_error, log_shutdown, log_startup};
use shared::{Component, RunSummary, RunnerCommand, StepView};
use tester::{LiveController, RunnerConfig, RunnerConfigBuilder, Scenario, TerminalPresenter, services::presenter::format_step_card};

#[derive(Parser)]
#[command(name = "tester")]
#[command(about = "Guided API tester for the library service")]
struct Args {
    /// Base URL of the service under test (overrides TESTER_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// File holding the persisted token and email (overrides TESTER_STORAGE_PATH)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error (overrides TESTER_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every step of the scenario
    List,

    /// Run all steps from `--from` to the last one
    Auto {
        /// 1-based step to start from
        #[arg(long, default_value_t = 1)]
        from: usize,

        /// Skip the pauses between steps
        #[arg(long)]
        no_pacing: bool,
    },

    /// Run a single step
    Step {
        /// 1-based step number
        number: usize,

        /// JSON text replacing the step's payload template
        #[arg(long)]
        payload: Option<String>,
    },

    /// Forget the persisted token and email
    Reset,

    /// Read commands (run, next, back, jump N, auto, reset, list, quit) from stdin
    Interactive,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let component = Component::init_tester();

    let mut config = RunnerConfig::from_env().context("Failed to load configuration")?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(storage) = args.storage {
        config.storage_path = storage;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if let Command::Auto { no_pacing: true, .. } = args.command {
        config = RunnerConfigBuilder::from_config(config).without_pacing().build();
    }

    init_tracing_with_level(Some(&config.log_level));
    log_startup(component, &format!("tester against {}", config.base_url));

    let controller = LiveController::from_config(&config, Scenario::library_flow(), TerminalPresenter::new())?;

    let result = match args.command {
        Command::List => {
            for view in controller.views().await {
                println!("{}", format_step_card(&view));
            }
            Ok(())
        }
        Command::Auto { from, .. } => run_auto(&controller, from).await,
        Command::Step { number, payload } => run_step(&controller, number, payload).await,
        Command::Reset => controller
            .reset()
            .await
            .map(|_| println!("Session reset: persisted token and email removed"))
            .map_err(anyhow::Error::from),
        Command::Interactive => run_interactive(&controller).await,
    };

    if let Err(e) = &result {
        log_error(component, "tester", e);
    }
    log_shutdown(component, "done");
    result
}

async fn run_auto(controller: &LiveController<TerminalPresenter>, from: usize) -> anyhow::Result<()> {
    controller.restore().await?;
    controller.jump(step_index(from)?).await?;

    let summary = controller.auto_run().await?;
    print_summary(&controller.views().await, &summary);
    Ok(())
}

async fn run_step(
    controller: &LiveController<TerminalPresenter>,
    number: usize,
    payload: Option<String>,
) -> anyhow::Result<()> {
    controller.restore().await?;
    controller.jump(step_index(number)?).await?;
    controller.run_current(payload).await?;
    Ok(())
}

async fn run_interactive(controller: &LiveController<TerminalPresenter>) -> anyhow::Result<()> {
    controller.restore().await?;
    println!("Commands: run [json], next, back, jump N, auto, reset, list, quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            "quit" | "exit" => break,
            "list" => {
                for view in controller.views().await {
                    println!("{:>2}. {} {} {}", view.id, view.method, view.path, view.title);
                }
                continue;
            }
            _ => {}
        }

        let command: RunnerCommand = match line.parse() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        let is_auto = command == RunnerCommand::AutoRun;
        match controller.dispatch(command).await {
            Ok(_) if is_auto => print_summary(&controller.views().await, &controller.summary().await),
            Ok(_) => {}
            Err(e) => println!("Rejected: {e}"),
        }
    }

    Ok(())
}

fn step_index(number: usize) -> anyhow::Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("Step numbers start at 1"))
}

fn print_summary(views: &[StepView], summary: &RunSummary) {
    println!("{:<4} {:<36} {:<6} {:>8}  {}", "#", "Step", "Result", "Time", "Expected");
    for view in views {
        let (status, elapsed) = match &view.result {
            Some(result) => (result.status.to_string(), format!("{}ms", result.elapsed_ms)),
            None => ("-".to_string(), "-".to_string()),
        };
        let expected = match view.matches_expectation() {
            Some(true) => "yes",
            Some(false) => "NO",
            None => "-",
        };
        println!("{:<4} {:<36} {:<6} {:>8}  {}", view.id, view.title, status, elapsed, expected);
    }

    println!(
        "\n{}/{} executed, {} ok, {} failed",
        summary.executed, summary.total, summary.succeeded, summary.failed
    );
    if summary.all_as_expected() {
        println!("All steps behaved as expected");
    } else if !summary.unexpected.is_empty() {
        println!("Unexpected outcome in steps: {:?}", summary.unexpected);
    }
}

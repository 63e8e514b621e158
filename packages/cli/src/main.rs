mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    check, init, inspect, new, normalize, CheckArgs, InitArgs, InspectArgs, NewArgs,
    NormalizeArgs,
};
use tracing_subscriber::EnvFilter;

/// Alva CLI - inspect, validate and normalize design projects
#[derive(Parser, Debug)]
#[command(name = "alva")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log model operations (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write an alva.config.json
    Init(InitArgs),

    /// Create a project file with one page
    New(NewArgs),

    /// Summarize pages and print each page's element tree
    Inspect(InspectArgs),

    /// Verify structural integrity of project files
    Check(CheckArgs),

    /// Rewrite a project file in canonical form
    Normalize(NormalizeArgs),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::New(args) => new(args, &cwd),
            Command::Inspect(args) => inspect(args, &cwd),
            Command::Check(args) => check(args, &cwd),
            Command::Normalize(args) => normalize(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

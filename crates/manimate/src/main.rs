//! manimate CLI binary.
//!
//! - `animate` turns a prompt into a rendered video
//! - `check` verifies the render tool
//! - `version` prints version information

use clap::Parser;
use manimate::{LoggingOptions, ManimateConfig, ManimateError, init_logging};
use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    use cli::{AnimateOutcome, Cli, Commands, run_animate, run_check};

    // Parse command-line arguments
    let cli = Cli::parse();

    if let Err(e) = init_logging(LoggingOptions {
        verbose: cli.verbose,
        json: cli.json_logs,
    }) {
        eprintln!("{}", e.message);
        return ExitCode::FAILURE;
    }

    if let Commands::Version = cli.command {
        println!("manimate {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let config = match ManimateConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.message);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Animate(args) => match run_animate(args, &config).await {
            Ok(AnimateOutcome::Finished(result)) => {
                println!("✓ Animation created successfully!");
                println!("  Video: {}", result.artifact_path().display());
                println!("  Duration: {:.1}s", result.duration());
                println!("  Description: {}", result.description());
                if let Some(path) = result.archived_at() {
                    println!("  Script: {}", path.display());
                }
                if cli.verbose {
                    println!("  Scene: {}", result.entry_point());
                    println!("  Attempt: {}", result.attempt());
                }
                ExitCode::SUCCESS
            }
            Ok(AnimateOutcome::Cancelled) => {
                eprintln!("Operation cancelled by user");
                ExitCode::FAILURE
            }
            Err(e) => report(&e),
        },
        Commands::Check => match run_check(&config).await {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(e) => report(&e),
        },
        Commands::Version => ExitCode::SUCCESS,
    }
}

fn report(error: &ManimateError) -> ExitCode {
    eprintln!("✗ {}", error.kind());
    if let Some(suggestion) = error.suggestion() {
        eprintln!("  {}", suggestion);
    }
    ExitCode::FAILURE
}

//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use manimate::{Quality, Style};
use std::path::PathBuf;

/// manimate - turn a prompt into a rendered Manim animation
#[derive(Parser, Debug)]
#[command(name = "manimate")]
#[command(about = "Turn a prompt into a rendered Manim animation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate and render an animation
    Animate(AnimateArgs),

    /// Check that the render tool is installed
    Check,

    /// Print version information
    Version,
}

/// Arguments for `animate`
#[derive(Args, Debug, Clone)]
pub struct AnimateArgs {
    /// What to animate
    pub prompt: String,

    /// Visual style (light or dark)
    #[arg(long, default_value = "light")]
    pub style: Style,

    /// Output root; defaults to the configured one
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Render quality (low, medium or high); defaults to the configured one
    #[arg(long)]
    pub quality: Option<Quality>,

    /// Use the prompt as-is instead of expanding it into a brief
    #[arg(long)]
    pub no_enhance: bool,

    /// API key; overrides the environment
    #[arg(long, env = "MANIMATE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

//! Notewell CLI - markdown pipeline for flat-file notes.
//!
//! Provides commands for:
//! - `render`: Render a note to HTML through the full viewer pipeline
//! - `annotate`: Print the inline reference annotations of a note

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AnnotateArgs, RenderArgs};
use output::Output;

/// Notewell - notes that link themselves.
#[derive(Parser)]
#[command(name = "notewell", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown note to HTML.
    Render(RenderArgs),
    /// Print the annotation stream for a markdown note.
    Annotate(AnnotateArgs),
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let output = Output::new();

    let result = match cli.command {
        Commands::Render(args) => args.execute(&output),
        Commands::Annotate(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

//! # vast CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// VAST ad-template toolchain.
///
/// Parses VAST 2.0 documents from XML, JSON or YAML, validates the whole
/// object graph, and reports every violation at once.
#[derive(Parser, Debug)]
#[command(name = "vast", version, about)]
struct Cli {
    /// Emit logs as JSON lines instead of human-readable text.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate a document and print a summary or every violation.
    Validate(vast_cli::validate::ValidateArgs),
    /// Print the validated object graph as JSON.
    Inspect(vast_cli::inspect::InspectArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let mut stdout = std::io::stdout().lock();
    let code = match cli.command {
        Commands::Validate(args) => vast_cli::validate::run_validate(&args, &mut stdout)?,
        Commands::Inspect(args) => vast_cli::inspect::run_inspect(&args, &mut stdout)?,
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

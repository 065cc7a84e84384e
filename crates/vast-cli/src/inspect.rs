//! # Inspect Subcommand
//!
//! Prints the validated object graph. Invalid documents are reported the
//! same way `validate` reports them in text form.

use std::io::Write;

use clap::{Args, ValueEnum};
use vast_document::parse_document;

use crate::input::DocumentArgs;

/// Arguments for the inspect subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: DocumentArgs,

    /// Output encoding of the object graph.
    #[arg(long, value_enum, default_value_t = GraphFormat::Json)]
    pub output: GraphFormat,
}

/// Encoding of the printed object graph.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Json,
    Yaml,
}

/// Execute the inspect subcommand, returning the process exit code.
pub fn run_inspect(args: &InspectArgs, out: &mut dyn Write) -> anyhow::Result<i32> {
    let input = args.input.load()?;
    let vast = match parse_document(&input.content, input.format, &input.config) {
        Ok(vast) => vast,
        Err(err) => {
            writeln!(out, "FAIL {}: {err}", args.input.file.display())?;
            return Ok(1);
        }
    };

    match args.output {
        GraphFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &vast)?;
            writeln!(out)?;
        }
        GraphFormat::Yaml => serde_yaml::to_writer(&mut *out, &vast)?,
    }
    Ok(0)
}

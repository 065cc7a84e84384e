//! # Validate Subcommand
//!
//! Parses and validates one document. A valid document prints a one-line
//! summary and exits 0; an invalid one prints every violation and exits 1.
//! Failures that prevent reading the document at all (missing file, bad
//! configuration) are returned as errors.

use std::io::Write;
use std::path::Path;

use clap::{Args, ValueEnum};
use serde::Serialize;
use vast_core::Violation;
use vast_document::{parse_document, DocumentError};
use vast_model::Vast;

use crate::input::DocumentArgs;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: DocumentArgs,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub report: ReportFormat,
}

/// Output format of the validation report.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Key facts about a valid document.
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub version: &'a str,
    pub ad_id: &'a str,
    pub kind: &'static str,
    pub creatives: usize,
}

impl<'a> Summary<'a> {
    fn of(vast: &'a Vast) -> Self {
        let ad = vast.ad();
        Self {
            version: vast.version(),
            ad_id: ad.id(),
            kind: ad.kind().as_str(),
            creatives: ad.kind().creatives().len(),
        }
    }
}

/// Machine-readable validation report.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub file: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub violations: &'a [Violation],
}

impl<'a> Report<'a> {
    fn new(file: &Path, outcome: &'a Result<Vast, DocumentError>) -> Self {
        let file = file.display().to_string();
        match outcome {
            Ok(vast) => Self {
                file,
                valid: true,
                summary: Some(Summary::of(vast)),
                error: None,
                violations: &[],
            },
            Err(DocumentError::Validation(err)) => Self {
                file,
                valid: false,
                summary: None,
                error: None,
                violations: err.violations(),
            },
            Err(err) => Self {
                file,
                valid: false,
                summary: None,
                error: Some(err.to_string()),
                violations: &[],
            },
        }
    }

    fn write_text(&self, out: &mut dyn Write) -> std::io::Result<()> {
        if let Some(summary) = &self.summary {
            return writeln!(
                out,
                "OK {}: VAST {} {} ad '{}' with {} creative(s)",
                self.file, summary.version, summary.kind, summary.ad_id, summary.creatives
            );
        }
        if let Some(error) = &self.error {
            return writeln!(out, "FAIL {}: {error}", self.file);
        }
        writeln!(out, "FAIL {}: {} violation(s)", self.file, self.violations.len())?;
        for violation in self.violations {
            writeln!(out, "{violation}")?;
        }
        Ok(())
    }
}

/// Execute the validate subcommand, returning the process exit code.
pub fn run_validate(args: &ValidateArgs, out: &mut dyn Write) -> anyhow::Result<i32> {
    let input = args.input.load()?;
    let outcome = parse_document(&input.content, input.format, &input.config);
    if let Err(err) = &outcome {
        tracing::info!(file = %args.input.file.display(), error = %err, "document rejected");
    }

    let report = Report::new(&args.input.file, &outcome);
    match args.report {
        ReportFormat::Text => report.write_text(out)?,
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(if report.valid { 0 } else { 1 })
}

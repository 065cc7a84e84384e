//! # Document Input
//!
//! Arguments shared by every subcommand that reads a document, and the
//! loading step they have in common.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, ValueEnum};
use vast_document::{AssemblerConfig, Format};

/// `--format` values.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Xml,
    Json,
    Yaml,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Xml => Format::Xml,
            FormatArg::Json => Format::Json,
            FormatArg::Yaml => Format::Yaml,
        }
    }
}

/// Input document selection.
#[derive(Args, Debug, Clone)]
pub struct DocumentArgs {
    /// Document to read.
    pub file: PathBuf,

    /// Input format. Inferred from the file extension when omitted.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Assembler configuration (YAML).
    #[arg(long, env = "VAST_CONFIG")]
    pub config: Option<PathBuf>,
}

/// A document read from disk together with the settings to parse it.
#[derive(Debug)]
pub struct LoadedInput {
    pub content: String,
    pub format: Format,
    pub config: AssemblerConfig,
}

impl DocumentArgs {
    /// Read the document and resolve its format and configuration.
    pub fn load(&self) -> anyhow::Result<LoadedInput> {
        let format = match self.format {
            Some(arg) => arg.into(),
            None => Format::from_path(&self.file).with_context(|| {
                format!(
                    "cannot infer the format of {}; pass --format xml|json|yaml",
                    self.file.display()
                )
            })?,
        };
        let config = match &self.config {
            Some(path) => load_config(path)?,
            None => AssemblerConfig::default(),
        };
        let content = std::fs::read_to_string(&self.file)
            .with_context(|| format!("failed to read {}", self.file.display()))?;
        tracing::debug!(file = %self.file.display(), format = %format, "loaded document");
        Ok(LoadedInput {
            content,
            format,
            config,
        })
    }
}

fn load_config(path: &Path) -> anyhow::Result<AssemblerConfig> {
    AssemblerConfig::load(path).with_context(|| format!("invalid configuration {}", path.display()))
}

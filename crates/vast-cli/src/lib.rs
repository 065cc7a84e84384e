//! # vast-cli — VAST Command-Line Interface
//!
//! ## Subcommands
//!
//! - `validate`: parse and validate a document, print a summary or every
//!   violation (text or JSON), exit non-zero on failure
//! - `inspect`: print the validated object graph as JSON or YAML
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handlers delegate parsing and validation to the domain crates.
//! - Handlers write to a caller-supplied writer and return the exit code,
//!   so they can be driven from tests.

pub mod input;
pub mod inspect;
pub mod validate;

// Re-export primary types for ergonomic imports.
pub use input::DocumentArgs;
pub use inspect::{run_inspect, InspectArgs};
pub use validate::{run_validate, ReportFormat, ValidateArgs};

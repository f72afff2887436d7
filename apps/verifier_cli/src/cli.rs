//! Command-line argument parsing for `verifyc`.

use clap::Parser;
use std::path::PathBuf;

/// Deductive verifier for the restricted C-subset the Parser collaborator
/// emits as JSON.
///
/// # Example
///
/// ```bash
/// verifyc program.json --function max2
/// verifyc program.json --function array_max --iter
/// verifyc program.json --function binary_search --horn
/// ```
#[derive(Parser)]
#[command(name = "verifyc")]
#[command(about = "Deductive verifier for annotated C-subset programs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the Parser's JSON AST document (a `translation_unit`).
    pub input: PathBuf,

    /// Name of the function to verify.
    #[arg(long, short)]
    pub function: String,

    /// Check paths one at a time, stopping at the first failure, instead
    /// of the single all-paths VC.
    #[arg(long)]
    pub iter: bool,

    /// Run Horn-clause invariant synthesis instead of path-based checking.
    #[arg(long)]
    pub horn: bool,

    /// Solver timeout, in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    pub timeout: u32,
}

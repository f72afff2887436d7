//! `verifyc` - deductive verifier CLI
//!
//! Thin wrapper around [`verifier_cli::run_cli`]; all logic lives in the
//! library crate for testability.

fn main() {
    if let Err(e) = verifier_cli::run_cli() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

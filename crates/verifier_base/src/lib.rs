//! # verifier-base
//!
//! Structural atoms shared across the verifier workspace: source-location
//! tracking ([`AstRange`]) and the one error shape contract violations take
//! ([`UnsupportedSyntax`]).
//!
//! This crate has no knowledge of the C-subset grammar or of Z3. It provides
//! only generic, reusable infrastructure that the parser, CFG, and solver
//! crates build upon.

pub mod error;
pub mod span;

pub use error::{Result, UnsupportedSyntax};
pub use span::AstRange;

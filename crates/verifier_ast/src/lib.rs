//! The expression algebra, typing environment, and substitution layer (C1).
//!
//! This crate has no notion of control flow — it is the pure, substitutable
//! term language that `verifier_cfg` builds programs out of and that
//! `verifier_solver` lowers to Z3.

mod builtin;
mod env;
mod expr;
mod types;

pub use builtin::Builtin;
pub use env::Environment;
pub use expr::{BinOp, Domain, Expr, RelOp, UnOp};
pub use types::Type;

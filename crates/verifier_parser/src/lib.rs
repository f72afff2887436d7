//! # verifier-parser
//!
//! The wire format consumed from the external C-subset **Parser**
//! collaborator (spec.md §6): a JSON document whose root is a
//! `translation_unit`, deserialized into an [`ast::AstNode`] tree.
//!
//! This crate has no opinion on *what the tree means* — that's
//! `verifier-ast`'s and `verifier-cfg`'s job. It only knows how to parse the
//! wire format.

pub mod ast;

pub use ast::{parse, AstNode, AstType};

//! A spanned, contract-violation error shared by the parser-facing and
//! CFG-building layers.
//!
//! Per spec.md §7, contract violations (malformed AST, unsupported syntax)
//! are reported and abandoned, never recovered from. `UnsupportedSyntax`
//! is the one error shape every upstream layer produces.

use crate::span::AstRange;
use std::fmt;

/// Something the core does not (and, per spec.md's Non-goals, will not)
/// support: an unrecognized AST shape, a malformed quantifier binder, a
/// `break`/`continue` outside a loop, and so on.
#[derive(Debug, Clone)]
pub struct UnsupportedSyntax {
    pub detail: String,
    pub range: Option<AstRange>,
}

impl UnsupportedSyntax {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            range: None,
        }
    }

    pub fn at(detail: impl Into<String>, range: AstRange) -> Self {
        Self {
            detail: detail.into(),
            range: Some(range),
        }
    }

    pub fn with_range(mut self, range: AstRange) -> Self {
        self.range = Some(range);
        self
    }
}

impl fmt::Display for UnsupportedSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.range {
            Some(r) => write!(f, "unsupported syntax at {}: {}", r, self.detail),
            None => write!(f, "unsupported syntax: {}", self.detail),
        }
    }
}

impl std::error::Error for UnsupportedSyntax {}

/// Alias for `std::result::Result<T, UnsupportedSyntax>`.
pub type Result<T> = std::result::Result<T, UnsupportedSyntax>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_without_range() {
        let e = UnsupportedSyntax::new("goto is not supported");
        assert_eq!(e.to_string(), "unsupported syntax: goto is not supported");
    }

    #[test]
    fn display_with_range() {
        let e = UnsupportedSyntax::at("multi-variable declaration", AstRange::new(3, 0, 3, 10));
        assert!(e.to_string().contains("3:0-3:10"));
    }

    #[test]
    fn with_range_attaches_after_construction() {
        let e = UnsupportedSyntax::new("x").with_range(AstRange::new(1, 1, 1, 2));
        assert!(e.range.is_some());
    }
}

//! The driver's own error shape. Per spec.md §4.6, the driver treats the
//! Solver as a black box: any internal failure bubbles up as a plain
//! driver-level message, distinct from the upstream `UnsupportedSyntax`
//! the parser/CFG layers raise for malformed input.

use std::fmt;
use verifier_base::UnsupportedSyntax;

#[derive(Debug)]
pub enum DriverError {
    /// A CFG/AST-level contract violation surfaced while building the
    /// paths or VCs this check needed.
    Ir(UnsupportedSyntax),
    /// Something the Solver itself could not do — an expression shape
    /// with no Z3 encoding, a malformed model, a Horn-clause head that
    /// isn't a registered relation application.
    Solver(String),
}

impl DriverError {
    pub fn solver(detail: impl Into<String>) -> Self {
        DriverError::Solver(detail.into())
    }
}

impl From<UnsupportedSyntax> for DriverError {
    fn from(e: UnsupportedSyntax) -> Self {
        DriverError::Ir(e)
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Ir(e) => write!(f, "{e}"),
            DriverError::Solver(detail) => write!(f, "solver error: {detail}"),
        }
    }
}

impl std::error::Error for DriverError {}

pub type Result<T> = std::result::Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_wraps_ir_error() {
        let e: DriverError = UnsupportedSyntax::new("goto").into();
        assert!(e.to_string().contains("goto"));
    }

    #[test]
    fn display_labels_solver_errors() {
        let e = DriverError::solver("model had no entry for x");
        assert_eq!(e.to_string(), "solver error: model had no entry for x");
    }
}

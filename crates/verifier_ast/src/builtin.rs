//! Built-in specification primitives (Design Notes §9).
//!
//! `assert`, `assume`, `requires`, `ensures`, `freeze`, `remember`, `forall`,
//! `exists`, and `then` are recognized syntactically as calls to identifiers
//! of those exact names, wherever a `postfix_expression`/`expression_statement`
//! applies an identifier to a parenthesized argument list. This single
//! routine is the one place that recognition happens, so adding a new
//! specification primitive means adding one match arm here.

/// A recognized specification built-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Expression-level: `forall(v in D, body)`.
    Forall,
    /// Expression-level: `exists(v in D, body)`.
    Exists,
    /// Expression-level: `then(p, q)` / `then(c, t, e)`.
    Then,
    /// Statement-level: `assert(p)`.
    Assert,
    /// Statement-level: `assume(p)`.
    Assume,
    /// Statement-level: `requires(p)`.
    Requires,
    /// Statement-level: `ensures(p)`.
    Ensures,
    /// Statement-level: `freeze(name, expr)`.
    Freeze,
    /// Statement-level: `remember(p)`.
    Remember,
}

impl Builtin {
    /// Recognizes `name` as a built-in, or `None` if it's an ordinary
    /// (unsupported) function call.
    pub fn recognize(name: &str) -> Option<Builtin> {
        match name {
            "forall" => Some(Builtin::Forall),
            "exists" => Some(Builtin::Exists),
            "then" => Some(Builtin::Then),
            "assert" => Some(Builtin::Assert),
            "assume" => Some(Builtin::Assume),
            "requires" => Some(Builtin::Requires),
            "ensures" => Some(Builtin::Ensures),
            "freeze" => Some(Builtin::Freeze),
            "remember" => Some(Builtin::Remember),
            _ => None,
        }
    }

    pub fn is_expr_level(self) -> bool {
        matches!(self, Builtin::Forall | Builtin::Exists | Builtin::Then)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_every_listed_builtin() {
        for name in [
            "assert", "assume", "requires", "ensures", "freeze", "remember", "forall", "exists",
            "then",
        ] {
            assert!(Builtin::recognize(name).is_some(), "{name} should be recognized");
        }
    }

    #[test]
    fn rejects_unknown_identifiers() {
        assert_eq!(Builtin::recognize("printf"), None);
        assert_eq!(Builtin::recognize("max"), None);
    }

    #[test]
    fn expr_level_classification() {
        assert!(Builtin::Forall.is_expr_level());
        assert!(Builtin::Then.is_expr_level());
        assert!(!Builtin::Assert.is_expr_level());
    }
}

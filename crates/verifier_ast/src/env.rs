//! Scoped environment with α-renaming (spec.md §3).
//!
//! Mirrors `original_source/expr.py::Environment` field-for-field: a scope
//! stack of source-name→type maps, a global map from *renamed* names to
//! types, a declaration counter shared across the whole environment (not
//! per-scope), and a rename-frame stack parallel to the scope stack.
//!
//! Declaring a name a second time anywhere in the function renames it to
//! `name$k`, where `k` is the prior declaration count for that name; the
//! renamed identifier is what appears in every lowered expression, and it
//! stays a valid key of the global map after its scope closes.

use crate::types::Type;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<HashMap<String, Type>>,
    vars: HashMap<String, Type>,
    names_count: HashMap<String, u32>,
    renamer: Vec<HashMap<String, String>>,
}

impl Environment {
    /// A fresh environment with a single open scope, matching `Environment.empty()`.
    pub fn new() -> Self {
        Environment {
            scopes: vec![HashMap::new()],
            vars: HashMap::new(),
            names_count: HashMap::new(),
            renamer: vec![HashMap::new()],
        }
    }

    /// The declared type of `var`, searching scopes innermost-first.
    ///
    /// Returns `None` if `var` was never declared; callers that know the
    /// name is in scope (e.g. `from_ast` resolving an identifier) should
    /// treat a `None` here as a contract violation, not a recoverable error.
    pub fn type_of(&self, var: &str) -> Option<Type> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(var))
            .cloned()
    }

    /// Declares `var` with type `ty` in the innermost scope, renaming it if
    /// this is a shadowing redeclaration.
    pub fn declare(&mut self, var: &str, ty: Type) {
        self.scopes
            .last_mut()
            .expect("environment always has an open scope")
            .insert(var.to_string(), ty.clone());

        let count = *self.names_count.get(var).unwrap_or(&0);
        if count > 0 {
            self.renamer
                .last_mut()
                .expect("environment always has an open rename frame")
                .insert(var.to_string(), format!("{var}${count}"));
        }
        self.names_count.insert(var.to_string(), count + 1);

        let renamed = self.rename(var);
        self.vars.insert(renamed, ty);
    }

    /// Whether `var` is declared in any open scope.
    pub fn contains(&self, var: &str) -> bool {
        self.scopes.iter().any(|scope| scope.contains_key(var))
    }

    /// The canonical (renamed) identifier for `var`, or `var` itself if it
    /// was declared only once.
    pub fn rename(&self, var: &str) -> String {
        self.renamer
            .iter()
            .rev()
            .find_map(|frame| frame.get(var))
            .cloned()
            .unwrap_or_else(|| var.to_string())
    }

    /// Opens a new scope and a parallel rename frame.
    pub fn open_scope(&mut self) {
        self.scopes.push(HashMap::new());
        self.renamer.push(HashMap::new());
    }

    /// Closes the innermost scope and rename frame. The renamed entries in
    /// the global variable map persist — they remain valid identifiers in
    /// any already-lowered expression.
    pub fn close_scope(&mut self) {
        self.scopes.pop();
        self.renamer.pop();
    }

    /// The full renamed-name → type universe declared so far.
    pub fn get_vars(&self) -> HashMap<String, Type> {
        self.vars.clone()
    }

    /// Removes `renamed` from the global variable universe.
    ///
    /// Used while building a quantifier body: the bound variable is visible
    /// for type resolution inside the body, but must not appear as a free
    /// variable of the enclosing function (spec.md §4.1).
    pub fn exclude_var(&mut self, renamed: &str) {
        self.vars.remove(renamed);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_declaration_keeps_original_name() {
        let mut env = Environment::new();
        env.declare("x", Type::Int);
        assert_eq!(env.rename("x"), "x");
    }

    #[test]
    fn redeclaration_renames_with_dollar_suffix() {
        let mut env = Environment::new();
        env.declare("x", Type::Int);
        env.declare("x", Type::Bool);
        assert_eq!(env.rename("x"), "x$1");
        assert_eq!(env.type_of("x"), Some(Type::Bool));
    }

    #[test]
    fn third_declaration_uses_prior_count() {
        let mut env = Environment::new();
        env.declare("x", Type::Int);
        env.declare("x", Type::Int);
        env.declare("x", Type::Int);
        assert_eq!(env.rename("x"), "x$2");
    }

    #[test]
    fn renamed_entries_survive_scope_close() {
        let mut env = Environment::new();
        env.declare("x", Type::Int);
        env.open_scope();
        env.declare("x", Type::Bool);
        let renamed = env.rename("x");
        assert_eq!(renamed, "x$1");
        env.close_scope();
        // Outer scope resolves to the original name again...
        assert_eq!(env.rename("x"), "x");
        // ...but the renamed identifier is still a valid key in the universe.
        assert_eq!(env.get_vars().get(&renamed), Some(&Type::Bool));
    }

    #[test]
    fn declaration_count_is_shared_across_sibling_scopes() {
        let mut env = Environment::new();
        env.open_scope();
        env.declare("x", Type::Int);
        env.close_scope();
        env.open_scope();
        env.declare("x", Type::Int);
        env.close_scope();
        // The second sibling block's `x` is the function's second
        // declaration of that name, so it is renamed even though the first
        // scope already closed.
        env.open_scope();
        env.declare("x", Type::Int);
        assert_eq!(env.rename("x"), "x$2");
    }

    #[test]
    fn contains_searches_all_open_scopes() {
        let mut env = Environment::new();
        env.declare("x", Type::Int);
        env.open_scope();
        assert!(env.contains("x"));
        assert!(!env.contains("y"));
    }

    #[test]
    fn exclude_var_removes_from_global_universe() {
        let mut env = Environment::new();
        env.declare("k", Type::Int);
        let renamed = env.rename("k");
        env.exclude_var(&renamed);
        assert!(!env.get_vars().contains_key(&renamed));
    }
}

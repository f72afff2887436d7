//! The verification-condition generator (C4, spec.md §4.4).

use crate::path::BasicPath;
use verifier_ast::{Expr, Type};
use verifier_base::{Result as VResult, UnsupportedSyntax};

/// `VC = (reach ∧ pre) → post`, degenerating to `post` when there is
/// neither a precondition nor any reachability conjuncts, and to
/// `reach → post` when there's reachability but no named precondition.
pub fn path_vc(path: &BasicPath) -> VResult<Expr> {
    let post = path
        .assertion_end
        .clone()
        .ok_or_else(|| UnsupportedSyntax::new("basic path has no assertion_end to discharge"))?;

    let reach = if path.reachability.is_empty() {
        None
    } else {
        Some(Expr::And(path.reachability.clone()))
    };

    let vc = match (&path.assertion_start, reach) {
        (Some(pre), Some(reach)) => {
            Expr::Implies(Box::new(Expr::And(vec![reach, pre.clone()])), Box::new(post))
        }
        (Some(pre), None) => Expr::Implies(Box::new(pre.clone()), Box::new(post)),
        (None, None) => post,
        (None, Some(reach)) => Expr::Implies(Box::new(reach), Box::new(post)),
    };
    Ok(vc)
}

fn quantify(vars: &[(String, Type)], body: Expr) -> Expr {
    if vars.is_empty() {
        body
    } else {
        Expr::Forall(vars.to_vec(), Box::new(body))
    }
}

/// The path-mode full-function rule: conjoin every path's VC, then
/// universally quantify over every name in `quantified_vars` (the global
/// variable map minus parameters — parameters stay implicitly universal).
pub fn full_function_vc(paths: &[BasicPath], quantified_vars: &[(String, Type)]) -> VResult<Expr> {
    let mut conjuncts = Vec::with_capacity(paths.len());
    for path in paths {
        conjuncts.push(path_vc(path)?);
    }
    let body = match conjuncts.len() {
        0 => Expr::BoolLit(true),
        1 => conjuncts.into_iter().next().unwrap(),
        _ => Expr::And(conjuncts),
    };
    Ok(quantify(quantified_vars, body))
}

/// One CHC per path (Horn mode): the path's VC, universally quantified
/// over **all** variables (params + locals).
pub fn horn_path_clause(path: &BasicPath, all_vars: &[(String, Type)]) -> VResult<Expr> {
    Ok(quantify(all_vars, path_vc(path)?))
}

/// Extracts the `(name, type)` pairs a `Predicate` expression is applied
/// to, in argument order, for use as that predicate's quantifier binder.
fn predicate_vars(predicate: &Expr) -> VResult<Vec<(String, Type)>> {
    match predicate {
        Expr::Predicate(_, args, argsorts) => args
            .iter()
            .zip(argsorts.iter())
            .map(|(arg, sort)| match arg {
                Expr::Var(name, _) => Ok((name.clone(), sort.clone())),
                _ => Err(UnsupportedSyntax::new("predicate argument is not a plain variable")),
            })
            .collect(),
        _ => Err(UnsupportedSyntax::new("expected a Predicate expression")),
    }
}

/// The side CHC binding a cutpoint's inserted predicate to the partial
/// invariant (original assertion) it replaced: `∀vars. P(vars) → partial`.
pub fn horn_predicate_clause(predicate: &Expr, partial_invariant: &Expr) -> VResult<Expr> {
    let vars = predicate_vars(predicate)?;
    let body = Expr::Implies(Box::new(predicate.clone()), Box::new(partial_invariant.clone()));
    Ok(quantify(&vars, body))
}

/// The full CHC system for Horn mode: one clause per basic path plus one
/// clause per selected cutpoint predicate.
pub fn horn_clauses(
    paths: &[BasicPath],
    all_vars: &[(String, Type)],
    predicates: &[(Expr, Expr)],
) -> VResult<Vec<Expr>> {
    let mut clauses = Vec::with_capacity(paths.len() + predicates.len());
    for path in paths {
        clauses.push(horn_path_clause(path, all_vars)?);
    }
    for (predicate, partial_invariant) in predicates {
        clauses.push(horn_predicate_clause(predicate, partial_invariant)?);
    }
    Ok(clauses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use verifier_ast::RelOp;

    fn var(name: &str) -> Expr {
        Expr::var(name, Type::Int)
    }

    #[test]
    fn path_with_pre_and_reach_builds_conjoined_implication() {
        let path = BasicPath {
            reachability: vec![Expr::Rel(RelOp::Gt, Box::new(var("a")), Box::new(Expr::IntLit(0)))],
            transformation: vec![],
            assertion_start: Some(Expr::BoolLit(true)),
            assertion_end: Some(Expr::BoolLit(true)),
            nodes: vec![],
        };
        let vc = path_vc(&path).unwrap();
        assert!(matches!(vc, Expr::Implies(_, _)));
    }

    #[test]
    fn path_with_nothing_reduces_to_bare_post() {
        let path = BasicPath {
            reachability: vec![],
            transformation: vec![],
            assertion_start: None,
            assertion_end: Some(Expr::BoolLit(true)),
            nodes: vec![],
        };
        let vc = path_vc(&path).unwrap();
        assert_eq!(vc, Expr::BoolLit(true));
    }

    #[test]
    fn predicate_clause_binds_partial_invariant() {
        let pred = Expr::Predicate("P0".to_string(), vec![var("i"), var("n")], vec![Type::Int, Type::Int]);
        let partial = Expr::Rel(RelOp::Le, Box::new(var("i")), Box::new(var("n")));
        let clause = horn_predicate_clause(&pred, &partial).unwrap();
        assert!(matches!(clause, Expr::Forall(_, _)));
    }
}

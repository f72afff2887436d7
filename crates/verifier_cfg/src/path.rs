//! The path enumerator (C3, spec.md §4.3): a depth-first walk producing
//! `BasicPath` values, forking at `Cond`, cutting cycles at `Assert`/
//! `Cutpoint`, and re-entering each cut point's continuation at most once
//! per enumeration.

use crate::node::{Cfg, Node, NodeId};
use std::collections::{HashMap, HashSet, VecDeque};
use verifier_ast::Expr;
use verifier_base::{Result as VResult, UnsupportedSyntax};

/// A loop-free trace through the CFG between two cut points (spec.md §3).
#[derive(Debug, Clone)]
pub struct BasicPath {
    pub reachability: Vec<Expr>,
    /// Variable -> expression, insertion-ordered; a later assignment to a
    /// variable already present overwrites its value in place.
    pub transformation: Vec<(String, Expr)>,
    pub assertion_start: Option<Expr>,
    pub assertion_end: Option<Expr>,
    pub nodes: Vec<NodeId>,
}

impl BasicPath {
    pub fn sigma_map(&self) -> HashMap<String, Expr> {
        self.transformation.iter().cloned().collect()
    }
}

#[derive(Debug, Clone)]
struct PathState {
    reachability: Vec<Expr>,
    transformation: Vec<(String, Expr)>,
    assertion_start: Option<Expr>,
    nodes: Vec<NodeId>,
    visited_in_path: HashSet<NodeId>,
}

impl PathState {
    fn new(assertion_start: Option<Expr>) -> Self {
        PathState {
            reachability: Vec::new(),
            transformation: Vec::new(),
            assertion_start,
            nodes: Vec::new(),
            visited_in_path: HashSet::new(),
        }
    }

    fn sigma_map(&self) -> HashMap<String, Expr> {
        self.transformation.iter().cloned().collect()
    }

    fn push_reach(&mut self, e: &Expr) {
        let substituted = e.assign(&self.sigma_map());
        self.reachability.push(substituted);
    }

    fn extend_assign(&mut self, target: &str, value: &Expr) {
        let substituted = value.assign(&self.sigma_map());
        if let Some(slot) = self.transformation.iter_mut().find(|(name, _)| name == target) {
            slot.1 = substituted;
        } else {
            self.transformation.push((target.to_string(), substituted));
        }
    }

    fn into_basic_path(self, assertion_end: Option<Expr>) -> BasicPath {
        BasicPath {
            reachability: self.reachability,
            transformation: self.transformation,
            assertion_start: self.assertion_start,
            assertion_end,
            nodes: self.nodes,
        }
    }
}

/// Enumerates every basic path of `cfg` (spec.md §4.3). Fails only if the
/// graph violates the builder's own invariants (a cycle with no Assert or
/// Cutpoint on it, or a `Dummy` left reachable).
pub fn enumerate_paths(cfg: &Cfg) -> VResult<Vec<BasicPath>> {
    let mut completed = Vec::new();
    let mut started_from: HashSet<NodeId> = HashSet::new();
    let mut worklist: VecDeque<(NodeId, Option<Expr>)> = VecDeque::new();
    worklist.push_back((cfg.start(), None));

    while let Some((node, pre)) = worklist.pop_front() {
        let state = PathState::new(pre);
        let mut fresh_starts = Vec::new();
        walk(cfg, node, state, &mut completed, &mut fresh_starts, &mut started_from)?;
        worklist.extend(fresh_starts);
    }
    Ok(completed)
}

fn walk(
    cfg: &Cfg,
    node: NodeId,
    mut state: PathState,
    completed: &mut Vec<BasicPath>,
    fresh_starts: &mut Vec<(NodeId, Option<Expr>)>,
    started_from: &mut HashSet<NodeId>,
) -> VResult<()> {
    if !state.visited_in_path.insert(node) {
        return Err(UnsupportedSyntax::new(
            "a cycle in the control-flow graph does not cross an assert or cutpoint",
        ));
    }
    state.nodes.push(node);

    let snapshot = cfg.get(node).clone();
    match snapshot {
        Node::Start { requires, next, .. } => {
            if state.assertion_start.is_none() {
                state.assertion_start = requires;
            }
            walk(cfg, next, state, completed, fresh_starts, started_from)
        }
        Node::Assign { target, value, next } => {
            state.extend_assign(&target, &value);
            walk(cfg, next, state, completed, fresh_starts, started_from)
        }
        Node::Assume { guard, next } => {
            state.push_reach(&guard);
            walk(cfg, next, state, completed, fresh_starts, started_from)
        }
        Node::Cond { cond, then_br, else_br } => {
            let mut then_state = state.clone();
            then_state.push_reach(&cond);
            walk(cfg, then_br, then_state, completed, fresh_starts, started_from)?;

            let mut else_state = state;
            else_state.push_reach(&Expr::Not(Box::new(cond)));
            walk(cfg, else_br, else_state, completed, fresh_starts, started_from)
        }
        Node::Assert { assertion, next, .. } => {
            let end = assertion.assign(&state.sigma_map());
            completed.push(state.clone().into_basic_path(Some(end)));
            if started_from.insert(node) {
                fresh_starts.push((next, Some(assertion)));
            }
            Ok(())
        }
        Node::Cutpoint { predicate, next, .. } => {
            let end = predicate.assign(&state.sigma_map());
            completed.push(state.clone().into_basic_path(Some(end)));
            if started_from.insert(node) {
                fresh_starts.push((next, Some(predicate)));
            }
            Ok(())
        }
        Node::End { ensures, .. } => {
            if let Some(ensures) = ensures {
                let end = ensures.assign(&state.sigma_map());
                completed.push(state.into_basic_path(Some(end)));
            }
            Ok(())
        }
        Node::Dummy => Err(UnsupportedSyntax::new(
            "path enumeration reached an unpatched Dummy node",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Cfg;
    use verifier_ast::{RelOp, Type};

    #[test]
    fn straight_line_function_has_one_path() {
        let mut cfg = Cfg::new();
        let end = cfg.end();
        cfg.set_end_ensures(Expr::BoolLit(true));
        let assign = cfg.alloc(Node::Assign {
            target: "ret".to_string(),
            value: Expr::IntLit(0),
            next: end,
        });
        cfg.set_start_next(assign);

        let paths = enumerate_paths(&cfg).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].transformation, vec![("ret".to_string(), Expr::IntLit(0))]);
    }

    #[test]
    fn branching_function_yields_two_paths() {
        let mut cfg = Cfg::new();
        let end = cfg.end();
        cfg.set_end_ensures(Expr::BoolLit(true));
        let then_assign = cfg.alloc(Node::Assign { target: "ret".to_string(), value: Expr::IntLit(1), next: end });
        let else_assign = cfg.alloc(Node::Assign { target: "ret".to_string(), value: Expr::IntLit(2), next: end });
        let cond = cfg.alloc(Node::Cond {
            cond: Expr::Rel(RelOp::Gt, Box::new(Expr::var("a", Type::Int)), Box::new(Expr::IntLit(0))),
            then_br: then_assign,
            else_br: else_assign,
        });
        cfg.set_start_next(cond);

        let paths = enumerate_paths(&cfg).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].reachability.len(), 1);
    }

    #[test]
    fn loop_without_assert_is_rejected() {
        let mut cfg = Cfg::new();
        let end = cfg.end();
        let dummy = cfg.alloc_dummy();
        let cond = cfg.alloc(Node::Cond { cond: Expr::BoolLit(true), then_br: dummy, else_br: end });
        cfg.rewire(cond, dummy, cond);
        cfg.set_start_next(cond);

        assert!(enumerate_paths(&cfg).is_err());
    }

    #[test]
    fn assert_cuts_a_cycle_into_two_paths() {
        let mut cfg = Cfg::new();
        let end = cfg.end();
        let assert_dummy = cfg.alloc_dummy();
        let assert_id = cfg.alloc(Node::Assert {
            assertion: Expr::BoolLit(true),
            next: assert_dummy,
            range: None,
        });
        cfg.rewire(assert_id, assert_dummy, assert_id);
        cfg.set_start_next(assert_id);
        cfg.set_end_ensures(Expr::BoolLit(true));

        let paths = enumerate_paths(&cfg).unwrap();
        // Start -> Assert, and Assert -> Assert (the self-loop, visited once).
        assert_eq!(paths.len(), 2);
    }
}

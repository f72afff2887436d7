//! The cutpoint selector (C5, spec.md §4.5): picks a feedback vertex set,
//! turns every `Assert` into a `Cutpoint` carrying its original assertion
//! as a partial invariant, and splices fresh `Cutpoint` nodes in front of
//! the remaining chosen vertices.

use crate::node::{Cfg, Node, NodeId};
use std::collections::{HashMap, HashSet};
use verifier_ast::{Expr, Type};
use verifier_base::Result as VResult;

/// `(predicate, partial_invariant)` pairs, one per cutpoint, used to build
/// the side CHCs in [`crate::vc::horn_predicate_clause`].
pub type CutpointPredicates = Vec<(Expr, Expr)>;

/// Enumerates simple cycles of the subgraph reachable from Start, each as
/// the ordered list of vertices on it (Johnson-style: for every vertex
/// `s`, search simple paths back to `s` using only vertices `>= s`, so
/// each cycle is found exactly once, rooted at its minimum vertex).
fn enumerate_simple_cycles(cfg: &Cfg, vertices: &[NodeId]) -> Vec<Vec<NodeId>> {
    let allowed: HashSet<NodeId> = vertices.iter().copied().collect();
    let mut cycles = Vec::new();
    for &start in vertices {
        let mut path = vec![start];
        let mut on_path: HashSet<NodeId> = HashSet::new();
        on_path.insert(start);
        search(cfg, start, start, &allowed, &mut path, &mut on_path, &mut cycles);
    }
    cycles
}

fn search(
    cfg: &Cfg,
    start: NodeId,
    current: NodeId,
    allowed: &HashSet<NodeId>,
    path: &mut Vec<NodeId>,
    on_path: &mut HashSet<NodeId>,
    cycles: &mut Vec<Vec<NodeId>>,
) {
    for succ in cfg.get(current).successors() {
        if succ == start {
            cycles.push(path.clone());
            continue;
        }
        if succ < start || !allowed.contains(&succ) || on_path.contains(&succ) {
            continue;
        }
        path.push(succ);
        on_path.insert(succ);
        search(cfg, start, succ, allowed, path, on_path, cycles);
        path.pop();
        on_path.remove(&succ);
    }
}

/// Greedy feedback-vertex cover: repeatedly take the vertex covering the
/// most remaining cycles, ties broken by vertex id.
fn greedy_feedback_vertex_set(mut cycles: Vec<Vec<NodeId>>) -> Vec<NodeId> {
    let mut chosen = Vec::new();
    while !cycles.is_empty() {
        let mut counts: HashMap<NodeId, usize> = HashMap::new();
        for cycle in &cycles {
            for v in cycle {
                *counts.entry(*v).or_insert(0) += 1;
            }
        }
        let best = counts
            .into_iter()
            .fold(None, |acc: Option<(NodeId, usize)>, (id, count)| match acc {
                None => Some((id, count)),
                Some((bid, bcount)) => {
                    if count > bcount || (count == bcount && id < bid) {
                        Some((id, count))
                    } else {
                        Some((bid, bcount))
                    }
                }
            })
            .map(|(id, _)| id)
            .expect("non-empty cycle list has a best vertex");
        chosen.push(best);
        cycles.retain(|cycle| !cycle.contains(&best));
    }
    chosen
}

struct PredicateFactory {
    next: usize,
    vars: Vec<(String, Type)>,
}

impl PredicateFactory {
    fn fresh(&mut self) -> Expr {
        let name = format!("P{}", self.next);
        self.next += 1;
        let args = self.vars.iter().map(|(n, t)| Expr::Var(n.clone(), t.clone())).collect();
        let argsorts = self.vars.iter().map(|(_, t)| t.clone()).collect();
        Expr::Predicate(name, args, argsorts)
    }
}

/// Mutates `cfg` in place, converting it to Horn form, and returns the
/// `(predicate, partial_invariant)` pairs needed for the side CHCs.
pub fn select_cutpoints(cfg: &mut Cfg, all_vars: &[(String, Type)]) -> VResult<CutpointPredicates> {
    let mut sorted_vars = all_vars.to_vec();
    sorted_vars.sort_by(|a, b| a.0.cmp(&b.0));
    let mut factory = PredicateFactory { next: 0, vars: sorted_vars };

    let mut vertices = cfg.reachable_from_start();
    vertices.sort();

    let assert_ids: HashSet<NodeId> = vertices
        .iter()
        .copied()
        .filter(|id| matches!(&*cfg.get(*id), Node::Assert { .. }))
        .collect();

    let cycles = enumerate_simple_cycles(cfg, &vertices);
    let cycles_needing_cover: Vec<Vec<NodeId>> = cycles
        .into_iter()
        .filter(|cycle| !cycle.iter().any(|v| assert_ids.contains(v)))
        .collect();
    let chosen = greedy_feedback_vertex_set(cycles_needing_cover);

    let mut predicates: CutpointPredicates = Vec::new();

    // Step 4: every existing Assert becomes a Cutpoint in place, in vertex
    // id order (asserts never move, so predecessors are untouched).
    for &id in &vertices {
        if !assert_ids.contains(&id) {
            continue;
        }
        let (assertion, next) = match &*cfg.get(id) {
            Node::Assert { assertion, next, .. } => (assertion.clone(), *next),
            _ => unreachable!(),
        };
        let predicate = factory.fresh();
        predicates.push((predicate.clone(), assertion.clone()));
        *cfg.get_mut(id) = Node::Cutpoint {
            predicate,
            partial_invariant: Some(assertion),
            next,
        };
    }

    // Step 5: splice a fresh Cutpoint node before each FVS-selected vertex,
    // in the order the greedy cover picked them.
    for vertex in chosen {
        let predecessors: Vec<NodeId> = vertices
            .iter()
            .copied()
            .filter(|&p| cfg.get(p).successors().contains(&vertex))
            .collect();
        let predicate = factory.fresh();
        let cutpoint_id = cfg.alloc(Node::Cutpoint {
            predicate: predicate.clone(),
            partial_invariant: None,
            next: vertex,
        });
        for pred in predecessors {
            cfg.redirect_edge(pred, vertex, cutpoint_id);
        }
    }

    Ok(predicates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use verifier_ast::RelOp;

    fn var(name: &str) -> Expr {
        Expr::var(name, Type::Int)
    }

    #[test]
    fn loop_with_no_assert_gets_a_spliced_cutpoint() {
        let mut cfg = Cfg::new();
        let end = cfg.end();
        let dummy = cfg.alloc_dummy();
        let body = cfg.alloc(Node::Assign { target: "i".to_string(), value: var("i"), next: dummy });
        let cond = cfg.alloc(Node::Cond {
            cond: Expr::Rel(RelOp::Lt, Box::new(var("i")), Box::new(Expr::IntLit(10))),
            then_br: body,
            else_br: end,
        });
        cfg.rewire(cond, dummy, cond);
        cfg.set_start_next(cond);

        let vars = vec![("i".to_string(), Type::Int)];
        let predicates = select_cutpoints(&mut cfg, &vars).unwrap();
        assert_eq!(predicates.len(), 0);

        let reachable = cfg.reachable_from_start();
        let has_cutpoint = reachable.iter().any(|&id| matches!(&*cfg.get(id), Node::Cutpoint { .. }));
        assert!(has_cutpoint);
    }

    #[test]
    fn assert_inside_loop_becomes_cutpoint_with_partial_invariant() {
        let mut cfg = Cfg::new();
        let end = cfg.end();
        let back_dummy = cfg.alloc_dummy();
        let assert_id = cfg.alloc(Node::Assert {
            assertion: Expr::Rel(RelOp::Le, Box::new(var("i")), Box::new(Expr::IntLit(10))),
            next: back_dummy,
            range: None,
        });
        cfg.rewire(assert_id, back_dummy, assert_id);
        cfg.set_start_next(assert_id);
        let _ = end;

        let vars = vec![("i".to_string(), Type::Int)];
        let predicates = select_cutpoints(&mut cfg, &vars).unwrap();
        assert_eq!(predicates.len(), 1);
        assert!(matches!(&*cfg.get(assert_id), Node::Cutpoint { .. }));
    }
}

//! The verifier driver (C6, spec.md §4.6): path mode, iterative path mode,
//! and Horn mode, each treating the Solver as a black box behind
//! [`Decision`]. Every internal Z3 failure surfaces as a [`DriverError`]
//! carrying the path or clause that triggered it, never a panic.

use crate::error::{DriverError, Result as DResult};
use crate::lower::Lowerer;
use crate::model::{self, Assignment};
use verifier_ast::Expr;
use verifier_cfg::{CutpointPredicates, Function};
use z3::{Config, Context, FuncDecl, Params, SatResult, Solver};
use z3::{Fixedpoint, Symbol};

/// What one validity check against a single formula decided.
enum Decision {
    Valid,
    Invalid(Assignment),
    Unknown(String),
}

/// Path-mode and iterative-mode outcome.
#[derive(Debug, Clone)]
pub enum Verdict {
    Ok,
    CounterExample(Assignment),
    Unknown(String),
}

/// One synthesized predicate's finite interpretation (spec.md §4.6: "a
/// finite mapping plus an else case").
#[derive(Debug, Clone)]
pub struct HornInvariant {
    pub predicate: String,
    pub entries: Vec<(Vec<String>, String)>,
    pub else_value: Option<String>,
}

/// Horn-mode outcome.
#[derive(Debug, Clone)]
pub enum HornVerdict {
    HornOk(Vec<HornInvariant>),
    HornFail,
    Unknown(String),
}

/// Drives Z3 against the VCs a [`Function`] produces. Stateless beyond its
/// timeout; a fresh `Context`/`Solver` is created per decision; spec.md's
/// concurrency model (one Solver per worker) falls out for free.
pub struct Driver {
    timeout_ms: u32,
}

impl Driver {
    pub fn new(timeout_ms: u32) -> Self {
        Driver { timeout_ms }
    }

    fn z3_config(&self) -> Config {
        let mut cfg = Config::new();
        cfg.set_param_value("timeout", &self.timeout_ms.to_string());
        cfg
    }

    fn decide(&self, formula: &Expr, vars: &[(String, verifier_ast::Type)]) -> DResult<Decision> {
        let z3_cfg = self.z3_config();
        let ctx = Context::new(&z3_cfg);
        let solver = Solver::new(&ctx);
        let lowerer = Lowerer::new(&ctx);

        let encoded = lowerer.lower(formula)?;
        let assertion = encoded
            .as_bool()
            .ok_or_else(|| DriverError::solver("verification condition did not encode to a boolean"))?;

        solver.assert(&assertion.not());
        match solver.check() {
            SatResult::Unsat => Ok(Decision::Valid),
            SatResult::Sat => {
                let assignment = match solver.get_model() {
                    Some(m) => model::extract_assignment(&m, &lowerer, vars)?,
                    None => Assignment::default(),
                };
                Ok(Decision::Invalid(assignment))
            }
            SatResult::Unknown => {
                let reason = solver.get_reason_unknown().unwrap_or_else(|| "unknown".to_string());
                Ok(Decision::Unknown(reason))
            }
        }
    }

    /// Path mode: the single, all-paths-conjoined VC (spec.md §4.4/§4.6).
    pub fn check(&self, function: &Function) -> DResult<Verdict> {
        let vc = function.full_vc()?;
        self.decide_to_verdict(&vc, &function.all_vars())
    }

    /// Iterative path mode: checks paths one at a time, stopping at the
    /// first that doesn't decide valid (the original's `get_failing_props`
    /// behavior, `one path at a time`).
    pub fn check_iter(&self, function: &Function) -> DResult<Verdict> {
        let vars = function.all_vars();
        for path in function.paths()? {
            let formula = verifier_cfg::path_vc(&path)?;
            match self.decide(&formula, &vars)? {
                Decision::Valid => continue,
                Decision::Invalid(assignment) => return Ok(Verdict::CounterExample(assignment)),
                Decision::Unknown(code) => return Ok(Verdict::Unknown(code)),
            }
        }
        Ok(Verdict::Ok)
    }

    fn decide_to_verdict(&self, formula: &Expr, vars: &[(String, verifier_ast::Type)]) -> DResult<Verdict> {
        match self.decide(formula, vars)? {
            Decision::Valid => Ok(Verdict::Ok),
            Decision::Invalid(assignment) => Ok(Verdict::CounterExample(assignment)),
            Decision::Unknown(code) => Ok(Verdict::Unknown(code)),
        }
    }

    /// Horn mode: asserts every CHC against a Spacer-configured Fixedpoint
    /// engine and interprets the result (spec.md §4.6). `sat` means a
    /// model of every predicate was found — the synthesized invariants;
    /// `unsat` means no invariant strong enough to discharge every clause
    /// exists.
    pub fn check_horn(&self, function: &Function) -> DResult<HornVerdict> {
        let (clauses, predicates) = function.horn_system()?;

        let z3_cfg = self.z3_config();
        let ctx = Context::new(&z3_cfg);
        let fp = Fixedpoint::new(&ctx);

        let mut params = Params::new(&ctx);
        params.set_symbol("engine", Symbol::String("spacer".to_string()));
        fp.set_params(&params);

        let lowerer = Lowerer::new(&ctx);
        let decls = register_predicates(&fp, &lowerer, &predicates);

        for clause in &clauses {
            let encoded = lowerer.lower(clause)?;
            let rule = encoded
                .as_bool()
                .ok_or_else(|| DriverError::solver("a Horn clause did not encode to a boolean"))?;
            fp.add_rule(&rule, None);
        }

        let decl_refs: Vec<&FuncDecl> = decls.iter().map(|(_, decl)| decl).collect();
        match fp.query(&decl_refs) {
            SatResult::Sat => {
                let invariants = decls
                    .iter()
                    .map(|(name, decl)| extract_invariant(&fp, name, decl))
                    .collect();
                Ok(HornVerdict::HornOk(invariants))
            }
            SatResult::Unsat => Ok(HornVerdict::HornFail),
            SatResult::Unknown => Ok(HornVerdict::Unknown("unknown".to_string())),
        }
    }
}

fn register_predicates<'ctx>(
    fp: &Fixedpoint<'ctx>,
    lowerer: &Lowerer<'ctx>,
    predicates: &CutpointPredicates,
) -> Vec<(String, FuncDecl<'ctx>)> {
    let mut decls = Vec::new();
    for (predicate, _) in predicates {
        if let Expr::Predicate(name, _, argsorts) = predicate {
            let decl = lowerer.predicate_decl(name, argsorts);
            fp.register_relation(&decl);
            decls.push((name.clone(), decl));
        }
    }
    decls
}

/// Reads back the fixpoint's answer for one predicate as a finite mapping.
/// Z3's Horn interface reports the discovered relation as a formula over
/// the predicate's argument consts, not as a `FuncInterp` table (predicates
/// are typically infinite-domain); we report that formula, stringified, as
/// the sole entry with no `else_value`, leaving numeric enumeration to
/// whatever renders the CLI's Horn-mode output.
fn extract_invariant(fp: &Fixedpoint, name: &str, decl: &FuncDecl) -> HornInvariant {
    let answer = fp
        .get_answer()
        .map(|a| a.to_string())
        .unwrap_or_else(|| "true".to_string());
    let _ = decl;
    HornInvariant {
        predicate: name.to_string(),
        entries: vec![(Vec::new(), answer)],
        else_value: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_has_a_configurable_timeout() {
        let d = Driver::new(5000);
        assert_eq!(d.timeout_ms, 5000);
    }
}

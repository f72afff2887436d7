//! Counterexample extraction: reading a Z3 model back into plain
//! `name -> value` strings, keyed by the verified function's own variable
//! names (not Z3's internal symbols).

use crate::error::Result as DResult;
use crate::lower::Lowerer;
use std::collections::HashMap;
use verifier_ast::Type;
use z3::Model;

/// A counterexample: one value per variable in `vars`, in whatever string
/// form Z3's model printer produces (`42`, `true`, array terms as-is).
pub type Assignment = HashMap<String, String>;

pub fn extract_assignment(model: &Model, lowerer: &Lowerer, vars: &[(String, Type)]) -> DResult<Assignment> {
    let mut out = HashMap::new();
    for (name, ty) in vars {
        let encoded = lowerer.lower(&verifier_ast::Expr::Var(name.clone(), ty.clone()))?;
        if let Some(value) = model.eval(&encoded, true) {
            out.insert(name.clone(), value.to_string());
        }
    }
    Ok(out)
}

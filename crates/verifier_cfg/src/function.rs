//! Function front-matter extraction (C7, spec.md §4.7): return type, the
//! parameter walk, `requires` extraction, and the params/locals split of
//! the post-build variable universe.

use crate::builder::Builder;
use crate::cutpoint::{self, CutpointPredicates};
use crate::node::Cfg;
use crate::path::{self, BasicPath};
use crate::vc;
use std::collections::HashSet;
use verifier_ast::{Expr, Type};
use verifier_base::{Result as VResult, UnsupportedSyntax};
use verifier_parser::{AstNode, AstType};

/// One verified function: its CFG plus the signature metadata the builder
/// doesn't track on its own.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub cfg: Cfg,
    pub ret: Option<Type>,
    pub requires: Option<Expr>,
    /// Parameters (plus the `ret` pseudo-variable, if any), renamed name -> type.
    pub params: Vec<(String, Type)>,
    /// Every other name in the post-build variable universe, renamed name -> type.
    pub locals: Vec<(String, Type)>,
}

impl Function {
    /// Builds a `Function` from a `function_definition` AST node.
    pub fn from_ast(def: &AstNode) -> VResult<Function> {
        if def.ty != AstType::FunctionDefinition || def.len() < 3 {
            return Err(UnsupportedSyntax::at("expected a function definition", def.range()));
        }
        let specifiers = def.child(0);
        let declarator = def.child(1);
        let body = def.children.last().expect("function_definition has a body");

        let name = find_identifier(declarator)
            .ok_or_else(|| UnsupportedSyntax::at("function is missing a name", def.range()))?
            .to_string();
        let ret = return_type(specifiers, def.range())?;

        let mut builder = Builder::new();
        let mut signature_names: HashSet<String> = HashSet::new();

        if let Some(ret_ty) = &ret {
            builder.env.declare("ret", ret_ty.clone());
            signature_names.insert(builder.env.rename("ret"));
        }

        if let Some(param_list) = find_parameter_list(declarator) {
            for param in flatten_parameter_list(param_list) {
                let (param_name, param_ty) = parameter_binding(param, def.range())?;
                builder.env.declare(&param_name, param_ty);
                signature_names.insert(builder.env.rename(&param_name));
            }
        }

        let requires = builder.build_function(body)?;

        let mut params = Vec::new();
        let mut locals = Vec::new();
        for (renamed, ty) in builder.env.get_vars() {
            if signature_names.contains(&renamed) {
                params.push((renamed, ty));
            } else {
                locals.push((renamed, ty));
            }
        }
        params.sort_by(|a, b| a.0.cmp(&b.0));
        locals.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(Function { name, cfg: builder.cfg, ret, requires, params, locals })
    }

    /// Every variable in the post-build universe, params first.
    pub fn all_vars(&self) -> Vec<(String, Type)> {
        let mut vars = self.params.clone();
        vars.extend(self.locals.clone());
        vars
    }

    /// Every basic path through this function's CFG (C3).
    pub fn paths(&self) -> VResult<Vec<BasicPath>> {
        path::enumerate_paths(&self.cfg)
    }

    /// The path-mode full-function VC: every path's obligation conjoined
    /// and closed over the locals (spec.md §4.4).
    pub fn full_vc(&self) -> VResult<Expr> {
        vc::full_function_vc(&self.paths()?, &self.locals)
    }

    /// The Horn-mode CHC system: inserts cutpoints into a fresh copy of
    /// the CFG, then emits one clause per path plus one per predicate.
    pub fn horn_system(&self) -> VResult<(Vec<Expr>, CutpointPredicates)> {
        let mut horn_cfg = self.cfg.clone();
        let all_vars = self.all_vars();
        let predicates = cutpoint::select_cutpoints(&mut horn_cfg, &all_vars)?;
        let paths = path::enumerate_paths(&horn_cfg)?;
        let clauses = vc::horn_clauses(&paths, &all_vars, &predicates)?;
        Ok((clauses, predicates))
    }

    /// The first path whose VC `is_valid` rejects, used by `check_iter`
    /// diagnostics (the original's `get_failing_props`, one path at a
    /// time). `is_valid` is whatever the Solver decides "valid" means.
    pub fn first_failing_path<F>(&self, mut is_valid: F) -> VResult<Option<(BasicPath, Expr)>>
    where
        F: FnMut(&Expr) -> VResult<bool>,
    {
        for path in self.paths()? {
            let formula = vc::path_vc(&path)?;
            if !is_valid(&formula)? {
                return Ok(Some((path, formula)));
            }
        }
        Ok(None)
    }

    /// Every failing path (not just the first), for CLI diagnostics that
    /// want to show every counterexample at once.
    pub fn failing_paths<F>(&self, mut is_valid: F) -> VResult<Vec<(BasicPath, Expr)>>
    where
        F: FnMut(&Expr) -> VResult<bool>,
    {
        let mut failing = Vec::new();
        for path in self.paths()? {
            let formula = vc::path_vc(&path)?;
            if !is_valid(&formula)? {
                failing.push((path, formula));
            }
        }
        Ok(failing)
    }
}

fn find_identifier(node: &AstNode) -> Option<&str> {
    if node.ty == AstType::Identifier {
        return node.text.as_deref();
    }
    node.children.iter().find_map(find_identifier)
}

fn find_parameter_list(node: &AstNode) -> Option<&AstNode> {
    if node.ty == AstType::ParameterList {
        return Some(node);
    }
    node.children.iter().find_map(find_parameter_list)
}

fn flatten_parameter_list(node: &AstNode) -> Vec<&AstNode> {
    match node.ty {
        AstType::ParameterDeclaration => vec![node],
        AstType::ParameterList if node.len() >= 3 => {
            let mut params = flatten_parameter_list(node.child(0));
            params.push(node.child(node.len() - 1));
            params
        }
        AstType::ParameterList => flatten_parameter_list(node.child(0)),
        _ => vec![node],
    }
}

fn parameter_binding(param: &AstNode, range: verifier_base::AstRange) -> VResult<(String, Type)> {
    if param.len() < 2 {
        return Err(UnsupportedSyntax::at("parameter is missing a declarator", range));
    }
    let base_ty = base_type(param.child(0))
        .ok_or_else(|| UnsupportedSyntax::at("parameter has an unrecognized type", range))?;
    let declarator = param.child(1);
    let name = find_identifier(declarator)
        .ok_or_else(|| UnsupportedSyntax::at("parameter is missing a name", range))?
        .to_string();
    let ty = if contains_brackets(declarator) { Type::array(base_ty) } else { base_ty };
    Ok((name, ty))
}

fn contains_brackets(node: &AstNode) -> bool {
    node.ty == AstType::BracketLeft || node.children.iter().any(contains_brackets)
}

fn base_type(specifiers: &AstNode) -> Option<Type> {
    match specifiers.ty {
        AstType::Int => Some(Type::Int),
        AstType::Float => Some(Type::Real),
        AstType::Bool => Some(Type::Bool),
        _ => specifiers.children.iter().find_map(base_type),
    }
}

/// `None` means `void` (no return value, no `ret` pseudo-variable).
fn return_type(specifiers: &AstNode, range: verifier_base::AstRange) -> VResult<Option<Type>> {
    if contains_void(specifiers) {
        return Ok(None);
    }
    base_type(specifiers)
        .map(Some)
        .ok_or_else(|| UnsupportedSyntax::at("function return type is not recognized", range))
}

fn contains_void(node: &AstNode) -> bool {
    node.ty == AstType::Void || node.children.iter().any(contains_void)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_json() -> &'static str {
        r#""range":{"startLineNumber":1,"startColumn":0,"endLineNumber":1,"endColumn":1}"#
    }

    fn leaf(ty: &str, text: &str) -> String {
        format!(r#"{{"type":"{ty}","text":"{text}",{},"children":[]}}"#, range_json())
    }

    fn node(ty: &str, children: &str) -> String {
        format!(r#"{{"type":"{ty}","text":null,{},"children":[{children}]}}"#, range_json())
    }

    #[test]
    fn no_params_void_return_has_empty_signature() {
        let specifiers = node("declaration_specifiers", &leaf("VOID", "VOID"));
        let name = leaf("IDENTIFIER", "main");
        let declarator = format!(
            r#"{{"type":"direct_declarator","text":null,{},"children":[{name},{},{}]}}"#,
            range_json(),
            leaf("(", "("),
            leaf(")", ")"),
        );
        let body = node("compound_statement", &format!("{},{}", leaf("{", "{"), leaf("}", "}")));
        let def = format!(
            r#"{{"type":"function_definition","text":null,{},"children":[{specifiers},{declarator},{body}]}}"#,
            range_json()
        );
        let ast = verifier_parser::parse(&def).unwrap();
        let f = Function::from_ast(&ast).unwrap();
        assert_eq!(f.name, "main");
        assert_eq!(f.ret, None);
        assert!(f.params.is_empty());
    }
}

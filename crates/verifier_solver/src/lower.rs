//! IR <-> Z3 lowering and raising. One recursive encoder and one recursive
//! decoder, mirroring the shape of the teacher's own `Encoder` (an entry
//! point per `Expr` variant, threading a scope of already-bound Z3 consts),
//! extended to the richer algebra this crate actually needs: `Real`,
//! `Array`, `IfThenElse`, real quantifiers, and uninterpreted `Predicate`
//! application.
//!
//! Every encode/decode step that can hit a sort mismatch or an
//! unrecognized term shape returns a [`DriverError`] instead of guessing —
//! a malformed VC should fail loudly, not verify under a silently-wrong
//! encoding.

use crate::error::{DriverError, Result as DResult};
use std::collections::HashMap;
use verifier_ast::{BinOp, Domain, Expr, RelOp, Type, UnOp};
use z3::ast::{exists_const, forall_const, Array, Ast, Bool, Dynamic, Int, Real};
use z3::{Context, FuncDecl, Sort};

/// Names already bound by an enclosing quantifier, mapped to the Z3 const
/// standing in for them. Empty at the top of every `lower` call.
type Scope<'ctx> = HashMap<String, Dynamic<'ctx>>;

pub struct Lowerer<'ctx> {
    ctx: &'ctx Context,
}

impl<'ctx> Lowerer<'ctx> {
    pub fn new(ctx: &'ctx Context) -> Self {
        Lowerer { ctx }
    }

    /// Lowers a closed-enough expression (free variables become fresh
    /// named consts) to its Z3 encoding.
    pub fn lower(&self, expr: &Expr) -> DResult<Dynamic<'ctx>> {
        let scope = Scope::new();
        self.encode(expr, &scope)
    }

    /// Raises a solver-returned term back into an `Expr`, restoring named
    /// variables through `bound_ctx` (the de-Bruijn-to-name stack: every
    /// name a const in `term` might refer to, innermost scope last).
    /// spec.md §4.1's `raise_from_solver`.
    pub fn raise(&self, term: &Dynamic<'ctx>, bound_ctx: &[(String, Type)]) -> DResult<Expr> {
        if let Some(b) = term.as_bool() {
            if let Some(v) = b.as_bool() {
                return Ok(Expr::BoolLit(v));
            }
        }
        if let Some(i) = term.as_int() {
            if let Some(n) = i.as_i64() {
                return Ok(Expr::IntLit(n));
            }
        }
        if let Some(r) = term.as_real() {
            if let Some((num, den)) = r.as_real() {
                return Ok(Expr::RealLit(num as f64 / den as f64));
            }
        }

        let decl = term
            .safe_decl()
            .map_err(|_| DriverError::solver("solver term is not an application (bound variable or quantifier)"))?;
        let name = decl.name();

        if decl.arity() == 0 {
            if let Some((bound_name, ty)) = bound_ctx.iter().rev().find(|(n, _)| *n == name) {
                return Ok(Expr::Var(bound_name.clone(), ty.clone()));
            }
            return Err(DriverError::solver(format!("'{name}' is not in the bound context")));
        }

        let children = term.children();
        let mut raised = Vec::with_capacity(children.len());
        for child in &children {
            raised.push(self.raise(child, bound_ctx)?);
        }

        match name.as_str() {
            "+" if raised.len() == 2 => Ok(Expr::Binary(BinOp::Add, Box::new(raised[0].clone()), Box::new(raised[1].clone()))),
            "-" if raised.len() == 2 => Ok(Expr::Binary(BinOp::Sub, Box::new(raised[0].clone()), Box::new(raised[1].clone()))),
            "*" if raised.len() == 2 => Ok(Expr::Binary(BinOp::Mul, Box::new(raised[0].clone()), Box::new(raised[1].clone()))),
            "div" if raised.len() == 2 => Ok(Expr::Binary(BinOp::Div, Box::new(raised[0].clone()), Box::new(raised[1].clone()))),
            "mod" if raised.len() == 2 => Ok(Expr::Binary(BinOp::Mod, Box::new(raised[0].clone()), Box::new(raised[1].clone()))),
            "-" if raised.len() == 1 => Ok(Expr::Unary(UnOp::Neg, Box::new(raised[0].clone()))),
            "<" => Ok(Expr::Rel(RelOp::Lt, Box::new(raised[0].clone()), Box::new(raised[1].clone()))),
            "<=" => Ok(Expr::Rel(RelOp::Le, Box::new(raised[0].clone()), Box::new(raised[1].clone()))),
            ">" => Ok(Expr::Rel(RelOp::Gt, Box::new(raised[0].clone()), Box::new(raised[1].clone()))),
            ">=" => Ok(Expr::Rel(RelOp::Ge, Box::new(raised[0].clone()), Box::new(raised[1].clone()))),
            "=" => Ok(Expr::Rel(RelOp::Eq, Box::new(raised[0].clone()), Box::new(raised[1].clone()))),
            "not" => Ok(Expr::Not(Box::new(raised[0].clone()))),
            "and" => Ok(Expr::And(raised)),
            "or" => Ok(Expr::Or(raised)),
            "=>" => Ok(Expr::Implies(Box::new(raised[0].clone()), Box::new(raised[1].clone()))),
            "if" | "ite" => Ok(Expr::IfThenElse(Box::new(raised[0].clone()), Box::new(raised[1].clone()), Box::new(raised[2].clone()))),
            "select" => Ok(Expr::ArraySelect(Box::new(raised[0].clone()), Box::new(raised[1].clone()))),
            "store" => Ok(Expr::ArrayStore(Box::new(raised[0].clone()), Box::new(raised[1].clone()), Box::new(raised[2].clone()))),
            "to_real" => Ok(Expr::AsReal(Box::new(raised[0].clone()))),
            "to_int" => Ok(Expr::AsInt(Box::new(raised[0].clone()))),
            other => Err(DriverError::solver(format!("cannot raise solver term with head '{other}'"))),
        }
    }

    pub fn sort_of(&self, ty: &Type) -> Sort<'ctx> {
        match ty {
            Type::Int => Sort::int(self.ctx),
            Type::Real => Sort::real(self.ctx),
            Type::Bool => Sort::bool(self.ctx),
            Type::Array(elem) => Sort::array(self.ctx, &Sort::int(self.ctx), &self.sort_of(elem)),
        }
    }

    /// The uninterpreted relation standing in for a Horn predicate symbol.
    pub fn predicate_decl(&self, name: &str, argsorts: &[Type]) -> FuncDecl<'ctx> {
        let domain: Vec<Sort> = argsorts.iter().map(|t| self.sort_of(t)).collect();
        let domain_refs: Vec<&Sort> = domain.iter().collect();
        FuncDecl::new(self.ctx, name, &domain_refs, &Sort::bool(self.ctx))
    }

    fn const_for(&self, name: &str, ty: &Type) -> Dynamic<'ctx> {
        match ty {
            Type::Int => Dynamic::from_ast(&Int::new_const(self.ctx, name)),
            Type::Real => Dynamic::from_ast(&Real::new_const(self.ctx, name)),
            Type::Bool => Dynamic::from_ast(&Bool::new_const(self.ctx, name)),
            Type::Array(elem) => {
                let domain = Sort::int(self.ctx);
                let range = self.sort_of(elem);
                Dynamic::from_ast(&Array::new_const(self.ctx, name, &domain, &range))
            }
        }
    }

    fn encode(&self, expr: &Expr, scope: &Scope<'ctx>) -> DResult<Dynamic<'ctx>> {
        match expr {
            Expr::Var(name, ty) => Ok(scope.get(name).cloned().unwrap_or_else(|| self.const_for(name, ty))),
            Expr::IntLit(n) => Ok(Dynamic::from_ast(&Int::from_i64(self.ctx, *n))),
            Expr::RealLit(r) => Ok(Dynamic::from_ast(&real_literal(self.ctx, *r))),
            Expr::BoolLit(b) => Ok(Dynamic::from_ast(&Bool::from_bool(self.ctx, *b))),
            Expr::Binary(op, l, r) => {
                let l = self.encode(l, scope)?;
                let r = self.encode(r, scope)?;
                self.encode_binary(*op, l, r)
            }
            Expr::Unary(op, e) => {
                let v = self.encode(e, scope)?;
                self.encode_unary(*op, v)
            }
            Expr::Rel(op, l, r) => {
                let l = self.encode(l, scope)?;
                let r = self.encode(r, scope)?;
                self.encode_rel(*op, l, r)
            }
            Expr::And(args) => {
                let mut parts = Vec::with_capacity(args.len());
                for a in args {
                    parts.push(as_bool(self.encode(a, scope)?)?);
                }
                let refs: Vec<&Bool> = parts.iter().collect();
                Ok(Dynamic::from_ast(&Bool::and(self.ctx, &refs)))
            }
            Expr::Or(args) => {
                let mut parts = Vec::with_capacity(args.len());
                for a in args {
                    parts.push(as_bool(self.encode(a, scope)?)?);
                }
                let refs: Vec<&Bool> = parts.iter().collect();
                Ok(Dynamic::from_ast(&Bool::or(self.ctx, &refs)))
            }
            Expr::Not(e) => Ok(Dynamic::from_ast(&as_bool(self.encode(e, scope)?)?.not())),
            Expr::Implies(p, q) => {
                let p = as_bool(self.encode(p, scope)?)?;
                let q = as_bool(self.encode(q, scope)?)?;
                Ok(Dynamic::from_ast(&p.implies(&q)))
            }
            Expr::IfThenElse(c, t, e) => {
                let c = as_bool(self.encode(c, scope)?)?;
                let t = self.encode(t, scope)?;
                let e = self.encode(e, scope)?;
                Ok(c.ite(&t, &e))
            }
            Expr::ArraySelect(a, i) => {
                let a = as_array(self.encode(a, scope)?)?;
                let i = as_int(self.encode(i, scope)?)?;
                Ok(a.select(&i))
            }
            Expr::ArrayStore(a, i, v) => {
                let a = as_array(self.encode(a, scope)?)?;
                let i = as_int(self.encode(i, scope)?)?;
                let v = self.encode(v, scope)?;
                Ok(Dynamic::from_ast(&a.store(&i, &v)))
            }
            Expr::AsInt(e) => {
                let v = self.encode(e, scope)?;
                match v.as_real() {
                    Some(r) => Ok(Dynamic::from_ast(&r.to_int())),
                    None => Ok(v),
                }
            }
            Expr::AsReal(e) => {
                let v = self.encode(e, scope)?;
                match v.as_int() {
                    Some(i) => Ok(Dynamic::from_ast(&i.to_real())),
                    None => Ok(v),
                }
            }
            Expr::Forall(vars, body) => self.encode_quantifier(vars, body, scope, true),
            Expr::ForallRange(var, ty, lo, hi, body) => {
                let bound = Int::new_const(self.ctx, var.as_str());
                let mut inner = scope.clone();
                inner.insert(var.clone(), Dynamic::from_ast(&bound));
                let lo = as_int(self.encode(lo, &inner)?)?;
                let hi = as_int(self.encode(hi, &inner)?)?;
                let body = as_bool(self.encode(body, &inner)?)?;
                let in_range = Bool::and(self.ctx, &[&bound.ge(&lo), &bound.lt(&hi)]);
                let guarded = in_range.implies(&body);
                let _ = ty;
                let bound_ref: &dyn Ast = &bound;
                Ok(Dynamic::from_ast(&forall_const(self.ctx, &[bound_ref], &[], &guarded)))
            }
            Expr::Exists(var, ty, domain, body) => {
                let bound = self.const_for(var, ty);
                let mut inner = scope.clone();
                inner.insert(var.clone(), bound.clone());
                let guard = match domain {
                    Domain::Type(_) => None,
                    Domain::Range(lo, hi) => {
                        let bound_int = as_int(bound.clone())?;
                        let lo = as_int(self.encode(lo, &inner)?)?;
                        let hi = as_int(self.encode(hi, &inner)?)?;
                        Some(Bool::and(self.ctx, &[&bound_int.ge(&lo), &bound_int.lt(&hi)]))
                    }
                };
                let body = as_bool(self.encode(body, &inner)?)?;
                let combined = match guard {
                    Some(g) => Bool::and(self.ctx, &[&g, &body]),
                    None => body,
                };
                let bound_ref: &dyn Ast = &bound;
                Ok(Dynamic::from_ast(&exists_const(self.ctx, &[bound_ref], &[], &combined)))
            }
            Expr::Predicate(name, args, argsorts) => {
                let decl = self.predicate_decl(name, argsorts);
                let mut encoded = Vec::with_capacity(args.len());
                for a in args {
                    encoded.push(self.encode(a, scope)?);
                }
                let refs: Vec<&dyn Ast> = encoded.iter().map(|d| d as &dyn Ast).collect();
                Ok(decl.apply(&refs))
            }
        }
    }

    fn encode_quantifier(
        &self,
        vars: &[(String, Type)],
        body: &Expr,
        scope: &Scope<'ctx>,
        universal: bool,
    ) -> DResult<Dynamic<'ctx>> {
        let mut inner = scope.clone();
        let bounds: Vec<Dynamic<'ctx>> = vars
            .iter()
            .map(|(name, ty)| {
                let c = self.const_for(name, ty);
                inner.insert(name.clone(), c.clone());
                c
            })
            .collect();
        let body = as_bool(self.encode(body, &inner)?)?;
        let bound_refs: Vec<&dyn Ast> = bounds.iter().map(|d| d as &dyn Ast).collect();
        if universal {
            Ok(Dynamic::from_ast(&forall_const(self.ctx, &bound_refs, &[], &body)))
        } else {
            Ok(Dynamic::from_ast(&exists_const(self.ctx, &bound_refs, &[], &body)))
        }
    }

    fn encode_binary(&self, op: BinOp, l: Dynamic<'ctx>, r: Dynamic<'ctx>) -> DResult<Dynamic<'ctx>> {
        if let (Some(li), Some(ri)) = (l.as_int(), r.as_int()) {
            return Ok(Dynamic::from_ast(&match op {
                BinOp::Add => li + ri,
                BinOp::Sub => li - ri,
                BinOp::Mul => li * ri,
                BinOp::Div => li.div(&ri),
                BinOp::Mod => li.modulo(&ri),
            }));
        }
        // `%` is Int-only (verifier_ast::Expr::get_type ties BinOp::Mod's
        // result to its Int-typed lhs); Real-sorted operands reaching here
        // mean a malformed VC, not a silently-computed wrong answer.
        if matches!(op, BinOp::Mod) {
            return Err(DriverError::solver("modulo is only defined over Int operands"));
        }
        let lr = as_real(l)?;
        let rr = as_real(r)?;
        Ok(Dynamic::from_ast(&match op {
            BinOp::Add => lr + rr,
            BinOp::Sub => lr - rr,
            BinOp::Mul => lr * rr,
            BinOp::Div => lr.div(&rr),
            BinOp::Mod => unreachable!("handled above"),
        }))
    }

    fn encode_unary(&self, op: UnOp, v: Dynamic<'ctx>) -> DResult<Dynamic<'ctx>> {
        match op {
            UnOp::Plus => Ok(v),
            UnOp::Neg => {
                if let Some(i) = v.as_int() {
                    Ok(Dynamic::from_ast(&i.unary_minus()))
                } else {
                    Ok(Dynamic::from_ast(&as_real(v)?.unary_minus()))
                }
            }
        }
    }

    fn encode_rel(&self, op: RelOp, l: Dynamic<'ctx>, r: Dynamic<'ctx>) -> DResult<Dynamic<'ctx>> {
        if matches!(op, RelOp::Eq) {
            return Ok(Dynamic::from_ast(&l._eq(&r)));
        }
        if matches!(op, RelOp::Ne) {
            return Ok(Dynamic::from_ast(&l._eq(&r).not()));
        }
        if let (Some(li), Some(ri)) = (l.as_int(), r.as_int()) {
            return Ok(Dynamic::from_ast(&match op {
                RelOp::Lt => li.lt(&ri),
                RelOp::Le => li.le(&ri),
                RelOp::Gt => li.gt(&ri),
                RelOp::Ge => li.ge(&ri),
                RelOp::Eq | RelOp::Ne => unreachable!(),
            }));
        }
        let lr = as_real(l)?;
        let rr = as_real(r)?;
        Ok(Dynamic::from_ast(&match op {
            RelOp::Lt => lr.lt(&rr),
            RelOp::Le => lr.le(&rr),
            RelOp::Gt => lr.gt(&rr),
            RelOp::Ge => lr.ge(&rr),
            RelOp::Eq | RelOp::Ne => unreachable!(),
        }))
    }
}

/// Converts an `f64` literal to a Z3 rational. The original source works
/// over arbitrary-precision rationals; this drops to a fixed denominator,
/// adequate for the literal magnitudes the grammar's `Constant` token
/// actually produces.
fn real_literal<'ctx>(ctx: &'ctx Context, value: f64) -> Real<'ctx> {
    const SCALE: i64 = 1_000_000;
    let scaled = (value * SCALE as f64).round() as i64;
    Real::from_real(ctx, scaled as i32, SCALE as i32)
}

fn as_bool<'ctx>(d: Dynamic<'ctx>) -> DResult<Bool<'ctx>> {
    d.as_bool().ok_or_else(|| DriverError::solver("expected a Bool-sorted term"))
}

fn as_int<'ctx>(d: Dynamic<'ctx>) -> DResult<Int<'ctx>> {
    d.as_int().ok_or_else(|| DriverError::solver("expected an Int-sorted term"))
}

fn as_real<'ctx>(d: Dynamic<'ctx>) -> DResult<Real<'ctx>> {
    match d.as_real() {
        Some(r) => Ok(r),
        None => match d.as_int() {
            Some(i) => Ok(i.to_real()),
            None => Err(DriverError::solver("expected a Real- or Int-sorted term")),
        },
    }
}

fn as_array<'ctx>(d: Dynamic<'ctx>) -> DResult<Array<'ctx>> {
    d.as_array().ok_or_else(|| DriverError::solver("expected an Array-sorted term"))
}

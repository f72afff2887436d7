//! The expression algebra (spec.md §3/§4.1): a tagged-sum `Expr`, its
//! operators, `from_ast` lowering from the Parser's tree, capture-avoiding
//! substitution, type derivation, and pretty-printing.

use crate::builtin::Builtin;
use crate::env::Environment;
use crate::types::Type;
use std::collections::HashMap;
use std::fmt;
use verifier_base::{Result as VResult, UnsupportedSyntax};
use verifier_parser::{AstNode, AstType};

/// Arithmetic binary operators (`+ - * / %`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    fn from_sym(sym: &str) -> Option<BinOp> {
        match sym {
            "+" => Some(BinOp::Add),
            "-" => Some(BinOp::Sub),
            "*" => Some(BinOp::Mul),
            "/" => Some(BinOp::Div),
            "%" => Some(BinOp::Mod),
            _ => None,
        }
    }

    pub fn sym(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        }
    }

    fn is_mul_group(self) -> bool {
        matches!(self, BinOp::Mul | BinOp::Div | BinOp::Mod)
    }

    fn is_add_group(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub)
    }
}

/// Unary operators (`+ -`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus,
    Neg,
}

impl UnOp {
    fn from_sym(sym: &str) -> Option<UnOp> {
        match sym {
            "+" => Some(UnOp::Plus),
            "-" => Some(UnOp::Neg),
            _ => None,
        }
    }

    pub fn sym(self) -> &'static str {
        match self {
            UnOp::Plus => "+",
            UnOp::Neg => "-",
        }
    }
}

/// Relational/equality operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl RelOp {
    fn from_sym(sym: &str) -> Option<RelOp> {
        match sym {
            "==" => Some(RelOp::Eq),
            "!=" => Some(RelOp::Ne),
            "<" => Some(RelOp::Lt),
            "<=" => Some(RelOp::Le),
            ">" => Some(RelOp::Gt),
            ">=" => Some(RelOp::Ge),
            _ => None,
        }
    }

    fn pretty(self) -> &'static str {
        match self {
            RelOp::Eq => "=",
            RelOp::Ne => "≠",
            RelOp::Lt => "<",
            RelOp::Le => "≤",
            RelOp::Gt => ">",
            RelOp::Ge => "≥",
        }
    }
}

/// The domain of a quantified variable: either a scalar type or a half-open
/// integer range `[lo, hi)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Domain {
    Type(Type),
    Range(Box<Expr>, Box<Expr>),
}

/// The expression algebra (spec.md §3). One variant per construct, all
/// immutable, all owning their syntactic children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Var(String, Type),
    IntLit(i64),
    RealLit(f64),
    BoolLit(bool),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Unary(UnOp, Box<Expr>),
    Rel(RelOp, Box<Expr>, Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
    Implies(Box<Expr>, Box<Expr>),
    IfThenElse(Box<Expr>, Box<Expr>, Box<Expr>),
    ArraySelect(Box<Expr>, Box<Expr>),
    ArrayStore(Box<Expr>, Box<Expr>, Box<Expr>),
    AsInt(Box<Expr>),
    AsReal(Box<Expr>),
    /// `forall v1: T1, v2: T2, ... . body`
    Forall(Vec<(String, Type)>, Box<Expr>),
    /// `forall v in [lo, hi) . body`, sugar carried as its own variant.
    ForallRange(String, Type, Box<Expr>, Box<Expr>, Box<Expr>),
    Exists(String, Type, Domain, Box<Expr>),
    /// Uninterpreted predicate symbol — the Horn invariant placeholder.
    Predicate(String, Vec<Expr>, Vec<Type>),
}

impl Expr {
    pub fn var(name: impl Into<String>, ty: Type) -> Expr {
        Expr::Var(name.into(), ty)
    }

    pub fn and(args: Vec<Expr>) -> Expr {
        Expr::And(args)
    }

    pub fn or(args: Vec<Expr>) -> Expr {
        Expr::Or(args)
    }

    /// Derives this expression's type from its structure and its children's
    /// types (spec.md §3 table).
    pub fn get_type(&self) -> Type {
        match self {
            Expr::Var(_, ty) => ty.clone(),
            Expr::IntLit(_) => Type::Int,
            Expr::RealLit(_) => Type::Real,
            Expr::BoolLit(_) => Type::Bool,
            Expr::Binary(_, lhs, _) => lhs.get_type(),
            Expr::Unary(_, operand) => operand.get_type(),
            Expr::Rel(..) => Type::Bool,
            Expr::And(_) | Expr::Or(_) | Expr::Not(_) | Expr::Implies(..) => Type::Bool,
            // Polymorphic: the branches agree by construction, so either
            // branch's type is the IfThenElse's type (spec.md §3).
            Expr::IfThenElse(_, value_true, _) => value_true.get_type(),
            Expr::ArraySelect(array, _) => array
                .get_type()
                .element()
                .cloned()
                .expect("ArraySelect base must have array type"),
            // Store returns a fresh array-typed term, not an element.
            Expr::ArrayStore(array, ..) => array.get_type(),
            Expr::AsInt(_) => Type::Int,
            Expr::AsReal(_) => Type::Real,
            Expr::Forall(..) | Expr::ForallRange(..) | Expr::Exists(..) | Expr::Predicate(..) => {
                Type::Bool
            }
        }
    }

    /// Capture-avoiding substitution. Quantified variables shadow `sigma`:
    /// their keys are removed from a local copy before recursing into the
    /// body (and, for range-bounded quantifiers, into the bounds too —
    /// matching `original_source/expr.py`'s `ForAllRange.assign`).
    pub fn assign(&self, sigma: &HashMap<String, Expr>) -> Expr {
        match self {
            Expr::Var(name, _) => sigma.get(name).cloned().unwrap_or_else(|| self.clone()),
            Expr::IntLit(_) | Expr::RealLit(_) | Expr::BoolLit(_) => self.clone(),
            Expr::Binary(op, l, r) => {
                Expr::Binary(*op, Box::new(l.assign(sigma)), Box::new(r.assign(sigma)))
            }
            Expr::Unary(op, e) => Expr::Unary(*op, Box::new(e.assign(sigma))),
            Expr::Rel(op, l, r) => {
                Expr::Rel(*op, Box::new(l.assign(sigma)), Box::new(r.assign(sigma)))
            }
            Expr::And(args) => Expr::And(args.iter().map(|a| a.assign(sigma)).collect()),
            Expr::Or(args) => Expr::Or(args.iter().map(|a| a.assign(sigma)).collect()),
            Expr::Not(e) => Expr::Not(Box::new(e.assign(sigma))),
            Expr::Implies(p, q) => {
                Expr::Implies(Box::new(p.assign(sigma)), Box::new(q.assign(sigma)))
            }
            Expr::IfThenElse(c, t, e) => Expr::IfThenElse(
                Box::new(c.assign(sigma)),
                Box::new(t.assign(sigma)),
                Box::new(e.assign(sigma)),
            ),
            Expr::ArraySelect(a, i) => {
                Expr::ArraySelect(Box::new(a.assign(sigma)), Box::new(i.assign(sigma)))
            }
            Expr::ArrayStore(a, i, v) => Expr::ArrayStore(
                Box::new(a.assign(sigma)),
                Box::new(i.assign(sigma)),
                Box::new(v.assign(sigma)),
            ),
            Expr::AsInt(e) => Expr::AsInt(Box::new(e.assign(sigma))),
            Expr::AsReal(e) => Expr::AsReal(Box::new(e.assign(sigma))),
            Expr::Forall(vars, body) => {
                let inner = shadow(sigma, vars.iter().map(|(n, _)| n.as_str()));
                Expr::Forall(vars.clone(), Box::new(body.assign(&inner)))
            }
            Expr::ForallRange(var, ty, lo, hi, body) => {
                let inner = shadow(sigma, std::iter::once(var.as_str()));
                Expr::ForallRange(
                    var.clone(),
                    ty.clone(),
                    Box::new(lo.assign(&inner)),
                    Box::new(hi.assign(&inner)),
                    Box::new(body.assign(&inner)),
                )
            }
            Expr::Exists(var, ty, domain, body) => {
                let inner = shadow(sigma, std::iter::once(var.as_str()));
                let domain = match domain {
                    Domain::Type(t) => Domain::Type(t.clone()),
                    Domain::Range(lo, hi) => {
                        Domain::Range(Box::new(lo.assign(&inner)), Box::new(hi.assign(&inner)))
                    }
                };
                Expr::Exists(var.clone(), ty.clone(), domain, Box::new(body.assign(&inner)))
            }
            Expr::Predicate(name, args, sorts) => Expr::Predicate(
                name.clone(),
                args.iter().map(|a| a.assign(sigma)).collect(),
                sorts.clone(),
            ),
        }
    }

    /// Lowers a Parser AST node into an expression, resolving identifiers
    /// and quantifier binders through `env` (spec.md §4.1).
    pub fn from_ast(ast: &AstNode, env: &mut Environment) -> VResult<Expr> {
        use AstType::*;
        match ast.ty {
            RelationalExpression | EqualityExpression => {
                let lhs = Expr::from_ast(ast.child(0), env)?;
                let op_text = ast.child(1).text.as_deref().ok_or_else(|| {
                    UnsupportedSyntax::at("relational operator missing text", ast.range())
                })?;
                let rhs = Expr::from_ast(ast.child(2), env)?;
                let op = RelOp::from_sym(op_text).ok_or_else(|| {
                    UnsupportedSyntax::at(format!("unknown relational operator {op_text}"), ast.range())
                })?;
                Ok(Expr::Rel(op, Box::new(lhs), Box::new(rhs)))
            }
            Identifier => {
                let text = ast
                    .text
                    .as_deref()
                    .ok_or_else(|| UnsupportedSyntax::at("identifier missing text", ast.range()))?;
                if text == "true" {
                    return Ok(Expr::BoolLit(true));
                }
                if text == "false" {
                    return Ok(Expr::BoolLit(false));
                }
                let ty = env
                    .type_of(text)
                    .ok_or_else(|| UnsupportedSyntax::at(format!("'{text}' is not in scope"), ast.range()))?;
                Ok(Expr::Var(env.rename(text), ty))
            }
            LogicalAndExpression => Ok(Expr::And(vec![
                Expr::from_ast(ast.child(0), env)?,
                Expr::from_ast(ast.child(2), env)?,
            ])),
            LogicalOrExpression => Ok(Expr::Or(vec![
                Expr::from_ast(ast.child(0), env)?,
                Expr::from_ast(ast.child(2), env)?,
            ])),
            PrimaryExpression => Expr::from_ast(ast.child(1), env),
            PostfixExpression => from_postfix(ast, env),
            Constant => {
                let text = ast
                    .text
                    .as_deref()
                    .ok_or_else(|| UnsupportedSyntax::at("constant missing text", ast.range()))?;
                if text == "true" || text == "false" {
                    Ok(Expr::BoolLit(text == "true"))
                } else if !text.contains('.') && text.parse::<i64>().is_ok() {
                    Ok(Expr::IntLit(text.parse().unwrap()))
                } else {
                    text.parse::<f64>().map(Expr::RealLit).map_err(|_| {
                        UnsupportedSyntax::at(format!("malformed numeric constant {text}"), ast.range())
                    })
                }
            }
            AdditiveExpression | MultiplicativeExpression => {
                let op_text = ast.child(1).text.as_deref().ok_or_else(|| {
                    UnsupportedSyntax::at("binary operator missing text", ast.range())
                })?;
                let op = BinOp::from_sym(op_text).ok_or_else(|| {
                    UnsupportedSyntax::at(format!("unknown binary operator {op_text}"), ast.range())
                })?;
                let lhs = Expr::from_ast(ast.child(0), env)?;
                let rhs = Expr::from_ast(ast.child(2), env)?;
                Ok(Expr::Binary(op, Box::new(lhs), Box::new(rhs)))
            }
            ShiftExpression | AndExpression | ExclusiveOrExpression | InclusiveOrExpression => {
                Err(UnsupportedSyntax::at(
                    "bitwise/shift operators are not supported",
                    ast.range(),
                ))
            }
            UnaryExpression => {
                let op = ast.child(0).text.as_deref().ok_or_else(|| {
                    UnsupportedSyntax::at("unary operator missing text", ast.range())
                })?;
                if op == "!" {
                    Ok(Expr::Not(Box::new(Expr::from_ast(ast.child(1), env)?)))
                } else {
                    let uop = UnOp::from_sym(op).ok_or_else(|| {
                        UnsupportedSyntax::at(format!("unknown unary operator {op}"), ast.range())
                    })?;
                    Ok(Expr::Unary(uop, Box::new(Expr::from_ast(ast.child(1), env)?)))
                }
            }
            ConditionalExpression => Ok(Expr::IfThenElse(
                Box::new(Expr::from_ast(ast.child(0), env)?),
                Box::new(Expr::from_ast(ast.child(2), env)?),
                Box::new(Expr::from_ast(ast.child(4), env)?),
            )),
            CastExpression => {
                let ty_name = ast.child(1).text.as_deref().ok_or_else(|| {
                    UnsupportedSyntax::at("cast target missing text", ast.range())
                })?;
                let inner = Expr::from_ast(ast.child(3), env)?;
                match ty_name {
                    "int" => Ok(Expr::AsInt(Box::new(inner))),
                    "float" => Ok(Expr::AsReal(Box::new(inner))),
                    other => Err(UnsupportedSyntax::at(
                        format!("cannot cast expression to type {other}"),
                        ast.range(),
                    )),
                }
            }
            other => Err(UnsupportedSyntax::at(
                format!("unknown expression node {}", other.as_str()),
                ast.range(),
            )),
        }
    }
}

/// Removes `names` from a copy of `sigma`, for capture-avoiding recursion
/// into a quantifier body (and, for range quantifiers, its bounds).
fn shadow<'a>(
    sigma: &HashMap<String, Expr>,
    names: impl Iterator<Item = &'a str>,
) -> HashMap<String, Expr> {
    let mut inner = sigma.clone();
    for name in names {
        inner.remove(name);
    }
    inner
}

fn parse_type_name(name: &str) -> Option<Type> {
    match name {
        "int" => Some(Type::Int),
        "float" => Some(Type::Real),
        "bool" => Some(Type::Bool),
        "array_int" => Some(Type::array(Type::Int)),
        "array_float" => Some(Type::array(Type::Real)),
        "array_bool" => Some(Type::array(Type::Bool)),
        _ => None,
    }
}

fn from_postfix(ast: &AstNode, env: &mut Environment) -> VResult<Expr> {
    if ast.child(1).ty == AstType::ParenLeft && ast.child(0).ty == AstType::Identifier {
        let name = ast
            .child(0)
            .text
            .as_deref()
            .ok_or_else(|| UnsupportedSyntax::at("function name missing text", ast.range()))?;
        match Builtin::recognize(name) {
            Some(Builtin::Forall) => parse_quantifier(ast, env, true),
            Some(Builtin::Exists) => parse_quantifier(ast, env, false),
            Some(Builtin::Then) => parse_then(ast, env),
            _ => Err(UnsupportedSyntax::at(format!("unknown function {name}"), ast.range())),
        }
    } else {
        if ast.child(1).ty != AstType::BracketLeft {
            return Err(UnsupportedSyntax::at(
                "unsupported postfix expression shape",
                ast.range(),
            ));
        }
        let array = Expr::from_ast(ast.child(0), env)?;
        let index = Expr::from_ast(ast.child(2), env)?;
        Ok(Expr::ArraySelect(Box::new(array), Box::new(index)))
    }
}

fn parse_quantifier(ast: &AstNode, env: &mut Environment, is_forall: bool) -> VResult<Expr> {
    let args = ast.child(2);
    let binder = args.child(0);
    let var_name = binder
        .child(0)
        .text
        .as_deref()
        .ok_or_else(|| UnsupportedSyntax::at("quantifier binder missing a variable name", ast.range()))?
        .to_string();
    let domain_node = binder.child(2);

    let domain = if domain_node.ty == AstType::Identifier {
        let type_name = domain_node
            .text
            .as_deref()
            .ok_or_else(|| UnsupportedSyntax::at("quantifier domain missing a type name", ast.range()))?;
        let ty = parse_type_name(type_name)
            .ok_or_else(|| UnsupportedSyntax::at(format!("unknown domain type {type_name}"), ast.range()))?;
        Domain::Type(ty)
    } else {
        let range_args = domain_node.child(2);
        let lo = Expr::from_ast(range_args.child(0), env)?;
        let hi = Expr::from_ast(range_args.child(2), env)?;
        Domain::Range(Box::new(lo), Box::new(hi))
    };

    let var_type = match &domain {
        Domain::Type(t) => t.clone(),
        Domain::Range(_, _) => Type::Int,
    };

    env.open_scope();
    env.declare(&var_name, var_type.clone());
    let renamed = env.rename(&var_name);
    env.exclude_var(&renamed);
    let body = Expr::from_ast(args.child(2), env)?;
    env.close_scope();

    if is_forall {
        match domain {
            Domain::Range(lo, hi) => Ok(Expr::ForallRange(renamed, var_type, lo, hi, Box::new(body))),
            Domain::Type(t) => Ok(Expr::Forall(vec![(renamed, t)], Box::new(body))),
        }
    } else {
        Ok(Expr::Exists(renamed, var_type, domain, Box::new(body)))
    }
}

fn parse_then(ast: &AstNode, env: &mut Environment) -> VResult<Expr> {
    let args = ast.child(2);
    if args.child(0).ty == AstType::ArgumentExpressionList {
        let cond = Expr::from_ast(args.child(0).child(0), env)?;
        let then_branch = Expr::from_ast(args.child(0).child(2), env)?;
        let else_branch = Expr::from_ast(args.child(2), env)?;
        Ok(Expr::IfThenElse(
            Box::new(cond),
            Box::new(then_branch),
            Box::new(else_branch),
        ))
    } else {
        let if_ = Expr::from_ast(args.child(0), env)?;
        let then_ = Expr::from_ast(args.child(2), env)?;
        Ok(Expr::Implies(Box::new(if_), Box::new(then_)))
    }
}

fn is_atomic_and_arg(e: &Expr) -> bool {
    matches!(e, Expr::And(_) | Expr::Not(_) | Expr::Var(..) | Expr::BoolLit(_))
}

fn is_atomic_or_arg(e: &Expr) -> bool {
    matches!(
        e,
        Expr::And(_) | Expr::Or(_) | Expr::Not(_) | Expr::Var(..) | Expr::BoolLit(_)
    )
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(name, _) => write!(f, "{name}"),
            Expr::IntLit(n) => write!(f, "{n}"),
            Expr::RealLit(r) => write!(f, "{r}"),
            Expr::BoolLit(b) => write!(f, "{b}"),
            Expr::Rel(op, l, r) => write!(f, "{l} {} {r}", op.pretty()),
            Expr::And(args) => {
                let parts: Vec<String> = args
                    .iter()
                    .map(|a| {
                        if is_atomic_and_arg(a) {
                            format!("{a}")
                        } else {
                            format!("({a})")
                        }
                    })
                    .collect();
                write!(f, "{}", parts.join(" ∧ "))
            }
            Expr::Or(args) => {
                let parts: Vec<String> = args
                    .iter()
                    .map(|a| {
                        if is_atomic_or_arg(a) {
                            format!("{a}")
                        } else {
                            format!("({a})")
                        }
                    })
                    .collect();
                write!(f, "{}", parts.join(" ∨ "))
            }
            Expr::Not(e) => write!(f, "¬({e})"),
            Expr::Implies(p, q) => {
                if matches!(**q, Expr::Implies(..) | Expr::Forall(..) | Expr::ForallRange(..) | Expr::Exists(..)) {
                    write!(f, "{p} → ({q})")
                } else {
                    write!(f, "{p} → {q}")
                }
            }
            Expr::IfThenElse(c, t, e) => write!(f, "({c}?{{{t}}}:{{{e}}})"),
            Expr::ArraySelect(a, i) => write!(f, "{a}[{i}]"),
            Expr::ArrayStore(a, i, v) => write!(f, "Store({a}, {i}, {v})"),
            Expr::AsInt(e) => write!(f, "int({e})"),
            Expr::AsReal(e) => write!(f, "real({e})"),
            Expr::Binary(op, l, r) => {
                if op.is_mul_group() {
                    let l_str = match **l {
                        Expr::Binary(inner, ..) if inner.is_add_group() => format!("({l})"),
                        _ => format!("{l}"),
                    };
                    let r_str = match **r {
                        Expr::Binary(inner, ..) if inner != *op => format!("({r})"),
                        _ => format!("{r}"),
                    };
                    write!(f, "{l_str} {} {r_str}", op.sym())
                } else {
                    write!(f, "{l} {} {r}", op.sym())
                }
            }
            Expr::Unary(op, e) => {
                if matches!(**e, Expr::Binary(..)) {
                    write!(f, "{}({e})", op.sym())
                } else {
                    write!(f, "{}{e}", op.sym())
                }
            }
            Expr::Forall(vars, body) => {
                let binders: Vec<String> = vars.iter().map(|(n, t)| format!("{n}∈{t}")).collect();
                write!(f, "∀{}.{body}", binders.join(","))
            }
            Expr::ForallRange(var, _, lo, hi, body) => {
                write!(f, "∀{var}∈({lo},{hi}).{body}")
            }
            Expr::Exists(var, _, domain, body) => {
                let domain_str = match domain {
                    Domain::Type(t) => format!("{t}"),
                    Domain::Range(lo, hi) => format!("({lo},{hi})"),
                };
                write!(f, "∃{var}∈{domain_str}.{body}")
            }
            Expr::Predicate(name, args, _) => {
                let parts: Vec<String> = args.iter().map(|a| format!("{a}")).collect();
                write!(f, "{name}({})", parts.join(","))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str, ty: Type) -> Expr {
        Expr::Var(name.to_string(), ty)
    }

    #[test]
    fn substitution_identity_on_empty_sigma() {
        let e = Expr::Rel(
            RelOp::Gt,
            Box::new(v("a", Type::Int)),
            Box::new(Expr::IntLit(5)),
        );
        assert_eq!(e.assign(&HashMap::new()), e);
    }

    #[test]
    fn substitution_replaces_free_variable() {
        let e = v("a", Type::Int);
        let mut sigma = HashMap::new();
        sigma.insert("a".to_string(), Expr::IntLit(7));
        assert_eq!(e.assign(&sigma), Expr::IntLit(7));
    }

    #[test]
    fn substitution_idempotent_on_closed_terms() {
        let e = Expr::IntLit(3);
        let mut sigma = HashMap::new();
        sigma.insert("a".to_string(), Expr::IntLit(99));
        assert_eq!(e.assign(&sigma), e);
    }

    #[test]
    fn substitution_composes() {
        let e = v("a", Type::Int);
        let mut s1 = HashMap::new();
        s1.insert("a".to_string(), v("b", Type::Int));
        let mut s2 = HashMap::new();
        s2.insert("b".to_string(), Expr::IntLit(1));
        let composed = e.assign(&s1).assign(&s2);

        let mut merged = s1.clone();
        merged.extend(s2.clone());
        assert_eq!(composed, e.assign(&merged));
    }

    #[test]
    fn quantified_variable_shadows_substitution() {
        let body = Expr::Rel(RelOp::Ge, Box::new(v("k", Type::Int)), Box::new(Expr::IntLit(0)));
        let forall = Expr::Forall(vec![("k".to_string(), Type::Int)], Box::new(body.clone()));
        let mut sigma = HashMap::new();
        sigma.insert("k".to_string(), Expr::IntLit(42));
        assert_eq!(forall.assign(&sigma), forall);
    }

    #[test]
    fn get_type_binary_follows_lhs() {
        let e = Expr::Binary(BinOp::Add, Box::new(v("a", Type::Real)), Box::new(Expr::IntLit(1)));
        assert_eq!(e.get_type(), Type::Real);
    }

    #[test]
    fn get_type_array_select_is_element_type() {
        let a = v("arr", Type::array(Type::Int));
        let e = Expr::ArraySelect(Box::new(a), Box::new(Expr::IntLit(0)));
        assert_eq!(e.get_type(), Type::Int);
    }

    #[test]
    fn get_type_array_store_is_array_type() {
        let a = v("arr", Type::array(Type::Int));
        let e = Expr::ArrayStore(Box::new(a.clone()), Box::new(Expr::IntLit(0)), Box::new(Expr::IntLit(9)));
        assert_eq!(e.get_type(), a.get_type());
    }

    #[test]
    fn display_and_uses_wedge_with_minimal_parens() {
        let e = Expr::And(vec![
            Expr::Rel(RelOp::Ge, Box::new(v("a", Type::Int)), Box::new(v("b", Type::Int))),
            v("c", Type::Bool),
        ]);
        assert_eq!(e.to_string(), "a ≥ b ∧ c");
    }

    #[test]
    fn display_not_always_parenthesizes() {
        let e = Expr::Not(Box::new(v("p", Type::Bool)));
        assert_eq!(e.to_string(), "¬(p)");
    }

    #[test]
    fn display_relational_uses_unicode_operators() {
        let e = Expr::Rel(RelOp::Le, Box::new(v("a", Type::Int)), Box::new(v("b", Type::Int)));
        assert_eq!(e.to_string(), "a ≤ b");
    }

    #[test]
    fn type_name_parsing_covers_scalars_and_arrays() {
        assert_eq!(parse_type_name("int"), Some(Type::Int));
        assert_eq!(parse_type_name("array_bool"), Some(Type::array(Type::Bool)));
        assert_eq!(parse_type_name("nonsense"), None);
    }
}

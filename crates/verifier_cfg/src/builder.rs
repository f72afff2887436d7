//! The statement-directed CFG builder (spec.md §4.2): destination-passing —
//! every constructor receives a `next` successor and returns the entry node
//! of the translated statement, patching `Dummy` placeholders where a
//! successor can't be named yet (chiefly a loop back-edge).

use crate::node::{Cfg, Node, NodeId};
use log::trace;
use verifier_ast::{BinOp, Builtin, Environment, Expr, Type};
use verifier_base::{AstRange, Result as VResult, UnsupportedSyntax};
use verifier_parser::{AstNode, AstType};

pub struct Builder {
    pub(crate) cfg: Cfg,
    pub(crate) env: Environment,
    remember_stack: Vec<Vec<Expr>>,
    break_stack: Vec<NodeId>,
    continue_stack: Vec<NodeId>,
}

impl Builder {
    pub fn new() -> Self {
        Builder {
            cfg: Cfg::new(),
            env: Environment::new(),
            remember_stack: vec![Vec::new()],
            break_stack: Vec::new(),
            continue_stack: Vec::new(),
        }
    }

    /// Builds a function's body, pulling a leading `requires(p)` call (if
    /// present) out as the Start precondition instead of threading it
    /// through as an ordinary statement (spec.md §4.7).
    pub fn build_function(&mut self, body: &AstNode) -> VResult<Option<Expr>> {
        let end = self.cfg.end();
        self.env.open_scope();
        self.remember_stack.push(Vec::new());

        let items: Vec<&AstNode> = if body.len() <= 2 { Vec::new() } else { Self::flatten_block_items(body.child(1)) };

        let mut requires = None;
        let mut rest: &[&AstNode] = &items;
        if let Some(first) = items.first() {
            if let Some(p) = self.try_extract_requires(first)? {
                requires = Some(p);
                rest = &items[1..];
            }
        }

        let result = self.build_items(rest, end, None);
        self.remember_stack.pop();
        self.env.close_scope();
        let entry = result?;

        self.cfg.set_start_next(entry);
        if let Some(p) = &requires {
            self.cfg.set_start_requires(p.clone());
        }
        Ok(requires)
    }

    /// Recognizes `requires(p);` as a bare expression statement, without
    /// committing to it being one (any other statement falls through to the
    /// ordinary statement builder).
    fn try_extract_requires(&mut self, item: &AstNode) -> VResult<Option<Expr>> {
        if item.ty != AstType::ExpressionStatement || item.is_empty() || item.len() == 1 {
            return Ok(None);
        }
        let expr = item.child(0);
        if expr.ty != AstType::PostfixExpression || expr.len() < 3 || expr.child(1).ty != AstType::ParenLeft {
            return Ok(None);
        }
        let Some(name) = expr.child(0).text.as_deref() else {
            return Ok(None);
        };
        if !matches!(Builtin::recognize(name), Some(Builtin::Requires)) {
            return Ok(None);
        }
        let args = Self::flatten_args(expr.child(2));
        Ok(Some(Expr::from_ast(args[0], &mut self.env)?))
    }

    fn active_remembers(&self) -> Vec<Expr> {
        self.remember_stack.iter().flatten().cloned().collect()
    }

    fn flatten_block_items<'a>(node: &'a AstNode) -> Vec<&'a AstNode> {
        if node.ty == AstType::BlockItemList && node.len() == 2 {
            let mut items = Self::flatten_block_items(node.child(0));
            items.push(node.child(1));
            items
        } else {
            vec![node]
        }
    }

    fn flatten_args<'a>(node: &'a AstNode) -> Vec<&'a AstNode> {
        if node.ty == AstType::ArgumentExpressionList {
            let mut args = Self::flatten_args(node.child(0));
            args.push(node.child(2));
            args
        } else {
            vec![node]
        }
    }

    pub fn build_statement(&mut self, ast: &AstNode, next: NodeId) -> VResult<NodeId> {
        self.build_statement_labeled(ast, next, None)
    }

    /// Same as `build_statement`, but forwards an in-progress switch's
    /// `labels` accumulator into a nested `CompoundStatement` instead of
    /// dropping it, so `case`/`default` labels nested inside a compound
    /// block nested within a switch body still get collected (spec.md
    /// §4.2: "labels may be nested in the compound").
    fn build_statement_labeled(
        &mut self,
        ast: &AstNode,
        next: NodeId,
        labels: Option<&mut Vec<(Option<Expr>, NodeId)>>,
    ) -> VResult<NodeId> {
        match ast.ty {
            AstType::ExpressionStatement => self.build_expression_statement(ast, next),
            AstType::CompoundStatement => self.build_compound(ast, next, labels),
            AstType::SelectionStatement => self.build_selection(ast, next),
            AstType::IterationStatement => self.build_iteration(ast, next),
            AstType::JumpStatement => self.build_jump(ast, next),
            AstType::Declaration => self.build_declaration(ast, next),
            AstType::LabeledStatement => self.build_labeled(ast, next),
            other => Err(UnsupportedSyntax::at(
                format!("unknown statement node {}", other.as_str()),
                ast.range(),
            )),
        }
    }

    // --- compound / sequencing -------------------------------------------------

    fn build_compound(
        &mut self,
        ast: &AstNode,
        next: NodeId,
        labels: Option<&mut Vec<(Option<Expr>, NodeId)>>,
    ) -> VResult<NodeId> {
        self.env.open_scope();
        self.remember_stack.push(Vec::new());
        let items: Vec<&AstNode> = if ast.len() <= 2 {
            Vec::new()
        } else {
            Self::flatten_block_items(ast.child(1))
        };
        let result = self.build_items(&items, next, labels);
        self.remember_stack.pop();
        self.env.close_scope();
        result
    }

    fn build_items(
        &mut self,
        items: &[&AstNode],
        next: NodeId,
        mut labels: Option<&mut Vec<(Option<Expr>, NodeId)>>,
    ) -> VResult<NodeId> {
        if items.is_empty() {
            return Ok(next);
        }
        let mut entry_of_first = None;
        let mut prev: Option<(NodeId, NodeId)> = None; // (dummy used as prev item's next, prev item's entry)

        for (idx, item) in items.iter().enumerate() {
            let item_next = if idx + 1 == items.len() {
                next
            } else {
                self.cfg.alloc_dummy()
            };
            let entry = self.build_statement_labeled(item, item_next, labels.as_deref_mut())?;
            if idx == 0 {
                entry_of_first = Some(entry);
            }
            if let Some((dummy, root)) = prev {
                self.cfg.rewire(root, dummy, entry);
            }
            if let Some(labels) = labels.as_deref_mut() {
                if item.ty == AstType::LabeledStatement {
                    let case_value = match item.child(0).ty {
                        AstType::Case => Some(Expr::from_ast(item.child(1), &mut self.env)?),
                        _ => None,
                    };
                    labels.push((case_value, entry));
                }
            }
            prev = if idx + 1 < items.len() { Some((item_next, entry)) } else { None };
        }
        Ok(entry_of_first.expect("non-empty items"))
    }

    fn build_labeled(&mut self, ast: &AstNode, next: NodeId) -> VResult<NodeId> {
        match ast.child(0).ty {
            AstType::Case => self.build_statement(ast.child(3), next),
            AstType::Default => self.build_statement(ast.child(2), next),
            AstType::Identifier => Err(UnsupportedSyntax::at("goto labels are not supported", ast.range())),
            _ => Err(UnsupportedSyntax::at("unknown labeled statement", ast.range())),
        }
    }

    // --- expression statements ---------------------------------------------------

    fn build_expression_statement(&mut self, ast: &AstNode, next: NodeId) -> VResult<NodeId> {
        if ast.is_empty() || ast.len() == 1 {
            return Ok(next);
        }
        self.build_expr_effect(ast.child(0), next)
    }

    fn build_expr_effect(&mut self, expr: &AstNode, next: NodeId) -> VResult<NodeId> {
        match expr.ty {
            AstType::AssignmentExpression => self.build_assignment(expr, next),
            AstType::PostfixExpression if expr.len() >= 3 && expr.child(1).ty == AstType::ParenLeft => {
                self.build_call_statement(expr, next)
            }
            AstType::PostfixExpression if expr.len() == 2 && expr.child(1).ty == AstType::IncOp => {
                self.build_incdec(expr.child(0), true, next, expr.range())
            }
            AstType::PostfixExpression if expr.len() == 2 && expr.child(1).ty == AstType::DecOp => {
                self.build_incdec(expr.child(0), false, next, expr.range())
            }
            AstType::UnaryExpression if expr.child(0).ty == AstType::IncOp => {
                self.build_incdec(expr.child(1), true, next, expr.range())
            }
            AstType::UnaryExpression if expr.child(0).ty == AstType::DecOp => {
                self.build_incdec(expr.child(1), false, next, expr.range())
            }
            _ => {
                // A side-effect-free expression statement: type-check it for
                // well-formedness and drop the result.
                Expr::from_ast(expr, &mut self.env)?;
                Ok(next)
            }
        }
    }

    fn build_call_statement(&mut self, ast: &AstNode, next: NodeId) -> VResult<NodeId> {
        let name = ast
            .child(0)
            .text
            .as_deref()
            .ok_or_else(|| UnsupportedSyntax::at("function name missing text", ast.range()))?;
        let builtin = Builtin::recognize(name)
            .ok_or_else(|| UnsupportedSyntax::at(format!("unknown function {name}"), ast.range()))?;
        if builtin.is_expr_level() {
            return Err(UnsupportedSyntax::at(
                format!("{name} cannot be used as a statement"),
                ast.range(),
            ));
        }
        let args = Self::flatten_args(ast.child(2));
        self.build_builtin_statement(builtin, &args, next, ast.range())
    }

    fn build_builtin_statement(
        &mut self,
        builtin: Builtin,
        args: &[&AstNode],
        next: NodeId,
        range: AstRange,
    ) -> VResult<NodeId> {
        match builtin {
            Builtin::Assert => {
                let p = Expr::from_ast(args[0], &mut self.env)?;
                let remembered = self.active_remembers();
                let assertion = if remembered.is_empty() {
                    p
                } else {
                    let mut conjuncts = remembered;
                    conjuncts.push(p);
                    Expr::And(conjuncts)
                };
                trace!("assert at {range}");
                Ok(self.cfg.alloc(Node::Assert { assertion, next, range: Some(range) }))
            }
            Builtin::Assume => {
                let guard = Expr::from_ast(args[0], &mut self.env)?;
                Ok(self.cfg.alloc(Node::Assume { guard, next }))
            }
            Builtin::Requires => Err(UnsupportedSyntax::at(
                "requires is only permitted as the function's first statement",
                range,
            )),
            Builtin::Ensures => {
                let p = Expr::from_ast(args[0], &mut self.env)?;
                self.cfg.set_end_ensures(p);
                Ok(next)
            }
            Builtin::Freeze => {
                let name = args[0]
                    .text
                    .as_deref()
                    .ok_or_else(|| UnsupportedSyntax::at("freeze requires a bare identifier", range))?
                    .to_string();
                let value = Expr::from_ast(args[1], &mut self.env)?;
                let ty = value.get_type();
                self.env.declare(&name, ty);
                let renamed = self.env.rename(&name);
                Ok(self.cfg.alloc(Node::Assign { target: renamed, value, next }))
            }
            Builtin::Remember => {
                let p = Expr::from_ast(args[0], &mut self.env)?;
                self.remember_stack.last_mut().expect("open scope").push(p);
                Ok(next)
            }
            Builtin::Forall | Builtin::Exists | Builtin::Then => {
                unreachable!("expr-level builtins are rejected before reaching here")
            }
        }
    }

    // --- assignment ---------------------------------------------------------

    fn build_assignment(&mut self, ast: &AstNode, next: NodeId) -> VResult<NodeId> {
        let lhs = ast.child(0);
        let op_ty = ast.child(1).ty;
        let rhs_expr = Expr::from_ast(ast.child(2), &mut self.env)?;
        self.build_store(lhs, op_ty, rhs_expr, next, ast.range())
    }

    fn build_incdec(&mut self, lhs: &AstNode, is_inc: bool, next: NodeId, range: AstRange) -> VResult<NodeId> {
        let op = if is_inc { BinOp::Add } else { BinOp::Sub };
        self.build_store_binop(lhs, op, Expr::IntLit(1), next, range)
    }

    fn build_store(
        &mut self,
        lhs: &AstNode,
        op_ty: AstType,
        rhs: Expr,
        next: NodeId,
        range: AstRange,
    ) -> VResult<NodeId> {
        use AstType::*;
        match op_ty {
            Eq => self.store_value(lhs, rhs, next, range),
            AddAssign => self.build_store_binop(lhs, BinOp::Add, rhs, next, range),
            SubAssign => self.build_store_binop(lhs, BinOp::Sub, rhs, next, range),
            MulAssign => self.build_store_binop(lhs, BinOp::Mul, rhs, next, range),
            DivAssign => self.build_store_binop(lhs, BinOp::Div, rhs, next, range),
            ModAssign => self.build_store_binop(lhs, BinOp::Mod, rhs, next, range),
            LeftAssign | RightAssign | AndAssign | XorAssign | OrAssign => {
                Err(UnsupportedSyntax::at("bitwise compound assignment is not supported", range))
            }
            other => Err(UnsupportedSyntax::at(format!("unknown assignment operator {}", other.as_str()), range)),
        }
    }

    fn build_store_binop(&mut self, lhs: &AstNode, op: BinOp, rhs: Expr, next: NodeId, range: AstRange) -> VResult<NodeId> {
        let current = self.lvalue_current_value(lhs, range)?;
        let value = Expr::Binary(op, Box::new(current), Box::new(rhs));
        self.store_value(lhs, value, next, range)
    }

    /// The current value of an lvalue, for compound assignment / increment.
    fn lvalue_current_value(&mut self, lhs: &AstNode, range: AstRange) -> VResult<Expr> {
        if lhs.ty == AstType::Identifier {
            let name = lhs.text.as_deref().ok_or_else(|| UnsupportedSyntax::at("identifier missing text", range))?;
            let ty = self
                .env
                .type_of(name)
                .ok_or_else(|| UnsupportedSyntax::at(format!("assignment to undeclared variable {name}"), range))?;
            Ok(Expr::Var(self.env.rename(name), ty))
        } else if lhs.ty == AstType::PostfixExpression && lhs.child(1).ty == AstType::BracketLeft {
            let (array_var, index) = self.array_lvalue(lhs, range)?;
            Ok(Expr::ArraySelect(Box::new(array_var), Box::new(index)))
        } else {
            Err(UnsupportedSyntax::at("unsupported assignment target", range))
        }
    }

    fn array_lvalue(&mut self, lhs: &AstNode, range: AstRange) -> VResult<(Expr, Expr)> {
        let array_name = lhs
            .child(0)
            .text
            .as_deref()
            .ok_or_else(|| UnsupportedSyntax::at("array name missing text", range))?;
        let array_ty = self
            .env
            .type_of(array_name)
            .ok_or_else(|| UnsupportedSyntax::at(format!("assignment to undeclared array {array_name}"), range))?;
        let index = Expr::from_ast(lhs.child(2), &mut self.env)?;
        Ok((Expr::Var(self.env.rename(array_name), array_ty), index))
    }

    fn store_value(&mut self, lhs: &AstNode, value: Expr, next: NodeId, range: AstRange) -> VResult<NodeId> {
        if lhs.ty == AstType::Identifier {
            let name = lhs.text.as_deref().ok_or_else(|| UnsupportedSyntax::at("identifier missing text", range))?;
            if self.env.type_of(name).is_none() {
                return Err(UnsupportedSyntax::at(format!("assignment to undeclared variable {name}"), range));
            }
            let renamed = self.env.rename(name);
            Ok(self.cfg.alloc(Node::Assign { target: renamed, value, next }))
        } else if lhs.ty == AstType::PostfixExpression && lhs.child(1).ty == AstType::BracketLeft {
            let (array_var, index) = self.array_lvalue(lhs, range)?;
            let target = match &array_var {
                Expr::Var(name, _) => name.clone(),
                _ => unreachable!("array_lvalue always returns a Var"),
            };
            let stored = Expr::ArrayStore(Box::new(array_var), Box::new(index), Box::new(value));
            Ok(self.cfg.alloc(Node::Assign { target, value: stored, next }))
        } else {
            Err(UnsupportedSyntax::at("unsupported assignment target", range))
        }
    }

    // --- declarations ---------------------------------------------------------

    /// `declaration_specifiers` can nest (`extern` combined with a type), so
    /// this searches the whole subtree for the first scalar type keyword.
    fn declaration_base_type(specifiers: &AstNode, range: AstRange) -> VResult<Type> {
        match specifiers.ty {
            AstType::Int => return Ok(Type::Int),
            AstType::Float => return Ok(Type::Real),
            AstType::Bool => return Ok(Type::Bool),
            _ => {}
        }
        for child in &specifiers.children {
            if let Ok(ty) = Self::declaration_base_type(child, range) {
                return Ok(ty);
            }
        }
        Err(UnsupportedSyntax::at("declaration is missing a recognized base type", range))
    }

    fn build_declaration(&mut self, ast: &AstNode, next: NodeId) -> VResult<NodeId> {
        let range = ast.range();
        let specifiers = ast.child(0);
        let base_ty = Self::declaration_base_type(specifiers, range)?;
        let init_decl = ast.child(1);
        if init_decl.ty != AstType::InitDeclarator && init_decl.ty != AstType::DirectDeclarator {
            return Err(UnsupportedSyntax::at("multi-variable declarations are not supported", range));
        }
        let direct = if init_decl.ty == AstType::DirectDeclarator { init_decl } else { init_decl.child(0) };
        let name = direct
            .child(0)
            .text
            .as_deref()
            .ok_or_else(|| UnsupportedSyntax::at("declared name missing text", range))?
            .to_string();

        if direct.len() > 1 {
            // `int x[];` — one-dimensional array, no initializer supported.
            if init_decl.len() > 1 {
                return Err(UnsupportedSyntax::at("array declarations cannot carry an initializer", range));
            }
            self.env.declare(&name, Type::array(base_ty));
            return Ok(next);
        }

        if init_decl.len() > 1 {
            // `int x = e;`
            let value = Expr::from_ast(init_decl.child(2), &mut self.env)?;
            self.env.declare(&name, base_ty);
            let renamed = self.env.rename(&name);
            Ok(self.cfg.alloc(Node::Assign { target: renamed, value, next }))
        } else {
            // `int x;` — declared, left unconstrained.
            self.env.declare(&name, base_ty);
            Ok(next)
        }
    }

    // --- selection (if / switch) ------------------------------------------------

    fn build_selection(&mut self, ast: &AstNode, next: NodeId) -> VResult<NodeId> {
        match ast.child(0).ty {
            AstType::If => self.build_if(ast, next),
            AstType::Switch => self.build_switch(ast, next),
            other => Err(UnsupportedSyntax::at(format!("unknown selection statement {}", other.as_str()), ast.range())),
        }
    }

    fn build_if(&mut self, ast: &AstNode, next: NodeId) -> VResult<NodeId> {
        let cond = Expr::from_ast(ast.child(2), &mut self.env)?;
        let then_entry = self.build_statement(ast.child(4), next)?;
        let else_entry = if ast.len() > 5 { self.build_statement(ast.child(6), next)? } else { next };
        Ok(self.cfg.alloc(Node::Cond { cond, then_br: then_entry, else_br: else_entry }))
    }

    fn build_switch(&mut self, ast: &AstNode, next: NodeId) -> VResult<NodeId> {
        let switch_value = Expr::from_ast(ast.child(2), &mut self.env)?;
        self.break_stack.push(next);
        let body = ast.child(4);
        let mut labels = Vec::new();
        self.build_compound(body, next, Some(&mut labels))?;
        self.break_stack.pop();

        let default_entry = labels.iter().find(|(v, _)| v.is_none()).map(|(_, id)| *id).unwrap_or(next);
        let mut chain_next = default_entry;
        for (case_value, entry) in labels.into_iter().rev() {
            if let Some(cv) = case_value {
                let cond = Expr::Rel(verifier_ast::RelOp::Eq, Box::new(switch_value.clone()), Box::new(cv));
                chain_next = self.cfg.alloc(Node::Cond { cond, then_br: entry, else_br: chain_next });
            }
        }
        Ok(chain_next)
    }

    // --- iteration (while / do-while / for) --------------------------------------

    fn build_iteration(&mut self, ast: &AstNode, next: NodeId) -> VResult<NodeId> {
        match ast.child(0).ty {
            AstType::While => self.build_while(ast, next),
            AstType::Do => self.build_do_while(ast, next),
            AstType::For => self.build_for(ast, next),
            other => Err(UnsupportedSyntax::at(format!("unknown iteration statement {}", other.as_str()), ast.range())),
        }
    }

    fn build_while(&mut self, ast: &AstNode, next: NodeId) -> VResult<NodeId> {
        let cond = Expr::from_ast(ast.child(2), &mut self.env)?;
        let body_dummy = self.cfg.alloc_dummy();
        let cond_id = self.cfg.alloc(Node::Cond { cond, then_br: body_dummy, else_br: next });

        self.break_stack.push(next);
        self.continue_stack.push(cond_id);
        let body_entry = self.build_statement(ast.child(4), cond_id)?;
        self.continue_stack.pop();
        self.break_stack.pop();

        self.cfg.rewire(cond_id, body_dummy, body_entry);
        Ok(cond_id)
    }

    fn build_do_while(&mut self, ast: &AstNode, next: NodeId) -> VResult<NodeId> {
        let cond = Expr::from_ast(ast.child(4), &mut self.env)?;
        let body_dummy = self.cfg.alloc_dummy();
        let cond_id = self.cfg.alloc(Node::Cond { cond, then_br: body_dummy, else_br: next });

        self.break_stack.push(next);
        self.continue_stack.push(cond_id);
        let body_entry = self.build_statement(ast.child(1), cond_id)?;
        self.continue_stack.pop();
        self.break_stack.pop();

        self.cfg.rewire(cond_id, body_dummy, body_entry);
        Ok(body_entry)
    }

    fn build_for(&mut self, ast: &AstNode, next: NodeId) -> VResult<NodeId> {
        self.env.open_scope();
        self.remember_stack.push(Vec::new());

        let init_clause = ast.child(2);
        let cond_clause = ast.child(3);
        let (inc_ast, body_ast) = if ast.len() == 7 {
            (Some(ast.child(4)), ast.child(6))
        } else {
            (None, ast.child(5))
        };

        let cond = if cond_clause.is_empty() || cond_clause.len() == 1 {
            Expr::BoolLit(true)
        } else {
            Expr::from_ast(cond_clause.child(0), &mut self.env)?
        };

        let body_dummy = self.cfg.alloc_dummy();
        let cond_id = self.cfg.alloc(Node::Cond { cond, then_br: body_dummy, else_br: next });

        let init_entry = self.build_for_init(init_clause, cond_id)?;

        let inc_dummy = self.cfg.alloc_dummy();
        self.break_stack.push(next);
        self.continue_stack.push(inc_dummy);
        let body_entry = self.build_statement(body_ast, inc_dummy)?;
        self.continue_stack.pop();
        self.break_stack.pop();

        let inc_entry = match inc_ast {
            Some(inc) => self.build_expr_effect(inc, cond_id)?,
            None => cond_id,
        };
        self.cfg.rewire(body_entry, inc_dummy, inc_entry);
        self.cfg.rewire(cond_id, body_dummy, body_entry);

        self.remember_stack.pop();
        self.env.close_scope();
        Ok(init_entry)
    }

    fn build_for_init(&mut self, clause: &AstNode, next: NodeId) -> VResult<NodeId> {
        match clause.ty {
            AstType::Declaration => self.build_declaration(clause, next),
            AstType::ExpressionStatement => {
                if clause.is_empty() || clause.len() == 1 {
                    Ok(next)
                } else {
                    Err(UnsupportedSyntax::at(
                        "a for-loop initializer that is a bare expression statement is not supported",
                        clause.range(),
                    ))
                }
            }
            other => Err(UnsupportedSyntax::at(format!("unsupported for-loop initializer {}", other.as_str()), clause.range())),
        }
    }

    // --- jumps ------------------------------------------------------------------

    fn build_jump(&mut self, ast: &AstNode, next: NodeId) -> VResult<NodeId> {
        let _ = next;
        match ast.child(0).ty {
            AstType::Break => self
                .break_stack
                .last()
                .copied()
                .ok_or_else(|| UnsupportedSyntax::at("break outside a loop or switch", ast.range())),
            AstType::Continue => self
                .continue_stack
                .last()
                .copied()
                .ok_or_else(|| UnsupportedSyntax::at("continue outside a loop", ast.range())),
            AstType::Return => {
                if ast.len() <= 2 {
                    Ok(self.cfg.end())
                } else {
                    let value = Expr::from_ast(ast.child(1), &mut self.env)?;
                    let ret_name = self.env.rename("ret");
                    let end = self.cfg.end();
                    Ok(self.cfg.alloc(Node::Assign { target: ret_name, value, next: end }))
                }
            }
            AstType::Goto => Err(UnsupportedSyntax::at("goto is not supported", ast.range())),
            other => Err(UnsupportedSyntax::at(format!("unknown jump statement {}", other.as_str()), ast.range())),
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_json() -> &'static str {
        r#""range":{"startLineNumber":1,"startColumn":0,"endLineNumber":1,"endColumn":1}"#
    }

    fn node(ty: &str, text: Option<&str>, children: &str) -> String {
        match text {
            Some(t) => format!(r#"{{"type":"{ty}","text":"{t}",{},"children":[{children}]}}"#, range_json()),
            None => format!(r#"{{"type":"{ty}","text":null,{},"children":[{children}]}}"#, range_json()),
        }
    }

    #[test]
    fn empty_expression_statement_returns_next_unchanged() {
        let mut builder = Builder::new();
        let end = builder.cfg.end();
        let ast = verifier_parser::parse(&node("expression_statement", None, &node(";", Some(";"), ""))).unwrap();
        assert_eq!(builder.build_statement(&ast, end).unwrap(), end);
    }

    #[test]
    fn simple_scalar_declaration_declares_and_links() {
        let mut builder = Builder::new();
        let end = builder.cfg.end();
        let spec = node("declaration_specifiers", None, &node("INT", Some("INT"), ""));
        let direct = node("direct_declarator", None, &node("IDENTIFIER", Some("x"), ""));
        let init_decl = format!(r#"{{"type":"init_declarator","text":null,{},"children":[{direct}]}}"#, range_json());
        let decl = format!(
            r#"{{"type":"declaration","text":null,{},"children":[{spec},{init_decl}]}}"#,
            range_json()
        );
        let ast = verifier_parser::parse(&decl).unwrap();
        let entry = builder.build_statement(&ast, end).unwrap();
        assert_eq!(entry, end);
        assert_eq!(builder.env.type_of("x"), Some(Type::Int));
    }
}

//! End-to-end scenarios driving the same pipeline `run_cli` does, but
//! in-process: parse -> `Function::from_ast` -> `Driver`. Mirrors spec.md
//! §8's testable-properties scenarios at a scale that's still honest to
//! hand-author as JSON (the array/forall scenarios there are covered at
//! the unit level in `verifier_cfg`'s own `path`/`cutpoint` tests instead).

use verifier_cfg::Function;
use verifier_solver::{Driver, Verdict};

fn range_json() -> &'static str {
    r#""range":{"startLineNumber":1,"startColumn":0,"endLineNumber":1,"endColumn":1}"#
}

fn leaf(ty: &str, text: &str) -> String {
    format!(r#"{{"type":"{ty}","text":"{text}",{},"children":[]}}"#, range_json())
}

fn node(ty: &str, children: &str) -> String {
    format!(r#"{{"type":"{ty}","text":null,{},"children":[{children}]}}"#, range_json())
}

fn join(parts: &[String]) -> String {
    parts.join(",")
}

/// `int identity(int x) { requires(x >= 0); ensures(ret == x); return x; }`
fn identity_function(return_expr: &str) -> String {
    let specifiers = node("declaration_specifiers", &leaf("INT", "INT"));
    let param = node(
        "parameter_declaration",
        &join(&[
            node("declaration_specifiers", &leaf("INT", "INT")),
            node("direct_declarator", &leaf("IDENTIFIER", "x")),
        ]),
    );
    let param_list = node("parameter_list", &param);
    let declarator = node(
        "direct_declarator",
        &join(&[leaf("IDENTIFIER", "identity"), leaf("(", "("), param_list, leaf(")", ")")]),
    );

    let requires_arg = node(
        "relational_expression",
        &join(&[leaf("IDENTIFIER", "x"), leaf("GE_OP", ">="), leaf("CONSTANT", "0")]),
    );
    let requires_call = node(
        "postfix_expression",
        &join(&[leaf("IDENTIFIER", "requires"), leaf("(", "("), requires_arg, leaf(")", ")")]),
    );
    let requires_stmt = node("expression_statement", &join(&[requires_call, leaf(";", ";")]));

    let ensures_arg = node(
        "equality_expression",
        &join(&[leaf("IDENTIFIER", "ret"), leaf("EQ_OP", "=="), leaf("IDENTIFIER", "x")]),
    );
    let ensures_call = node(
        "postfix_expression",
        &join(&[leaf("IDENTIFIER", "ensures"), leaf("(", "("), ensures_arg, leaf(")", ")")]),
    );
    let ensures_stmt = node("expression_statement", &join(&[ensures_call, leaf(";", ";")]));

    let return_stmt = node("jump_statement", &join(&[leaf("RETURN", "RETURN"), return_expr.to_string(), leaf(";", ";")]));

    let inner_list = node("block_item_list", &join(&[requires_stmt, ensures_stmt]));
    let block_item_list = node("block_item_list", &join(&[inner_list, return_stmt]));
    let body = node("compound_statement", &join(&[leaf("{", "{"), block_item_list, leaf("}", "}")]));

    node("function_definition", &join(&[specifiers, declarator, body]))
}

#[test]
fn identity_function_is_valid_in_path_mode() {
    let src = identity_function(&leaf("IDENTIFIER", "x"));
    let ast = verifier_parser::parse(&src).unwrap();
    let function = Function::from_ast(&ast).unwrap();
    assert_eq!(function.paths().unwrap().len(), 1);

    let driver = Driver::new(10_000);
    match driver.check(&function).unwrap() {
        Verdict::Ok => {}
        other => panic!("expected Ok, got {other:?}"),
    }
}

#[test]
fn identity_function_buggy_returns_counterexample() {
    let src = identity_function(&leaf("CONSTANT", "0"));
    let ast = verifier_parser::parse(&src).unwrap();
    let function = Function::from_ast(&ast).unwrap();

    let driver = Driver::new(10_000);
    match driver.check(&function).unwrap() {
        Verdict::CounterExample(_) => {}
        other => panic!("expected a counterexample, got {other:?}"),
    }
}

/// `bool demorgan(bool a, bool b) { ensures((!(a && b)) == (!a || !b)); return true; }`
#[test]
fn de_morgan_identity_is_valid() {
    let specifiers = node("declaration_specifiers", &leaf("BOOL", "BOOL"));
    let param_a = node(
        "parameter_declaration",
        &join(&[node("declaration_specifiers", &leaf("BOOL", "BOOL")), node("direct_declarator", &leaf("IDENTIFIER", "a"))]),
    );
    let param_b = node(
        "parameter_declaration",
        &join(&[node("declaration_specifiers", &leaf("BOOL", "BOOL")), node("direct_declarator", &leaf("IDENTIFIER", "b"))]),
    );
    let param_list = node("parameter_list", &join(&[param_a, leaf(",", ","), param_b]));
    let declarator = node(
        "direct_declarator",
        &join(&[leaf("IDENTIFIER", "demorgan"), leaf("(", "("), param_list, leaf(")", ")")]),
    );

    let not_a_and_b = node(
        "unary_expression",
        &join(&[leaf("!", "!"), node("logical_and_expression", &join(&[leaf("IDENTIFIER", "a"), leaf("AND_OP", "&&"), leaf("IDENTIFIER", "b")]))]),
    );
    let not_a = node("unary_expression", &join(&[leaf("!", "!"), leaf("IDENTIFIER", "a")]));
    let not_b = node("unary_expression", &join(&[leaf("!", "!"), leaf("IDENTIFIER", "b")]));
    let not_a_or_not_b = node("logical_or_expression", &join(&[not_a, leaf("OR_OP", "||"), not_b]));
    let ensures_arg = node("equality_expression", &join(&[not_a_and_b, leaf("EQ_OP", "=="), not_a_or_not_b]));
    let ensures_call = node(
        "postfix_expression",
        &join(&[leaf("IDENTIFIER", "ensures"), leaf("(", "("), ensures_arg, leaf(")", ")")]),
    );
    let ensures_stmt = node("expression_statement", &join(&[ensures_call, leaf(";", ";")]));
    let return_stmt = node("jump_statement", &join(&[leaf("RETURN", "RETURN"), leaf("CONSTANT", "true"), leaf(";", ";")]));
    let block_item_list = node("block_item_list", &join(&[ensures_stmt, return_stmt]));
    let body = node("compound_statement", &join(&[leaf("{", "{"), block_item_list, leaf("}", "}")]));
    let def = node("function_definition", &join(&[specifiers, declarator, body]));

    let ast = verifier_parser::parse(&def).unwrap();
    let function = Function::from_ast(&ast).unwrap();

    let driver = Driver::new(10_000);
    match driver.check(&function).unwrap() {
        Verdict::Ok => {}
        other => panic!("expected Ok, got {other:?}"),
    }
}

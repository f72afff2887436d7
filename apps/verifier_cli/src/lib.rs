//! `verifyc`: loads a Parser JSON document, builds the named function, and
//! runs the requested check mode.
//!
//! All real logic lives here rather than in `main.rs`, so it can be
//! exercised directly by tests instead of spawning the binary.

pub mod cli;

use clap::Parser as _;
use cli::Cli;
use std::fs;
use verifier_cfg::Function;
use verifier_parser::{AstNode, AstType};
use verifier_solver::{Driver, HornVerdict, Verdict};

pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let source = fs::read_to_string(&cli.input)?;
    let unit = verifier_parser::parse(&source)?;
    let def = find_function(&unit, &cli.function)
        .ok_or_else(|| format!("no function named '{}' in {}", cli.function, cli.input.display()))?;
    let function = Function::from_ast(def)?;

    let driver = Driver::new(cli.timeout);

    if cli.horn {
        match driver.check_horn(&function)? {
            HornVerdict::HornOk(invariants) => {
                println!("valid (Horn mode), {} invariant(s) synthesized:", invariants.len());
                for inv in invariants {
                    for (args, value) in &inv.entries {
                        if args.is_empty() {
                            println!("  {} := {}", inv.predicate, value);
                        } else {
                            println!("  {}({}) := {}", inv.predicate, args.join(", "), value);
                        }
                    }
                }
            }
            HornVerdict::HornFail => {
                println!("invalid: no invariant discharges every clause");
                std::process::exit(1);
            }
            HornVerdict::Unknown(reason) => {
                println!("unknown: {reason}");
                std::process::exit(2);
            }
        }
        return Ok(());
    }

    let verdict = if cli.iter { driver.check_iter(&function)? } else { driver.check(&function)? };
    match verdict {
        Verdict::Ok => println!("valid"),
        Verdict::CounterExample(assignment) => {
            println!("invalid, counterexample:");
            let mut names: Vec<&String> = assignment.keys().collect();
            names.sort();
            for name in names {
                println!("  {name} = {}", assignment[name]);
            }
            std::process::exit(1);
        }
        Verdict::Unknown(reason) => {
            println!("unknown: {reason}");
            std::process::exit(2);
        }
    }
    Ok(())
}

/// Depth-first search for a `function_definition` node whose name matches.
fn find_function<'a>(node: &'a AstNode, name: &str) -> Option<&'a AstNode> {
    if node.ty == AstType::FunctionDefinition && function_name(node) == Some(name) {
        return Some(node);
    }
    node.children.iter().find_map(|child| find_function(child, name))
}

fn function_name(def: &AstNode) -> Option<&str> {
    if def.len() < 2 {
        return None;
    }
    find_identifier(def.child(1))
}

fn find_identifier(node: &AstNode) -> Option<&str> {
    if node.ty == AstType::Identifier {
        return node.text.as_deref();
    }
    node.children.iter().find_map(find_identifier)
}

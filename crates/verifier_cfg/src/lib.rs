//! Control-flow graph, path enumerator, VC generator, cutpoint selector,
//! and function front-matter extraction (C2-C5, C7).

mod builder;
mod cutpoint;
mod function;
mod node;
mod path;
mod vc;

pub use builder::Builder;
pub use cutpoint::{select_cutpoints, CutpointPredicates};
pub use function::Function;
pub use node::{Cfg, Node, NodeId};
pub use path::{enumerate_paths, BasicPath};
pub use vc::{full_function_vc, horn_clauses, horn_path_clause, horn_predicate_clause, path_vc};

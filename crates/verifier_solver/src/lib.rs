//! Z3-backed verifier driver (C6): IR lowering and raising (`Lowerer::lower`
//! / `Lowerer::raise`), model extraction, and the path-mode / iterative /
//! Horn-mode checking surfaces.

mod driver;
mod error;
mod lower;
mod model;

pub use driver::{Driver, HornInvariant, HornVerdict, Verdict};
pub use error::{DriverError, Result};
pub use lower::Lowerer;
pub use model::{extract_assignment, Assignment};

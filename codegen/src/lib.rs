//! protoclosure-codegen
//!
//! This crate implements:
//!  1) The wire-format resolver (tags, wire types, packed encoding),
//!  2) The output composition primitives (`SectionBuffer`,
//!     `IndentedLineBuffer`, `DocBuilder`, `FunctionBuilder`),
//!  3) The type/namespace resolver (`TypeNameMap`),
//!  4) The Closure javascript generator, and
//!  5) The compilation driver (`CompilerOptions` + `run`).

pub mod builder;
pub mod closure;
pub mod driver;
pub mod error;
pub mod naming;
pub mod util;
pub mod wire;

pub use closure::ClosureGenerator;
pub use driver::{run, CompilerOptions};
pub use error::GenError;

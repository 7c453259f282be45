//! Output composition primitives. Generation walks the descriptor tree
//! top-down, but the rendered file needs headers, provides, and requires
//! ahead of content that is only discovered mid-walk; the section buffer
//! solves this with numerically keyed sections rendered in ascending order.

pub mod doc;
pub mod func;
pub mod line;
pub mod section;

pub use doc::DocBuilder;
pub use func::FunctionBuilder;
pub use line::IndentedLineBuffer;
pub use section::{Fragment, SectionBuffer, SectionKey};

//! deepnote-blocks
//!
//! Compilers that turn Deepnote blocks into text:
//! - executable Python for code-producing kinds (code, sql, inputs, button,
//!   visualization, big-number)
//! - Markdown/HTML for display kinds (markdown, text cells, separator, image)
//!
//! Every compiler is a pure function of the block (plus, for buttons, an
//! explicit execution context). Nothing here executes code, renders markup, or
//! performs I/O.
//!
//! Entry points:
//! - [`python::create_python_code`]
//! - [`markdown::create_markdown`] and [`markdown::strip_markdown`]
//! - [`notebook::compile_notebook`] for a whole notebook in sorting-key order
//! - [`check::check_block`] for pre-compile input checks

pub mod blocks;
pub mod check;
pub mod errors;
pub mod markdown;
pub mod notebook;
pub mod python;
pub mod registry;
pub mod snippets;

pub use crate::errors::{BlockError, BlockResult};
pub use crate::python::ExecutionContext;

/// Convenience re-exports.
pub mod prelude {
    pub use crate::check::check_block;
    pub use crate::errors::{
        BlockError, BlockResult, ButtonBlockError, InputBlockError, Operation,
        UnsupportedBlockTypeError, VisualizationBlockError,
    };
    pub use crate::markdown::{create_markdown, strip_markdown};
    pub use crate::notebook::{compile_notebook, CompiledBlock};
    pub use crate::python::{create_python_code, ExecutionContext};
    pub use crate::registry::{catalog, classify, Family};
}

//! Whole-notebook compilation.
//!
//! Blocks are visited in sorting-key order. Each block compiles independently:
//! a failure is recorded against that block and the rest still compile.

use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use deepnote_core::model::{Block, BlockKind, Notebook};

use crate::errors::BlockError;
use crate::markdown::create_markdown;
use crate::python::{create_python_code, ExecutionContext};
use crate::registry::{classify, Family};

/// What a block compiled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLanguage {
    Python,
    Markdown,
}

/// The result of compiling one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledBlock {
    pub block_id: String,
    pub kind: BlockKind,
    /// `None` for kinds with no compiler.
    pub language: Option<OutputLanguage>,
    #[serde(serialize_with = "serialize_output")]
    pub output: Result<String, BlockError>,
}

impl CompiledBlock {
    pub fn is_ok(&self) -> bool {
        self.output.is_ok()
    }
}

fn serialize_output<S: Serializer>(output: &Result<String, BlockError>, s: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    #[serde(rename_all = "lowercase")]
    enum Out<'a> {
        Ok(&'a str),
        Error(String),
    }
    match output {
        Ok(text) => Out::Ok(text).serialize(s),
        Err(e) => Out::Error(e.to_string()).serialize(s),
    }
}

/// Compile one block with the compiler its kind selects.
pub fn compile_block(block: &Block, ctx: &ExecutionContext) -> CompiledBlock {
    let (language, output) = match classify(&block.kind) {
        Family::Code(_) => (Some(OutputLanguage::Python), create_python_code(block, ctx)),
        Family::Markup(_) => (Some(OutputLanguage::Markdown), create_markdown(block)),
        // Reported the way a Python-only consumer would see it.
        Family::Unsupported => (None, create_python_code(block, ctx)),
    };

    if let Err(e) = &output {
        warn!(block_id = %block.id, kind = %block.kind, error = %e, "block failed to compile");
    }

    CompiledBlock {
        block_id: block.id.to_string(),
        kind: block.kind.clone(),
        language,
        output,
    }
}

/// Compile every block of `notebook` in sorting-key order.
pub fn compile_notebook(notebook: &Notebook, ctx: &ExecutionContext) -> Vec<CompiledBlock> {
    let compiled: Vec<CompiledBlock> = notebook
        .blocks_in_order()
        .into_iter()
        .map(|b| compile_block(b, ctx))
        .collect();

    debug!(
        notebook_id = %notebook.id,
        blocks = compiled.len(),
        failed = compiled.iter().filter(|c| !c.is_ok()).count(),
        "compiled notebook"
    );
    compiled
}

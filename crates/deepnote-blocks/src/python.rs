//! Python code generation.
//!
//! [`create_python_code`] dispatches on the block kind via
//! [`crate::registry::classify`]. Markup kinds and unknown kinds are
//! rejected with [`UnsupportedBlockTypeError`].

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use deepnote_core::model::Block;

use crate::blocks::{big_number, button, code, input, sql, visualization};
use crate::errors::{BlockResult, Operation, UnsupportedBlockTypeError};
use crate::registry::{classify, CodeKind, Family};

/// Run-time facts a compiler cannot read from the block itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContext {
    /// Sanitized names of `set_variable` buttons that started the current run.
    #[serde(default)]
    pub variable_context: Vec<String>,
}

impl ExecutionContext {
    pub fn with_variables<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variable_context: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.variable_context.iter().any(|v| v == name)
    }
}

/// Compile one block to Python source.
pub fn create_python_code(block: &Block, ctx: &ExecutionContext) -> BlockResult<String> {
    let kind = match classify(&block.kind) {
        Family::Code(kind) => kind,
        _ => {
            return Err(UnsupportedBlockTypeError::new(block.kind.as_str(), Operation::PythonCode).into());
        }
    };
    trace!(block_id = %block.id, kind = %block.kind, "compiling python");

    let out = match kind {
        CodeKind::Code => code::python(block),
        CodeKind::Sql => sql::python(block),
        CodeKind::InputText | CodeKind::InputTextarea => input::text(block),
        CodeKind::InputCheckbox => input::checkbox(block),
        CodeKind::InputSelect => input::select(block),
        CodeKind::InputSlider => input::slider(block),
        CodeKind::InputFile => input::file(block),
        CodeKind::InputDate => input::date(block),
        CodeKind::InputDateRange => input::date_range(block),
        CodeKind::Visualization => visualization::python(block),
        CodeKind::Button => button::python(block, ctx),
        CodeKind::BigNumber => big_number::python(block),
    }?;

    debug!(block_id = %block.id, bytes = out.len(), "compiled block to python");
    Ok(out)
}

//! Compile errors.
//!
//! Each failure kind is its own type carrying the block id and, where a field
//! is at fault, the literal field name. `BlockError` wraps them so callers can
//! propagate with `?` and still match on the specific kind.

use std::fmt;

use thiserror::Error;

pub type BlockResult<T> = Result<T, BlockError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error(transparent)]
    Unsupported(#[from] UnsupportedBlockTypeError),

    #[error(transparent)]
    Button(#[from] ButtonBlockError),

    #[error(transparent)]
    Visualization(#[from] VisualizationBlockError),

    #[error(transparent)]
    Input(#[from] InputBlockError),

    #[error("failed to encode {what} for block \"{block_id}\": {message}")]
    Serialization {
        block_id: String,
        what: &'static str,
        message: String,
    },
}

impl BlockError {
    pub fn serialization(block_id: impl Into<String>, what: &'static str, err: impl fmt::Display) -> Self {
        Self::Serialization {
            block_id: block_id.into(),
            what,
            message: err.to_string(),
        }
    }
}

/// The operation a compiler was asked to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    PythonCode,
    Markdown,
    StripMarkdown,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PythonCode => "python code",
            Self::Markdown => "markdown",
            Self::StripMarkdown => "strip markdown",
        }
    }
}

/// No compiler exists for this kind and operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct UnsupportedBlockTypeError {
    pub kind: String,
    pub operation: Operation,
}

impl UnsupportedBlockTypeError {
    pub fn new(kind: impl Into<String>, operation: Operation) -> Self {
        Self {
            kind: kind.into(),
            operation,
        }
    }
}

impl fmt::Display for UnsupportedBlockTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operation {
            Operation::PythonCode => write!(
                f,
                "Creating python code from block type {} is not supported yet.",
                self.kind
            ),
            Operation::Markdown => write!(
                f,
                "Creating markdown from block type {} is not supported yet.",
                self.kind
            ),
            Operation::StripMarkdown => write!(
                f,
                "Stripping markdown from block type {} is not supported yet.",
                self.kind
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Button block \"{block_id}\" has behavior \"{behavior}\" but is missing required field \"{field}\".")]
pub struct ButtonBlockError {
    pub block_id: String,
    pub behavior: &'static str,
    pub field: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Visualization block \"{block_id}\" is missing required field \"{field}\".")]
pub struct VisualizationBlockError {
    pub block_id: String,
    pub field: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Input block \"{block_id}\" has invalid value {value:?} in field \"{field}\": {reason}")]
pub struct InputBlockError {
    pub block_id: String,
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

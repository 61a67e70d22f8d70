//! Markdown rendering and stripping.

use tracing::trace;

use deepnote_core::model::Block;

use crate::blocks::text;
use crate::errors::{BlockResult, Operation, UnsupportedBlockTypeError};
use crate::registry::{classify, Family};

/// Render a display block as Markdown (images as an inline `<img>` tag).
pub fn create_markdown(block: &Block) -> BlockResult<String> {
    match classify(&block.kind) {
        Family::Markup(kind) => {
            trace!(block_id = %block.id, kind = %block.kind, "rendering markdown");
            text::markdown(block, kind)
        }
        _ => Err(UnsupportedBlockTypeError::new(block.kind.as_str(), Operation::Markdown).into()),
    }
}

/// Plain text of a text cell with its leading markdown marker removed.
pub fn strip_markdown(block: &Block) -> BlockResult<String> {
    match classify(&block.kind) {
        Family::Markup(kind) if kind.is_text_cell() => Ok(text::strip(block, kind)),
        _ => Err(UnsupportedBlockTypeError::new(block.kind.as_str(), Operation::StripMarkdown).into()),
    }
}

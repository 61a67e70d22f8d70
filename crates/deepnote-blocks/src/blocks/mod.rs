//! Per-kind compilers.
//!
//! Each submodule owns one kind (or a family of closely related kinds) and
//! exposes plain functions over `&Block`. Dispatch lives in `crate::python`
//! and `crate::markdown`; nothing here decides whether a kind is supported.

/// Borrow the metadata of `$block` as variant `$variant`, or a default value
/// when metadata is absent or shaped for another kind.
macro_rules! metadata_of {
    ($block:expr, $variant:ident) => {
        match &$block.metadata {
            Some(deepnote_core::model::BlockMetadata::$variant(m)) => std::borrow::Cow::Borrowed(m),
            _ => std::borrow::Cow::Owned(Default::default()),
        }
    };
}

pub mod big_number;
pub mod button;
pub mod code;
pub mod image;
pub mod input;
pub mod sql;
pub mod text;
pub mod visualization;

use deepnote_core::sanitize::sanitize_identifier;

/// Sanitized variable name of an input block.
pub(crate) fn variable_name(raw: &str) -> String {
    sanitize_identifier(raw)
}

#[cfg(test)]
pub(crate) mod testing {
    use deepnote_core::model::{Block, BlockKind, BlockMetadata};
    use serde_json::Value;

    /// Build a block whose metadata is decoded from JSON, as the reader would.
    pub fn block(kind: BlockKind, content: &str, metadata: Value) -> Block {
        let meta = BlockMetadata::from_value(&kind, metadata).expect("metadata decodes");
        Block::new("123", kind, "a0").with_content(content).with_metadata(meta)
    }
}

//! deepnote-core
//!
//! Core primitives for Deepnote documents:
//! - the typed document model (project, notebooks, blocks, per-kind metadata)
//! - structural validation with addressable, bounded issue reporting
//! - YAML deserialization into the typed model
//! - identifier sanitization and string-literal escaping for generated code
//! - sorting-key helpers for deterministic block order
//!
//! Nothing in this crate performs filesystem or network I/O. Callers provide
//! document text and configuration explicitly.

pub mod config;
pub mod deserialize;
pub mod errors;
pub mod model;
pub mod sanitize;
pub mod schema;
pub mod sorting;
pub mod validation;

pub use crate::errors::{CoreError, CoreResult, FileParseError};

/// Document format version written by current exporters.
pub const DOCUMENT_VERSION: &str = "1.0.0";

/// Convenience re-exports.
pub mod prelude {
    pub use crate::config::{CoreConfig, LimitsConfig};
    pub use crate::deserialize::{deserialize_file, deserialize_file_with_config};
    pub use crate::model::{
        Block, BlockId, BlockKind, BlockMetadata, DeepnoteFile, Notebook, NotebookId, Project,
        ProjectId,
    };
    pub use crate::sanitize::{escape_string_literal, sanitize_identifier, validate_identifier};
    pub use crate::schema::{PathSegment, SchemaIssue};
    pub use crate::validation::ValidationResult;
    pub use crate::{CoreError, CoreResult, FileParseError};
}

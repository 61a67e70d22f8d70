//! Deepnote document model.
//!
//! This module defines the strongly-typed Rust representation of a Deepnote
//! document: a project with notebooks, each an ordered list of blocks.
//!
//! Design goals:
//! - **Open for extension:** unknown block kinds and unknown metadata keys are
//!   kept, so newer documents load and re-serialize without loss.
//! - **Minimal policy:** models are mostly data. Structural checks live in
//!   `crate::schema`; cross-reference checks live in [`validate`].
//!
//! Field names on the wire are camelCase for document structure and
//! snake_case inside block metadata, exactly as exporters write them.

mod ids;
mod kind;
pub mod metadata;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

pub use ids::{is_valid_id, BlockId, IntegrationId, NotebookId, ProjectId};
pub use kind::BlockKind;
pub use metadata::BlockMetadata;

use crate::errors::CoreError;

/// A whole `.deepnote` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepnoteFile {
    pub metadata: FileMetadata,
    pub project: Project,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_notebook_id: Option<NotebookId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrations: Option<Vec<Integration>>,
    pub name: String,
    pub notebooks: Vec<Notebook>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<ProjectSettings>,
}

impl Project {
    pub fn notebook(&self, id: &str) -> Option<&Notebook> {
        self.notebooks.iter().find(|n| n.id.as_str() == id)
    }

    pub fn integration(&self, id: &str) -> Option<&Integration> {
        self.integrations
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|i| i.id.as_str() == id)
    }
}

/// A data-source connection referenced by SQL blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    pub id: IntegrationId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_cache_max_age: Option<Number>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python_version: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Block,
    Downstream,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_mode: Option<ExecutionMode>,
    pub id: NotebookId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_module: Option<bool>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
}

impl Notebook {
    /// Blocks ordered by sorting key. Ties keep storage order.
    pub fn blocks_in_order(&self) -> Vec<&Block> {
        let mut blocks: Vec<&Block> = self.blocks.iter().collect();
        crate::sorting::sort_by_sorting_key(&mut blocks, |b| b.sorting_key.as_str());
        blocks
    }
}

/// One execution output attached to a block. Keys other than the known ones
/// are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<metadata::StringOrList>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One notebook cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    pub content: Option<String>,
    pub metadata: Option<BlockMetadata>,
    pub sorting_key: String,
    pub block_group: Option<String>,
    pub execution_count: Option<Number>,
    pub outputs: Option<Vec<BlockOutput>>,
    pub version: Option<Number>,
}

impl Block {
    pub fn new(id: impl Into<BlockId>, kind: BlockKind, sorting_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            content: None,
            metadata: None,
            sorting_key: sorting_key.into(),
            block_group: None,
            execution_count: None,
            outputs: None,
            version: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_metadata(mut self, metadata: BlockMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Content, or the empty string when absent.
    pub fn content_str(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// Wire form of [`Block`], with metadata left untyped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    block_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    execution_count: Option<Number>,
    id: BlockId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    outputs: Option<Vec<BlockOutput>>,
    sorting_key: String,
    #[serde(rename = "type")]
    kind: BlockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<Number>,
}

impl TryFrom<RawBlock> for Block {
    type Error = CoreError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        let metadata = raw
            .metadata
            .map(|m| BlockMetadata::from_value(&raw.kind, m))
            .transpose()?;

        Ok(Self {
            id: raw.id,
            kind: raw.kind,
            content: raw.content,
            metadata,
            sorting_key: raw.sorting_key,
            block_group: raw.block_group,
            execution_count: raw.execution_count,
            outputs: raw.outputs,
            version: raw.version,
        })
    }
}

impl TryFrom<&Block> for RawBlock {
    type Error = CoreError;

    fn try_from(b: &Block) -> Result<Self, Self::Error> {
        let metadata = b.metadata.as_ref().map(BlockMetadata::to_value).transpose()?;

        Ok(Self {
            block_group: b.block_group.clone(),
            content: b.content.clone(),
            execution_count: b.execution_count.clone(),
            id: b.id.clone(),
            metadata,
            outputs: b.outputs.clone(),
            sorting_key: b.sorting_key.clone(),
            kind: b.kind.clone(),
            version: b.version.clone(),
        })
    }
}

impl Serialize for Block {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawBlock::try_from(self)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

/// Cross-reference checks for model consumers.
///
/// These are not part of structural validation: a document that fails them is
/// still well-formed, but tools that resolve notebooks by id should reject it.
pub mod validate {
    use std::collections::BTreeSet;

    use tracing::warn;

    use super::*;
    use crate::errors::CoreResult;

    /// Checks:
    /// - notebook ids are unique within the project
    /// - `initNotebookId`, if set, names an existing notebook
    /// - block ids are unique within each notebook
    pub fn document_basic(file: &DeepnoteFile) -> CoreResult<()> {
        let mut notebook_ids = BTreeSet::new();
        for nb in &file.project.notebooks {
            if !notebook_ids.insert(nb.id.as_str()) {
                warn!(notebook_id = %nb.id, "duplicate notebook id");
                return Err(CoreError::invalid_argument(format!(
                    "duplicate notebook id: {}",
                    nb.id
                )));
            }

            let mut block_ids = BTreeSet::new();
            for b in &nb.blocks {
                if !block_ids.insert(b.id.as_str()) {
                    return Err(CoreError::invalid_argument(format!(
                        "duplicate block id in notebook {}: {}",
                        nb.id, b.id
                    )));
                }
            }
        }

        if let Some(init) = &file.project.init_notebook_id {
            if !notebook_ids.contains(init.as_str()) {
                warn!(init_notebook_id = %init, "init notebook not found");
                return Err(CoreError::invalid_argument(format!(
                    "initNotebookId references missing notebook: {init}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn file_with(notebooks: Value) -> DeepnoteFile {
        serde_json::from_value(json!({
            "metadata": { "createdAt": "2025-01-01T00:00:00Z" },
            "version": "1.0.0",
            "project": { "id": "p", "name": "P", "notebooks": notebooks }
        }))
        .unwrap()
    }

    #[test]
    fn block_decodes_metadata_by_kind() {
        let b: Block = serde_json::from_value(json!({
            "id": "b1",
            "type": "input-checkbox",
            "sortingKey": "a0",
            "metadata": { "deepnote_variable_name": "flag", "deepnote_variable_value": true }
        }))
        .unwrap();
        assert_eq!(b.kind, BlockKind::InputCheckbox);
        assert_matches!(b.metadata, Some(BlockMetadata::Checkbox(ref m)) if m.deepnote_variable_value);
    }

    #[test]
    fn block_round_trips_unknown_kind() {
        let v = json!({
            "id": "b1",
            "type": "future-kind",
            "sortingKey": "a0",
            "metadata": { "zeta": 1, "alpha": [true] }
        });
        let b: Block = serde_json::from_value(v.clone()).unwrap();
        assert_eq!(serde_json::to_value(&b).unwrap(), v);
    }

    #[test]
    fn block_serialization_keeps_typed_and_extra_metadata() {
        let v = json!({
            "id": "b1",
            "type": "text-cell-p",
            "content": "hello",
            "sortingKey": "a0",
            "metadata": { "formattedRanges": [], "color": "orange", "checked": "yes" }
        });
        let b: Block = serde_json::from_value(v.clone()).unwrap();
        assert_eq!(serde_json::to_value(&b).unwrap(), v);

        let raw = RawBlock::try_from(&b).unwrap();
        assert_eq!(raw.metadata, v.get("metadata").cloned());
    }

    #[test]
    fn blocks_in_order_uses_sorting_key() {
        let file = file_with(json!([{
            "id": "nb", "name": "NB",
            "blocks": [
                { "id": "c", "type": "code", "sortingKey": "a2" },
                { "id": "a", "type": "code", "sortingKey": "a0" },
                { "id": "b", "type": "code", "sortingKey": "a1" }
            ]
        }]));
        let ids: Vec<&str> = file.project.notebooks[0]
            .blocks_in_order()
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn duplicate_notebook_ids_rejected() {
        let file = file_with(json!([
            { "id": "nb", "name": "A", "blocks": [] },
            { "id": "nb", "name": "B", "blocks": [] }
        ]));
        assert_matches!(validate::document_basic(&file), Err(CoreError::InvalidArgument(_)));
    }

    #[test]
    fn missing_init_notebook_rejected() {
        let mut file = file_with(json!([{ "id": "nb", "name": "A", "blocks": [] }]));
        file.project.init_notebook_id = Some(NotebookId::new("other"));
        assert!(validate::document_basic(&file).is_err());

        file.project.init_notebook_id = Some(NotebookId::new("nb"));
        validate::document_basic(&file).unwrap();
    }
}

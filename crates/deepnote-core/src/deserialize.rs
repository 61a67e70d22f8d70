//! Reading Deepnote documents from YAML text.
//!
//! Pipeline:
//! 1. enforce the configured size limit
//! 2. parse YAML (`CoreError::Parse` on malformed text, parser message kept)
//! 3. convert to a `serde_json::Value`, keeping mapping order
//! 4. structural validation, collecting every issue (`CoreError::Schema`)
//! 5. decode into the typed model and apply count limits
//!
//! Parsing is deterministic given the same text.

use serde_json::Value;
use tracing::debug;

use crate::config::CoreConfig;
use crate::errors::{CoreError, CoreResult, FileParseError};
use crate::model::DeepnoteFile;
use crate::schema;

/// Parse, validate and decode a document with default limits.
pub fn deserialize_file(text: &str) -> CoreResult<DeepnoteFile> {
    deserialize_file_with_config(text, &CoreConfig::default())
}

/// Parse, validate and decode a document.
pub fn deserialize_file_with_config(text: &str, cfg: &CoreConfig) -> CoreResult<DeepnoteFile> {
    if text.len() > cfg.limits.max_document_bytes {
        return Err(CoreError::invalid_argument(format!(
            "document too large ({} bytes > limit {})",
            text.len(),
            cfg.limits.max_document_bytes
        )));
    }

    let value = parse_yaml(text)?;

    let issues = schema::validate_document(&value);
    if !issues.is_empty() {
        debug!(issues = issues.len(), "document failed structural validation");
        return Err(FileParseError::new(issues).into());
    }

    let file: DeepnoteFile = serde_json::from_value(value)
        .map_err(|e| CoreError::serialization(format!("failed to decode document: {e}")))?;

    check_limits(&file, cfg)?;

    debug!(
        project_id = %file.project.id,
        notebooks = file.project.notebooks.len(),
        "document loaded"
    );
    Ok(file)
}

/// Parse YAML text into an untyped JSON value.
pub fn parse_yaml(text: &str) -> CoreResult<Value> {
    let y: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| CoreError::parse(e.to_string()))?;
    yaml_to_json(&y)
}

/// Convert a YAML value to JSON. Mapping order is kept; non-string keys are
/// rendered as their YAML text.
pub fn yaml_to_json(v: &serde_yaml::Value) -> CoreResult<Value> {
    match v {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(i.into()))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(u.into()))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| CoreError::parse(format!("unsupported non-finite number: {f}")))
            } else {
                Err(CoreError::parse("unknown numeric type in yaml"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items = seq.iter().map(yaml_to_json).collect::<CoreResult<Vec<_>>>()?;
            Ok(Value::Array(items))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut obj = serde_json::Map::with_capacity(map.len());
            for (k, v2) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    other => serde_yaml::to_string(other)
                        .map(|s| s.trim().to_string())
                        .map_err(|e| CoreError::parse(format!("unsupported mapping key: {e}")))?,
                };
                obj.insert(key, yaml_to_json(v2)?);
            }
            Ok(Value::Object(obj))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

fn check_limits(file: &DeepnoteFile, cfg: &CoreConfig) -> CoreResult<()> {
    let notebooks = &file.project.notebooks;
    if notebooks.len() > cfg.limits.max_notebooks {
        return Err(CoreError::invalid_argument(format!(
            "too many notebooks ({} > limit {})",
            notebooks.len(),
            cfg.limits.max_notebooks
        )));
    }

    for nb in notebooks {
        if nb.blocks.len() > cfg.limits.max_blocks_per_notebook {
            return Err(CoreError::invalid_argument(format!(
                "notebook {} has too many blocks ({} > limit {})",
                nb.id,
                nb.blocks.len(),
                cfg.limits.max_blocks_per_notebook
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const MINIMAL: &str = r#"
metadata:
  createdAt: '2025-01-01T00:00:00Z'
version: '1'
project:
  id: 'project-123'
  name: 'Test Project'
  notebooks: []
"#;

    #[test]
    fn minimal_document_loads() {
        let f = deserialize_file(MINIMAL).unwrap();
        assert_eq!(f.project.id.as_str(), "project-123");
        assert_eq!(f.version, "1");
        assert!(f.project.notebooks.is_empty());
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let res = deserialize_file("key: [unclosed");
        assert_matches!(res, Err(CoreError::Parse(_)));
    }

    #[test]
    fn schema_failure_reports_all_issues() {
        let res = deserialize_file("version: 1\nblocks:\n  - {}\n");
        let err = res.unwrap_err();
        let schema = err.as_schema().unwrap();
        assert_eq!(schema.issues().len(), 3);
        assert!(err.to_string().starts_with("Failed to parse the Deepnote file:"));
        assert_eq!(schema.first_issue_message(), "metadata: Required");
    }

    #[test]
    fn mapping_order_is_kept() {
        let v = parse_yaml("b: 1\na: 2\n").unwrap();
        let keys: Vec<&String> = v.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn non_string_keys_are_rendered() {
        let v = parse_yaml("1: one\ntrue: yes\n").unwrap();
        assert_eq!(v["1"], Value::String("one".into()));
        assert!(v.get("true").is_some());
    }

    #[test]
    fn size_limit_enforced() {
        let mut cfg = CoreConfig::default();
        cfg.limits.max_document_bytes = 10;
        assert_matches!(
            deserialize_file_with_config(MINIMAL, &cfg),
            Err(CoreError::InvalidArgument(_))
        );
    }

    #[test]
    fn notebook_limit_enforced() {
        let text = MINIMAL.replace(
            "notebooks: []",
            "notebooks:\n    - { id: a, name: A, blocks: [] }\n    - { id: b, name: B, blocks: [] }",
        );
        let mut cfg = CoreConfig::default();
        cfg.limits.max_notebooks = 1;
        assert_matches!(
            deserialize_file_with_config(&text, &cfg),
            Err(CoreError::InvalidArgument(_))
        );
        deserialize_file(&text).unwrap();
    }
}

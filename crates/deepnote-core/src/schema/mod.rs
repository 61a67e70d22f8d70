//! Structural validation of Deepnote documents.
//!
//! Validation runs over an untyped `serde_json::Value` (the YAML document after
//! conversion) and collects every issue instead of stopping at the first one.
//! Each issue carries the path of the offending field so front ends can point
//! at it.
//!
//! Shape rules:
//! - unknown keys on project, notebook and block objects are ignored
//! - block metadata is checked against the shape selected by the block `type`
//! - metadata of unknown block types only has to be an object
//!
//! Consumer-level invariants (unique notebook ids, `initNotebookId` pointing at
//! an existing notebook) are checked separately by `model::validate`.

mod fields;

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

pub use fields::{metadata_fields, Field, FieldType};

use crate::model::BlockKind;

/// One segment of an issue path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    pub fn key(k: impl Into<String>) -> Self {
        Self::Key(k.into())
    }

    pub fn index(i: usize) -> Self {
        Self::Index(i)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Join path segments with `.`.
pub fn render_path(path: &[PathSegment]) -> String {
    path.iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// A single structural validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaIssue {
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl SchemaIssue {
    pub fn new(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// `(block index: i)` when the path goes through a block, otherwise
    /// `(notebook index: i)` when it goes through a notebook.
    pub fn location_hint(&self) -> Option<String> {
        if let Some(i) = self.index_after("blocks") {
            return Some(format!("(block index: {i})"));
        }
        self.index_after("notebooks")
            .map(|i| format!("(notebook index: {i})"))
    }

    fn index_after(&self, key: &str) -> Option<usize> {
        let pos = self
            .path
            .iter()
            .position(|s| matches!(s, PathSegment::Key(k) if k == key))?;
        match self.path.get(pos + 1) {
            Some(PathSegment::Index(i)) => Some(*i),
            _ => None,
        }
    }
}

/// Validate a whole document value. Returns all issues in document order.
pub fn validate_document(value: &Value) -> Vec<SchemaIssue> {
    let mut w = Walker::default();
    w.document(value);
    w.issues
}

/// Validate metadata of a single block against the shape of `kind`.
pub fn validate_block_metadata(kind: &BlockKind, metadata: &Value) -> Vec<SchemaIssue> {
    let mut w = Walker::default();
    w.metadata(kind, metadata);
    w.issues
}

/// Name of the JSON type, as used in issue messages.
pub(crate) fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Default)]
struct Walker {
    path: Vec<PathSegment>,
    issues: Vec<SchemaIssue>,
}

impl Walker {
    fn push_issue(&mut self, message: impl Into<String>) {
        self.issues.push(SchemaIssue::new(self.path.clone(), message));
    }

    fn with_key<F: FnOnce(&mut Self)>(&mut self, key: &str, f: F) {
        self.path.push(PathSegment::key(key));
        f(self);
        self.path.pop();
    }

    fn with_index<F: FnOnce(&mut Self)>(&mut self, idx: usize, f: F) {
        self.path.push(PathSegment::index(idx));
        f(self);
        self.path.pop();
    }

    fn object<'v>(&mut self, v: &'v Value) -> Option<&'v Map<String, Value>> {
        match v.as_object() {
            Some(o) => Some(o),
            None => {
                self.push_issue(format!("Expected object, received {}", type_name(v)));
                None
            }
        }
    }

    fn document(&mut self, v: &Value) {
        let Some(obj) = self.object(v) else {
            return;
        };

        self.required(obj, "metadata", |w, m| {
            if let Some(mo) = w.object(m) {
                w.fields(mo, fields::FILE_METADATA);
            }
        });
        self.required(obj, "project", |w, p| w.project(p));
        self.required(obj, "version", |w, v| w.check(v, &FieldType::String));
    }

    fn project(&mut self, v: &Value) {
        let Some(obj) = self.object(v) else {
            return;
        };

        self.fields(obj, fields::PROJECT);
        self.required(obj, "notebooks", |w, nbs| {
            let Some(arr) = w.array(nbs) else {
                return;
            };
            for (i, nb) in arr.iter().enumerate() {
                w.with_index(i, |w| w.notebook(nb));
            }
        });
        self.fields(obj, fields::PROJECT_SETTINGS);
    }

    fn notebook(&mut self, v: &Value) {
        let Some(obj) = self.object(v) else {
            return;
        };

        self.required(obj, "blocks", |w, blocks| {
            let Some(arr) = w.array(blocks) else {
                return;
            };
            for (i, b) in arr.iter().enumerate() {
                w.with_index(i, |w| w.block(b));
            }
        });
        self.fields(obj, fields::NOTEBOOK);
    }

    fn block(&mut self, v: &Value) {
        let Some(obj) = self.object(v) else {
            return;
        };

        self.fields(obj, fields::BLOCK);

        let kind = obj
            .get("type")
            .and_then(Value::as_str)
            .map(BlockKind::parse);

        if let Some(meta) = obj.get("metadata") {
            self.with_key("metadata", |w| match &kind {
                Some(kind) => w.metadata(kind, meta),
                None => {
                    w.object(meta);
                }
            });
        }
    }

    fn metadata(&mut self, kind: &BlockKind, v: &Value) {
        trace!(kind = kind.as_str(), "validating block metadata");
        let Some(obj) = self.object(v) else {
            return;
        };
        self.fields(obj, metadata_fields(kind));
    }

    fn array<'v>(&mut self, v: &'v Value) -> Option<&'v Vec<Value>> {
        match v.as_array() {
            Some(a) => Some(a),
            None => {
                self.push_issue(format!("Expected array, received {}", type_name(v)));
                None
            }
        }
    }

    fn required<F: FnOnce(&mut Self, &Value)>(&mut self, obj: &Map<String, Value>, key: &str, f: F) {
        self.with_key(key, |w| match obj.get(key) {
            Some(v) => f(w, v),
            None => w.push_issue("Required"),
        });
    }

    fn fields(&mut self, obj: &Map<String, Value>, table: &[Field]) {
        for field in table {
            self.with_key(field.name, |w| match obj.get(field.name) {
                Some(v) => w.check(v, &field.ty),
                None if field.required => w.push_issue("Required"),
                None => {}
            });
        }
    }

    fn check(&mut self, v: &Value, ty: &FieldType) {
        match ty {
            FieldType::Unknown => {}
            FieldType::String => self.expect(v, "string", v.is_string()),
            FieldType::Number => self.expect(v, "number", v.is_number()),
            FieldType::Bool => self.expect(v, "boolean", v.is_boolean()),
            FieldType::Enum(options) => self.enumeration(v, options),
            FieldType::Literal(lit) => {
                if v.as_str() != Some(*lit) {
                    self.push_issue(format!("Invalid literal value, expected \"{lit}\""));
                }
            }
            FieldType::Array(inner) => {
                if let Some(arr) = self.array(v) {
                    for (i, item) in arr.iter().enumerate() {
                        self.with_index(i, |w| w.check(item, inner));
                    }
                }
            }
            FieldType::Object(table) => {
                if let Some(obj) = self.object(v) {
                    self.fields(obj, table);
                }
            }
            FieldType::Record => {
                self.object(v);
            }
            FieldType::StringOrStrings => {
                let ok = match v {
                    Value::String(_) => true,
                    Value::Array(items) => items.iter().all(Value::is_string),
                    _ => false,
                };
                if !ok {
                    self.push_issue("Invalid input");
                }
            }
            FieldType::StringOrPair => match v {
                Value::String(_) => {}
                Value::Array(items) if items.iter().all(Value::is_string) => {
                    if items.len() != 2 {
                        self.push_issue("Array must contain exactly 2 element(s)");
                    }
                }
                _ => self.push_issue("Invalid input"),
            },
            FieldType::OneOf(alternatives) => {
                let matched = alternatives.iter().any(|alt| {
                    let mut trial = Walker::default();
                    trial.check(v, alt);
                    trial.issues.is_empty()
                });
                if !matched {
                    self.push_issue("Invalid input");
                }
            }
        }
    }

    fn expect(&mut self, v: &Value, expected: &str, ok: bool) {
        if !ok {
            self.push_issue(format!("Expected {expected}, received {}", type_name(v)));
        }
    }

    fn enumeration(&mut self, v: &Value, options: &[&str]) {
        let expected = options
            .iter()
            .map(|o| format!("'{o}'"))
            .collect::<Vec<_>>()
            .join(" | ");
        match v.as_str() {
            Some(s) if options.contains(&s) => {}
            Some(s) => self.push_issue(format!(
                "Invalid enum value. Expected {expected}, received '{s}'"
            )),
            None => self.push_issue(format!("Expected {expected}, received {}", type_name(v))),
        }
    }
}

//! Error types for deepnote-core.
//!
//! `CoreError` is the single error type returned by the core crate. Structural
//! validation failures carry every collected issue in a `FileParseError` so
//! callers can render a summary or inspect issues one by one.

use std::fmt;

use thiserror::Error;

use crate::schema::{render_path, SchemaIssue};

/// Result alias used throughout the core crate.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors produced by the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The document text is not well-formed YAML. Carries the parser message.
    #[error("{0}")]
    Parse(String),

    /// The document parsed but does not match the document schema.
    #[error(transparent)]
    Schema(#[from] FileParseError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl CoreError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// Returns the schema failure if this error is one.
    pub fn as_schema(&self) -> Option<&FileParseError> {
        match self {
            Self::Schema(e) => Some(e),
            _ => None,
        }
    }
}

/// Structural validation failure for a whole document.
///
/// The `Display` output lists at most [`FileParseError::MAX_ISSUES_TO_SHOW`]
/// issues, each with its path and a location hint, followed by a count of the
/// issues left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileParseError {
    issues: Vec<SchemaIssue>,
}

impl FileParseError {
    pub const MAX_ISSUES_TO_SHOW: usize = 5;

    pub fn new(issues: Vec<SchemaIssue>) -> Self {
        Self { issues }
    }

    /// All issues in the order they were found.
    pub fn issues(&self) -> &[SchemaIssue] {
        &self.issues
    }

    /// `path: message` for the first issue, or just the message when the path
    /// is empty.
    pub fn first_issue_message(&self) -> String {
        match self.issues.first() {
            None => "Invalid Deepnote file".to_string(),
            Some(issue) if issue.path.is_empty() => issue.message.clone(),
            Some(issue) => format!("{}: {}", render_path(&issue.path), issue.message),
        }
    }
}

impl fmt::Display for FileParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Failed to parse the Deepnote file:")?;

        for (i, issue) in self.issues.iter().take(Self::MAX_ISSUES_TO_SHOW).enumerate() {
            let path = if issue.path.is_empty() {
                "(root)".to_string()
            } else {
                render_path(&issue.path)
            };
            write!(f, "\n  {}. [{}] {}", i + 1, path, issue.message)?;
            if let Some(hint) = issue.location_hint() {
                write!(f, " {hint}")?;
            }
        }

        let remaining = self.issues.len().saturating_sub(Self::MAX_ISSUES_TO_SHOW);
        if remaining > 0 {
            write!(f, "\n  ... and {remaining} more issue(s)")?;
        }
        Ok(())
    }
}

impl std::error::Error for FileParseError {}

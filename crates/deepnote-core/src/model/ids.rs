//! Typed identifiers.
//!
//! Project, notebook, block and integration ids are all strings on the wire.
//! Distinct newtypes keep them from being mixed up in APIs.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Stable project identifier.
    ProjectId
);
string_id!(
    /// Notebook identifier, unique within a project.
    NotebookId
);
string_id!(
    /// Author-assigned block identifier.
    BlockId
);
string_id!(
    /// Identifier of a data-source integration (SQL connection).
    IntegrationId
);

/// Ids are any non-empty string.
pub fn is_valid_id(value: &str) -> bool {
    !value.is_empty()
}

//! Configuration structures for deepnote-core.
//!
//! These objects control resource limits applied while reading documents.
//! They are serde-friendly so front ends (the CLI) can load them from a YAML
//! file; every field has a default.
//!
//! The core crate itself does not read environment variables. All configuration
//! must be provided explicitly by the caller.

use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, CoreResult};

/// Global configuration container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Resource limits enforced when reading a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum size of the raw document text.
    #[serde(default = "LimitsConfig::default_max_document_bytes")]
    pub max_document_bytes: usize,

    /// Maximum number of notebooks in a project.
    #[serde(default = "LimitsConfig::default_max_notebooks")]
    pub max_notebooks: usize,

    /// Maximum number of blocks in a single notebook.
    #[serde(default = "LimitsConfig::default_max_blocks_per_notebook")]
    pub max_blocks_per_notebook: usize,
}

impl LimitsConfig {
    fn default_max_document_bytes() -> usize {
        64 * 1024 * 1024
    }

    fn default_max_notebooks() -> usize {
        10_000
    }

    fn default_max_blocks_per_notebook() -> usize {
        100_000
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: Self::default_max_document_bytes(),
            max_notebooks: Self::default_max_notebooks(),
            max_blocks_per_notebook: Self::default_max_blocks_per_notebook(),
        }
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &CoreConfig) -> CoreResult<()> {
    if cfg.limits.max_document_bytes == 0 {
        return Err(CoreError::invalid_argument(
            "max_document_bytes must be greater than zero",
        ));
    }

    if cfg.limits.max_notebooks == 0 {
        return Err(CoreError::invalid_argument(
            "max_notebooks must be greater than zero",
        ));
    }

    if cfg.limits.max_blocks_per_notebook == 0 {
        return Err(CoreError::invalid_argument(
            "max_blocks_per_notebook must be greater than zero",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = CoreConfig::default();
        validate_config(&cfg).unwrap();
    }

    #[test]
    fn zero_document_limit_detected() {
        let mut cfg = CoreConfig::default();
        cfg.limits.max_document_bytes = 0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn zero_block_limit_detected() {
        let mut cfg = CoreConfig::default();
        cfg.limits.max_blocks_per_notebook = 0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let cfg: CoreConfig = serde_yaml::from_str("limits:\n  max_notebooks: 3\n").unwrap();
        assert_eq!(cfg.limits.max_notebooks, 3);
        assert_eq!(
            cfg.limits.max_document_bytes,
            LimitsConfig::default().max_document_bytes
        );
    }

    #[test]
    fn unknown_keys_rejected() {
        let res: Result<CoreConfig, _> = serde_yaml::from_str("limits:\n  max_nodes: 3\n");
        assert!(res.is_err());
    }
}

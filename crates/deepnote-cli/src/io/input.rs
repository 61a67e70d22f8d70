use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use deepnote_core::config::{validate_config, CoreConfig};
use deepnote_core::deserialize::deserialize_file_with_config;
use deepnote_core::model::{DeepnoteFile, Notebook};

/// Defaults unless a config file is given.
pub fn load_config(path: Option<&Path>) -> Result<CoreConfig> {
    let Some(path) = path else {
        return Ok(CoreConfig::default());
    };
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    let cfg: CoreConfig =
        serde_yaml::from_str(&raw).map_err(|e| anyhow!("invalid config {}: {e}", path.display()))?;
    validate_config(&cfg)?;
    info!(path = %path.display(), "loaded config");
    Ok(cfg)
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Read and fully validate a document.
pub fn read_document(path: &Path, cfg: &CoreConfig) -> Result<DeepnoteFile> {
    let text = read_text(path)?;
    deserialize_file_with_config(&text, cfg).with_context(|| format!("loading {}", path.display()))
}

/// All notebooks, or the one named by `id`.
pub fn select_notebooks<'a>(file: &'a DeepnoteFile, id: Option<&str>) -> Result<Vec<&'a Notebook>> {
    match id {
        Some(id) => file
            .project
            .notebook(id)
            .map(|nb| vec![nb])
            .ok_or_else(|| anyhow!("notebook not found: {id}")),
        None => Ok(file.project.notebooks.iter().collect()),
    }
}

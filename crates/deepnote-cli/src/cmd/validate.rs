use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;

use deepnote_blocks::check::check_block;
use deepnote_core::config::CoreConfig;
use deepnote_core::deserialize::deserialize_file_with_config;
use deepnote_core::model::{validate, BlockKind, DeepnoteFile};
use deepnote_core::schema::{render_path, SchemaIssue};
use deepnote_core::CoreError;

use crate::io::input;
use crate::output::{self, Status};

#[derive(Debug, Default, Serialize)]
pub struct ValidateOut {
    pub valid: bool,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<SchemaIssue>,
    pub notebooks: usize,
    pub blocks: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<BlockCheck>,
}

/// Pre-compile findings for one block. Only blocks with messages are listed.
#[derive(Debug, Serialize)]
pub struct BlockCheck {
    pub notebook_id: String,
    pub block_id: String,
    pub kind: BlockKind,
    /// Errors joined into one line; absent when the block only has warnings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn run(cfg: &CoreConfig, path: &Path) -> Result<()> {
    let text = input::read_text(path)?;
    let mut out = ValidateOut {
        file: path.display().to_string(),
        ..Default::default()
    };

    match deserialize_file_with_config(&text, cfg) {
        Ok(file) => inspect(&file, &mut out),
        Err(CoreError::Schema(e)) => {
            out.error = Some(e.first_issue_message());
            out.issues = e.issues().to_vec();
        }
        Err(e) => out.error = Some(e.to_string()),
    }

    report(&out)?;
    if !out.valid {
        bail!("{} is not a valid Deepnote document", out.file);
    }
    Ok(())
}

fn inspect(file: &DeepnoteFile, out: &mut ValidateOut) {
    out.notebooks = file.project.notebooks.len();
    out.blocks = file.project.notebooks.iter().map(|nb| nb.blocks.len()).sum();

    if let Err(e) = validate::document_basic(file) {
        out.error = Some(e.to_string());
        return;
    }

    for nb in &file.project.notebooks {
        for block in nb.blocks_in_order() {
            let r = check_block(block);
            if r.errors.is_empty() && r.warnings.is_empty() {
                continue;
            }
            out.checks.push(BlockCheck {
                notebook_id: nb.id.to_string(),
                block_id: block.id.to_string(),
                kind: block.kind.clone(),
                summary: (!r.success).then(|| r.error_summary()),
                errors: r.errors,
                warnings: r.warnings,
            });
        }
    }

    out.valid = out.checks.iter().all(|c| c.errors.is_empty());
}

fn report(out: &ValidateOut) -> Result<()> {
    if output::is_json() {
        return output::print(out);
    }

    let mut stdout = output::stdout();
    for issue in &out.issues {
        let path = if issue.path.is_empty() {
            "(root)".to_string()
        } else {
            render_path(&issue.path)
        };
        let hint = issue.location_hint().map(|h| format!(" {h}")).unwrap_or_default();
        output::status_line(&mut stdout, Status::Error, &format!("[{path}] {}{hint}", issue.message))?;
    }
    if out.issues.is_empty() {
        if let Some(e) = &out.error {
            output::status_line(&mut stdout, Status::Error, e)?;
        }
    }
    for c in &out.checks {
        for e in &c.errors {
            output::status_line(&mut stdout, Status::Error, &format!("{}/{}: {e}", c.notebook_id, c.block_id))?;
        }
        for w in &c.warnings {
            output::status_line(&mut stdout, Status::Warn, &format!("{}/{}: {w}", c.notebook_id, c.block_id))?;
        }
    }
    if out.valid {
        output::status_line(
            &mut stdout,
            Status::Ok,
            &format!("{} ({} notebooks, {} blocks)", out.file, out.notebooks, out.blocks),
        )?;
    }
    Ok(())
}

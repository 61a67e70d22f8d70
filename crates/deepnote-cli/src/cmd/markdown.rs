use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use deepnote_blocks::markdown::{create_markdown, strip_markdown};
use deepnote_blocks::registry::{classify, Family};
use deepnote_core::config::CoreConfig;

use crate::io::input;
use crate::output;

#[derive(Debug, Serialize)]
pub struct MarkdownBlock {
    pub notebook_id: String,
    pub block_id: String,
    pub markdown: String,
}

pub fn run(cfg: &CoreConfig, path: &Path, notebook: Option<&str>, plain: bool) -> Result<()> {
    let file = input::read_document(path, cfg)?;

    let mut blocks = Vec::new();
    for nb in input::select_notebooks(&file, notebook)? {
        for block in nb.blocks_in_order() {
            let Family::Markup(kind) = classify(&block.kind) else {
                debug!(block_id = %block.id, kind = %block.kind, "skipping non-display block");
                continue;
            };
            let markdown = if plain && kind.is_text_cell() {
                strip_markdown(block)?
            } else {
                create_markdown(block)?
            };
            blocks.push(MarkdownBlock {
                notebook_id: nb.id.to_string(),
                block_id: block.id.to_string(),
                markdown,
            });
        }
    }

    if output::is_json() {
        return output::print(&blocks);
    }
    let text: Vec<&str> = blocks.iter().map(|b| b.markdown.as_str()).collect();
    println!("{}", text.join("\n\n"));
    Ok(())
}

//! `code` blocks: display preamble followed by the source verbatim.

use deepnote_core::model::Block;

use crate::errors::BlockResult;
use crate::snippets;

pub fn python(block: &Block) -> BlockResult<String> {
    let meta = metadata_of!(block, Code);
    let attrs = snippets::table_state_json(block.id.as_str(), meta.deepnote_table_state.as_ref())?;
    Ok(format!(
        "{}\n{}",
        snippets::table_state_preamble(&attrs),
        block.content_str()
    ))
}

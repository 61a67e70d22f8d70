//! `button` blocks.
//!
//! `run` buttons (and legacy buttons with no behavior) trigger execution from
//! the UI and compile to nothing. `set_variable` buttons bind a boolean that
//! is `True` only while the run was started by that button.

use deepnote_core::model::metadata::ButtonBehavior;
use deepnote_core::model::Block;

use super::variable_name;
use crate::errors::{BlockResult, ButtonBlockError};
use crate::python::ExecutionContext;
use crate::snippets;

pub fn python(block: &Block, ctx: &ExecutionContext) -> BlockResult<String> {
    let meta = metadata_of!(block, Button);

    match meta.deepnote_button_behavior {
        Some(ButtonBehavior::SetVariable) => {
            let raw = meta
                .deepnote_variable_name
                .as_deref()
                .filter(|n| !n.is_empty())
                .ok_or_else(|| ButtonBlockError {
                    block_id: block.id.to_string(),
                    behavior: ButtonBehavior::SetVariable.as_str(),
                    field: "deepnote_variable_name",
                })?;
            let name = variable_name(raw);
            let pressed = ctx.is_active(&name);
            Ok(snippets::set_variable(&name, pressed))
        }
        Some(ButtonBehavior::Run) | None => Ok(String::new()),
    }
}

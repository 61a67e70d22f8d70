//! `sql` blocks.

use deepnote_core::model::metadata::SqlReturnType;
use deepnote_core::model::Block;
use deepnote_core::sanitize::escape_string_literal;

use crate::errors::BlockResult;
use crate::snippets;

pub fn python(block: &Block) -> BlockResult<String> {
    let meta = metadata_of!(block, Sql);

    let call = snippets::execute_sql(
        &escape_string_literal(block.content_str()),
        &snippets::sql_env_var(meta.sql_integration_id.as_deref()),
        meta.deepnote_return_variable_type
            .unwrap_or(SqlReturnType::Dataframe)
            .as_str(),
    );

    let body = match meta.deepnote_variable_name.as_deref().filter(|n| !n.is_empty()) {
        Some(raw) => {
            let name = super::variable_name(raw);
            format!("{name} = {call}\n{name}")
        }
        None => call,
    };

    match &meta.deepnote_table_state {
        Some(state) => {
            let attrs = snippets::table_state_json(block.id.as_str(), Some(state))?;
            Ok(format!("{}\n{body}", snippets::table_state_preamble(&attrs)))
        }
        None => Ok(body),
    }
}

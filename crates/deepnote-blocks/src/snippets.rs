//! Python snippet builders.
//!
//! Every fragment of generated Python that is longer than a single assignment
//! lives here, so the per-kind compilers only decide *which* snippet to emit
//! and with what arguments. Arguments that end up inside Python string
//! literals must already be escaped by the caller unless noted otherwise.

use deepnote_core::model::metadata::TableState;
use deepnote_core::sanitize::escape_string_literal;

use crate::errors::{BlockError, BlockResult};

/// Env var used when a SQL block names no integration.
pub const DEFAULT_SQL_ENV_VAR: &str = "SQL_ALCHEMY_JSON_ENV_VAR";

/// Name of the generated big-number function.
pub const BIG_NUMBER_FN: &str = "__deepnote_big_number__";

/// Compact JSON of a table state, `{}` when absent.
pub fn table_state_json(block_id: &str, state: Option<&TableState>) -> BlockResult<String> {
    match state {
        Some(s) => serde_json::to_string(s)
            .map_err(|e| BlockError::serialization(block_id, "deepnote_table_state", e)),
        None => Ok("{}".to_string()),
    }
}

/// Dataframe display preamble. Ends with a newline.
pub fn table_state_preamble(table_state_json: &str) -> String {
    let attrs = escape_string_literal(table_state_json);
    format!(
        "if '_dntk' in globals():\n  _dntk.dataframe_utils.configure_dataframe_formatter({attrs})\nelse:\n  _deepnote_current_table_attrs = {attrs}\n"
    )
}

/// Environment variable holding the connection of `integration_id`.
pub fn sql_env_var(integration_id: Option<&str>) -> String {
    match integration_id.filter(|id| !id.is_empty()) {
        Some(id) => {
            let mut out = String::with_capacity(id.len() + 4);
            out.push_str("SQL_");
            out.extend(id.chars().map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            }));
            out
        }
        None => DEFAULT_SQL_ENV_VAR.to_string(),
    }
}

/// `_dntk.execute_sql(...)` call. `query_literal` is already escaped.
pub fn execute_sql(query_literal: &str, env_var: &str, return_type: &str) -> String {
    format!(
        "_dntk.execute_sql(\n  {query_literal},\n  '{env_var}',\n  audit_sql_comment='',\n  sql_cache_mode='cache_disabled',\n  return_variable_type='{return_type}'\n)"
    )
}

/// Chart construction over `variable`. Both JSON payloads are escaped here.
pub fn deepnote_chart(variable: &str, spec_json: &str, filters_json: &str) -> String {
    format!(
        "_dntk.DeepnoteChart({variable}, {}, attach_selection=True, filters={})",
        escape_string_literal(spec_json),
        escape_string_literal(filters_json)
    )
}

/// Boolean assignment used by set-variable buttons.
pub fn set_variable(name: &str, value: bool) -> String {
    format!("{name} = {}", python_bool(value))
}

pub fn python_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Inputs to the big-number snippet. Expressions are emitted verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BigNumberParts {
    pub title_expr: String,
    pub value_expr: String,
    pub comparison_title_expr: Option<String>,
    pub comparison_value_expr: Option<String>,
}

/// Self-contained function rendering a KPI as JSON, invoked on the last line.
pub fn big_number(parts: &BigNumberParts) -> String {
    let mut fields = vec![
        format!("        \"title\": {},", parts.title_expr),
        format!("        \"value\": {},", parts.value_expr),
    ];
    if let Some(t) = &parts.comparison_title_expr {
        fields.push(format!("        \"comparisonTitle\": {t},"));
    }
    if let Some(v) = &parts.comparison_value_expr {
        fields.push(format!("        \"comparisonValue\": {v},"));
    }

    format!(
        "def {BIG_NUMBER_FN}():\n\
         \x20   import json\n\
         \x20   import jinja2\n\
         \x20   from jinja2 import meta\n\
         \n\
         \x20   def render_template(template):\n\
         \x20       parsed_content = jinja2.Environment().parse(template)\n\
         \x20       required_variables = meta.find_undeclared_variables(parsed_content)\n\
         \x20       context = {{\n\
         \x20           variable_name: globals().get(variable_name)\n\
         \x20           for variable_name in required_variables\n\
         \x20       }}\n\
         \x20       return jinja2.Environment().from_string(template).render(context)\n\
         \n\
         \x20   return json.dumps({{\n\
         {}\n\
         \x20   }})\n\
         \n\
         {BIG_NUMBER_FN}()",
        fields.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_embeds_escaped_json_twice() {
        let p = table_state_preamble("{}");
        assert_eq!(
            p,
            "if '_dntk' in globals():\n  _dntk.dataframe_utils.configure_dataframe_formatter('{}')\nelse:\n  _deepnote_current_table_attrs = '{}'\n"
        );
    }

    #[test]
    fn env_var_from_integration_id() {
        assert_eq!(sql_env_var(Some("my-postgres-connection")), "SQL_MY_POSTGRES_CONNECTION");
        assert_eq!(sql_env_var(Some("a1.b2")), "SQL_A1_B2");
        assert_eq!(sql_env_var(None), DEFAULT_SQL_ENV_VAR);
        assert_eq!(sql_env_var(Some("")), DEFAULT_SQL_ENV_VAR);
    }

    #[test]
    fn chart_payloads_are_literals() {
        let s = deepnote_chart("df", r#"{"mark":"bar"}"#, "[]");
        assert_eq!(
            s,
            r#"_dntk.DeepnoteChart(df, '{"mark":"bar"}', attach_selection=True, filters='[]')"#
        );
    }

    #[test]
    fn big_number_only_lists_configured_fields() {
        let parts = BigNumberParts {
            title_expr: "'Sales'".into(),
            value_expr: "f\"{sales}\"".into(),
            ..Default::default()
        };
        let code = big_number(&parts);
        assert!(code.starts_with("def __deepnote_big_number__():\n    import json\n"));
        assert!(code.contains("        \"title\": 'Sales',\n"));
        assert!(!code.contains("comparisonTitle"));
        assert!(code.ends_with("\n\n__deepnote_big_number__()"));
    }
}

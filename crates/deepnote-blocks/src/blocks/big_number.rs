//! `big-number` blocks: a KPI rendered to JSON at run time.
//!
//! Titles may contain Jinja templates referencing notebook variables; those
//! are passed through `render_template` inside the generated function.

use once_cell::sync::Lazy;
use regex::Regex;

use deepnote_core::model::Block;
use deepnote_core::sanitize::escape_string_literal;

use super::variable_name;
use crate::errors::BlockResult;
use crate::snippets::{self, BigNumberParts};

static TEMPLATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{\{.*?\}\}|\{%.*?%\}").unwrap());

/// Whether `text` contains Jinja expression (`{{ }}`) or statement (`{% %}`) syntax.
pub fn contains_template_syntax(text: &str) -> bool {
    TEMPLATE_RE.is_match(text)
}

fn title_expr(title: &str) -> String {
    let literal = escape_string_literal(title);
    if contains_template_syntax(title) {
        format!("render_template({literal})")
    } else {
        literal
    }
}

fn value_expr(raw: &str) -> String {
    format!("f\"{{{}}}\"", variable_name(raw))
}

pub fn python(block: &Block) -> BlockResult<String> {
    let meta = metadata_of!(block, BigNumber);

    let configured = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_owned);

    let parts = BigNumberParts {
        title_expr: title_expr(meta.deepnote_big_number_title.as_deref().unwrap_or("")),
        value_expr: value_expr(meta.deepnote_big_number_value.as_deref().unwrap_or("")),
        comparison_title_expr: configured(&meta.deepnote_big_number_comparison_title).map(|t| title_expr(&t)),
        comparison_value_expr: configured(&meta.deepnote_big_number_comparison_value).map(|v| value_expr(&v)),
    };

    Ok(snippets::big_number(&parts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::testing::block;
    use deepnote_core::model::BlockKind;
    use serde_json::json;

    #[test]
    fn title_and_value() {
        let b = block(
            BlockKind::BigNumber,
            "",
            json!({ "deepnote_big_number_title": "Total Sales", "deepnote_big_number_value": "total_sales" }),
        );
        let code = python(&b).unwrap();
        assert!(code.contains("__deepnote_big_number__"));
        assert!(code.contains("'Total Sales'"));
        assert!(code.contains("f\"{total_sales}\""));
        assert!(code.contains("import json"));
        assert!(code.contains("import jinja2"));
        assert!(!code.contains("comparisonTitle"));
    }

    #[test]
    fn comparison_fields_when_configured() {
        let b = block(
            BlockKind::BigNumber,
            "",
            json!({
                "deepnote_big_number_title": "Revenue",
                "deepnote_big_number_value": "revenue",
                "deepnote_big_number_comparison_title": "vs Last Month",
                "deepnote_big_number_comparison_value": "revenue_change"
            }),
        );
        let code = python(&b).unwrap();
        assert!(code.contains("\"comparisonTitle\": 'vs Last Month',"));
        assert!(code.contains("\"comparisonValue\": f\"{revenue_change}\","));
    }

    #[test]
    fn empty_metadata_uses_fallbacks() {
        let b = block(BlockKind::BigNumber, "", json!({}));
        let code = python(&b).unwrap();
        assert!(code.contains("\"title\": '',"));
        assert!(code.contains("f\"{input_1}\""));
    }

    #[test]
    fn templated_title_is_rendered() {
        let b = block(
            BlockKind::BigNumber,
            "",
            json!({ "deepnote_big_number_title": "Sales for {{ year }}", "deepnote_big_number_value": "total_sales" }),
        );
        assert!(python(&b).unwrap().contains("\"title\": render_template('Sales for {{ year }}'),"));
    }

    #[test]
    fn value_name_is_sanitized_and_title_escaped() {
        let b = block(
            BlockKind::BigNumber,
            "",
            json!({ "deepnote_big_number_title": "It's a \"test\"", "deepnote_big_number_value": "my-value-name" }),
        );
        let code = python(&b).unwrap();
        assert!(code.contains("myvaluename"));
        assert!(code.contains(r#"'It\'s a "test"'"#));
    }

    #[test]
    fn template_detection() {
        assert!(contains_template_syntax("{{ x }}"));
        assert!(contains_template_syntax("{% if x %}y{% endif %}"));
        assert!(!contains_template_syntax("{ x }"));
        assert!(!contains_template_syntax("plain"));
    }
}

//! `visualization` blocks: a chart over a dataframe variable.

use serde_json::Value;

use deepnote_core::model::Block;

use super::variable_name;
use crate::errors::{BlockError, BlockResult, VisualizationBlockError};
use crate::snippets;

pub const VARIABLE_FIELD: &str = "deepnote_variable_name";
pub const SPEC_FIELD: &str = "deepnote_visualization_spec";

pub fn python(block: &Block) -> BlockResult<String> {
    let meta = metadata_of!(block, Visualization);
    let missing = |field| VisualizationBlockError {
        block_id: block.id.to_string(),
        field,
    };

    let raw_name = meta
        .deepnote_variable_name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| missing(VARIABLE_FIELD))?;

    let spec = meta
        .deepnote_visualization_spec
        .as_ref()
        .filter(|s| is_present(s))
        .ok_or_else(|| missing(SPEC_FIELD))?;

    let spec_json = serde_json::to_string(spec)
        .map_err(|e| BlockError::serialization(block.id.as_str(), SPEC_FIELD, e))?;

    let filters = meta
        .deepnote_chart_filter
        .as_ref()
        .and_then(|f| f.advanced_filters.as_deref())
        .unwrap_or_default();
    let filters_json = serde_json::to_string(filters)
        .map_err(|e| BlockError::serialization(block.id.as_str(), "deepnote_chart_filter", e))?;

    Ok(snippets::deepnote_chart(&variable_name(raw_name), &spec_json, &filters_json))
}

/// A spec counts as missing when it is null, `false`, `0` or the empty string.
pub fn is_present(spec: &Value) -> bool {
    match spec {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::testing::block;
    use assert_matches::assert_matches;
    use deepnote_core::model::BlockKind;
    use serde_json::json;

    #[test]
    fn emits_chart_with_default_filters() {
        let b = block(
            BlockKind::Visualization,
            "",
            json!({
                "deepnote_variable_name": "df",
                "deepnote_visualization_spec": { "mark": "bar", "encoding": {} }
            }),
        );
        assert_eq!(
            python(&b).unwrap(),
            r#"_dntk.DeepnoteChart(df, '{"mark":"bar","encoding":{}}', attach_selection=True, filters='[]')"#
        );
    }

    #[test]
    fn filters_and_sanitized_name() {
        let b = block(
            BlockKind::Visualization,
            "",
            json!({
                "deepnote_variable_name": "my df",
                "deepnote_visualization_spec": { "mark": "line" },
                "deepnote_chart_filter": { "advancedFilters": [{ "column": "a" }] }
            }),
        );
        let code = python(&b).unwrap();
        assert!(code.starts_with("_dntk.DeepnoteChart(my_df, "));
        assert!(code.ends_with(r#"filters='[{"column":"a"}]')"#));
    }

    #[test]
    fn missing_variable_name() {
        let mut b = block(BlockKind::Visualization, "", json!({ "deepnote_visualization_spec": {} }));
        b.id = "test-viz-id".into();
        let err = python(&b).unwrap_err();
        assert_matches!(
            &err,
            BlockError::Visualization(VisualizationBlockError { field: "deepnote_variable_name", .. })
        );
        assert!(err.to_string().contains("test-viz-id"));
    }

    #[test]
    fn missing_or_falsy_spec() {
        for spec in [json!(null), json!(false), json!(""), json!(0)] {
            let b = block(
                BlockKind::Visualization,
                "",
                json!({ "deepnote_variable_name": "df", "deepnote_visualization_spec": spec }),
            );
            assert_matches!(
                python(&b),
                Err(BlockError::Visualization(VisualizationBlockError { field: "deepnote_visualization_spec", .. }))
            );
        }
    }

    #[test]
    fn name_is_checked_before_spec() {
        let b = block(BlockKind::Visualization, "", json!({}));
        assert_matches!(
            python(&b),
            Err(BlockError::Visualization(VisualizationBlockError { field: "deepnote_variable_name", .. }))
        );
    }
}

//! Per-kind block metadata.
//!
//! Each struct carries the known fields of one block kind plus `extra`, an
//! ordered map holding every other key so documents round-trip without loss.
//! Field names match the document format exactly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{CoreError, CoreResult};
use crate::model::BlockKind;

/// Execution bookkeeping shared by every executable block kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_context_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_millis: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_code_hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_output_hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_executed_function_notebook_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_function_run_started_at: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
}

/// Display configuration of a data table. Absent fields are omitted when
/// serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_formatting_rules: Option<Vec<CellFormattingRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_display_names: Option<Vec<ColumnDisplayName>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_order: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_filters: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<TableFilter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_column_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_index: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<Vec<SortBy>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapped_text_column_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellFormattingRule {
    pub column: String,
    pub rule: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDisplayName {
    pub column_name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFilter {
    pub id: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortBy {
    pub id: String,
    pub desc: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeMetadata {
    #[serde(flatten)]
    pub execution: ExecutionMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_table_state: Option<TableState>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlReturnType {
    Dataframe,
    QueryPreview,
}

impl SqlReturnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dataframe => "dataframe",
            Self::QueryPreview => "query_preview",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SqlMetadata {
    #[serde(flatten)]
    pub execution: ExecutionMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_return_variable_type: Option<SqlReturnType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_table_state: Option<TableState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_variable_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_export_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_compiled_sql_query_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_integration_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Shared by text, textarea and file inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextInputMetadata {
    #[serde(flatten)]
    pub execution: ExecutionMetadata,
    pub deepnote_variable_name: String,
    pub deepnote_variable_value: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckboxMetadata {
    #[serde(flatten)]
    pub execution: ExecutionMetadata,
    pub deepnote_variable_name: String,
    pub deepnote_variable_value: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl Default for StringOrList {
    fn default() -> Self {
        Self::One(String::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectType {
    FromOptions,
    FromVariable,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectMetadata {
    #[serde(flatten)]
    pub execution: ExecutionMetadata,
    pub deepnote_variable_name: String,
    pub deepnote_variable_value: StringOrList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_variable_options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_variable_custom_options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_variable_selected_variable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_variable_select_type: Option<SelectType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_allow_multiple_values: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SliderMetadata {
    #[serde(flatten)]
    pub execution: ExecutionMetadata,
    pub deepnote_variable_name: String,
    pub deepnote_variable_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_slider_min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_slider_max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_slider_step: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateMetadata {
    #[serde(flatten)]
    pub execution: ExecutionMetadata,
    pub deepnote_variable_name: String,
    pub deepnote_variable_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_input_date_version: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRangeMetadata {
    #[serde(flatten)]
    pub execution: ExecutionMetadata,
    pub deepnote_variable_name: String,
    /// A relative token (`past7days`, `customDays30`, ...) or two dates.
    pub deepnote_variable_value: StringOrList,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonBehavior {
    Run,
    SetVariable,
}

impl ButtonBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::SetVariable => "set_variable",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonMetadata {
    #[serde(flatten)]
    pub execution: ExecutionMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_button_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_button_color_scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_button_behavior: Option<ButtonBehavior>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_variable_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_filters: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualizationMetadata {
    #[serde(flatten)]
    pub execution: ExecutionMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_variable_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_visualization_spec: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_chart_filter: Option<ChartFilter>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BigNumberMetadata {
    #[serde(flatten)]
    pub execution: ExecutionMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_big_number_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_big_number_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_big_number_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_big_number_comparison_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_big_number_comparison_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_big_number_comparison_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_big_number_comparison_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_big_number_comparison_format: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutColor {
    Blue,
    Green,
    Yellow,
    Red,
    Purple,
}

/// Shared by every `text-cell-*` kind. `checked` is typed only on todo
/// blocks and `color` only on callouts; on the other text kinds those keys
/// are ordinary unknown keys and stay in `extra` whatever their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextMetadata {
    /// Rich-text ranges, kept as raw values.
    #[serde(rename = "formattedRanges", default, skip_serializing_if = "Option::is_none")]
    pub formatted_ranges: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_collapsed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<CalloutColor>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_img_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_img_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_img_alignment: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkdownMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepnote_cell_height: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Metadata of a block, shaped by its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockMetadata {
    Code(CodeMetadata),
    Sql(SqlMetadata),
    /// `input-text`, `input-textarea` and `input-file`.
    TextInput(TextInputMetadata),
    Checkbox(CheckboxMetadata),
    Select(SelectMetadata),
    Slider(SliderMetadata),
    Date(DateMetadata),
    DateRange(DateRangeMetadata),
    Button(ButtonMetadata),
    Visualization(VisualizationMetadata),
    BigNumber(BigNumberMetadata),
    Text(TextMetadata),
    Image(ImageMetadata),
    Markdown(MarkdownMetadata),
    /// Separators and unknown kinds: an ordered key-value bag.
    Other(Map<String, Value>),
}

fn decode<T: serde::de::DeserializeOwned>(kind: &BlockKind, v: Value) -> CoreResult<T> {
    serde_json::from_value(v)
        .map_err(|e| CoreError::serialization(format!("invalid metadata for {kind} block: {e}")))
}

/// Keys of [`TextMetadata`] that are typed for one text kind only.
fn text_key_owner(key: &str) -> Option<BlockKind> {
    match key {
        "checked" => Some(BlockKind::TextCellTodo),
        "color" => Some(BlockKind::TextCellCallout),
        _ => None,
    }
}

/// Decode text-cell metadata, holding back keys typed for another text kind
/// and returning them through `extra` untouched.
fn decode_text(kind: &BlockKind, value: Value) -> CoreResult<TextMetadata> {
    let Value::Object(mut map) = value else {
        return decode(kind, value);
    };

    let foreign: Vec<String> = map
        .keys()
        .filter(|k| text_key_owner(k).is_some_and(|owner| owner != *kind))
        .cloned()
        .collect();
    let mut held = Map::new();
    for key in foreign {
        if let Some(v) = map.remove(&key) {
            held.insert(key, v);
        }
    }

    let mut meta: TextMetadata = decode(kind, Value::Object(map))?;
    meta.extra.extend(held);
    Ok(meta)
}

impl BlockMetadata {
    /// Decode a metadata object using the shape selected by `kind`.
    pub fn from_value(kind: &BlockKind, value: Value) -> CoreResult<Self> {
        let meta = match kind {
            BlockKind::Code => Self::Code(decode(kind, value)?),
            BlockKind::Sql => Self::Sql(decode(kind, value)?),
            BlockKind::InputText | BlockKind::InputTextarea | BlockKind::InputFile => {
                Self::TextInput(decode(kind, value)?)
            }
            BlockKind::InputCheckbox => Self::Checkbox(decode(kind, value)?),
            BlockKind::InputSelect => Self::Select(decode(kind, value)?),
            BlockKind::InputSlider => Self::Slider(decode(kind, value)?),
            BlockKind::InputDate => Self::Date(decode(kind, value)?),
            BlockKind::InputDateRange => Self::DateRange(decode(kind, value)?),
            BlockKind::Button => Self::Button(decode(kind, value)?),
            BlockKind::Visualization => Self::Visualization(decode(kind, value)?),
            BlockKind::BigNumber => Self::BigNumber(decode(kind, value)?),
            BlockKind::TextCellP
            | BlockKind::TextCellH1
            | BlockKind::TextCellH2
            | BlockKind::TextCellH3
            | BlockKind::TextCellBullet
            | BlockKind::TextCellTodo
            | BlockKind::TextCellCallout => Self::Text(decode_text(kind, value)?),
            BlockKind::Image => Self::Image(decode(kind, value)?),
            BlockKind::Markdown => Self::Markdown(decode(kind, value)?),
            BlockKind::Separator | BlockKind::Other(_) => Self::Other(decode(kind, value)?),
        };
        Ok(meta)
    }

    pub fn to_value(&self) -> CoreResult<Value> {
        let res = match self {
            Self::Code(m) => serde_json::to_value(m),
            Self::Sql(m) => serde_json::to_value(m),
            Self::TextInput(m) => serde_json::to_value(m),
            Self::Checkbox(m) => serde_json::to_value(m),
            Self::Select(m) => serde_json::to_value(m),
            Self::Slider(m) => serde_json::to_value(m),
            Self::Date(m) => serde_json::to_value(m),
            Self::DateRange(m) => serde_json::to_value(m),
            Self::Button(m) => serde_json::to_value(m),
            Self::Visualization(m) => serde_json::to_value(m),
            Self::BigNumber(m) => serde_json::to_value(m),
            Self::Text(m) => serde_json::to_value(m),
            Self::Image(m) => serde_json::to_value(m),
            Self::Markdown(m) => serde_json::to_value(m),
            Self::Other(m) => Ok(Value::Object(m.clone())),
        };
        res.map_err(|e| CoreError::serialization(format!("failed to encode metadata: {e}")))
    }
}

//! Field tables for every object shape in a document.
//!
//! Tables list fields in the order issues are reported.

use crate::model::BlockKind;

/// Expected type of one field.
#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    String,
    Number,
    Bool,
    /// Any value, including null.
    Unknown,
    Enum(&'static [&'static str]),
    Literal(&'static str),
    Array(&'static FieldType),
    Object(&'static [Field]),
    /// Any object, keys unchecked.
    Record,
    /// A string or a list of strings.
    StringOrStrings,
    /// A string or a list of exactly two strings.
    StringOrPair,
    /// At least one alternative must match.
    OneOf(&'static [FieldType]),
}

/// One named field of an object shape.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
}

const fn req(name: &'static str, ty: FieldType) -> Field {
    Field { name, ty, required: true }
}

const fn opt(name: &'static str, ty: FieldType) -> Field {
    Field { name, ty, required: false }
}

const STRINGS: FieldType = FieldType::Array(&FieldType::String);

pub(crate) const FILE_METADATA: &[Field] = &[
    opt("checksum", FieldType::String),
    req("createdAt", FieldType::String),
    opt("exportedAt", FieldType::String),
    opt("modifiedAt", FieldType::String),
];

const INTEGRATION: &[Field] = &[
    req("id", FieldType::String),
    req("name", FieldType::String),
    req("type", FieldType::String),
];

const ENVIRONMENT: &[Field] = &[
    opt("customImage", FieldType::String),
    opt("pythonVersion", FieldType::String),
];

const SETTINGS: &[Field] = &[
    opt("environment", FieldType::Object(ENVIRONMENT)),
    opt("requirements", STRINGS),
    opt("sqlCacheMaxAge", FieldType::Number),
];

/// Project fields checked before `notebooks`.
pub(crate) const PROJECT: &[Field] = &[
    req("id", FieldType::String),
    opt("initNotebookId", FieldType::String),
    opt("integrations", FieldType::Array(&FieldType::Object(INTEGRATION))),
    req("name", FieldType::String),
];

/// Project fields checked after `notebooks`.
pub(crate) const PROJECT_SETTINGS: &[Field] = &[opt("settings", FieldType::Object(SETTINGS))];

/// Notebook fields other than `blocks`.
pub(crate) const NOTEBOOK: &[Field] = &[
    opt("executionMode", FieldType::Enum(&["block", "downstream"])),
    req("id", FieldType::String),
    opt("isModule", FieldType::Bool),
    req("name", FieldType::String),
    opt("workingDirectory", FieldType::String),
];

const OUTPUT: &[Field] = &[
    opt("data", FieldType::Record),
    opt("metadata", FieldType::Record),
    opt("name", FieldType::String),
    opt("output_type", FieldType::String),
    opt("text", FieldType::StringOrStrings),
];

/// Block fields other than `metadata`.
pub(crate) const BLOCK: &[Field] = &[
    opt("blockGroup", FieldType::String),
    opt("content", FieldType::String),
    opt("executionCount", FieldType::Number),
    req("id", FieldType::String),
    opt("outputs", FieldType::Array(&FieldType::Object(OUTPUT))),
    req("sortingKey", FieldType::String),
    req("type", FieldType::String),
    opt("version", FieldType::Number),
];

const CELL_FORMATTING_RULE: &[Field] = &[
    req("column", FieldType::String),
    req("rule", FieldType::String),
];

const COLUMN_DISPLAY_NAME: &[Field] = &[
    req("columnName", FieldType::String),
    req("displayName", FieldType::String),
];

const TABLE_FILTER: &[Field] = &[
    req("id", FieldType::String),
    req("value", FieldType::String),
];

const SORT_BY: &[Field] = &[
    req("id", FieldType::String),
    req("desc", FieldType::Bool),
];

const TABLE_STATE: &[Field] = &[
    opt("cellFormattingRules", FieldType::Array(&FieldType::Object(CELL_FORMATTING_RULE))),
    opt("columnDisplayNames", FieldType::Array(&FieldType::Object(COLUMN_DISPLAY_NAME))),
    opt("columnOrder", STRINGS),
    opt("conditionalFilters", FieldType::Array(&FieldType::Unknown)),
    opt("filters", FieldType::Array(&FieldType::Object(TABLE_FILTER))),
    opt("hiddenColumnIds", STRINGS),
    opt("pageIndex", FieldType::Number),
    opt("pageSize", FieldType::Number),
    opt("sortBy", FieldType::Array(&FieldType::Object(SORT_BY))),
    opt("wrappedTextColumnIds", STRINGS),
];

/// Prepends the execution fields shared by every executable block kind.
macro_rules! executable {
    ($($field:expr),* $(,)?) => {
        &[
            opt("execution_context_id", FieldType::String),
            opt("execution_millis", FieldType::Number),
            opt("execution_start", FieldType::Number),
            opt("is_code_hidden", FieldType::Bool),
            opt("is_output_hidden", FieldType::Bool),
            opt("last_executed_function_notebook_id", FieldType::String),
            opt("last_function_run_started_at", FieldType::Number),
            opt("source_hash", FieldType::String),
            $($field),*
        ]
    };
}

const CODE: &[Field] = executable![opt("deepnote_table_state", FieldType::Object(TABLE_STATE))];

const SQL: &[Field] = executable![
    opt("deepnote_return_variable_type", FieldType::Enum(&["dataframe", "query_preview"])),
    opt("deepnote_table_state", FieldType::Object(TABLE_STATE)),
    opt("deepnote_variable_name", FieldType::String),
    opt("function_export_name", FieldType::String),
    opt("is_compiled_sql_query_visible", FieldType::Bool),
    opt("sql_integration_id", FieldType::String),
];

const INPUT_STRING: &[Field] = executable![
    req("deepnote_variable_name", FieldType::String),
    req("deepnote_variable_value", FieldType::String),
];

const INPUT_CHECKBOX: &[Field] = executable![
    req("deepnote_variable_name", FieldType::String),
    req("deepnote_variable_value", FieldType::Bool),
];

const INPUT_SELECT: &[Field] = executable![
    req("deepnote_variable_name", FieldType::String),
    req("deepnote_variable_value", FieldType::StringOrStrings),
    opt("deepnote_variable_options", STRINGS),
    opt("deepnote_variable_custom_options", STRINGS),
    opt("deepnote_variable_selected_variable", FieldType::String),
    opt("deepnote_variable_select_type", FieldType::Enum(&["from_options", "from_variable"])),
    opt("deepnote_allow_multiple_values", FieldType::Bool),
];

const INPUT_SLIDER: &[Field] = executable![
    req("deepnote_variable_name", FieldType::String),
    req("deepnote_variable_value", FieldType::String),
    opt("deepnote_slider_min_value", FieldType::Number),
    opt("deepnote_slider_max_value", FieldType::Number),
    opt("deepnote_slider_step", FieldType::Number),
];

const INPUT_DATE: &[Field] = executable![
    req("deepnote_variable_name", FieldType::String),
    req("deepnote_variable_value", FieldType::String),
    opt("deepnote_input_date_version", FieldType::Number),
];

const INPUT_DATE_RANGE: &[Field] = executable![
    req("deepnote_variable_name", FieldType::String),
    req("deepnote_variable_value", FieldType::StringOrPair),
];

const BUTTON: &[Field] = executable![
    opt("deepnote_button_title", FieldType::String),
    opt("deepnote_button_color_scheme", FieldType::String),
    opt("deepnote_button_behavior", FieldType::Enum(&["run", "set_variable"])),
    opt("deepnote_variable_name", FieldType::String),
];

const CHART_FILTER: &[Field] = &[opt("advancedFilters", FieldType::Array(&FieldType::Unknown))];

const VISUALIZATION: &[Field] = executable![
    opt("deepnote_variable_name", FieldType::String),
    opt("deepnote_visualization_spec", FieldType::Unknown),
    opt("deepnote_chart_filter", FieldType::Object(CHART_FILTER)),
];

const BIG_NUMBER: &[Field] = executable![
    opt("deepnote_big_number_title", FieldType::String),
    opt("deepnote_big_number_value", FieldType::String),
    opt("deepnote_big_number_format", FieldType::String),
    opt("deepnote_big_number_comparison_enabled", FieldType::Bool),
    opt("deepnote_big_number_comparison_title", FieldType::String),
    opt("deepnote_big_number_comparison_value", FieldType::String),
    opt("deepnote_big_number_comparison_type", FieldType::String),
    opt("deepnote_big_number_comparison_format", FieldType::String),
];

const MARKS: &[Field] = &[
    opt("bold", FieldType::Bool),
    opt("code", FieldType::Bool),
    opt("color", FieldType::String),
    opt("italic", FieldType::Bool),
    opt("strike", FieldType::Bool),
    opt("underline", FieldType::Bool),
];

const MARK_RANGE: &[Field] = &[
    req("fromCodePoint", FieldType::Number),
    req("marks", FieldType::Object(MARKS)),
    req("toCodePoint", FieldType::Number),
    opt("type", FieldType::Literal("marks")),
];

const LINK_RANGE: &[Field] = &[
    req("fromCodePoint", FieldType::Number),
    req("ranges", FieldType::Array(&FieldType::Object(MARK_RANGE))),
    req("toCodePoint", FieldType::Number),
    req("type", FieldType::Literal("link")),
    req("url", FieldType::String),
];

const FORMATTED_RANGE: FieldType =
    FieldType::OneOf(&[FieldType::Object(MARK_RANGE), FieldType::Object(LINK_RANGE)]);

const TEXT: &[Field] = &[
    opt("formattedRanges", FieldType::Array(&FORMATTED_RANGE)),
    opt("is_collapsed", FieldType::Bool),
];

const TODO: &[Field] = &[
    opt("formattedRanges", FieldType::Array(&FORMATTED_RANGE)),
    opt("is_collapsed", FieldType::Bool),
    opt("checked", FieldType::Bool),
];

const CALLOUT: &[Field] = &[
    opt("formattedRanges", FieldType::Array(&FORMATTED_RANGE)),
    opt("is_collapsed", FieldType::Bool),
    opt("color", FieldType::Enum(&["blue", "green", "yellow", "red", "purple"])),
];

const IMAGE: &[Field] = &[
    opt("deepnote_img_src", FieldType::String),
    opt("deepnote_img_width", FieldType::String),
    opt("deepnote_img_alignment", FieldType::String),
];

const MARKDOWN: &[Field] = &[opt("deepnote_cell_height", FieldType::Number)];

/// Metadata shape for a block kind. Unknown kinds have no checked fields.
pub fn metadata_fields(kind: &BlockKind) -> &'static [Field] {
    match kind {
        BlockKind::Code => CODE,
        BlockKind::Sql => SQL,
        BlockKind::InputText | BlockKind::InputTextarea | BlockKind::InputFile => INPUT_STRING,
        BlockKind::InputCheckbox => INPUT_CHECKBOX,
        BlockKind::InputSelect => INPUT_SELECT,
        BlockKind::InputSlider => INPUT_SLIDER,
        BlockKind::InputDate => INPUT_DATE,
        BlockKind::InputDateRange => INPUT_DATE_RANGE,
        BlockKind::Button => BUTTON,
        BlockKind::Visualization => VISUALIZATION,
        BlockKind::BigNumber => BIG_NUMBER,
        BlockKind::TextCellTodo => TODO,
        BlockKind::TextCellCallout => CALLOUT,
        BlockKind::TextCellP
        | BlockKind::TextCellH1
        | BlockKind::TextCellH2
        | BlockKind::TextCellH3
        | BlockKind::TextCellBullet => TEXT,
        BlockKind::Image => IMAGE,
        BlockKind::Markdown => MARKDOWN,
        BlockKind::Separator | BlockKind::Other(_) => &[],
    }
}

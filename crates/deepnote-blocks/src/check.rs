//! Pre-compile input checks.
//!
//! The compilers trust their input: a slider value is pasted verbatim, a date
//! string is handed to `dateutil` at run time. [`check_block`] is where an
//! editor or CLI finds out ahead of time that a block will compile to broken
//! or surprising Python.
//!
//! Errors mean the block should not be run as-is. Warnings flag variable names
//! that collide with Python keywords or built-ins, and values that are legal
//! but likely wrong.

use deepnote_core::model::metadata::{ButtonBehavior, SelectMetadata, SelectType, SliderMetadata, StringOrList};
use deepnote_core::model::{Block, BlockKind, BlockMetadata};
use deepnote_core::sanitize::validate_identifier;
use deepnote_core::validation::{
    validate_defined, validate_non_empty_array, validate_non_empty_string, validate_number_in_range,
    validate_one_of, ValidationResult,
};

use crate::blocks::input::{is_valid_date, is_valid_date_range_order, RelativeRange, MAX_CUSTOM_DAYS};
use crate::blocks::{image, visualization};

const NAME_FIELD: &str = "deepnote_variable_name";
const VALUE_FIELD: &str = "deepnote_variable_value";
const OPTIONS_FIELD: &str = "deepnote_variable_options";
const ALIGNMENT_FIELD: &str = "deepnote_img_alignment";

/// Check one block. Kinds without checkable inputs always succeed.
pub fn check_block(block: &Block) -> ValidationResult {
    let mut results = Vec::new();

    match (&block.kind, &block.metadata) {
        (BlockKind::InputText | BlockKind::InputTextarea | BlockKind::InputFile, Some(BlockMetadata::TextInput(m))) => {
            results.push(required_name(Some(m.deepnote_variable_name.as_str())));
        }
        (BlockKind::InputCheckbox, Some(BlockMetadata::Checkbox(m))) => {
            results.push(required_name(Some(m.deepnote_variable_name.as_str())));
        }
        (BlockKind::InputSelect, Some(BlockMetadata::Select(m))) => {
            results.push(required_name(Some(m.deepnote_variable_name.as_str())));
            results.push(check_select(m));
        }
        (BlockKind::InputSlider, Some(BlockMetadata::Slider(m))) => {
            results.push(required_name(Some(m.deepnote_variable_name.as_str())));
            results.push(check_slider(m));
        }
        (BlockKind::InputDate, Some(BlockMetadata::Date(m))) => {
            results.push(required_name(Some(m.deepnote_variable_name.as_str())));
            results.push(check_date(&m.deepnote_variable_value));
        }
        (BlockKind::InputDateRange, Some(BlockMetadata::DateRange(m))) => {
            results.push(required_name(Some(m.deepnote_variable_name.as_str())));
            results.push(check_date_range(&m.deepnote_variable_value));
        }
        (BlockKind::Sql, Some(BlockMetadata::Sql(m))) => {
            if let Some(name) = m.deepnote_variable_name.as_deref().filter(|n| !n.is_empty()) {
                results.push(name_warnings(name));
            }
        }
        (BlockKind::Button, Some(BlockMetadata::Button(m))) => {
            if m.deepnote_button_behavior == Some(ButtonBehavior::SetVariable) {
                results.push(required_name(m.deepnote_variable_name.as_deref()));
            }
        }
        (BlockKind::Visualization, Some(BlockMetadata::Visualization(m))) => {
            results.push(required_name(m.deepnote_variable_name.as_deref()));
            let spec = m.deepnote_visualization_spec.as_ref().filter(|s| visualization::is_present(s));
            results.push(validate_defined(spec, visualization::SPEC_FIELD).discard());
        }
        (BlockKind::Image, Some(BlockMetadata::Image(m))) => {
            if let Some(align) = m.deepnote_img_alignment.as_deref().filter(|a| !a.is_empty()) {
                results.push(check_alignment(align));
            }
        }
        (BlockKind::Visualization, None) => {
            results.push(required_name(None));
        }
        (BlockKind::InputDateRange, None) => {
            results.push(check_date_range(&StringOrList::default()));
        }
        _ => {}
    }

    ValidationResult::combine(results)
}

/// A non-empty name, plus keyword / built-in warnings for its sanitized form.
fn required_name(name: Option<&str>) -> ValidationResult {
    let present = validate_non_empty_string(name, NAME_FIELD);
    if let Some(n) = present.data.as_deref() {
        return name_warnings(n);
    }
    present.discard()
}

fn name_warnings(name: &str) -> ValidationResult {
    let v = validate_identifier(name);
    ValidationResult::success_with_warnings((), v.warnings)
}

fn check_select(m: &SelectMetadata) -> ValidationResult {
    if m.deepnote_variable_select_type == Some(SelectType::FromVariable) {
        return ValidationResult::ok();
    }
    let selected: Vec<&String> = match &m.deepnote_variable_value {
        StringOrList::One(v) if v.is_empty() => Vec::new(),
        StringOrList::One(v) => vec![v],
        StringOrList::Many(vs) => vs.iter().collect(),
    };
    if selected.is_empty() {
        return ValidationResult::ok();
    }

    let offered: Vec<&String> = m
        .deepnote_variable_options
        .iter()
        .chain(m.deepnote_variable_custom_options.iter())
        .flatten()
        .collect();
    let offered = validate_non_empty_array(Some(offered), OPTIONS_FIELD);
    let Some(known) = offered.data else {
        return ValidationResult::success_with_warnings((), offered.errors);
    };

    let warnings = selected
        .into_iter()
        .filter(|v| !known.contains(v))
        .map(|v| format!("{VALUE_FIELD} \"{v}\" is not one of the configured options"))
        .collect();
    ValidationResult::success_with_warnings((), warnings)
}

/// The image compiler drops alignments it does not know.
fn check_alignment(align: &str) -> ValidationResult {
    let r = validate_one_of(&align.to_ascii_lowercase(), image::ALIGNMENTS, ALIGNMENT_FIELD);
    ValidationResult::success_with_warnings((), r.errors)
}

fn check_slider(m: &SliderMetadata) -> ValidationResult {
    let raw = m.deepnote_variable_value.trim();
    let Ok(value) = raw.parse::<f64>() else {
        return ValidationResult::success_with_warnings(
            (),
            vec![format!("{VALUE_FIELD} \"{raw}\" is not a number")],
        );
    };

    match (m.deepnote_slider_min_value, m.deepnote_slider_max_value) {
        (Some(min), Some(max)) => {
            let range = validate_number_in_range(value, min, max, VALUE_FIELD);
            ValidationResult::success_with_warnings((), range.errors)
        }
        _ => ValidationResult::ok(),
    }
}

fn check_date(value: &str) -> ValidationResult {
    if is_valid_date(value) {
        ValidationResult::ok()
    } else {
        ValidationResult::failure(vec![format!(
            "{VALUE_FIELD} must be a date in YYYY-MM-DD format, got \"{value}\""
        )])
    }
}

fn check_date_range(value: &StringOrList) -> ValidationResult {
    let mut errors = Vec::new();
    match value {
        StringOrList::Many(values) if values.len() == 2 => {
            for v in values {
                if !is_valid_date(v) {
                    errors.push(format!("{VALUE_FIELD} must contain dates in YYYY-MM-DD format, got \"{v}\""));
                }
            }
            if errors.is_empty() && !is_valid_date_range_order(&values[0], &values[1]) {
                errors.push(format!(
                    "{VALUE_FIELD} start date {} is after end date {}",
                    values[0], values[1]
                ));
            }
        }
        StringOrList::Many(values) => {
            errors.push(format!(
                "{VALUE_FIELD} must contain exactly 2 dates, got {}",
                values.len()
            ));
        }
        StringOrList::One(token) => {
            if RelativeRange::parse(token).is_none() {
                errors.push(format!(
                    "{VALUE_FIELD} must be two dates, \"past7days\" or \"customDaysN\" with N between 1 and {MAX_CUSTOM_DAYS}, got \"{token}\""
                ));
            }
        }
    }

    if errors.is_empty() {
        ValidationResult::ok()
    } else {
        ValidationResult::failure(errors)
    }
}

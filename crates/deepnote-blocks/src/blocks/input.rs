//! Input blocks: each binds one Python variable to the value the user picked.
//!
//! Kinds handled here:
//! - `input-text`, `input-textarea`, `input-file`: string literal
//! - `input-checkbox`: `True` / `False`
//! - `input-select`: literal, list of literals, or `None`
//! - `input-slider`: the raw value, unvalidated
//! - `input-date`: parsed date via `dateutil`
//! - `input-date-range`: two dates, or a relative range computed at run time
//!
//! The date helpers below are shared with `crate::check`.

use once_cell::sync::Lazy;
use regex::Regex;
use time::macros::format_description;
use time::Date;

use deepnote_core::model::metadata::StringOrList;
use deepnote_core::model::Block;
use deepnote_core::sanitize::escape_string_literal;

use super::variable_name;
use crate::errors::{BlockResult, InputBlockError};
use crate::snippets::python_bool;

/// Upper bound for `customDaysN` ranges (about ten years).
pub const MAX_CUSTOM_DAYS: u32 = 3650;

/// Relative range covering the last seven days.
pub const PAST_7_DAYS: &str = "past7days";

static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static CUSTOM_DAYS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^customDays(\d+)$").unwrap());

const VALUE_FIELD: &str = "deepnote_variable_value";

pub fn text(block: &Block) -> BlockResult<String> {
    let meta = metadata_of!(block, TextInput);
    Ok(format!(
        "{} = {}",
        variable_name(&meta.deepnote_variable_name),
        escape_string_literal(&meta.deepnote_variable_value)
    ))
}

pub fn file(block: &Block) -> BlockResult<String> {
    let meta = metadata_of!(block, TextInput);
    let name = variable_name(&meta.deepnote_variable_name);
    if meta.deepnote_variable_value.is_empty() {
        return Ok(format!("{name} = None"));
    }
    Ok(format!("{name} = {}", escape_string_literal(&meta.deepnote_variable_value)))
}

pub fn checkbox(block: &Block) -> BlockResult<String> {
    let meta = metadata_of!(block, Checkbox);
    Ok(format!(
        "{} = {}",
        variable_name(&meta.deepnote_variable_name),
        python_bool(meta.deepnote_variable_value)
    ))
}

pub fn select(block: &Block) -> BlockResult<String> {
    let meta = metadata_of!(block, Select);
    let name = variable_name(&meta.deepnote_variable_name);

    if meta.deepnote_allow_multiple_values.unwrap_or(false) {
        let items: Vec<String> = match &meta.deepnote_variable_value {
            StringOrList::Many(values) => values.iter().map(|v| escape_string_literal(v)).collect(),
            StringOrList::One(v) if v.is_empty() => Vec::new(),
            StringOrList::One(v) => vec![escape_string_literal(v)],
        };
        return Ok(format!("{name} = [{}]", items.join(", ")));
    }

    let value = match &meta.deepnote_variable_value {
        StringOrList::One(v) => v.as_str(),
        StringOrList::Many(values) => values.first().map(String::as_str).unwrap_or(""),
    };
    if value.is_empty() {
        Ok(format!("{name} = None"))
    } else {
        Ok(format!("{name} = {}", escape_string_literal(value)))
    }
}

pub fn slider(block: &Block) -> BlockResult<String> {
    let meta = metadata_of!(block, Slider);
    Ok(format!(
        "{} = {}",
        variable_name(&meta.deepnote_variable_name),
        meta.deepnote_variable_value
    ))
}

pub fn date(block: &Block) -> BlockResult<String> {
    let meta = metadata_of!(block, Date);
    let name = variable_name(&meta.deepnote_variable_name);
    let value = meta.deepnote_variable_value.as_str();

    if value.is_empty() {
        return Ok(format!("\n{name} = None\n"));
    }

    let literal = escape_string_literal(value);
    if meta.deepnote_input_date_version == Some(2.0) {
        Ok(format!(
            "\nfrom dateutil.parser import parse as _deepnote_parse\n{name} = _deepnote_parse({literal}).date()\n"
        ))
    } else {
        Ok(format!(
            "\nimport dateutil.parser as _deepnote_dateutil_parser\n{name} = _deepnote_dateutil_parser.parse({literal}).date()\n"
        ))
    }
}

pub fn date_range(block: &Block) -> BlockResult<String> {
    let meta = metadata_of!(block, DateRange);
    let name = variable_name(&meta.deepnote_variable_name);

    match &meta.deepnote_variable_value {
        StringOrList::Many(values) if values.len() == 2 => {
            let parsed: Vec<String> = values
                .iter()
                .map(|v| {
                    if v.is_empty() {
                        "None".to_string()
                    } else {
                        format!("_deepnote_parse({}).date()", escape_string_literal(v))
                    }
                })
                .collect();
            Ok(format!(
                "from dateutil.parser import parse as _deepnote_parse\n{name} = [{}]",
                parsed.join(", ")
            ))
        }
        StringOrList::One(token) => match RelativeRange::parse(token) {
            Some(RelativeRange::Past7Days) => Ok(format!(
                "from datetime import datetime as _deepnote_datetime, timedelta as _deepnote_timedelta\n\
                 {name} = [_deepnote_datetime.now().date() - _deepnote_timedelta(days=7), _deepnote_datetime.now().date()]"
            )),
            Some(RelativeRange::CustomDays(days)) => Ok(format!(
                "from datetime import datetime, timedelta\n\
                 {name} = [datetime.now().date() - timedelta(days={days}), datetime.now().date()]"
            )),
            None => Err(invalid_range(block, token, relative_reason(token)).into()),
        },
        StringOrList::Many(values) => Err(invalid_range(
            block,
            &format!("{values:?}"),
            format!("expected exactly 2 dates, got {}", values.len()),
        )
        .into()),
    }
}

fn invalid_range(block: &Block, value: &str, reason: String) -> InputBlockError {
    InputBlockError {
        block_id: block.id.to_string(),
        field: VALUE_FIELD,
        value: value.to_string(),
        reason,
    }
}

fn relative_reason(token: &str) -> String {
    match CUSTOM_DAYS_RE.captures(token) {
        Some(_) => format!("custom range must be between 1 and {MAX_CUSTOM_DAYS} days"),
        None => "expected two dates, \"past7days\" or \"customDaysN\"".to_string(),
    }
}

/// A date range resolved relative to the execution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeRange {
    Past7Days,
    CustomDays(u32),
}

impl RelativeRange {
    /// Recognize `past7days` or `customDaysN` with `1 <= N <= MAX_CUSTOM_DAYS`.
    pub fn parse(token: &str) -> Option<Self> {
        if token == PAST_7_DAYS {
            return Some(Self::Past7Days);
        }
        let caps = CUSTOM_DAYS_RE.captures(token)?;
        let days: u32 = caps[1].parse().ok()?;
        (1..=MAX_CUSTOM_DAYS).contains(&days).then_some(Self::CustomDays(days))
    }
}

fn parse_date(value: &str) -> Option<Date> {
    if !ISO_DATE_RE.is_match(value) {
        return None;
    }
    Date::parse(value, format_description!("[year]-[month]-[day]")).ok()
}

/// Empty, or a real calendar date written `YYYY-MM-DD`.
pub fn is_valid_date(value: &str) -> bool {
    value.is_empty() || parse_date(value).is_some()
}

/// `start <= end`. An empty side (or an unparsable one) never fails the order check.
pub fn is_valid_date_range_order(start: &str, end: &str) -> bool {
    match (parse_date(start), parse_date(end)) {
        (Some(s), Some(e)) => s <= e,
        _ => true,
    }
}

/// Exactly two values, each a valid date, in order.
pub fn is_valid_absolute_date_range(values: &[String]) -> bool {
    match values {
        [start, end] => is_valid_date(start) && is_valid_date(end) && is_valid_date_range_order(start, end),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::testing::block;
    use crate::errors::BlockError;
    use assert_matches::assert_matches;
    use deepnote_core::model::BlockKind;
    use serde_json::json;

    fn var(name: &str, value: serde_json::Value) -> serde_json::Value {
        json!({ "deepnote_variable_name": name, "deepnote_variable_value": value })
    }

    #[test]
    fn text_values_are_escaped() {
        let b = block(BlockKind::InputText, "", var("my_input", json!("It's a \"test\"")));
        assert_eq!(text(&b).unwrap(), r#"my_input = 'It\'s a "test"'"#);

        let b = block(BlockKind::InputTextarea, "", var("my_text", json!("Multi\nline\ntext")));
        assert_eq!(text(&b).unwrap(), r"my_text = 'Multi\nline\ntext'");
    }

    #[test]
    fn checkbox_is_a_python_bool() {
        let b = block(BlockKind::InputCheckbox, "", var("my_checkbox", json!(true)));
        assert_eq!(checkbox(&b).unwrap(), "my_checkbox = True");
        let b = block(BlockKind::InputCheckbox, "", var("my_checkbox", json!(false)));
        assert_eq!(checkbox(&b).unwrap(), "my_checkbox = False");
    }

    #[test]
    fn select_single_multi_and_empty() {
        let b = block(BlockKind::InputSelect, "", var("my_select", json!("Option 1")));
        assert_eq!(select(&b).unwrap(), "my_select = 'Option 1'");

        let mut meta = var("my_select", json!(["Option 1", "Option 2"]));
        meta["deepnote_allow_multiple_values"] = json!(true);
        let b = block(BlockKind::InputSelect, "", meta);
        assert_eq!(select(&b).unwrap(), "my_select = ['Option 1', 'Option 2']");

        let b = block(BlockKind::InputSelect, "", var("my_select", json!("")));
        assert_eq!(select(&b).unwrap(), "my_select = None");
    }

    #[test]
    fn slider_passes_value_through() {
        let b = block(BlockKind::InputSlider, "", var("my_slider", json!("42")));
        assert_eq!(slider(&b).unwrap(), "my_slider = 42");
    }

    #[test]
    fn file_path_or_none() {
        let b = block(BlockKind::InputFile, "", var("my_file", json!("/path/to/file.csv")));
        assert_eq!(file(&b).unwrap(), "my_file = '/path/to/file.csv'");
        let b = block(BlockKind::InputFile, "", var("my_file", json!("")));
        assert_eq!(file(&b).unwrap(), "my_file = None");
    }

    #[test]
    fn date_versions() {
        let mut meta = var("my_date", json!("2024-01-15"));
        meta["deepnote_input_date_version"] = json!(2);
        let b = block(BlockKind::InputDate, "", meta);
        assert_eq!(
            date(&b).unwrap(),
            "\nfrom dateutil.parser import parse as _deepnote_parse\nmy_date = _deepnote_parse('2024-01-15').date()\n"
        );

        let b = block(BlockKind::InputDate, "", var("my_date", json!("2024-01-15")));
        assert_eq!(
            date(&b).unwrap(),
            "\nimport dateutil.parser as _deepnote_dateutil_parser\nmy_date = _deepnote_dateutil_parser.parse('2024-01-15').date()\n"
        );

        let b = block(BlockKind::InputDate, "", var("my_date", json!("")));
        assert_eq!(date(&b).unwrap(), "\nmy_date = None\n");
    }

    #[test]
    fn absolute_date_range() {
        let b = block(BlockKind::InputDateRange, "", var("my_range", json!(["2024-01-01", "2024-12-31"])));
        assert_eq!(
            date_range(&b).unwrap(),
            "from dateutil.parser import parse as _deepnote_parse\nmy_range = [_deepnote_parse('2024-01-01').date(), _deepnote_parse('2024-12-31').date()]"
        );

        let b = block(BlockKind::InputDateRange, "", var("my_range", json!(["", "2024-12-31"])));
        assert!(date_range(&b).unwrap().ends_with("my_range = [None, _deepnote_parse('2024-12-31').date()]"));
    }

    #[test]
    fn relative_date_ranges() {
        let b = block(BlockKind::InputDateRange, "", var("my_range", json!("past7days")));
        assert_eq!(
            date_range(&b).unwrap(),
            "from datetime import datetime as _deepnote_datetime, timedelta as _deepnote_timedelta\nmy_range = [_deepnote_datetime.now().date() - _deepnote_timedelta(days=7), _deepnote_datetime.now().date()]"
        );

        let b = block(BlockKind::InputDateRange, "", var("my_range", json!("customDays30")));
        assert_eq!(
            date_range(&b).unwrap(),
            "from datetime import datetime, timedelta\nmy_range = [datetime.now().date() - timedelta(days=30), datetime.now().date()]"
        );
    }

    #[test]
    fn unknown_range_shapes_are_rejected() {
        for value in [json!("pastYear"), json!("customDays0"), json!("customDays99999"), json!(["2024-01-01"])] {
            let b = block(BlockKind::InputDateRange, "", var("my_range", value));
            assert_matches!(
                date_range(&b),
                Err(BlockError::Input(InputBlockError { field: "deepnote_variable_value", ref block_id, .. })) if block_id == "123"
            );
        }
    }

    #[test]
    fn variable_names_are_sanitized() {
        let b = block(BlockKind::InputText, "", var("my input-name", json!("x")));
        assert_eq!(text(&b).unwrap(), "my_inputname = 'x'");
    }

    #[test]
    fn date_validation() {
        for ok in ["2024-01-15", "2024-12-31", "2020-02-29", ""] {
            assert!(is_valid_date(ok), "{ok}");
        }
        for bad in ["01-15-2024", "2024/01/15", "Jan 15, 2024", "2024-02-30", "2024-13-01", "2024-00-15", "2023-02-29", "+2024-01-15"] {
            assert!(!is_valid_date(bad), "{bad}");
        }
    }

    #[test]
    fn date_range_order() {
        assert!(is_valid_date_range_order("2024-01-01", "2024-12-31"));
        assert!(is_valid_date_range_order("2024-06-15", "2024-06-15"));
        assert!(!is_valid_date_range_order("2024-12-31", "2024-01-01"));
        assert!(is_valid_date_range_order("", "2024-12-31"));
        assert!(is_valid_date_range_order("", ""));
    }

    #[test]
    fn absolute_date_range_validation() {
        let s = |v: &[&str]| v.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        assert!(is_valid_absolute_date_range(&s(&["2024-01-01", "2024-12-31"])));
        assert!(is_valid_absolute_date_range(&s(&["", ""])));
        assert!(!is_valid_absolute_date_range(&s(&["2024-01-01"])));
        assert!(!is_valid_absolute_date_range(&s(&["2024-01-01", "2024-06-15", "2024-12-31"])));
        assert!(!is_valid_absolute_date_range(&s(&["2024-02-30", "2024-12-31"])));
        assert!(!is_valid_absolute_date_range(&s(&["2024-12-31", "2024-01-01"])));
    }

    #[test]
    fn relative_range_parse() {
        assert_eq!(RelativeRange::parse("past7days"), Some(RelativeRange::Past7Days));
        assert_eq!(RelativeRange::parse("customDays3650"), Some(RelativeRange::CustomDays(3650)));
        assert_eq!(RelativeRange::parse("customDays3651"), None);
        assert_eq!(RelativeRange::parse("customDays-1"), None);
    }
}

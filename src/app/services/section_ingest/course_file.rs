//! Course-file parsing
//!
//! Each course file is a JSON object whose `result` array holds one element
//! per section run. Required fields may arrive as JSON numbers or numeric
//! strings; both forms occur in real archives. A missing or null required
//! field fails the element, and with it the whole ingest.

use crate::app::models::Section;
use crate::constants::{OVERALL_SECTION_MARKER, OVERALL_SECTION_YEAR};
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Parse one course file into its Section rows
///
/// A file with an empty `result` array contributes zero rows; the caller
/// enforces the at-least-one-row rule across the whole archive.
pub fn parse_course_file(name: &str, bytes: &[u8]) -> Result<Vec<Section>> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|e| Error::invalid_content(format!("course file '{name}' is not valid JSON: {e}")))?;

    let result = document
        .get("result")
        .ok_or_else(|| Error::invalid_content(format!("course file '{name}' has no 'result' key")))?
        .as_array()
        .ok_or_else(|| {
            Error::invalid_content(format!("course file '{name}': 'result' must be an array"))
        })?;

    result
        .iter()
        .map(|element| parse_section(name, element))
        .collect()
}

/// Build a Section from one `result` element
fn parse_section(name: &str, element: &Value) -> Result<Section> {
    let record = element.as_object().ok_or_else(|| {
        Error::invalid_content(format!("course file '{name}': result element is not an object"))
    })?;

    // Aggregate rows carry the substituted year; all others use the
    // archive-declared year.
    let year = if section_marker(record) == Some(OVERALL_SECTION_MARKER) {
        OVERALL_SECTION_YEAR
    } else {
        integer_field(name, record, "Year")?
    };

    Ok(Section {
        uuid: string_field(name, record, "id")?,
        id: string_field(name, record, "Course")?,
        title: string_field(name, record, "Title")?,
        instructor: string_field(name, record, "Professor")?,
        dept: string_field(name, record, "Subject")?,
        year,
        avg: numeric_field(name, record, "Avg")?,
        pass: integer_field(name, record, "Pass")?,
        fail: integer_field(name, record, "Fail")?,
        audit: integer_field(name, record, "Audit")?,
    })
}

fn section_marker(record: &Map<String, Value>) -> Option<&str> {
    record.get("Section").and_then(Value::as_str)
}

/// A required field must be present and non-null
fn required<'a>(name: &str, record: &'a Map<String, Value>, key: &str) -> Result<&'a Value> {
    match record.get(key) {
        Some(Value::Null) | None => Err(Error::invalid_content(format!(
            "course file '{name}': required field '{key}' is missing"
        ))),
        Some(value) => Ok(value),
    }
}

/// Read a required string field; numbers are rendered to their string form
/// (section ids arrive as numbers)
fn string_field(name: &str, record: &Map<String, Value>, key: &str) -> Result<String> {
    match required(name, record, key)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(Error::invalid_content(format!(
            "course file '{name}': field '{key}' has unexpected type ({other})"
        ))),
    }
}

/// Read a required numeric field from a JSON number or a numeric string
fn numeric_field(name: &str, record: &Map<String, Value>, key: &str) -> Result<f64> {
    let value = required(name, record, key)?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| {
        Error::invalid_content(format!(
            "course file '{name}': field '{key}' is not numeric ({value})"
        ))
    })
}

/// Read a required integer field, truncating fractional archive values
fn integer_field(name: &str, record: &Map<String, Value>, key: &str) -> Result<i64> {
    numeric_field(name, record, key).map(|v| v as i64)
}

//! Tests for JSON course-file parsing

use super::*;
use crate::Error;
use crate::app::services::section_ingest::course_file::parse_course_file;

fn parse(json: &str) -> crate::Result<Vec<crate::Section>> {
    parse_course_file("TEST", json.as_bytes())
}

#[test]
fn test_sample_file_parses() {
    let sections = parse(&sample_course_json()).unwrap();

    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0].id, "310");
    assert_eq!(sections[0].instructor, "smith, jo");
    assert_eq!(sections[0].avg, 78.25);
    assert_eq!(sections[0].pass, 120);
}

#[test]
fn test_numeric_uuid_rendered_as_string() {
    let sections = parse(&sample_course_json()).unwrap();
    assert_eq!(sections[0].uuid, "32016");
}

#[test]
fn test_year_accepts_number_and_numeric_string() {
    let sections = parse(&sample_course_json()).unwrap();
    assert_eq!(sections[0].year, 2015); // "2015"
    assert_eq!(sections[1].year, 2016); // 2016
}

#[test]
fn test_overall_marker_is_case_sensitive() {
    let json = serde_json::json!({
        "result": [{
            "id": 1, "Course": "310", "Title": "t", "Professor": "p",
            "Subject": "cpsc", "Avg": 70.0, "Pass": 10, "Fail": 1,
            "Audit": 0, "Year": 2012, "Section": "Overall"
        }]
    })
    .to_string();

    let sections = parse(&json).unwrap();
    assert_eq!(sections[0].year, 2012);
}

#[test]
fn test_missing_result_key_is_rejected() {
    match parse(r#"{"rank": []}"#) {
        Err(Error::InvalidContent { .. }) => {}
        other => panic!("expected InvalidContent, got {other:?}"),
    }
}

#[test]
fn test_non_array_result_is_rejected() {
    match parse(r#"{"result": "oops"}"#) {
        Err(Error::InvalidContent { .. }) => {}
        other => panic!("expected InvalidContent, got {other:?}"),
    }
}

#[test]
fn test_missing_required_field_is_rejected() {
    // No Professor key at all.
    let json = serde_json::json!({
        "result": [{
            "id": 1, "Course": "310", "Title": "t",
            "Subject": "cpsc", "Avg": 70.0, "Pass": 10, "Fail": 1,
            "Audit": 0, "Year": 2012
        }]
    })
    .to_string();

    match parse(&json) {
        Err(Error::InvalidContent { .. }) => {}
        other => panic!("expected InvalidContent, got {other:?}"),
    }
}

#[test]
fn test_null_required_field_is_rejected() {
    let json = serde_json::json!({
        "result": [{
            "id": 1, "Course": "310", "Title": null, "Professor": "p",
            "Subject": "cpsc", "Avg": 70.0, "Pass": 10, "Fail": 1,
            "Audit": 0, "Year": 2012
        }]
    })
    .to_string();

    match parse(&json) {
        Err(Error::InvalidContent { .. }) => {}
        other => panic!("expected InvalidContent, got {other:?}"),
    }
}

#[test]
fn test_non_numeric_avg_is_rejected() {
    let json = serde_json::json!({
        "result": [{
            "id": 1, "Course": "310", "Title": "t", "Professor": "p",
            "Subject": "cpsc", "Avg": "high", "Pass": 10, "Fail": 1,
            "Audit": 0, "Year": 2012
        }]
    })
    .to_string();

    match parse(&json) {
        Err(Error::InvalidContent { .. }) => {}
        other => panic!("expected InvalidContent, got {other:?}"),
    }
}

#[test]
fn test_empty_result_gives_zero_rows() {
    assert!(parse(r#"{"result": []}"#).unwrap().is_empty());
}

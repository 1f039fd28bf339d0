//! Tests for projection, ordering and the result cap

use super::*;
use crate::Error;
use serde_json::json;

#[test]
fn test_projection_keeps_only_requested_columns() {
    let dataset = sample_sections();
    let rows = run(
        &dataset,
        json!({
            "WHERE": {"IS": {"sections_uuid": "1"}},
            "OPTIONS": {"COLUMNS": ["sections_dept", "sections_avg"]}
        }),
    )
    .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), 2);
    assert_eq!(rows[0]["sections_dept"], json!("cpsc"));
    assert_eq!(rows[0]["sections_avg"], json!(72.5));
}

#[test]
fn test_integer_fields_project_as_integers() {
    let dataset = sample_sections();
    let rows = run(
        &dataset,
        json!({
            "WHERE": {"IS": {"sections_uuid": "1"}},
            "OPTIONS": {"COLUMNS": ["sections_year", "sections_pass", "sections_avg"]}
        }),
    )
    .unwrap();

    assert!(rows[0]["sections_year"].is_i64());
    assert!(rows[0]["sections_pass"].is_i64());
    assert!(rows[0]["sections_avg"].is_f64());
}

#[test]
fn test_single_key_order_is_ascending() {
    let dataset = sample_sections();
    let rows = run(
        &dataset,
        json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["sections_avg"], "ORDER": "sections_avg"}
        }),
    )
    .unwrap();

    let avgs: Vec<f64> = rows.iter().map(|r| r["sections_avg"].as_f64().unwrap()).collect();
    assert_eq!(avgs, vec![68.25, 72.5, 75.5, 85.0, 90.0, 97.19]);
}

#[test]
fn test_down_order_descends() {
    let dataset = sample_sections();
    let rows = run(
        &dataset,
        json!({
            "WHERE": {},
            "OPTIONS": {
                "COLUMNS": ["sections_avg"],
                "ORDER": {"dir": "DOWN", "keys": ["sections_avg"]}
            }
        }),
    )
    .unwrap();

    let avgs: Vec<f64> = rows.iter().map(|r| r["sections_avg"].as_f64().unwrap()).collect();
    assert_eq!(avgs, vec![97.19, 90.0, 85.0, 75.5, 72.5, 68.25]);
}

#[test]
fn test_multi_key_order_breaks_ties_with_later_keys() {
    let dataset = sample_sections();
    let rows = run(
        &dataset,
        json!({
            "WHERE": {},
            "OPTIONS": {
                "COLUMNS": ["sections_year", "sections_avg", "sections_uuid"],
                "ORDER": {"dir": "UP", "keys": ["sections_year", "sections_avg"]}
            }
        }),
    )
    .unwrap();

    let pairs: Vec<(i64, f64)> = rows
        .iter()
        .map(|r| (r["sections_year"].as_i64().unwrap(), r["sections_avg"].as_f64().unwrap()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (2014, 68.25),
            (2014, 72.5),
            (2015, 75.5),
            (2015, 85.0),
            (2015, 90.0),
            (2016, 97.19),
        ]
    );
}

#[test]
fn test_string_keys_sort_lexicographically() {
    let dataset = sample_rooms();
    let rows = run(
        &dataset,
        json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["rooms_name"], "ORDER": "rooms_name"}
        }),
    )
    .unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r["rooms_name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["ACU_120", "DMP_101", "DMP_310"]);
}

#[test]
fn test_stable_sort_preserves_input_order_on_ties() {
    let dataset = Dataset::sections(
        "sections",
        vec![
            section("a", "cpsc", "310", 2014, 70.0, 10),
            section("b", "cpsc", "310", 2014, 70.0, 10),
            section("c", "cpsc", "310", 2014, 70.0, 10),
        ],
    );

    for dir in ["UP", "DOWN"] {
        let rows = run(
            &dataset,
            json!({
                "WHERE": {},
                "OPTIONS": {
                    "COLUMNS": ["sections_avg", "sections_uuid"],
                    "ORDER": {"dir": dir, "keys": ["sections_avg"]}
                }
            }),
        )
        .unwrap();

        let uuids: Vec<&str> = rows.iter().map(|r| r["sections_uuid"].as_str().unwrap()).collect();
        assert_eq!(uuids, vec!["a", "b", "c"], "direction {dir}");
    }
}

#[test]
fn test_order_by_apply_key() {
    let dataset = sample_sections();
    let rows = run(
        &dataset,
        json!({
            "WHERE": {},
            "OPTIONS": {
                "COLUMNS": ["sections_dept", "maxAvg"],
                "ORDER": {"dir": "DOWN", "keys": ["maxAvg"]}
            },
            "TRANSFORMATIONS": {
                "GROUP": ["sections_dept"],
                "APPLY": [{"maxAvg": {"MAX": "sections_avg"}}]
            }
        }),
    )
    .unwrap();

    assert_eq!(rows[0]["sections_dept"], json!("math"));
    assert_eq!(rows[1]["sections_dept"], json!("cpsc"));
}

#[test]
fn test_result_cap_enforced() {
    let rows: Vec<_> = (0..5001)
        .map(|i| section(&i.to_string(), "cpsc", "310", 2014, 70.0, 10))
        .collect();
    let dataset = Dataset::sections("sections", rows);

    match run(
        &dataset,
        json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["sections_uuid"]}
        }),
    ) {
        Err(Error::ResultTooLarge { rows, limit }) => {
            assert_eq!(rows, 5001);
            assert_eq!(limit, 5000);
        }
        other => panic!("expected ResultTooLarge, got {other:?}"),
    }
}

#[test]
fn test_result_cap_applies_to_groups_not_input_rows() {
    // 5001 input rows collapsing into one group must succeed.
    let rows: Vec<_> = (0..5001)
        .map(|i| section(&i.to_string(), "cpsc", "310", 2014, 70.0, 10))
        .collect();
    let dataset = Dataset::sections("sections", rows);

    let result = run(
        &dataset,
        json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["sections_dept", "count"]},
            "TRANSFORMATIONS": {
                "GROUP": ["sections_dept"],
                "APPLY": [{"count": {"COUNT": "sections_uuid"}}]
            }
        }),
    )
    .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0]["count"], json!(5001));
}

#[test]
fn test_exactly_5000_rows_is_allowed() {
    let rows: Vec<_> = (0..5000)
        .map(|i| section(&i.to_string(), "cpsc", "310", 2014, 70.0, 10))
        .collect();
    let dataset = Dataset::sections("sections", rows);

    let result = run(
        &dataset,
        json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["sections_uuid"]}
        }),
    )
    .unwrap();

    assert_eq!(result.len(), 5000);
}

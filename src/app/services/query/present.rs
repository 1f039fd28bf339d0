//! Projection, ordering and the result-size bound
//!
//! The row cap is enforced on the post-filter (or post-transform) count
//! before any projection or sorting work is spent. Sorting is a stable
//! `sort_by`; DOWN reverses the comparator rather than the row order, so
//! rows equal on every key keep their relative input order either way.

use super::ResultRow;
use super::ast::{ColumnRef, Order, Query, SortDirection};
use crate::app::models::QueryRow;
use crate::constants::MAX_RESULT_ROWS;
use crate::{Error, Result};
use std::cmp::Ordering;

/// Fail with `ResultTooLarge` when the row count exceeds the cap
pub fn enforce_cap(rows: usize) -> Result<()> {
    if rows > MAX_RESULT_ROWS {
        return Err(Error::result_too_large(rows));
    }
    Ok(())
}

/// Project raw rows to the COLUMNS list
pub fn project_rows<R: QueryRow>(rows: &[&R], query: &Query) -> Vec<ResultRow> {
    rows.iter()
        .map(|row| {
            let mut record = ResultRow::new();
            for column in &query.columns {
                if let ColumnRef::Dataset { key, field } = column {
                    let value = row
                        .field(field)
                        .map(|v| v.to_json())
                        .unwrap_or(serde_json::Value::Null);
                    record.insert(key.clone(), value);
                }
            }
            record
        })
        .collect()
}

/// Restrict synthetic transform rows to the COLUMNS list
pub fn select_columns(records: Vec<ResultRow>, columns: &[ColumnRef]) -> Vec<ResultRow> {
    records
        .into_iter()
        .map(|record| {
            let mut selected = ResultRow::new();
            for column in columns {
                let key = column.output_key();
                let value = record.get(key).cloned().unwrap_or(serde_json::Value::Null);
                selected.insert(key.to_string(), value);
            }
            selected
        })
        .collect()
}

/// Stable multi-key sort of the projected records
pub fn sort_records(records: &mut [ResultRow], order: &Order) {
    let (keys, direction): (Vec<&str>, SortDirection) = match order {
        Order::Single(key) => (vec![key.as_str()], SortDirection::Up),
        Order::Keys { direction, keys } => {
            (keys.iter().map(String::as_str).collect(), *direction)
        }
    };

    records.sort_by(|a, b| {
        for key in &keys {
            let ordering = compare_values(a.get(*key), b.get(*key));
            let ordering = match direction {
                SortDirection::Up => ordering,
                SortDirection::Down => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Compare two projected values: numbers numerically, strings
/// lexicographically
fn compare_values(a: Option<&serde_json::Value>, b: Option<&serde_json::Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => match (a.as_str(), b.as_str()) {
                (Some(x), Some(y)) => x.cmp(y),
                _ => Ordering::Equal,
            },
        },
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

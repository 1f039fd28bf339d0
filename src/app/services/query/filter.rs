//! WHERE-tree evaluation
//!
//! Evaluation is total: every legally-typed row answers `true` or `false`.
//! Field/kind mismatches are rejected before evaluation starts, so the
//! defensive `false` arms are never reached on validated queries.

use super::ast::Filter;
use crate::app::models::QueryRow;

/// Test a row against a compiled WHERE tree
pub fn matches<R: QueryRow>(filter: &Filter, row: &R) -> bool {
    match filter {
        Filter::All => true,
        Filter::And(members) => members.iter().all(|member| matches(member, row)),
        Filter::Or(members) => members.iter().any(|member| matches(member, row)),
        Filter::Not(inner) => !matches(inner, row),
        Filter::Gt { field, value } => numeric(row, field).is_some_and(|v| v > *value),
        Filter::Lt { field, value } => numeric(row, field).is_some_and(|v| v < *value),
        Filter::Eq { field, value } => numeric(row, field).is_some_and(|v| v == *value),
        Filter::Is { field, pattern } => row
            .field(field)
            .and_then(|v| v.as_str().map(|s| pattern.matches(s)))
            .unwrap_or(false),
    }
}

fn numeric<R: QueryRow>(row: &R, field: &str) -> Option<f64> {
    row.field(field).and_then(|v| v.as_f64())
}

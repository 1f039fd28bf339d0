//! Structured query engine
//!
//! Compiles a raw JSON query into a typed AST (`parse`), then evaluates it
//! against one loaded dataset: filter (`filter`), optional grouping and
//! aggregation (`transform`), and projection / ordering / result bounding
//! (`present`). Kind dispatch happens exactly once, at the dataset
//! container; the pipeline itself is generic over the row accessor trait.

use crate::app::models::{Dataset, DatasetRows, QueryRow};
use crate::{Error, Result};

pub mod ast;
pub mod filter;
pub mod parse;
pub mod present;
pub mod transform;

#[cfg(test)]
pub mod tests;

pub use ast::Query;
pub use parse::compile;

/// A projected result record: output column name to scalar value
pub type ResultRow = serde_json::Map<String, serde_json::Value>;

/// Evaluate a compiled query against a loaded dataset
///
/// The caller guarantees the dataset is the one the query references; this
/// function still rejects queries whose fields do not belong to the
/// dataset's kind.
pub fn evaluate(dataset: &Dataset, query: &Query) -> Result<Vec<ResultRow>> {
    let kind = dataset.kind();
    for field in &query.fields {
        if !kind.has_field(field) {
            return Err(Error::invalid_query(format!(
                "field '{field}' does not exist on a {kind} dataset"
            )));
        }
    }

    match &dataset.rows {
        DatasetRows::Sections(rows) => execute(rows, query),
        DatasetRows::Rooms(rows) => execute(rows, query),
    }
}

fn execute<R: QueryRow>(rows: &[R], query: &Query) -> Result<Vec<ResultRow>> {
    let filtered: Vec<&R> = rows
        .iter()
        .filter(|row| filter::matches(&query.filter, *row))
        .collect();

    let mut records = match &query.transformations {
        Some(transformations) => {
            let grouped = transform::group_and_apply(&filtered, transformations)?;
            present::enforce_cap(grouped.len())?;
            present::select_columns(grouped, &query.columns)
        }
        None => {
            present::enforce_cap(filtered.len())?;
            present::project_rows(&filtered, query)
        }
    };

    if let Some(order) = &query.order {
        present::sort_records(&mut records, order);
    }

    Ok(records)
}

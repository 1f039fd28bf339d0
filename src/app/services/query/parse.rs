//! Query validation and compilation
//!
//! Shape-checks the raw JSON query and compiles it into the typed AST.
//! Every violation surfaces as `InvalidQuery`. The single-dataset rule is
//! enforced by collecting every dataset id mentioned in any clause; the
//! field-type rules are enforced here because a field's scalar type is a
//! pure function of its name.

use super::ast::{
    ApplyOp, ApplyRule, ColumnRef, Filter, GroupKey, Order, Pattern, Query, SortDirection,
    Transformations,
};
use crate::app::models::{FieldType, field_type};
use crate::{Error, Result};
use serde_json::Value;
use std::collections::BTreeSet;

/// Compile and validate a raw JSON query
pub fn compile(raw: &Value) -> Result<Query> {
    let root = root_object(raw)?;

    let where_value = root
        .get("WHERE")
        .ok_or_else(|| Error::invalid_query("query is missing WHERE"))?;
    let options_value = root
        .get("OPTIONS")
        .ok_or_else(|| Error::invalid_query("query is missing OPTIONS"))?;

    let mut ctx = Context::default();

    // Transformations compile first so COLUMNS can resolve apply keys.
    let transformations = root
        .get("TRANSFORMATIONS")
        .map(|value| compile_transformations(value, &mut ctx))
        .transpose()?;

    let filter = compile_filter(where_value, &mut ctx)?;
    let (columns, order) = compile_options(options_value, transformations.as_ref(), &mut ctx)?;

    if let Some(transformations) = &transformations {
        check_group_covers_columns(transformations, &columns)?;
        check_apply_keys_projected(transformations, &columns)?;
    }

    let dataset_id = single_dataset_id(ctx.ids)?;

    Ok(Query {
        dataset_id,
        filter,
        columns,
        order,
        transformations,
        fields: ctx.fields.into_iter().collect(),
    })
}

fn root_object(raw: &Value) -> Result<&serde_json::Map<String, Value>> {
    let root = raw
        .as_object()
        .ok_or_else(|| Error::invalid_query("query must be a JSON object"))?;

    for key in root.keys() {
        if !matches!(key.as_str(), "WHERE" | "OPTIONS" | "TRANSFORMATIONS") {
            return Err(Error::invalid_query(format!(
                "unexpected top-level key '{key}'"
            )));
        }
    }

    Ok(root)
}

/// Dataset ids and bare field names collected while compiling
#[derive(Default)]
struct Context {
    ids: BTreeSet<String>,
    fields: BTreeSet<String>,
}

impl Context {
    /// Validate a `<id>_<field>` key and return the bare field name
    fn dataset_key(&mut self, key: &str) -> Result<String> {
        let Some((id, field)) = key.split_once('_') else {
            return Err(Error::invalid_query(format!(
                "'{key}' is not a dataset key"
            )));
        };

        if id.is_empty() {
            return Err(Error::invalid_query(format!(
                "dataset key '{key}' has an empty dataset id"
            )));
        }

        if field_type(field).is_none() {
            return Err(Error::invalid_query(format!(
                "unknown field '{field}' in key '{key}'"
            )));
        }

        self.ids.insert(id.to_string());
        self.fields.insert(field.to_string());
        Ok(field.to_string())
    }

    /// Like `dataset_key`, additionally requiring the field's scalar type
    fn typed_dataset_key(&mut self, key: &str, expected: FieldType, clause: &str) -> Result<String> {
        let field = self.dataset_key(key)?;
        if field_type(&field) != Some(expected) {
            let wanted = match expected {
                FieldType::Numeric => "numeric",
                FieldType::String => "string",
            };
            return Err(Error::invalid_query(format!(
                "{clause} requires a {wanted} field, but '{key}' is not one"
            )));
        }
        Ok(field)
    }
}

fn single_dataset_id(ids: BTreeSet<String>) -> Result<String> {
    let mut ids = ids.into_iter();
    match (ids.next(), ids.next()) {
        (Some(id), None) => Ok(id),
        (None, _) => Err(Error::invalid_query("query references no dataset")),
        (Some(first), Some(second)) => Err(Error::invalid_query(format!(
            "query references more than one dataset ('{first}', '{second}')"
        ))),
    }
}

// =============================================================================
// WHERE
// =============================================================================

fn compile_filter(value: &Value, ctx: &mut Context) -> Result<Filter> {
    let node = value
        .as_object()
        .ok_or_else(|| Error::invalid_query("WHERE node must be an object"))?;

    if node.is_empty() {
        return Ok(Filter::All);
    }

    if node.len() != 1 {
        return Err(Error::invalid_query(
            "WHERE node must have exactly one operator",
        ));
    }

    let (op, body) = node
        .iter()
        .next()
        .ok_or_else(|| Error::invalid_query("WHERE node must have exactly one operator"))?;

    match op.as_str() {
        "AND" => Ok(Filter::And(compile_junction(op, body, ctx)?)),
        "OR" => Ok(Filter::Or(compile_junction(op, body, ctx)?)),
        "NOT" => Ok(Filter::Not(Box::new(compile_filter(body, ctx)?))),
        "GT" | "LT" | "EQ" => {
            let (field, literal) = numeric_comparison(op, body, ctx)?;
            Ok(match op.as_str() {
                "GT" => Filter::Gt {
                    field,
                    value: literal,
                },
                "LT" => Filter::Lt {
                    field,
                    value: literal,
                },
                _ => Filter::Eq {
                    field,
                    value: literal,
                },
            })
        }
        "IS" => {
            let (key, raw_pattern) = one_key_object(body, "IS comparison")?;
            let pattern_text = raw_pattern
                .as_str()
                .ok_or_else(|| Error::invalid_query("IS requires a string pattern literal"))?;
            let field = ctx.typed_dataset_key(key, FieldType::String, "IS")?;
            Ok(Filter::Is {
                field,
                pattern: Pattern::compile(pattern_text)?,
            })
        }
        other => Err(Error::invalid_query(format!(
            "unknown filter operator '{other}'"
        ))),
    }
}

/// Compile the member list of AND / OR; members must be non-empty nodes
fn compile_junction(op: &str, body: &Value, ctx: &mut Context) -> Result<Vec<Filter>> {
    let members = body
        .as_array()
        .ok_or_else(|| Error::invalid_query(format!("{op} must hold an array of filters")))?;

    if members.is_empty() {
        return Err(Error::invalid_query(format!("{op} cannot be empty")));
    }

    members
        .iter()
        .map(|member| {
            let node = member
                .as_object()
                .ok_or_else(|| Error::invalid_query(format!("{op} members must be objects")))?;
            if node.is_empty() {
                return Err(Error::invalid_query(format!(
                    "{op} members cannot be empty filters"
                )));
            }
            compile_filter(member, ctx)
        })
        .collect()
}

fn numeric_comparison(op: &str, body: &Value, ctx: &mut Context) -> Result<(String, f64)> {
    let (key, literal) = one_key_object(body, &format!("{op} comparison"))?;
    let value = literal
        .as_f64()
        .ok_or_else(|| Error::invalid_query(format!("{op} requires a numeric literal")))?;
    let field = ctx.typed_dataset_key(key, FieldType::Numeric, op)?;
    Ok((field, value))
}

fn one_key_object<'a>(value: &'a Value, what: &str) -> Result<(&'a str, &'a Value)> {
    let object = value
        .as_object()
        .ok_or_else(|| Error::invalid_query(format!("{what} must be an object")))?;

    if object.len() != 1 {
        return Err(Error::invalid_query(format!(
            "{what} must have exactly one key"
        )));
    }

    object
        .iter()
        .next()
        .map(|(key, inner)| (key.as_str(), inner))
        .ok_or_else(|| Error::invalid_query(format!("{what} must have exactly one key")))
}

// =============================================================================
// OPTIONS
// =============================================================================

fn compile_options(
    value: &Value,
    transformations: Option<&Transformations>,
    ctx: &mut Context,
) -> Result<(Vec<ColumnRef>, Option<Order>)> {
    let options = value
        .as_object()
        .ok_or_else(|| Error::invalid_query("OPTIONS must be an object"))?;

    for key in options.keys() {
        if !matches!(key.as_str(), "COLUMNS" | "ORDER") {
            return Err(Error::invalid_query(format!(
                "unexpected OPTIONS key '{key}'"
            )));
        }
    }

    let raw_columns = options
        .get("COLUMNS")
        .ok_or_else(|| Error::invalid_query("OPTIONS is missing COLUMNS"))?
        .as_array()
        .ok_or_else(|| Error::invalid_query("COLUMNS must be an array"))?;

    if raw_columns.is_empty() {
        return Err(Error::invalid_query("COLUMNS cannot be empty"));
    }

    let mut columns = Vec::new();
    for raw in raw_columns {
        let key = raw
            .as_str()
            .ok_or_else(|| Error::invalid_query("COLUMNS entries must be strings"))?;

        if key.contains('_') {
            let field = ctx.dataset_key(key)?;
            columns.push(ColumnRef::Dataset {
                key: key.to_string(),
                field,
            });
        } else {
            let declared = transformations
                .map(|t| t.apply.iter().any(|rule| rule.key == key))
                .unwrap_or(false);
            if !declared {
                return Err(Error::invalid_query(format!(
                    "column '{key}' is neither a dataset key nor a declared apply key"
                )));
            }
            columns.push(ColumnRef::Apply {
                key: key.to_string(),
            });
        }
    }

    let order = options
        .get("ORDER")
        .map(|value| compile_order(value, &columns))
        .transpose()?;

    Ok((columns, order))
}

fn compile_order(value: &Value, columns: &[ColumnRef]) -> Result<Order> {
    let in_columns = |key: &str| columns.iter().any(|column| column.output_key() == key);

    match value {
        Value::String(key) => {
            if !in_columns(key) {
                return Err(Error::invalid_query(format!(
                    "ORDER key '{key}' must appear in COLUMNS"
                )));
            }
            Ok(Order::Single(key.clone()))
        }
        Value::Object(object) => {
            for key in object.keys() {
                if !matches!(key.as_str(), "dir" | "keys") {
                    return Err(Error::invalid_query(format!(
                        "unexpected ORDER key '{key}'"
                    )));
                }
            }

            let direction = match object.get("dir").and_then(Value::as_str) {
                Some("UP") => SortDirection::Up,
                Some("DOWN") => SortDirection::Down,
                Some(other) => {
                    return Err(Error::invalid_query(format!(
                        "ORDER dir must be UP or DOWN, not '{other}'"
                    )));
                }
                None => return Err(Error::invalid_query("ORDER must declare dir")),
            };

            let raw_keys = object
                .get("keys")
                .ok_or_else(|| Error::invalid_query("ORDER must declare keys"))?
                .as_array()
                .ok_or_else(|| Error::invalid_query("ORDER keys must be an array"))?;

            if raw_keys.is_empty() {
                return Err(Error::invalid_query("ORDER keys cannot be empty"));
            }

            let mut keys = Vec::new();
            for raw in raw_keys {
                let key = raw
                    .as_str()
                    .ok_or_else(|| Error::invalid_query("ORDER keys must be strings"))?;
                if !in_columns(key) {
                    return Err(Error::invalid_query(format!(
                        "ORDER key '{key}' must appear in COLUMNS"
                    )));
                }
                keys.push(key.to_string());
            }

            Ok(Order::Keys { direction, keys })
        }
        _ => Err(Error::invalid_query("ORDER must be a string or an object")),
    }
}

// =============================================================================
// TRANSFORMATIONS
// =============================================================================

fn compile_transformations(value: &Value, ctx: &mut Context) -> Result<Transformations> {
    let object = value
        .as_object()
        .ok_or_else(|| Error::invalid_query("TRANSFORMATIONS must be an object"))?;

    for key in object.keys() {
        if !matches!(key.as_str(), "GROUP" | "APPLY") {
            return Err(Error::invalid_query(format!(
                "unexpected TRANSFORMATIONS key '{key}'"
            )));
        }
    }

    let raw_group = object
        .get("GROUP")
        .ok_or_else(|| Error::invalid_query("TRANSFORMATIONS is missing GROUP"))?
        .as_array()
        .ok_or_else(|| Error::invalid_query("GROUP must be an array"))?;

    if raw_group.is_empty() {
        return Err(Error::invalid_query("GROUP cannot be empty"));
    }

    let group = raw_group
        .iter()
        .map(|raw| {
            let key = raw
                .as_str()
                .ok_or_else(|| Error::invalid_query("GROUP entries must be strings"))?;
            let field = ctx.dataset_key(key)?;
            Ok(GroupKey {
                key: key.to_string(),
                field,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let raw_apply = object
        .get("APPLY")
        .ok_or_else(|| Error::invalid_query("TRANSFORMATIONS is missing APPLY"))?
        .as_array()
        .ok_or_else(|| Error::invalid_query("APPLY must be an array"))?;

    let mut apply: Vec<ApplyRule> = Vec::new();
    for raw_rule in raw_apply {
        let (apply_key, body) = one_key_object(raw_rule, "APPLY rule")?;

        if apply_key.is_empty() {
            return Err(Error::invalid_query("apply key cannot be empty"));
        }
        if apply_key.contains('_') {
            return Err(Error::invalid_query(format!(
                "apply key '{apply_key}' cannot contain an underscore"
            )));
        }
        if apply.iter().any(|rule| rule.key == apply_key) {
            return Err(Error::invalid_query(format!(
                "duplicate apply key '{apply_key}'"
            )));
        }

        let (op_name, target) = one_key_object(body, "APPLY operation")?;
        let op = ApplyOp::parse(op_name).ok_or_else(|| {
            Error::invalid_query(format!("unknown apply operation '{op_name}'"))
        })?;

        let target_key = target
            .as_str()
            .ok_or_else(|| Error::invalid_query("apply target must be a dataset key"))?;

        let field = if op.requires_numeric() {
            ctx.typed_dataset_key(target_key, FieldType::Numeric, op_name)?
        } else {
            ctx.dataset_key(target_key)?
        };

        apply.push(ApplyRule {
            key: apply_key.to_string(),
            op,
            field,
        });
    }

    Ok(Transformations { group, apply })
}

/// With TRANSFORMATIONS present, every dataset column must be grouped
fn check_group_covers_columns(
    transformations: &Transformations,
    columns: &[ColumnRef],
) -> Result<()> {
    for column in columns {
        if let ColumnRef::Dataset { key, .. } = column {
            if !transformations.group.iter().any(|g| g.key == *key) {
                return Err(Error::invalid_query(format!(
                    "column '{key}' must appear in GROUP when TRANSFORMATIONS is present"
                )));
            }
        }
    }
    Ok(())
}

/// Every declared apply key must be projected
fn check_apply_keys_projected(
    transformations: &Transformations,
    columns: &[ColumnRef],
) -> Result<()> {
    for rule in &transformations.apply {
        let projected = columns
            .iter()
            .any(|column| matches!(column, ColumnRef::Apply { key } if *key == rule.key));
        if !projected {
            return Err(Error::invalid_query(format!(
                "apply key '{}' must appear in COLUMNS",
                rule.key
            )));
        }
    }
    Ok(())
}

//! Grouping and aggregation
//!
//! Groups the filtered rows by the GROUP key tuple and emits one synthetic
//! row per group: the group field values plus one value per APPLY rule.
//! SUM and AVG accumulate in decimal arithmetic so results match
//! fixed-decimal expectations instead of drifting with a float
//! accumulator.

use super::ResultRow;
use super::ast::{ApplyOp, ApplyRule, Transformations};
use crate::app::models::{FieldValue, QueryRow};
use crate::constants::AGGREGATE_DECIMALS;
use crate::{Error, Result};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::{HashMap, HashSet};

/// One component of a group key tuple
///
/// Floats compare by bit pattern with `-0.0` normalized, so grouping
/// equality matches value equality on everything the archives produce.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyPart {
    Num(u64),
    Text(String),
    Missing,
}

impl KeyPart {
    fn of(value: Option<FieldValue<'_>>) -> Self {
        match value {
            Some(FieldValue::Str(text)) => KeyPart::Text(text.to_string()),
            Some(value) => match value.as_f64() {
                Some(number) => {
                    let normalized = if number == 0.0 { 0.0 } else { number };
                    KeyPart::Num(normalized.to_bits())
                }
                None => KeyPart::Missing,
            },
            None => KeyPart::Missing,
        }
    }
}

/// Group rows and evaluate every APPLY rule per group
///
/// Returns synthetic rows keyed by the full GROUP keys and the bare apply
/// keys, in first-observed group order.
pub fn group_and_apply<R: QueryRow>(
    rows: &[&R],
    transformations: &Transformations,
) -> Result<Vec<ResultRow>> {
    let mut groups: Vec<Vec<&R>> = Vec::new();
    let mut index: HashMap<Vec<KeyPart>, usize> = HashMap::new();

    for &row in rows {
        let key: Vec<KeyPart> = transformations
            .group
            .iter()
            .map(|group_key| KeyPart::of(row.field(&group_key.field)))
            .collect();

        match index.get(&key) {
            Some(&slot) => groups[slot].push(row),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![row]);
            }
        }
    }

    groups
        .into_iter()
        .map(|members| synthesize_group(&members, transformations))
        .collect()
}

/// Produce the synthetic row of one non-empty group
fn synthesize_group<R: QueryRow>(
    members: &[&R],
    transformations: &Transformations,
) -> Result<ResultRow> {
    let first = members
        .first()
        .ok_or_else(|| Error::internal("grouping produced an empty group"))?;

    let mut record = ResultRow::new();
    for group_key in &transformations.group {
        let value = first
            .field(&group_key.field)
            .map(|v| v.to_json())
            .unwrap_or(serde_json::Value::Null);
        record.insert(group_key.key.clone(), value);
    }

    for rule in &transformations.apply {
        record.insert(rule.key.clone(), aggregate(rule, members));
    }

    Ok(record)
}

/// Evaluate one APPLY rule over a group
fn aggregate<R: QueryRow>(rule: &ApplyRule, members: &[&R]) -> serde_json::Value {
    match rule.op {
        ApplyOp::Max => extremum(rule, members, std::cmp::Ordering::Greater),
        ApplyOp::Min => extremum(rule, members, std::cmp::Ordering::Less),
        ApplyOp::Sum => {
            let total = decimal_sum(rule, members);
            decimal_to_json(total.round_dp_with_strategy(
                AGGREGATE_DECIMALS,
                RoundingStrategy::MidpointAwayFromZero,
            ))
        }
        ApplyOp::Avg => {
            // Decimal-exact sum, then float division and 2-decimal
            // half-away-from-zero rounding.
            let total = decimal_sum(rule, members).to_f64().unwrap_or(0.0);
            let mean = total / members.len() as f64;
            let rounded = (mean * 100.0).round() / 100.0;
            f64_to_json(rounded)
        }
        ApplyOp::Count => {
            let distinct: HashSet<KeyPart> = members
                .iter()
                .map(|row| KeyPart::of(row.field(&rule.field)))
                .collect();
            serde_json::Value::from(distinct.len() as i64)
        }
    }
}

/// MAX / MIN preserving the integer-ness of the winning value
///
/// Ties keep the earliest row's value, which is indistinguishable in
/// output but keeps the fold deterministic.
fn extremum<R: QueryRow>(
    rule: &ApplyRule,
    members: &[&R],
    keep: std::cmp::Ordering,
) -> serde_json::Value {
    let mut best: Option<(f64, FieldValue<'_>)> = None;

    for row in members {
        let Some(value) = row.field(&rule.field) else {
            continue;
        };
        let Some(number) = value.as_f64() else {
            continue;
        };

        match &best {
            Some((current, _)) if number.partial_cmp(current) != Some(keep) => {}
            _ => best = Some((number, value)),
        }
    }

    best.map(|(_, value)| value.to_json())
        .unwrap_or(serde_json::Value::Null)
}

fn decimal_sum<R: QueryRow>(rule: &ApplyRule, members: &[&R]) -> Decimal {
    members
        .iter()
        .filter_map(|row| row.field(&rule.field))
        .filter_map(|value| value.as_f64())
        .filter_map(Decimal::from_f64)
        .sum()
}

/// Integral aggregates serialize as JSON integers, matching the rendering
/// result comparisons expect
fn decimal_to_json(value: Decimal) -> serde_json::Value {
    if value.is_integer() {
        if let Some(integer) = value.to_i64() {
            return serde_json::Value::from(integer);
        }
    }
    serde_json::Value::from(value.to_f64().unwrap_or(0.0))
}

fn f64_to_json(value: f64) -> serde_json::Value {
    if value.fract() == 0.0 && value.abs() <= i64::MAX as f64 {
        serde_json::Value::from(value as i64)
    } else {
        serde_json::Value::from(value)
    }
}

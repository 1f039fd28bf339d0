//! Typed query representation
//!
//! The validator compiles the raw JSON query into these types; everything
//! downstream (filtering, grouping, ordering, projection) works on the
//! compiled form and never re-inspects JSON shape.

use crate::{Error, Result};

/// A compiled query over exactly one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// The single dataset id referenced by every dataset key
    pub dataset_id: String,

    /// Compiled WHERE tree
    pub filter: Filter,

    /// Output columns, in COLUMNS order
    pub columns: Vec<ColumnRef>,

    /// Optional ordering
    pub order: Option<Order>,

    /// Optional grouping and aggregation
    pub transformations: Option<Transformations>,

    /// Every bare field name the query touches, for the kind check
    pub fields: Vec<String>,
}

/// One output column: either a dataset field or an APPLY-generated value
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnRef {
    /// Dataset key; `key` is the full `<id>_<field>` form used in output
    Dataset { key: String, field: String },

    /// Apply key declared in TRANSFORMATIONS
    Apply { key: String },
}

impl ColumnRef {
    /// The output column name of this reference
    pub fn output_key(&self) -> &str {
        match self {
            ColumnRef::Dataset { key, .. } => key,
            ColumnRef::Apply { key } => key,
        }
    }
}

/// Compiled WHERE node
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `{}`: matches every row
    All,
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    Gt { field: String, value: f64 },
    Lt { field: String, value: f64 },
    Eq { field: String, value: f64 },
    Is { field: String, pattern: Pattern },
}

/// Compiled IS pattern with the wildcard resolved
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Exact(String),
    /// `text*`
    Prefix(String),
    /// `*text`
    Suffix(String),
    /// `*text*`
    Contains(String),
    /// `*`: matches any string, including the empty one
    Any,
}

impl Pattern {
    /// Compile a raw pattern, rejecting interior wildcards
    pub fn compile(raw: &str) -> Result<Self> {
        if raw == "*" {
            return Ok(Pattern::Any);
        }

        let leading = raw.starts_with('*');
        let trailing = raw.ends_with('*');
        let start = usize::from(leading);
        let end = raw.len() - usize::from(trailing);
        let inner = &raw[start..end];

        if inner.contains('*') {
            return Err(Error::invalid_query(format!(
                "pattern '{raw}' has a wildcard that is not a leading prefix or trailing suffix"
            )));
        }

        Ok(match (leading, trailing) {
            (true, true) => Pattern::Contains(inner.to_string()),
            (true, false) => Pattern::Suffix(inner.to_string()),
            (false, true) => Pattern::Prefix(inner.to_string()),
            (false, false) => Pattern::Exact(inner.to_string()),
        })
    }

    /// Test a string against this pattern
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Pattern::Exact(text) => value == text,
            Pattern::Prefix(text) => value.starts_with(text),
            Pattern::Suffix(text) => value.ends_with(text),
            Pattern::Contains(text) => value.contains(text),
            Pattern::Any => true,
        }
    }
}

/// Sort direction of the object ORDER form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Up,
    Down,
}

/// Compiled ORDER clause; keys are output column names
#[derive(Debug, Clone, PartialEq)]
pub enum Order {
    /// String form: one ascending key
    Single(String),
    /// Object form: priority-ordered keys with a shared direction
    Keys {
        direction: SortDirection,
        keys: Vec<String>,
    },
}

/// Aggregate operators of APPLY rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOp {
    Max,
    Min,
    Avg,
    Sum,
    Count,
}

impl ApplyOp {
    /// Parse the uppercase wire form
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "MAX" => Some(Self::Max),
            "MIN" => Some(Self::Min),
            "AVG" => Some(Self::Avg),
            "SUM" => Some(Self::Sum),
            "COUNT" => Some(Self::Count),
            _ => None,
        }
    }

    /// Whether this operator only accepts numeric fields
    pub fn requires_numeric(self) -> bool {
        !matches!(self, Self::Count)
    }
}

/// One GROUP key
#[derive(Debug, Clone, PartialEq)]
pub struct GroupKey {
    /// Full `<id>_<field>` form used as the output column name
    pub key: String,

    /// Bare field name used for row access
    pub field: String,
}

/// One APPLY rule: `{<key>: {<op>: <dataset key>}}`
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyRule {
    /// Apply key; doubles as the output column name
    pub key: String,

    pub op: ApplyOp,

    /// Bare field name the aggregate reads
    pub field: String,
}

/// Compiled TRANSFORMATIONS clause
#[derive(Debug, Clone, PartialEq)]
pub struct Transformations {
    pub group: Vec<GroupKey>,
    pub apply: Vec<ApplyRule>,
}

//! Data models for campus-insight datasets
//!
//! This module contains the two row variants (course Section and campus
//! Room), the dataset kind enum, the dataset container binding an id to a
//! homogeneous row collection, and the typed field accessors the query
//! engine evaluates against.

use crate::constants::fields;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

// =============================================================================
// Row Variants
// =============================================================================

/// A single course-section record
///
/// One row per offering of a course. Rows marked by the archive as the
/// course's overall aggregate carry the substituted year 1900.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique section instance id
    pub uuid: String,

    /// Course code (e.g., "310")
    pub id: String,

    /// Course title
    pub title: String,

    /// Instructor name
    pub instructor: String,

    /// Department code (e.g., "cpsc")
    pub dept: String,

    /// Year the section ran, or 1900 for overall aggregate rows
    pub year: i64,

    /// Section grade average, 0-100
    pub avg: f64,

    /// Number of passing students
    pub pass: i64,

    /// Number of failing students
    pub fail: i64,

    /// Number of auditing students
    pub audit: i64,
}

/// A single campus-room record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Full building name (e.g., "Hugh Dempster Pavilion")
    pub fullname: String,

    /// Short building code (e.g., "DMP")
    pub shortname: String,

    /// Room number; not always numeric, so kept as a string
    pub number: String,

    /// Canonical room name: `<shortname>_<number>`
    pub name: String,

    /// Street address of the building
    pub address: String,

    /// Latitude resolved by the geocoder
    pub lat: f64,

    /// Longitude resolved by the geocoder
    pub lon: f64,

    /// Seat capacity
    pub seats: i64,

    /// Room type (e.g., "Small Group")
    #[serde(rename = "type")]
    pub room_type: String,

    /// Furniture description
    pub furniture: String,

    /// URL of the room's detail page
    pub href: String,
}

// =============================================================================
// Dataset Container
// =============================================================================

/// The two dataset kinds, matching the HTTP `:kind` path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Sections,
    Rooms,
}

impl DatasetKind {
    /// Parse the lowercase wire form ("sections" / "rooms")
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sections" => Some(Self::Sections),
            "rooms" => Some(Self::Rooms),
            _ => None,
        }
    }

    /// Lowercase wire form of this kind
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sections => "sections",
            Self::Rooms => "rooms",
        }
    }

    /// Check whether a query field name belongs to rows of this kind
    pub fn has_field(self, field: &str) -> bool {
        match self {
            Self::Sections => {
                fields::SECTION_NUMERIC.contains(&field) || fields::SECTION_STRING.contains(&field)
            }
            Self::Rooms => {
                fields::ROOM_NUMERIC.contains(&field) || fields::ROOM_STRING.contains(&field)
            }
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind-tagged row collection of a dataset
///
/// Serializes as `"kind": "sections", "rows": [..]`, which together with
/// the id makes the persisted document fully self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "lowercase")]
pub enum DatasetRows {
    Sections(Vec<Section>),
    Rooms(Vec<Room>),
}

/// A named, immutable collection of rows of one kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// User-supplied dataset id
    pub id: String,

    #[serde(flatten)]
    pub rows: DatasetRows,
}

impl Dataset {
    /// Create a sections dataset
    pub fn sections(id: impl Into<String>, rows: Vec<Section>) -> Self {
        Self {
            id: id.into(),
            rows: DatasetRows::Sections(rows),
        }
    }

    /// Create a rooms dataset
    pub fn rooms(id: impl Into<String>, rows: Vec<Room>) -> Self {
        Self {
            id: id.into(),
            rows: DatasetRows::Rooms(rows),
        }
    }

    /// Kind of the contained rows
    pub fn kind(&self) -> DatasetKind {
        match &self.rows {
            DatasetRows::Sections(_) => DatasetKind::Sections,
            DatasetRows::Rooms(_) => DatasetKind::Rooms,
        }
    }

    /// Number of contained rows
    pub fn len(&self) -> usize {
        match &self.rows {
            DatasetRows::Sections(rows) => rows.len(),
            DatasetRows::Rooms(rows) => rows.len(),
        }
    }

    /// Whether the dataset holds no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validate a user-supplied dataset id
///
/// Legal ids are non-empty, not all whitespace, and contain no underscore.
/// Any other character (including path separators) is permitted; the store
/// encodes ids before touching the filesystem.
pub fn validate_dataset_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::invalid_id(id, "id cannot be empty"));
    }

    if id.trim().is_empty() {
        return Err(Error::invalid_id(id, "id cannot be only whitespace"));
    }

    if id.contains('_') {
        return Err(Error::invalid_id(id, "id cannot contain an underscore"));
    }

    Ok(())
}

// =============================================================================
// Typed Field Access
// =============================================================================

/// Scalar type of a query field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Numeric,
    String,
}

/// Look up the scalar type of a field name across both kinds
///
/// The section and room field sets are disjoint, so the name alone is
/// enough. Returns `None` for names outside the closed sets.
pub fn field_type(field: &str) -> Option<FieldType> {
    if fields::SECTION_NUMERIC.contains(&field) || fields::ROOM_NUMERIC.contains(&field) {
        Some(FieldType::Numeric)
    } else if fields::SECTION_STRING.contains(&field) || fields::ROOM_STRING.contains(&field) {
        Some(FieldType::String)
    } else {
        None
    }
}

/// A typed view of one row field
///
/// Integer-backed fields stay integers so projection can emit JSON
/// integers rather than floats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Int(i64),
    Float(f64),
    Str(&'a str),
}

impl FieldValue<'_> {
    /// Numeric view of this value, if it is numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Str(_) => None,
        }
    }

    /// String view of this value, if it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Render as a JSON value for projection
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Int(v) => serde_json::Value::from(*v),
            FieldValue::Float(v) => serde_json::Value::from(*v),
            FieldValue::Str(s) => serde_json::Value::from(*s),
        }
    }
}

/// Row-side seam of the query engine: maps a field name to a typed value
///
/// Kind dispatch happens once at the dataset container; everything past
/// that point is generic over this trait.
pub trait QueryRow {
    /// Typed value of the named field, or `None` if the field does not
    /// belong to this row kind
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

impl QueryRow for Section {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "uuid" => Some(FieldValue::Str(&self.uuid)),
            "id" => Some(FieldValue::Str(&self.id)),
            "title" => Some(FieldValue::Str(&self.title)),
            "instructor" => Some(FieldValue::Str(&self.instructor)),
            "dept" => Some(FieldValue::Str(&self.dept)),
            "year" => Some(FieldValue::Int(self.year)),
            "avg" => Some(FieldValue::Float(self.avg)),
            "pass" => Some(FieldValue::Int(self.pass)),
            "fail" => Some(FieldValue::Int(self.fail)),
            "audit" => Some(FieldValue::Int(self.audit)),
            _ => None,
        }
    }
}

impl QueryRow for Room {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "fullname" => Some(FieldValue::Str(&self.fullname)),
            "shortname" => Some(FieldValue::Str(&self.shortname)),
            "number" => Some(FieldValue::Str(&self.number)),
            "name" => Some(FieldValue::Str(&self.name)),
            "address" => Some(FieldValue::Str(&self.address)),
            "lat" => Some(FieldValue::Float(self.lat)),
            "lon" => Some(FieldValue::Float(self.lon)),
            "seats" => Some(FieldValue::Int(self.seats)),
            "type" => Some(FieldValue::Str(&self.room_type)),
            "furniture" => Some(FieldValue::Str(&self.furniture)),
            "href" => Some(FieldValue::Str(&self.href)),
            _ => None,
        }
    }
}

//! Application constants for campus-insight
//!
//! This module contains configuration defaults, archive layout names,
//! query limits and the closed field-name sets used throughout the
//! application.

// =============================================================================
// Service Defaults
// =============================================================================

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 4321;

/// Default storage directory for persisted dataset documents
pub const DEFAULT_STORAGE_DIR: &str = "./data";

/// Default base URL of the address geocoding service
pub const DEFAULT_GEOCODER_BASE: &str = "http://localhost:4500/address";

/// Default maximum accepted archive size in bytes (10 MB)
pub const DEFAULT_MAX_ARCHIVE_BYTES: usize = 10 * 1024 * 1024;

/// Timeout applied to each geocoder request
pub const GEOCODER_TIMEOUT_SECONDS: u64 = 30;

// =============================================================================
// Storage Layout
// =============================================================================

/// Extension of persisted dataset documents
pub const DATASET_FILE_EXT: &str = "json";

/// Suffix appended to in-flight dataset documents before the final rename
pub const TEMP_FILE_SUFFIX: &str = "tmp";

// =============================================================================
// Archive Layout
// =============================================================================

/// Required top-level directory of a course-section archive
pub const COURSES_PREFIX: &str = "courses/";

/// Required root index page of a campus-room archive
pub const INDEX_PAGE: &str = "index.htm";

/// `Section` field value marking a course's overall aggregate row
pub const OVERALL_SECTION_MARKER: &str = "overall";

/// Year substituted for overall aggregate rows
pub const OVERALL_SECTION_YEAR: i64 = 1900;

// =============================================================================
// Query Limits
// =============================================================================

/// Hard cap on the number of rows a query may return
pub const MAX_RESULT_ROWS: usize = 5_000;

/// Decimal places applied to AVG and SUM aggregate results
pub const AGGREGATE_DECIMALS: u32 = 2;

// =============================================================================
// Field Name Sets
// =============================================================================

/// Closed field-name sets per dataset kind, split by scalar type
///
/// The section and room sets are disjoint, so a field name alone determines
/// both the kind it belongs to and whether it is numeric or string valued.
pub mod fields {
    /// Numeric fields of a Section row
    pub const SECTION_NUMERIC: &[&str] = &["avg", "pass", "fail", "audit", "year"];

    /// String fields of a Section row
    pub const SECTION_STRING: &[&str] = &["dept", "id", "instructor", "title", "uuid"];

    /// Numeric fields of a Room row
    pub const ROOM_NUMERIC: &[&str] = &["lat", "lon", "seats"];

    /// String fields of a Room row
    pub const ROOM_STRING: &[&str] = &[
        "fullname",
        "shortname",
        "number",
        "name",
        "address",
        "type",
        "furniture",
        "href",
    ];
}

//! Building discovery from the archive's index page
//!
//! The index page lists every building in a table whose cells carry the
//! `views-field-title` and `views-field-field-building-address` classes.
//! The first such table wins; rows without a usable building link are
//! skipped.

use super::html;
use crate::{Error, Result};

/// One building discovered on the index page
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingRef {
    /// Full building name from the title anchor
    pub fullname: String,

    /// Short code extracted from the `/<SHORT>.htm` href component
    pub shortname: String,

    /// Street address used for geocoding
    pub address: String,

    /// Building page path, rooted to the archive
    pub path: String,
}

/// Parse the index page into building references
pub fn parse_index(html: &str) -> Result<Vec<BuildingRef>> {
    for table_html in html::tables(html)? {
        let mut is_building_table = false;
        let mut buildings = Vec::new();

        for row_html in html::rows(&table_html)? {
            let cells = html::cells(&row_html)?;

            let title = cells.iter().find(|c| c.has_class("views-field-title"));
            let address = cells
                .iter()
                .find(|c| c.has_class("views-field-field-building-address"));

            let (Some(title), Some(address)) = (title, address) else {
                continue;
            };
            is_building_table = true;

            // Header rows and malformed rows have no building anchor.
            let (Some(href), Some(fullname)) =
                (title.anchor_href.as_deref(), title.anchor_text.as_deref())
            else {
                continue;
            };
            let Some(shortname) = shortname_from_href(href) else {
                continue;
            };

            buildings.push(BuildingRef {
                fullname: fullname.to_string(),
                shortname,
                address: address.text.clone(),
                path: archive_path(href),
            });
        }

        if is_building_table {
            return Ok(buildings);
        }
    }

    Err(Error::invalid_content(
        "index page contains no building table",
    ))
}

/// Extract the short building code from an href ending in `/<SHORT>.htm`
fn shortname_from_href(href: &str) -> Option<String> {
    let segment = href.rsplit('/').next()?;
    segment.strip_suffix(".htm").map(str::to_string)
}

/// Root a relative index href to the archive
fn archive_path(href: &str) -> String {
    href.trim_start_matches("./").to_string()
}

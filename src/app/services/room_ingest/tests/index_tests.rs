//! Tests for index-page building discovery

use super::*;
use crate::Error;
use crate::app::services::room_ingest::index_page::parse_index;

#[test]
fn test_buildings_discovered_from_index() {
    let buildings = parse_index(sample_index_html()).unwrap();

    assert_eq!(buildings.len(), 2);

    assert_eq!(buildings[0].fullname, "Hugh Dempster Pavilion");
    assert_eq!(buildings[0].shortname, "DMP");
    assert_eq!(buildings[0].address, "6245 Agronomy Road V6T 1Z4");
    assert_eq!(
        buildings[0].path,
        "campus/discover/buildings-and-classrooms/DMP.htm"
    );

    assert_eq!(buildings[1].shortname, "ACU");
    assert_eq!(buildings[1].address, "2211 Wesbrook Mall");
}

#[test]
fn test_navigation_table_is_not_mistaken_for_buildings() {
    // The nav table precedes the building table in the document; discovery
    // must skip it and land on the first table with the marker classes.
    let buildings = parse_index(sample_index_html()).unwrap();
    assert!(buildings.iter().all(|b| !b.fullname.contains("About")));
}

#[test]
fn test_index_without_building_table_is_rejected() {
    let html = r#"<html><body>
<table class="menu"><tr><td class="nav-item">About</td></tr></table>
</body></html>"#;

    match parse_index(html) {
        Err(Error::InvalidContent { .. }) => {}
        other => panic!("expected InvalidContent, got {other:?}"),
    }
}

#[test]
fn test_row_without_anchor_is_skipped() {
    let html = r#"<table>
<tr>
  <td class="views-field views-field-title">No link here</td>
  <td class="views-field views-field-field-building-address">1 Somewhere</td>
</tr>
<tr>
  <td class="views-field views-field-title"><a href="./b/LSK.htm">Leonard S. Klinck</a></td>
  <td class="views-field views-field-field-building-address">6356 Agricultural Road</td>
</tr>
</table>"#;

    let buildings = parse_index(html).unwrap();
    assert_eq!(buildings.len(), 1);
    assert_eq!(buildings[0].shortname, "LSK");
    assert_eq!(buildings[0].path, "b/LSK.htm");
}

#[test]
fn test_unclosed_tags_are_tolerated() {
    // Real pages leave cells and rows unclosed.
    let html = r#"<table>
<tr>
  <td class="views-field views-field-title"><a href="./b/MATH.htm">Mathematics
  <td class="views-field views-field-field-building-address">1984 Mathematics Road
</table>"#;

    let buildings = parse_index(html).unwrap();
    assert_eq!(buildings.len(), 1);
    assert_eq!(buildings[0].shortname, "MATH");
    assert_eq!(buildings[0].address, "1984 Mathematics Road");
}

//! Room extraction from a building page
//!
//! A building page may carry one room table, identified by the room
//! number / capacity / furniture / type cell classes. Rows missing any
//! required cell, missing a room-number anchor, or with an unparseable
//! capacity are skipped silently; a page with no room table contributes
//! zero rooms.

use super::html;
use tracing::debug;

/// One room row extracted from a building page
#[derive(Debug, Clone, PartialEq)]
pub struct RoomInfo {
    /// Room number; kept as a string (not always numeric)
    pub number: String,

    /// Seat capacity
    pub seats: i64,

    /// Furniture description
    pub furniture: String,

    /// Room type
    pub room_type: String,

    /// URL of the room's detail page
    pub href: String,
}

/// Parse a building page into its rooms, tolerating any malformed HTML
pub fn parse_building(html: &str) -> Vec<RoomInfo> {
    let Ok(tables) = html::tables(html) else {
        debug!("skipping unparseable building page");
        return Vec::new();
    };

    for table_html in tables {
        let Ok(row_htmls) = html::rows(&table_html) else {
            continue;
        };

        let mut is_room_table = false;
        let mut rooms = Vec::new();

        for row_html in row_htmls {
            let Ok(cells) = html::cells(&row_html) else {
                continue;
            };

            let number = cells
                .iter()
                .find(|c| c.has_class("views-field-field-room-number"));
            let capacity = cells
                .iter()
                .find(|c| c.has_class("views-field-field-room-capacity"));
            let furniture = cells
                .iter()
                .find(|c| c.has_class("views-field-field-room-furniture"));
            let room_type = cells
                .iter()
                .find(|c| c.has_class("views-field-field-room-type"));

            let (Some(number), Some(capacity), Some(furniture), Some(room_type)) =
                (number, capacity, furniture, room_type)
            else {
                continue;
            };
            is_room_table = true;

            // Header rows carry the classes but no anchor; data rows
            // without one are equally unusable.
            let (Some(href), Some(number_text)) =
                (number.anchor_href.as_deref(), number.anchor_text.as_deref())
            else {
                continue;
            };
            let Ok(seats) = capacity.text.parse::<i64>() else {
                continue;
            };

            rooms.push(RoomInfo {
                number: number_text.to_string(),
                seats,
                furniture: furniture.text.clone(),
                room_type: room_type.text.clone(),
                href: href.to_string(),
            });
        }

        if is_room_table {
            return rooms;
        }
    }

    Vec::new()
}

//! Shared test fixtures for dataset store tests

use crate::app::models::{Dataset, Room, Section};


/// Create a test section with the given uuid and average
pub fn create_test_section(uuid: &str, avg: f64) -> Section {
    Section {
        uuid: uuid.to_string(),
        id: "310".to_string(),
        title: "software eng".to_string(),
        instructor: "smith, jo".to_string(),
        dept: "cpsc".to_string(),
        year: 2015,
        avg,
        pass: 100,
        fail: 5,
        audit: 0,
    }
}

/// Create a test room with the given number
pub fn create_test_room(number: &str) -> Room {
    Room {
        fullname: "Hugh Dempster Pavilion".to_string(),
        shortname: "DMP".to_string(),
        number: number.to_string(),
        name: format!("DMP_{number}"),
        address: "6245 Agronomy Road V6T 1Z4".to_string(),
        lat: 49.26125,
        lon: -123.24807,
        seats: 120,
        room_type: "Tiered Large Group".to_string(),
        furniture: "Classroom-Fixed Tablets".to_string(),
        href: format!("http://example.edu/rooms/DMP-{number}"),
    }
}

/// Create a small sections dataset for persistence tests
pub fn create_sections_dataset(id: &str) -> Dataset {
    Dataset::sections(
        id,
        vec![
            create_test_section("1001", 71.5),
            create_test_section("1002", 84.0),
        ],
    )
}

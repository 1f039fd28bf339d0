//! Shared fixtures for query engine tests

use crate::app::models::{Dataset, Room, Section};

pub mod present_tests;

/// Build one section row
pub fn section(uuid: &str, dept: &str, id: &str, year: i64, avg: f64, pass: i64) -> Section {
    Section {
        uuid: uuid.to_string(),
        id: id.to_string(),
        title: format!("{dept} {id}"),
        instructor: "smith, jo".to_string(),
        dept: dept.to_string(),
        year,
        avg,
        pass,
        fail: 2,
        audit: 0,
    }
}

/// A small sections dataset covering two departments and three years
pub fn sample_sections() -> Dataset {
    Dataset::sections(
        "sections",
        vec![
            section("1", "cpsc", "310", 2014, 72.5, 100),
            section("2", "cpsc", "310", 2015, 85.0, 110),
            section("3", "cpsc", "310", 2015, 90.0, 120),
            section("4", "cpsc", "110", 2014, 68.25, 200),
            section("5", "math", "100", 2015, 75.5, 300),
            section("6", "math", "100", 2016, 97.19, 310),
        ],
    )
}

/// Build one room row
pub fn room(shortname: &str, number: &str, seats: i64, furniture: &str) -> Room {
    Room {
        fullname: format!("{shortname} Building"),
        shortname: shortname.to_string(),
        number: number.to_string(),
        name: format!("{shortname}_{number}"),
        address: "1 Campus Way".to_string(),
        lat: 49.26,
        lon: -123.25,
        seats,
        room_type: "Small Group".to_string(),
        furniture: furniture.to_string(),
        href: format!("http://example.edu/rooms/{shortname}-{number}"),
    }
}

/// A small rooms dataset with two buildings
pub fn sample_rooms() -> Dataset {
    Dataset::rooms(
        "rooms",
        vec![
            room("DMP", "310", 160, "Fixed Tables"),
            room("DMP", "101", 40, "Movable Tables & Chairs"),
            room("ACU", "120", 40, "Movable Tables & Chairs"),
        ],
    )
}

/// Compile a query literal, panicking on validation failure
pub fn compile(query: serde_json::Value) -> crate::app::services::query::Query {
    crate::app::services::query::compile(&query).unwrap()
}

/// Run a query literal end-to-end against a dataset
pub fn run(
    dataset: &Dataset,
    query: serde_json::Value,
) -> crate::Result<Vec<crate::app::services::query::ResultRow>> {
    let compiled = crate::app::services::query::compile(&query)?;
    crate::app::services::query::evaluate(dataset, &compiled)
}

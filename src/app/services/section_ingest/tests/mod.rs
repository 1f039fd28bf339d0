//! Shared fixtures for section ingestion tests

use base64::Engine;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub mod course_file_tests;
pub mod ingest_tests;

/// Build a base64 zip archive from (entry name, content) pairs
pub fn archive_from_entries(entries: &[(&str, &str)]) -> String {
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = ZipWriter::new(&mut cursor);
    let options = SimpleFileOptions::default();

    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(name.trim_end_matches('/'), options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
    }

    writer.finish().unwrap();
    base64::engine::general_purpose::STANDARD.encode(cursor.into_inner())
}

/// A well-formed course file with two section runs and one overall row
pub fn sample_course_json() -> String {
    serde_json::json!({
        "result": [
            {
                "id": 32016,
                "Course": "310",
                "Title": "software eng",
                "Professor": "smith, jo",
                "Subject": "cpsc",
                "Avg": 78.25,
                "Pass": 120,
                "Fail": 4,
                "Audit": 1,
                "Year": "2015",
                "Section": "101"
            },
            {
                "id": 32017,
                "Course": "310",
                "Title": "software eng",
                "Professor": "lee, sam",
                "Subject": "cpsc",
                "Avg": 81.0,
                "Pass": 110,
                "Fail": 2,
                "Audit": 0,
                "Year": 2016,
                "Section": "102"
            },
            {
                "id": 32018,
                "Course": "310",
                "Title": "software eng",
                "Professor": "",
                "Subject": "cpsc",
                "Avg": 79.6,
                "Pass": 230,
                "Fail": 6,
                "Audit": 1,
                "Year": "2015",
                "Section": "overall"
            }
        ]
    })
    .to_string()
}

/// A valid single-file archive built from `sample_course_json`
pub fn sample_archive() -> String {
    archive_from_entries(&[("courses/", ""), ("courses/CPSC310", &sample_course_json())])
}

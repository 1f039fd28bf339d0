//! Tests for archive layout validation and end-to-end section ingestion

use super::*;
use crate::Error;
use crate::app::services::section_ingest::SectionIngester;
use crate::constants::OVERALL_SECTION_YEAR;

fn ingester() -> SectionIngester {
    SectionIngester::new(2)
}

#[tokio::test]
async fn test_valid_archive_produces_sections() {
    let sections = ingester()
        .ingest("courses", &sample_archive())
        .await
        .unwrap();

    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0].uuid, "32016");
    assert_eq!(sections[0].dept, "cpsc");
    assert_eq!(sections[0].year, 2015);
    assert_eq!(sections[1].year, 2016);
}

#[tokio::test]
async fn test_overall_rows_take_substituted_year() {
    let sections = ingester()
        .ingest("courses", &sample_archive())
        .await
        .unwrap();

    assert_eq!(sections[2].year, OVERALL_SECTION_YEAR);
}

#[tokio::test]
async fn test_multiple_course_files_are_combined() {
    let payload = archive_from_entries(&[
        ("courses/", ""),
        ("courses/CPSC310", &sample_course_json()),
        ("courses/CPSC210", &sample_course_json()),
    ]);

    let sections = ingester().ingest("courses", &payload).await.unwrap();
    assert_eq!(sections.len(), 6);
}

#[tokio::test]
async fn test_not_base64_is_invalid_content() {
    match ingester().ingest("courses", "@@not-base64@@").await {
        Err(Error::InvalidContent { .. }) => {}
        other => panic!("expected InvalidContent, got {other:?}"),
    }
}

#[tokio::test]
async fn test_not_a_zip_is_invalid_content() {
    use base64::Engine;
    let payload = base64::engine::general_purpose::STANDARD.encode(b"plain bytes, not a zip");

    match ingester().ingest("courses", &payload).await {
        Err(Error::InvalidContent { .. }) => {}
        other => panic!("expected InvalidContent, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_top_level_directory_is_rejected() {
    let payload = archive_from_entries(&[("lectures/", ""), ("lectures/CPSC310", &sample_course_json())]);

    match ingester().ingest("courses", &payload).await {
        Err(Error::InvalidContent { .. }) => {}
        other => panic!("expected InvalidContent, got {other:?}"),
    }
}

#[tokio::test]
async fn test_extra_top_level_entry_is_rejected() {
    let payload = archive_from_entries(&[
        ("courses/", ""),
        ("courses/CPSC310", &sample_course_json()),
        ("README", "stray file"),
    ]);

    match ingester().ingest("courses", &payload).await {
        Err(Error::InvalidContent { .. }) => {}
        other => panic!("expected InvalidContent, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_courses_directory_is_rejected() {
    let payload = archive_from_entries(&[("courses/", "")]);

    match ingester().ingest("courses", &payload).await {
        Err(Error::InvalidContent { .. }) => {}
        other => panic!("expected InvalidContent, got {other:?}"),
    }
}

#[tokio::test]
async fn test_zero_sections_overall_is_rejected() {
    let payload = archive_from_entries(&[("courses/", ""), ("courses/EMPTY", r#"{"result": []}"#)]);

    match ingester().ingest("courses", &payload).await {
        Err(Error::InvalidContent { .. }) => {}
        other => panic!("expected InvalidContent, got {other:?}"),
    }
}

#[tokio::test]
async fn test_one_bad_file_aborts_whole_ingest() {
    let payload = archive_from_entries(&[
        ("courses/", ""),
        ("courses/GOOD", &sample_course_json()),
        ("courses/BAD", "{ not json"),
    ]);

    match ingester().ingest("courses", &payload).await {
        Err(Error::InvalidContent { .. }) => {}
        other => panic!("expected InvalidContent, got {other:?}"),
    }
}

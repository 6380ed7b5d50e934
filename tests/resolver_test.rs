//! Tests for FileResolver against an in-memory Drive.

mod common;

use common::FakeDrive;
use drive_fetch::pattern::FALLBACK_FILTER;
use drive_fetch::{DriveError, FileRecord, FileResolver};

fn names(files: &[FileRecord]) -> Vec<&str> {
    files.iter().filter_map(|f| f.name.as_deref()).collect()
}

mod literal_names {
    use super::*;

    #[tokio::test]
    async fn issues_one_equality_query() {
        let drive = FakeDrive::with_listing(&["report.csv"]);
        let files = FileResolver::new(&drive)
            .resolve("F1", "report.csv")
            .await
            .unwrap();

        assert_eq!(drive.queries(), vec!["'F1' in parents and name = 'report.csv'"]);
        assert_eq!(names(&files), vec!["report.csv"]);
    }

    #[tokio::test]
    async fn returns_server_result_unfiltered() {
        // Duplicates and whatever else the service reports pass straight through.
        let drive = FakeDrive::with_listing(&["report.csv", "report.csv", "other.txt"]);
        let files = FileResolver::new(&drive)
            .resolve("F1", "report.csv")
            .await
            .unwrap();

        assert_eq!(names(&files), vec!["report.csv", "report.csv", "other.txt"]);
    }

    #[tokio::test]
    async fn escapes_quotes() {
        let drive = FakeDrive::with_listing(&[]);
        FileResolver::new(&drive)
            .resolve("F1", "bob's notes.txt")
            .await
            .unwrap();

        assert_eq!(
            drive.queries(),
            vec!["'F1' in parents and name = 'bob\\'s notes.txt'"]
        );
    }
}

mod glob_patterns {
    use super::*;

    #[tokio::test]
    async fn suffix_pattern_uses_fallback_filter() {
        let drive = FakeDrive::with_listing(&["a.csv", "b.txt", "C.CSV", "a.csv.bak"]);
        let files = FileResolver::new(&drive).resolve("F1", "*.csv").await.unwrap();

        assert_eq!(
            drive.queries(),
            vec![format!("'F1' in parents and {}", FALLBACK_FILTER)]
        );
        assert_eq!(names(&files), vec!["a.csv", "C.CSV"]);
    }

    #[tokio::test]
    async fn prefix_pattern_uses_contains() {
        let drive = FakeDrive::with_listing(&["draft-1.doc", "old-draft.doc", "Draft"]);
        let files = FileResolver::new(&drive).resolve("F1", "draft*").await.unwrap();

        assert_eq!(drive.queries(), vec!["'F1' in parents and name contains 'draft'"]);
        assert_eq!(names(&files), vec!["draft-1.doc", "Draft"]);
    }

    #[tokio::test]
    async fn contains_pattern_matches_anywhere() {
        let drive = FakeDrive::with_listing(&["draft-1.doc", "old-draft.doc", "dra-ft"]);
        let files = FileResolver::new(&drive).resolve("F1", "*draft*").await.unwrap();

        assert_eq!(drive.queries(), vec!["'F1' in parents and name contains 'draft'"]);
        assert_eq!(names(&files), vec!["draft-1.doc", "old-draft.doc"]);
    }

    #[tokio::test]
    async fn keeps_server_order() {
        let drive = FakeDrive::with_listing(&["z.log", "skip.txt", "a.log", "m.log"]);
        let files = FileResolver::new(&drive).resolve("F1", "?.log").await.unwrap();

        assert_eq!(names(&files), vec!["z.log", "a.log", "m.log"]);
    }

    #[tokio::test]
    async fn drops_records_without_name() {
        let mut drive = FakeDrive::with_listing(&["a.csv"]);
        drive.listing.push(FileRecord {
            id: Some("nameless".to_string()),
            name: None,
            parents: vec![],
        });

        let files = FileResolver::new(&drive).resolve("F1", "*").await.unwrap();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn no_match_is_empty_not_error() {
        let drive = FakeDrive::with_listing(&["a.txt"]);
        let files = FileResolver::new(&drive).resolve("F1", "*.csv").await.unwrap();
        assert!(files.is_empty());
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn list_failure_is_lookup_error() {
        let drive = FakeDrive {
            fail_with: Some(503),
            ..FakeDrive::default()
        };

        let err = FileResolver::new(&drive)
            .resolve("F1", "*.csv")
            .await
            .unwrap_err();

        match err {
            DriveError::LookupError { query, source } => {
                assert!(query.starts_with("'F1' in parents"));
                assert!(matches!(*source, DriveError::ApiError { status: 503, .. }));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(drive.queries().len(), 1);
    }

    #[tokio::test]
    async fn missing_id_is_not_found() {
        let drive = FakeDrive::default();
        let err = FileResolver::new(&drive)
            .resolve_by_id("nope")
            .await
            .unwrap_err();

        assert!(matches!(err, DriveError::FileNotFound(ref id) if id == "nope"));
        assert!(drive.queries().is_empty());
    }

    #[tokio::test]
    async fn get_failure_is_lookup_error() {
        let drive = FakeDrive {
            fail_with: Some(500),
            ..FakeDrive::default()
        };
        let err = FileResolver::new(&drive)
            .resolve_by_id("abc")
            .await
            .unwrap_err();

        match err {
            DriveError::LookupError { query, source } => {
                assert_eq!(query, "id = 'abc'");
                assert!(matches!(*source, DriveError::ApiError { status: 500, .. }));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

#[tokio::test]
async fn resolve_by_id_returns_record() {
    let mut drive = FakeDrive::default();
    drive
        .records
        .insert("abc".to_string(), FileRecord::new("abc", "report.csv"));

    let record = FileResolver::new(&drive).resolve_by_id("abc").await.unwrap();
    assert_eq!(record.name.as_deref(), Some("report.csv"));
    assert!(drive.queries().is_empty());
}

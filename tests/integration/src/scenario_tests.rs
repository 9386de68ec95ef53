//! Scenario-based Integration Tests
//!
//! Each module drives one end-to-end scenario through the public API
//! against a real project directory, using the on-disk config, lock and
//! cache stores.

use vendor_core::position::extract;
use vendor_core::store::{FileLockStore, LockSource, ProjectLayout};
use vendor_core::{Error, LockEntry, Position, SyncEngine, VendorLock};
use vendor_test_utils::{TestProject, VendorYaml, numbered_lines};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn fingerprint(content: &str, position: Option<Position>) -> String {
    extract(content.as_bytes(), position.as_ref())
        .unwrap()
        .fingerprint
}

/// Persist a lock for `vendor` through the production lock store.
fn write_lock(project: &TestProject, vendor: &str, records: &[(&str, String, &str, String)]) {
    let mut entry = LockEntry::internal(vendor);
    for (from, source_hash, to, dest_hash) in records {
        entry.record(from, source_hash, to, dest_hash);
    }
    let mut lock = VendorLock::default();
    lock.upsert(entry);
    FileLockStore::for_project(&ProjectLayout::new(project.root()))
        .save(&lock)
        .unwrap();
}

// =============================================================================
// S1: Line range extraction
// =============================================================================

mod s1_extract_lines {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn s1_1_middle_lines_have_no_trailing_newline() {
        let project = TestProject::new();
        project.write_file("f.txt", "line1\nline2\nline3\nline4\nline5\n");
        let engine = SyncEngine::open(project.root());

        let extracted = engine
            .extract_position("f.txt", Some(&Position::lines(2, 4)))
            .unwrap();

        assert_eq!(extracted.text_lossy(), "line2\nline3\nline4");
        assert!(extracted.fingerprint.starts_with("sha256:"));
    }

    #[test]
    fn s1_2_phantom_line_is_addressable() {
        let project = TestProject::new();
        project.write_file("f.txt", "line1\nline2\n");
        let engine = SyncEngine::open(project.root());

        let extracted = engine
            .extract_position("f.txt", Some(&Position::line(3)))
            .unwrap();
        assert_eq!(extracted.text_lossy(), "");

        let err = engine
            .extract_position("f.txt", Some(&Position::line(4)))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::LineOutOfRange {
                line: 4,
                line_count: 3
            }
        ));
    }
}

// =============================================================================
// S2: Column placement
// =============================================================================

mod s2_place_columns {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn s2_1_replace_word_on_disk() {
        let project = TestProject::new();
        project.write_file("f.txt", "Hello World!\n");
        let engine = SyncEngine::open(project.root());

        let placement = engine
            .place_content("f.txt", b"Go", Some(&Position::columns(1, 7, 1, 11)))
            .unwrap();

        assert!(placement.written);
        assert_eq!(placement.line_delta(), 0);
        project.assert_file_eq("f.txt", "Hello Go!\n");
    }

    #[test]
    fn s2_2_placing_identical_content_keeps_bytes() {
        let project = TestProject::new();
        project.write_file("f.txt", "Hello World!\r\n");
        let engine = SyncEngine::open(project.root());

        let placement = engine
            .place_content("f.txt", b"World", Some(&Position::columns(1, 7, 1, 11)))
            .unwrap();

        assert!(!placement.written);
        project.assert_file_eq("f.txt", "Hello World!\r\n");
    }
}

// =============================================================================
// S3: Line-ending invariance
// =============================================================================

mod s3_line_endings {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn s3_1_crlf_and_lf_share_a_fingerprint() {
        let project = TestProject::new();
        project.write_file("crlf.txt", "line1\r\nline2\r\n");
        project.write_file("lf.txt", "line1\nline2\n");
        let engine = SyncEngine::open(project.root());
        let range = Position::lines(1, 2);

        let crlf = engine.extract_position("crlf.txt", Some(&range)).unwrap();
        let lf = engine.extract_position("lf.txt", Some(&range)).unwrap();

        assert_eq!(crlf.fingerprint, lf.fingerprint);
        assert_eq!(crlf.text, lf.text);
    }
}

// =============================================================================
// S4: Destination drift under source-canonical
// =============================================================================

mod s4_dest_drift {
    use super::*;
    use pretty_assertions::assert_eq;
    use vendor_core::ComplianceOptions;
    use vendor_core::sync::{ComplianceAction, ComplianceResult, DriftState};

    fn project() -> TestProject {
        let project = TestProject::new();
        project.write_file("a.txt", "h1");
        project.write_file("b.txt", "h3");
        project.write_config(
            &VendorYaml::new()
                .internal("v", Some("source-canonical"), &[("a.txt", "b.txt")])
                .build(),
        );
        write_lock(
            &project,
            "v",
            &[("a.txt", fingerprint("h1", None), "b.txt", fingerprint("h2", None))],
        );
        project
    }

    #[test]
    fn s4_1_warns_and_writes_nothing() {
        let project = project();
        let lock_before = project.read_lock();
        let engine = SyncEngine::open(project.root());

        let report = engine
            .propagate_compliance(&ComplianceOptions::default())
            .unwrap();

        assert_eq!(report.entries[0].state, DriftState::DestDrift);
        assert_eq!(report.entries[0].action, ComplianceAction::Warn);
        assert_eq!(report.summary.result, ComplianceResult::Drifted);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.files_written.is_empty());
        project.assert_file_eq("a.txt", "h1");
        project.assert_file_eq("b.txt", "h3");
        assert_eq!(project.read_lock(), lock_before);
    }

    #[test]
    fn s4_2_reverse_copies_back_and_relocks() {
        let project = project();
        let engine = SyncEngine::open(project.root());

        let report = engine
            .propagate_compliance(&ComplianceOptions {
                reverse: true,
                ..Default::default()
            })
            .unwrap();

        assert_eq!(report.entries[0].action, ComplianceAction::CopyToSource);
        assert_eq!(report.files_written, vec!["a.txt".to_string()]);
        project.assert_file_eq("a.txt", "h3");

        let check = engine
            .check_compliance(&ComplianceOptions::default())
            .unwrap();
        assert_eq!(check.summary.result, ComplianceResult::Synced);
    }
}

// =============================================================================
// S5: Circular internal vendors
// =============================================================================

mod s5_cycles {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn s5_1_three_vendor_cycle_fails_validation() {
        let project = TestProject::new();
        for file in ["a.txt", "b.txt", "c.txt"] {
            project.write_file(file, "x\n");
        }
        project.write_config(
            &VendorYaml::new()
                .internal("ab", None, &[("a.txt", "b.txt")])
                .internal("bc", None, &[("b.txt", "c.txt")])
                .internal("ca", None, &[("c.txt", "a.txt")])
                .build(),
        );
        let engine = SyncEngine::open(project.root());

        let err = engine.validate_config().unwrap_err();

        let Error::CircularDependency { chain } = &err else {
            panic!("expected a cycle, got {err:?}");
        };
        assert_eq!(chain.first(), chain.last());
        assert_eq!(chain.len(), 4);
    }

    #[test]
    fn s5_2_external_edges_never_close_a_cycle() {
        let project = TestProject::new();
        project.write_file("a.txt", "x\n");
        project.write_file("b.txt", "x\n");
        project.write_config(
            &VendorYaml::new()
                .internal("ab", None, &[("a.txt", "b.txt")])
                .external("ba", "https://example.com/ba.git", &[("b.txt", "a.txt")])
                .build(),
        );
        let engine = SyncEngine::open(project.root());

        assert!(engine.validate_config().is_ok());
    }
}

// =============================================================================
// S6: Shrinking destination breaks a sibling address
// =============================================================================

mod s6_position_delta {
    use super::*;
    use pretty_assertions::assert_eq;
    use vendor_core::ComplianceOptions;

    #[test]
    fn s6_1_adjustment_fails_and_nothing_changes() {
        let project = TestProject::new();
        let dest = numbered_lines(19);
        let lib = numbered_lines(16);
        project.write_file("src.txt", "a\nb\nc");
        project.write_file("lib.txt", &lib);
        project.write_file("dest.txt", &dest);
        project.write_config(
            &VendorYaml::new()
                .internal(
                    "v",
                    Some("source-canonical"),
                    &[("src.txt", "dest.txt"), ("lib.txt:L1-L16", "dest.txt:L5-L20")],
                )
                .build(),
        );
        write_lock(
            &project,
            "v",
            &[
                ("src.txt", fingerprint("old", None), "dest.txt", fingerprint(&dest, None)),
                (
                    "lib.txt:L1-L16",
                    fingerprint(&lib, Some(Position::lines(1, 16))),
                    "dest.txt:L5-L20",
                    fingerprint(&dest, Some(Position::lines(5, 20))),
                ),
            ],
        );
        let config_before = project.read_config();
        let engine = SyncEngine::open(project.root());

        let report = engine
            .propagate_compliance(&ComplianceOptions::default())
            .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert!(
            report.failures[0]
                .message
                .contains("end line 3 would precede start line 5")
        );
        project.assert_file_eq("dest.txt", &dest);
        assert_eq!(project.read_config(), config_before);

        let err = report.into_result().unwrap_err();
        assert!(err.to_string().starts_with("1 mapping(s) failed to propagate"));
    }
}

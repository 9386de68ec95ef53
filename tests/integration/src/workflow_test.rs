//! End-to-end workflow test
//!
//! This test exercises the complete flow: validate -> sync -> edit source ->
//! check -> propagate (with address rewrite) -> check.

use pretty_assertions::assert_eq;
use std::sync::Arc;
use vendor_core::store::{
    FileConfigStore, MemoryChecksumCache, MemoryLockStore, ProjectLayout,
};
use vendor_core::sync::{ComplianceAction, ComplianceResult, DriftState};
use vendor_core::{ComplianceOptions, SyncEngine, SyncOptions, VendorLock};
use vendor_fs::LocalFs;
use vendor_test_utils::{TestProject, VendorYaml};

fn setup_project() -> TestProject {
    let project = TestProject::new();
    project.write_file("lib/util.go", "package lib\nfunc A() {}\nfunc B() {}");
    project.write_file("pkg/util.go", "// vendored\nfunc A() {}\nfunc B() {}\n// end\n");
    project.write_config(
        &VendorYaml::new()
            .internal(
                "util",
                None,
                &[("lib/util.go:L2-EOF", "pkg/util.go:L2-L3")],
            )
            .build(),
    );
    project
}

#[test]
fn test_full_vendor_lifecycle() {
    let project = setup_project();
    let engine = SyncEngine::open(project.root());

    // Configuration is valid
    engine.validate_config().unwrap();

    // Initial sync finds the region already in place and records it
    let report = engine.sync(&SyncOptions::default()).unwrap();
    assert!(report.success, "{:?}", report.errors);
    assert_eq!(report.actions, vec!["pkg/util.go:L2-L3 is up to date".to_string()]);
    project.assert_file_exists(".git-vendor/vendor.lock");
    project.assert_file_exists(".git-vendor/.cache/util@local.json");

    let check = engine.check_compliance(&ComplianceOptions::default()).unwrap();
    assert_eq!(check.summary.result, ComplianceResult::Synced);

    // The source region grows by one line
    project.write_file(
        "lib/util.go",
        "package lib\nfunc A() {}\nfunc B() {}\nfunc C() {}",
    );

    let check = engine.check_compliance(&ComplianceOptions::default()).unwrap();
    assert_eq!(check.summary.result, ComplianceResult::Drifted);
    assert_eq!(check.entries[0].state, DriftState::SourceDrift);
    assert_eq!(check.entries[0].action, ComplianceAction::CopyToDest);
    project.assert_file_eq("pkg/util.go", "// vendored\nfunc A() {}\nfunc B() {}\n// end\n");

    let report = engine
        .propagate_compliance(&ComplianceOptions::default())
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(report.files_written, vec!["pkg/util.go".to_string()]);
    project.assert_file_eq(
        "pkg/util.go",
        "// vendored\nfunc A() {}\nfunc B() {}\nfunc C() {}\n// end\n",
    );

    // The destination address was resized to cover the new text
    project.assert_file_contains(".git-vendor/vendor.yml", "pkg/util.go:L2-L4");
    project.assert_file_contains(".git-vendor/vendor.lock", "pkg/util.go:L2-L4");
    assert_eq!(report.entries[0].to, "pkg/util.go:L2-L4");

    let check = engine.check_compliance(&ComplianceOptions::default()).unwrap();
    assert_eq!(check.summary.result, ComplianceResult::Synced);
    assert_eq!(check.summary.total, 1);
}

#[test]
fn test_report_json_shape() {
    let project = setup_project();
    project.write_file("lib/util.go", "package lib\nfunc A() {}\nfunc Z() {}");
    let engine = SyncEngine::open(project.root());

    let report = engine.check_compliance(&ComplianceOptions::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["summary"]["result"], "DRIFTED");
    assert_eq!(json["summary"]["source_drift"], 1);
    assert_eq!(json["entries"][0]["vendor"], "util");
    assert_eq!(json["entries"][0]["from"], "lib/util.go:L2-EOF");
    assert_eq!(json["dry_run"], false);
}

#[test]
fn test_mixed_backends() {
    // Real files and config, in-memory lock and cache
    let project = setup_project();
    let layout = ProjectLayout::new(project.root());
    let lock = Arc::new(MemoryLockStore::new(VendorLock::default()));
    let engine = SyncEngine::new(
        project.root(),
        Arc::new(LocalFs::new()),
        Arc::new(FileConfigStore::for_project(&layout)),
        lock.clone(),
        Arc::new(MemoryChecksumCache::new()),
    );

    let report = engine.sync(&SyncOptions::default()).unwrap();

    assert!(report.success);
    assert_eq!(lock.save_count(), 1);
    assert!(lock.snapshot().entry("util", "local").is_some());
    project.assert_file_not_exists(".git-vendor/vendor.lock");
}

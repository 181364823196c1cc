//! Runs the lint over a scratch `app/src` tree on disk.

use std::fs;
use std::path::Path;

use architecture_lint::{ArchitectureLintError, Violation, lint_app_sources};
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[fixture]
fn app_dir() -> TempDir {
    TempDir::new().expect("tempdir")
}

fn write_source(app: &Path, file: &str, contents: &str) {
    let path = app.join("src").join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directories");
    }
    fs::write(&path, contents).expect("write source file");
}

fn write_clean_layers(app: &Path) {
    write_source(
        app,
        "domain/grocery.rs",
        "pub struct ItemId(String); impl ItemId { pub fn new(v: &str) -> Self { Self(v.to_owned()) } }",
    );
    write_source(
        app,
        "screens/grocery_list.rs",
        "use crate::domain::grocery::ItemId; fn edit() { let _ = ItemId::new(\"a\"); }",
    );
    write_source(
        app,
        "inbound/console/session.rs",
        "use crate::screens::grocery_list; use crate::domain::grocery::ItemId; fn run() {}",
    );
    write_source(
        app,
        "outbound/memory/item_store.rs",
        "use crate::domain::grocery::ItemId; pub struct Store; impl Store { pub fn delete(&self, _id: ItemId) {} }",
    );
    write_source(
        app,
        "bootstrap.rs",
        "use crate::outbound::memory; use crate::screens::Backend; fn build() {}",
    );
}

fn violations(result: Result<(), ArchitectureLintError>) -> Vec<Violation> {
    match result {
        Err(ArchitectureLintError::Violations(violations)) => violations,
        other => panic!("expected violations, got {other:?}"),
    }
}

#[rstest]
fn clean_tree_passes(app_dir: TempDir) {
    write_clean_layers(app_dir.path());
    let result = lint_app_sources(app_dir.path());
    assert!(result.is_ok(), "result: {result:?}");
}

#[rstest]
fn test_harness_files_may_wire_adapters(app_dir: TempDir) {
    write_clean_layers(app_dir.path());
    write_source(
        app_dir.path(),
        "inbound/console/session_tests.rs",
        "use crate::outbound::memory::InMemoryItemStore; fn fixture() {}",
    );
    assert!(lint_app_sources(app_dir.path()).is_ok());
}

#[rstest]
fn every_violation_is_reported(app_dir: TempDir) {
    write_clean_layers(app_dir.path());
    write_source(
        app_dir.path(),
        "screens/login.rs",
        "use crate::outbound::firebase::FirebaseSessionService; fn submit() {}",
    );
    write_source(
        app_dir.path(),
        "domain/auth.rs",
        "use reqwest::Client; fn sign_in(_: Client) {}",
    );

    let mut found: Vec<(String, String)> = violations(lint_app_sources(app_dir.path()))
        .into_iter()
        .map(|violation| (violation.file.display().to_string(), violation.message))
        .collect();
    found.sort();

    assert_eq!(
        found,
        vec![
            (
                "domain/auth.rs".to_owned(),
                "domain module must not depend on external crate `reqwest`".to_owned(),
            ),
            (
                "screens/login.rs".to_owned(),
                "screens module must not depend on crate::outbound".to_owned(),
            ),
        ]
    );
}

#[rstest]
fn missing_layers_are_skipped(app_dir: TempDir) {
    write_source(app_dir.path(), "domain/notice.rs", "pub struct Notice;");
    assert!(lint_app_sources(app_dir.path()).is_ok());
}

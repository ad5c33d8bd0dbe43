//! Tests for manifest construction and lookup.

use std::sync::Arc;

use camino::Utf8PathBuf;
use rstest::{fixture, rstest};

use crate::command::adapters::InMemoryCommandSource;
use crate::command::domain::ReturnItem;
use crate::command::ports::{CommandSource, CommandSourceError, CommandSourceResult, SourceDocument};
use crate::command::services::ManifestBuilder;

struct BrokenSource;

impl CommandSource for BrokenSource {
    fn label(&self) -> &str {
        "broken"
    }

    fn documents(&self) -> CommandSourceResult<Vec<SourceDocument>> {
        Err(CommandSourceError::Open {
            root: Utf8PathBuf::from("/nowhere"),
            source: Arc::new(std::io::Error::other("permission denied")),
        })
    }
}

#[fixture]
fn global() -> InMemoryCommandSource {
    InMemoryCommandSource::new("global")
        .with_document("review", "---\nreturn: global follow-up\n---\nGlobal review")
        .with_document("deploy", "Deploy $ARGUMENTS")
}

#[fixture]
fn local() -> InMemoryCommandSource {
    InMemoryCommandSource::new("local")
        .with_document("review", "---\nreturn: local follow-up\n---\nLocal review")
        .with_document("team/lint", "Lint it")
}

#[rstest]
fn local_definitions_override_global(global: InMemoryCommandSource, local: InMemoryCommandSource) {
    let manifest = ManifestBuilder::new()
        .with_source(global)
        .with_source(local)
        .build();

    let review = manifest.get("review").expect("review registered");
    assert_eq!(review.template, "Local review");
    assert_eq!(
        review.first_return(),
        Some(&ReturnItem::prompt("local follow-up"))
    );
    assert_eq!(manifest.names(), vec!["deploy", "lint", "review"]);
    assert_eq!(manifest.len(), 3);
}

#[rstest]
fn nested_documents_resolve_by_name_and_path(local: InMemoryCommandSource) {
    let manifest = ManifestBuilder::new().with_source(local).build();

    let by_name = manifest.get("lint").expect("lint by name");
    let by_path = manifest.get("team/lint").expect("lint by path");

    assert_eq!(by_name.path, "team/lint");
    assert!(Arc::ptr_eq(by_name, by_path));
    assert!(manifest.get_by_path("lint").is_none());
}

#[rstest]
fn failing_source_contributes_nothing(global: InMemoryCommandSource) {
    let manifest = ManifestBuilder::new()
        .with_source(global)
        .with_source(BrokenSource)
        .build();

    assert_eq!(manifest.names(), vec!["deploy", "review"]);
}

#[rstest]
fn empty_builder_builds_empty_manifest() {
    let manifest = ManifestBuilder::new().build();

    assert!(manifest.is_empty());
    assert!(manifest.get("anything").is_none());
}

#[rstest]
fn repeated_builds_are_independent(global: InMemoryCommandSource) {
    let builder = ManifestBuilder::new().with_source(global);

    let first = builder.build();
    let second = builder.build();

    assert_eq!(first.names(), second.names());
    let first_review = first.get("review").expect("review in first build");
    let second_review = second.get("review").expect("review in second build");
    assert!(!Arc::ptr_eq(first_review, second_review));
}

//! Overrides persisted through the TOML file store

use std::collections::HashMap;
use std::path::Path;

use pretty_assertions::assert_eq;

use tenant_snippets::{
    CatalogLoader, FileOverrideStore, SnippetCatalog, SnippetError, SnippetOverrideStore,
    SnippetResolver, UpdateOutcome,
};

fn catalog() -> SnippetCatalog {
    CatalogLoader::new()
        .load_file(Path::new("tests/fixtures/snippets.toml"))
        .expect("fixture catalog should load")
}

#[test]
fn test_overrides_survive_a_new_resolver() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overrides.toml");

    let mut resolver = SnippetResolver::new(catalog(), FileOverrideStore::open(&path).unwrap());
    assert_eq!(
        resolver.update_source("B", "acme", "buzz").unwrap(),
        UpdateOutcome::Created
    );
    assert_eq!(
        resolver
            .update_source("emails.footer", "acme", "ACME, {name}")
            .unwrap(),
        UpdateOutcome::Created
    );
    drop(resolver);

    let resolver = SnippetResolver::new(catalog(), FileOverrideStore::open(&path).unwrap());
    assert_eq!(resolver.render("A", "acme", &HashMap::new()).unwrap(), "A: buzz");
    assert_eq!(
        resolver.resolve_source("emails.footer", "acme").unwrap(),
        "ACME, {name}"
    );
    assert_eq!(resolver.resolve_source("B", "globex").unwrap(), "bee");
}

#[test]
fn test_clearing_removes_override_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overrides.toml");

    let mut resolver = SnippetResolver::new(catalog(), FileOverrideStore::open(&path).unwrap());
    resolver.update_source("B", "acme", "buzz").unwrap();
    assert_eq!(
        resolver.update_source("B", "acme", "").unwrap(),
        UpdateOutcome::Removed
    );

    let store = resolver.into_store();
    assert!(store.all_for_tenant("acme").unwrap().is_empty());

    let reopened = FileOverrideStore::open(&path).unwrap();
    assert!(reopened.find("acme", "B").unwrap().is_none());
}

#[test]
fn test_file_format_groups_by_tenant() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overrides.toml");
    std::fs::write(
        &path,
        r#"
[tenants.acme]
welcome = "Hello from ACME, {name}!"

[tenants.globex]
B = "bzz"
"#,
    )
    .unwrap();

    let resolver = SnippetResolver::new(catalog(), FileOverrideStore::open(&path).unwrap());
    let supplied = HashMap::from([("name".to_string(), "Ada".to_string())]);
    assert_eq!(
        resolver.render("welcome", "acme", &supplied).unwrap(),
        "Hello from ACME, Ada!"
    );
    assert_eq!(resolver.render("A", "globex", &supplied).unwrap(), "A: bzz");
    assert_eq!(resolver.render("A", "acme", &supplied).unwrap(), "A: bee");
}

#[test]
fn test_failed_write_does_not_change_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let parent = dir.path().join("state");
    let path = parent.join("overrides.toml");

    let mut resolver = SnippetResolver::new(catalog(), FileOverrideStore::open(&path).unwrap());
    let err = resolver.update_source("B", "acme", "buzz").unwrap_err();
    assert!(matches!(err, SnippetError::Store(_)));
    assert_eq!(resolver.resolve_source("B", "acme").unwrap(), "bee");

    std::fs::create_dir(&parent).unwrap();
    assert_eq!(
        resolver.update_source("B", "acme", "buzz").unwrap(),
        UpdateOutcome::Created
    );
    assert_eq!(resolver.resolve_source("B", "acme").unwrap(), "buzz");
}

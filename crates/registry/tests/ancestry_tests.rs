//! Integration tests for pull manifest and tag resolution.

mod common;

use common::{TestRegistry, ids_of, repo};
use dockyard_core::RepositoryName;
use dockyard_registry::RegistryError;

/// Register, upload and finalize a repository with the given images.
async fn completed_repository(
    registry: &TestRegistry,
    name: &RepositoryName,
    images: &[(&str, &[&str])],
) {
    let owner = registry.create_user(name.namespace()).await;
    let ids: Vec<&str> = images.iter().map(|(id, _)| *id).collect();
    registry.register(&owner, name, &ids).await;
    for (id, chain) in images {
        registry.put_image(id, chain, 10, true, true).await;
    }
    registry
        .verifier
        .verify_and_finalize(name)
        .await
        .expect("Completion check failed");
}

async fn tag(registry: &TestRegistry, name: &RepositoryName, tag: &str, image_id: &str) {
    let tag = dockyard_core::TagName::parse(tag).unwrap();
    registry
        .tags
        .put_tag(name, &tag, format!("\"{image_id}\"").as_bytes(), Some("docker/1.0"))
        .await
        .expect("Tag write failed");
}

#[tokio::test]
async fn test_shared_ancestry_is_deduplicated() {
    let registry = TestRegistry::new().await;
    let name = repo("alice", "app");
    completed_repository(&registry, &name, &[("img1", &[]), ("img2", &["img1"])]).await;

    tag(&registry, &name, "latest", "img2").await;
    tag(&registry, &name, "v1", "img1").await;

    let manifest = registry.resolver.resolve_pull_manifest(&name).await.unwrap();
    assert_eq!(ids_of(manifest.image_ids().cloned()), vec!["img1", "img2"]);
}

#[tokio::test]
async fn test_later_tags_take_priority() {
    let registry = TestRegistry::new().await;
    let name = repo("alice", "app");
    completed_repository(
        &registry,
        &name,
        &[("base", &[]), ("left", &["base"]), ("right", &["base"])],
    )
    .await;

    tag(&registry, &name, "a", "left").await;
    tag(&registry, &name, "b", "right").await;

    let manifest = registry.resolver.resolve_pull_manifest(&name).await.unwrap();
    assert_eq!(
        ids_of(manifest.image_ids().cloned()),
        vec!["right", "base", "left"]
    );
}

#[tokio::test]
async fn test_chain_starting_with_head_is_not_repeated() {
    let registry = TestRegistry::new().await;
    let name = repo("alice", "app");
    completed_repository(&registry, &name, &[("img1", &[]), ("img2", &["img2", "img1"])]).await;

    tag(&registry, &name, "latest", "img2").await;

    let manifest = registry.resolver.resolve_pull_manifest(&name).await.unwrap();
    assert_eq!(ids_of(manifest.image_ids().cloned()), vec!["img2", "img1"]);
}

#[tokio::test]
async fn test_resolution_is_deterministic() {
    let registry = TestRegistry::new().await;
    let name = repo("alice", "app");
    completed_repository(
        &registry,
        &name,
        &[("a", &[]), ("b", &["a"]), ("c", &["b", "a"])],
    )
    .await;

    tag(&registry, &name, "one", "c").await;
    tag(&registry, &name, "two", "b").await;
    tag(&registry, &name, "three", "a").await;

    let first = registry.resolver.resolve_pull_manifest(&name).await.unwrap();
    let second = registry.resolver.resolve_pull_manifest(&name).await.unwrap();
    assert_eq!(first, second);

    let ids = ids_of(first.image_ids().cloned());
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(ids.len(), unique.len());
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_tag_pointing_at_missing_image_is_validation_error() {
    let registry = TestRegistry::new().await;
    let name = repo("alice", "app");
    completed_repository(&registry, &name, &[("img1", &[])]).await;

    tag(&registry, &name, "broken", "ghost").await;

    let err = registry
        .resolver
        .resolve_pull_manifest(&name)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Validation(_)));
}

#[tokio::test]
async fn test_no_tags_is_not_found() {
    let registry = TestRegistry::new().await;
    let name = repo("alice", "app");
    completed_repository(&registry, &name, &[("img1", &[])]).await;

    let err = registry
        .resolver
        .resolve_pull_manifest(&name)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(_)));

    let err = registry.resolver.resolve_tags(&name).await.unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(_)));
}

#[tokio::test]
async fn test_incomplete_repository_looks_missing() {
    let registry = TestRegistry::new().await;
    let alice = registry.create_user("alice").await;
    let name = repo("alice", "app");

    registry.register(&alice, &name, &["img1"]).await;
    registry.put_image("img1", &[], 10, false, false).await;
    tag(&registry, &name, "latest", "img1").await;

    let incomplete = registry
        .resolver
        .resolve_pull_manifest(&name)
        .await
        .unwrap_err();
    let missing = registry
        .resolver
        .resolve_pull_manifest(&repo("alice", "never"))
        .await
        .unwrap_err();

    assert_eq!(incomplete.to_string(), missing.to_string());
    assert!(matches!(incomplete, RegistryError::NotFound(_)));
}

#[tokio::test]
async fn test_resolve_tags_returns_latest_write_per_name() {
    let registry = TestRegistry::new().await;
    let name = repo("alice", "app");
    completed_repository(&registry, &name, &[("img1", &[]), ("img2", &["img1"])]).await;

    tag(&registry, &name, "latest", "img1").await;
    tag(&registry, &name, "v1", "img1").await;
    tag(&registry, &name, "latest", "img2").await;

    let tags = registry.resolver.resolve_tags(&name).await.unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags.get("latest").map(String::as_str), Some("img2"));
    assert_eq!(tags.get("v1").map(String::as_str), Some("img1"));
}

//! End-to-end resolution tests against a mock registry

use httpmock::prelude::*;
use pkgtree_errors::{Error, ResolveError};
use pkgtree_registry::{MetaCache, RegistryClient, RegistryConfig};
use pkgtree_resolver::resolve_manifest;
use pkgtree_types::{Manifest, Requirement};
use serde_json::{json, Value};
use std::collections::HashMap;

fn cache_for(server: &MockServer) -> MetaCache {
    let client = RegistryClient::new(&RegistryConfig {
        base_url: server.base_url() + "/",
        ..RegistryConfig::default()
    })
    .unwrap();
    MetaCache::new(client)
}

fn manifest(deps: &[(&str, &str)]) -> Manifest {
    Manifest {
        name: "root".to_string(),
        version: "1.0.0".to_string(),
        dependencies: deps
            .iter()
            .map(|(name, spec)| ((*name).to_string(), (*spec).to_string()))
            .collect(),
    }
}

/// Registry document with one version per entry: (version, [(dep, spec)])
fn meta(name: &str, versions: &[(&str, &[(&str, &str)])]) -> Value {
    let mut version_docs = serde_json::Map::new();
    for (version, deps) in versions {
        let deps: HashMap<&str, &str> = deps.iter().copied().collect();
        version_docs.insert(
            (*version).to_string(),
            json!({ "name": name, "version": version, "dependencies": deps }),
        );
    }
    json!({ "versions": version_docs })
}

#[tokio::test]
async fn linear_chain_resolves_three_nodes() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/a");
        then.status(200)
            .json_body(meta("a", &[("1.0.0", &[("b", "^2.0.0")])]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/b");
        then.status(200).json_body(meta("b", &[("2.0.0", &[])]));
    });

    let cache = cache_for(&server);
    let tree = resolve_manifest(&cache, &manifest(&[("a", "^1.0.0")]))
        .await
        .unwrap();

    let doc = tree.to_doc();
    assert_eq!(doc.name, "root");
    assert_eq!(doc.children.len(), 1);
    assert_eq!(doc.children[0].name, "a");
    assert_eq!(doc.children[0].version, "1.0.0");
    assert_eq!(doc.children[0].children.len(), 1);
    assert_eq!(doc.children[0].children[0].name, "b");
    assert_eq!(doc.children[0].children[0].version, "2.0.0");
    assert!(doc.children[0].children[0].children.is_empty());
}

#[tokio::test]
async fn empty_manifest_resolves_to_leaf() {
    let server = MockServer::start();
    let cache = cache_for(&server);

    let tree = resolve_manifest(&cache, &manifest(&[])).await.unwrap();
    let doc = tree.to_doc();
    assert_eq!(doc.name, "root");
    assert!(doc.children.is_empty());
}

#[tokio::test]
async fn diamond_dependency_merges_and_prunes() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/a");
        then.status(200)
            .json_body(meta("a", &[("1.0.0", &[("c", "^1.0.0")])]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/b");
        then.status(200)
            .json_body(meta("b", &[("1.0.0", &[("c", "^1.0.0")])]));
    });
    let c_mock = server.mock(|when, then| {
        when.method(GET).path("/c");
        then.status(200).json_body(meta(
            "c",
            &[("1.0.0", &[]), ("1.2.5", &[]), ("1.3.0", &[])],
        ));
    });

    let cache = cache_for(&server);
    let tree = resolve_manifest(&cache, &manifest(&[("a", "^1.0.0"), ("b", "^1.0.0")]))
        .await
        .unwrap();

    // Both subtrees asked for c, but the cache coalesced the fetches.
    c_mock.assert_hits(1);

    let doc = tree.to_doc();
    let a = &doc.children[0];
    let b = &doc.children[1];
    assert_eq!((a.name.as_str(), b.name.as_str()), ("a", "b"));

    // The highest matching c appears once, under the lexicographically
    // first parent, and is omitted under the other.
    assert_eq!(a.children.len(), 1);
    assert_eq!(a.children[0].name, "c");
    assert_eq!(a.children[0].version, "1.3.0");
    assert!(b.children.is_empty());
}

#[tokio::test]
async fn highest_satisfying_version_is_selected() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/a");
        then.status(200).json_body(meta(
            "a",
            &[
                ("0.9.0", &[]),
                ("1.0.0", &[]),
                ("1.4.2", &[]),
                ("2.0.0", &[]),
            ],
        ));
    });

    let cache = cache_for(&server);
    let tree = resolve_manifest(&cache, &manifest(&[("a", "^1.0.0")]))
        .await
        .unwrap();

    assert_eq!(tree.to_doc().children[0].version, "1.4.2");
}

#[tokio::test]
async fn tag_requirement_resolves_through_dist_tags() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/a");
        then.status(200).json_body(json!({
            "dist-tags": { "latest": "2.5.0" },
            "versions": {
                "2.5.0": { "name": "a", "version": "2.5.0", "dependencies": {} },
                "3.0.0-beta.1": { "name": "a", "version": "3.0.0-beta.1", "dependencies": {} }
            }
        }));
    });

    let cache = cache_for(&server);
    let builder = pkgtree_resolver::TreeBuilder::new(cache);
    let ty = builder
        .resolve_dependency("a", &Requirement::parse("latest"))
        .await
        .unwrap();

    assert_eq!(ty.version.to_string(), "2.5.0");
    // The recorded range is "exactly 2.5.0".
    assert!(ty.range.satisfies(&ty.version));
    assert!(!ty.range.satisfies(&semver::Version::parse("2.5.1").unwrap()));
}

#[tokio::test]
async fn cyclic_dependencies_fail() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/a");
        then.status(200)
            .json_body(meta("a", &[("1.0.0", &[("b", "^1.0.0")])]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/b");
        then.status(200)
            .json_body(meta("b", &[("1.0.0", &[("a", "^1.0.0")])]));
    });

    let cache = cache_for(&server);
    let err = resolve_manifest(&cache, &manifest(&[("a", "^1.0.0")]))
        .await
        .unwrap_err();

    match err {
        Error::Resolve(ResolveError::CyclicDependency { chain }) => {
            assert_eq!(chain, vec!["root", "a", "b", "a"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unsatisfiable_range_fails_with_no_matching_version() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/a");
        then.status(200).json_body(meta("a", &[("1.0.0", &[])]));
    });

    let cache = cache_for(&server);
    let err = resolve_manifest(&cache, &manifest(&[("a", "^3.0.0")]))
        .await
        .unwrap_err();

    match err {
        Error::Resolve(ResolveError::NoMatchingVersion { name, .. }) => assert_eq!(name, "a"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn absent_tag_fails_with_no_matching_version() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/a");
        then.status(200).json_body(meta("a", &[("1.0.0", &[])]));
    });

    let cache = cache_for(&server);
    let err = resolve_manifest(&cache, &manifest(&[("a", "next")]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Resolve(ResolveError::NoMatchingVersion { .. })
    ));
}

#[tokio::test]
async fn dangling_dist_tag_fails_with_missing_version_data() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/a");
        then.status(200).json_body(json!({
            "dist-tags": { "latest": "9.9.9" },
            "versions": {
                "1.0.0": { "name": "a", "version": "1.0.0", "dependencies": {} }
            }
        }));
    });

    let cache = cache_for(&server);
    let err = resolve_manifest(&cache, &manifest(&[("a", "latest")]))
        .await
        .unwrap_err();

    match err {
        Error::Resolve(ResolveError::MissingVersionData { name, version }) => {
            assert_eq!(name, "a");
            assert_eq!(version, "9.9.9");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn resolution_is_deterministic() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/a");
        then.status(200)
            .json_body(meta("a", &[("1.0.0", &[("c", "^1.0.0")])]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/b");
        then.status(200)
            .json_body(meta("b", &[("1.0.0", &[("c", "~1.2.0")])]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/c");
        then.status(200)
            .json_body(meta("c", &[("1.2.0", &[]), ("1.2.9", &[])]));
    });

    let cache = cache_for(&server);
    let manifest = manifest(&[("b", "^1.0.0"), ("a", "^1.0.0")]);

    let first = resolve_manifest(&cache, &manifest).await.unwrap().to_doc();
    let second = resolve_manifest(&cache, &manifest).await.unwrap().to_doc();
    assert_eq!(first, second);

    // Children attach in lexicographic order regardless of declaration order.
    let names: Vec<&str> = first.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[tokio::test]
async fn streaming_form_emits_children_before_parents() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/a");
        then.status(200)
            .json_body(meta("a", &[("1.0.0", &[("b", "^2.0.0")])]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/b");
        then.status(200).json_body(meta("b", &[("2.0.0", &[])]));
    });

    let cache = cache_for(&server);
    let tree = resolve_manifest(&cache, &manifest(&[("a", "^1.0.0")]))
        .await
        .unwrap();

    let lines = tree.stream_lines();
    let names: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["b", "a", "root"]);
    assert_eq!(lines[1].refs, vec!["b@2.0.0"]);
    assert_eq!(lines[2].refs, vec!["a@1.0.0"]);
}

//! Integration tests for snapshot resolution

mod common;

use std::sync::Arc;

use common::FakeProvider;
use driftenv_core::{Declarations, Error, Resolver};
use pretty_assertions::assert_eq;

const DECLS: &str = r#"
providers:
  prod:
    env_sync:
      - path: app
        source: prod
        remap:
          db_pass: DB_PASSWORD
    env:
      API_KEY:
        path: api
        source: prod
      OPTIONAL_FLAG:
        path: flag
        optional: true
  staging:
    env:
      API_KEY:
        path: api
        sink: prod
"#;

fn resolver() -> Resolver {
    let prod = FakeProvider::new("prod")
        .mapping("app", &[("db_pass", "p4ss"), ("db_user", "admin")])
        .value("api", "key-prod")
        .delay("app", 40);
    let staging = FakeProvider::new("staging").value("api", "key-staging");

    Resolver::new()
        .with_provider("prod", Arc::new(prod))
        .with_provider("staging", Arc::new(staging))
}

#[tokio::test]
async fn test_resolve_orders_by_declaration_not_completion() {
    let decls = Declarations::parse_yaml(DECLS).unwrap();
    let snapshot = resolver().resolve(&decls).await.unwrap();

    let keys: Vec<_> = snapshot
        .iter()
        .map(|e| format!("{}:{}", e.provider_name, e.key))
        .collect();
    assert_eq!(
        keys,
        vec![
            "prod:DB_PASSWORD",
            "prod:db_user",
            "prod:API_KEY",
            "staging:API_KEY",
        ]
    );
}

#[tokio::test]
async fn test_resolve_lookups_by_selector() {
    let decls = Declarations::parse_yaml(DECLS).unwrap();
    let snapshot = resolver().resolve(&decls).await.unwrap();

    assert_eq!(snapshot.env_by_key("API_KEY", ""), "key-prod");
    assert_eq!(
        snapshot.env_by_key_and_provider("API_KEY", "staging", ""),
        "key-staging"
    );
    assert_eq!(snapshot.env_by("DB_PASSWORD", "prod", "app/db_pass", ""), "p4ss");
    assert_eq!(snapshot.env_by_key("OPTIONAL_FLAG", "unset"), "unset");
}

#[tokio::test]
async fn test_resolve_unknown_provider() {
    let decls = Declarations::parse_yaml("providers:\n  ghost:\n    env:\n      X:\n        path: x\n")
        .unwrap();
    let err = resolver().resolve(&decls).await.unwrap_err();
    assert!(matches!(err, Error::UnknownProvider { ref name } if name == "ghost"));
}

#[tokio::test]
async fn test_resolve_propagates_required_absence() {
    let decls = Declarations::parse_yaml("providers:\n  prod:\n    env:\n      X:\n        path: nowhere\n")
        .unwrap();
    let err = resolver().resolve(&decls).await.unwrap_err();
    assert!(matches!(err, Error::Resolution { ref path, .. } if path == "nowhere"));
}

#[tokio::test]
async fn test_resolved_snapshot_drifts_between_roles() {
    let decls = Declarations::parse_yaml(DECLS).unwrap();
    let snapshot = resolver().resolve(&decls).await.unwrap();

    let (sources, targets) = driftenv_core::split_by_role(&snapshot);
    let drifts = driftenv_core::drift(&sources, &targets);

    let summary: Vec<_> = drifts
        .iter()
        .map(|d| format!("{}:{}:{}", d.label(), d.key(), d.kind))
        .collect();
    assert_eq!(
        summary,
        vec![
            "prod:DB_PASSWORD:missing",
            "prod:db_user:missing",
            "prod:API_KEY:changed",
        ]
    );
}

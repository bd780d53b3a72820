//! Install a batch, fill the resulting models with records and query them
//! back through the session.

use forge_core::{ErrorKind, InstallSession, InstallerConfig};
use forge_query::{
    DynamicRecord, FilterCondition, FilterOperator, IncludeSpec, JoinDefinition, QueryEngine,
    QueryOptions, SortDirection,
};
use forge_store::{MemoryBackend, StorageBackend};
use forge_test_utils::{ManifestBuilder, crm_manifest, sales_manifest};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use serde_json::{Map, Value, json};

fn data(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn ids(rows: &[DynamicRecord]) -> Vec<&str> {
    rows.iter().map(|r| r.id.as_str()).collect()
}

/// crm + sales installed, three contacts and four products.
#[fixture]
fn session() -> InstallSession {
    let mut session =
        InstallSession::new(Box::new(MemoryBackend::new()), InstallerConfig::default());
    session
        .install(vec![sales_manifest(), crm_manifest()])
        .unwrap();

    let backend = session.backend_mut();
    for (id, row) in [
        ("c1", json!({"name": "Ada", "email": "ada@example.com", "stage": "customer", "loyalty_points": 120})),
        ("c2", json!({"name": "Grace", "email": "grace@example.com", "stage": "lead", "loyalty_points": 15})),
        ("c3", json!({"name": "Linus", "stage": "buyer", "loyalty_points": 40})),
    ] {
        backend.upsert_record("contact", id, data(row)).unwrap();
    }
    for (id, row) in [
        ("p1", json!({"title": "Engine", "price": 1200, "contact_id": "c1"})),
        ("p2", json!({"title": "Compiler", "price": 800, "contact_id": "c2"})),
        ("p3", json!({"title": "Notebook", "price": 15, "contact_id": "c1"})),
        ("p4", json!({"title": "Orphan", "price": 5, "contact_id": "ghost"})),
    ] {
        backend.upsert_record("product", id, data(row)).unwrap();
    }
    session
}

#[rstest]
fn filter_order_and_paginate(session: InstallSession) {
    let options = QueryOptions::filtered(vec![FilterCondition::new(
        "price",
        FilterOperator::Gte,
        json!(10),
    )])
    .order_by("price", SortDirection::Desc)
    .offset(1)
    .limit(2);

    let rows = session.query("product", &options).unwrap();
    // Ordering is by string form: "800" > "15" > "1200".
    assert_eq!(ids(&rows), vec!["p3", "p1"]);
}

#[rstest]
fn conditions_fold_left_to_right(session: InstallSession) {
    // (stage = lead OR stage = buyer) AND loyalty_points > 20
    let options = QueryOptions::filtered(vec![
        FilterCondition::new("stage", FilterOperator::Eq, json!("lead")),
        FilterCondition::new("stage", FilterOperator::Eq, json!("buyer")).or(),
        FilterCondition::new("loyalty_points", FilterOperator::Gt, json!(20)),
    ]);

    let rows = session.query("contact", &options).unwrap();
    assert_eq!(ids(&rows), vec!["c3"]);
}

#[rstest]
fn inner_join_merges_prefixed_target_fields(session: InstallSession) {
    let options = QueryOptions::default()
        .join(JoinDefinition::inner("product", "contact_id", "contact", "id"))
        .order_by("title", SortDirection::Asc);

    let rows = session.query("product", &options).unwrap();
    assert_eq!(ids(&rows), vec!["p2", "p1", "p3"]);
    assert_eq!(rows[0].get("contact.name"), Some(&json!("Grace")));
    assert_eq!(rows[0].get("contact.id"), Some(&json!("c2")));
    assert_eq!(rows[0].get("title"), Some(&json!("Compiler")));
}

#[rstest]
fn left_join_keeps_unmatched_rows(session: InstallSession) {
    let options = QueryOptions::filtered(vec![FilterCondition::new(
        "title",
        FilterOperator::Eq,
        json!("Orphan"),
    )])
    .join(JoinDefinition::inner("product", "contact_id", "contact", "id").left());

    let rows = session.query("product", &options).unwrap();
    assert_eq!(ids(&rows), vec!["p4"]);
    assert_eq!(rows[0].get("contact.name"), None);
}

#[rstest]
fn include_attaches_children_under_alias(session: InstallSession) {
    let options = QueryOptions::default()
        .order_by("name", SortDirection::Asc)
        .include(IncludeSpec::new("product", "contact_id").alias("products"));

    let rows = session.query("contact", &options).unwrap();
    let counts: Vec<_> = rows
        .iter()
        .map(|r| r.related("products").map_or(0, <[DynamicRecord]>::len))
        .collect();
    assert_eq!(ids(&rows), vec!["c1", "c2", "c3"]);
    assert_eq!(counts, vec![2, 1, 0]);
}

#[rstest]
fn required_filtered_include_drops_parents(session: InstallSession) {
    let expensive = IncludeSpec::new("product", "contact_id")
        .required()
        .filtered(vec![FilterCondition::new(
            "price",
            FilterOperator::Gt,
            json!(500),
        )]);
    let rows = session
        .query("contact", &QueryOptions::default().include(expensive))
        .unwrap();

    assert_eq!(ids(&rows), vec!["c1", "c2"]);
    assert_eq!(ids(rows[0].related("product").unwrap()), vec!["p1"]);
}

#[rstest]
fn query_engine_runs_directly_over_memory_backend(session: InstallSession) {
    let backend = MemoryBackend::new();
    let empty = QueryEngine::new(&backend).run("contact", &QueryOptions::default());
    assert!(empty.is_err(), "unregistered model must not be queryable");

    let rows = session
        .backend()
        .records("contact", &QueryOptions::default().limit(1))
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[rstest]
fn record_writes_are_validated(mut session: InstallSession) {
    let missing_name = session
        .create_record("contact", data(json!({"email": "x@example.com"})))
        .unwrap_err();
    assert_eq!(missing_name.kind(), ErrorKind::Validation);

    let null_name = session
        .create_record("contact", data(json!({"name": null})))
        .unwrap_err();
    assert_eq!(null_name.kind(), ErrorKind::Validation);

    let unsafe_key = session
        .create_record("contact", data(json!({"name": "Eve", "bad;key": 1})))
        .unwrap_err();
    assert_eq!(unsafe_key.kind(), ErrorKind::Validation);

    let unknown_model = session
        .create_record("invoice", data(json!({"total": 1})))
        .unwrap_err();
    assert_eq!(unknown_model.kind(), ErrorKind::NotFound);
}

#[rstest]
fn update_and_delete_records(mut session: InstallSession) {
    let backend = session.backend_mut();

    let updated = backend
        .update_record("contact", "c2", data(json!({"stage": "customer"})))
        .unwrap();
    assert_eq!(updated.get("stage"), Some(&json!("customer")));
    assert_eq!(updated.get("name"), Some(&json!("Grace")));
    assert!(updated.updated_at >= updated.created_at);

    let cheap = QueryOptions::filtered(vec![FilterCondition::new(
        "price",
        FilterOperator::Lt,
        json!(100),
    )]);
    assert_eq!(backend.delete_records("product", &cheap).unwrap(), 2);

    backend.delete_record("product", "p1").unwrap();
    let err = backend.record_by_id("product", "p1").unwrap_err();
    assert!(err.is_not_found());

    let remaining = session.query("product", &QueryOptions::default()).unwrap();
    assert_eq!(ids(&remaining), vec!["p2"]);
}

#[rstest]
fn failed_batch_keeps_existing_records(mut session: InstallSession) {
    let broken = ManifestBuilder::new("loyalty", "1.0.0")
        .depends_on("crm")
        .impact(json!({"action": "addField", "targetModel": "contact", "field": {"name": "tier", "type": "string"}}))
        .impact(json!({"action": "addIndex", "targetModel": "contact", "field": "no_such_field"}))
        .build();

    let err = session
        .install(vec![crm_manifest(), broken])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ImpactApplication);

    let contact = session.model("contact").unwrap().unwrap();
    assert!(!contact.has_field("tier"));
    assert!(!session.registry().is_installed("loyalty"));

    let rows = session.query("contact", &QueryOptions::default()).unwrap();
    assert_eq!(rows.len(), 3);
}

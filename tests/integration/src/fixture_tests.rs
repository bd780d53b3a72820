//! Scenarios driven by the manifest files under `test-fixtures/`.

use std::path::{Path, PathBuf};

use forge_core::{ErrorKind, Installer, InstallerConfig};
use forge_modules::{discover_manifests, load_manifest, load_manifests, resolve_order};
use forge_schema::{CascadeRule, FieldType, ImpactAction};
use forge_store::{MemoryBackend, StorageBackend};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures")
}

fn module_files() -> Vec<PathBuf> {
    discover_manifests(&fixtures().join("modules")).unwrap()
}

#[test]
fn fixture_manifests_load_in_every_format() {
    let manifests = load_manifests(&module_files()).unwrap();
    let names: Vec<_> = manifests.iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["crm", "sales", "support"]);

    let crm = &manifests[0];
    assert_eq!(crm.module.author.as_deref(), Some("ACME"));
    assert!(crm.views.is_some());

    let support = &manifests[2];
    assert_eq!(support.dependencies.len(), 2);
    assert_eq!(support.impacts[0].action(), ImpactAction::AddRelation);
}

#[test]
fn fixture_batch_resolves_dependencies_first() {
    let mut files = module_files();
    files.reverse();
    let ordered = resolve_order(load_manifests(&files).unwrap()).unwrap();
    let names: Vec<_> = ordered.iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["crm", "sales", "support"]);
}

#[test]
fn fixture_batch_installs_with_file_config() {
    let config = InstallerConfig::load(&fixtures().join("forge.toml")).unwrap();
    assert_eq!(config, InstallerConfig::default());

    let mut backend = MemoryBackend::new();
    let report = Installer::new(config)
        .install(load_manifests(&module_files()).unwrap(), &mut backend)
        .unwrap();

    assert_eq!(report.order, vec!["crm", "sales", "support"]);
    assert_eq!(report.applied_impacts(), 6);

    let contact = backend.model("contact").unwrap();
    assert_eq!(
        contact.field("stage").unwrap().options,
        vec!["lead", "customer", "buyer", "churned"]
    );
    assert_eq!(
        contact.field("loyalty_points").unwrap().field_type,
        FieldType::Number
    );

    let ticket_id = backend.model("deal").unwrap().field("ticket_id").cloned().unwrap();
    let relation = ticket_id.relation.unwrap();
    assert_eq!(relation.target, "ticket");
    assert_eq!(relation.on_delete, Some(CascadeRule::SetNull));

    let owner = backend.managed_schema("ticket").unwrap().unwrap();
    assert_eq!((owner.module.as_str(), owner.version.as_str()), ("support", "0.3.1"));

    let changes: Vec<_> = backend
        .schema_changes()
        .iter()
        .map(|c| (c.module.as_str(), c.model.as_str(), c.action))
        .collect();
    assert_eq!(
        changes,
        vec![
            ("sales", "contact", ImpactAction::ExtendEnum),
            ("sales", "contact", ImpactAction::AddField),
            ("sales", "contact", ImpactAction::AddIndex),
            ("sales", "deal", ImpactAction::CreateModelTable),
            ("support", "deal", ImpactAction::AddRelation),
            ("support", "contact", ImpactAction::ExtendEnum),
        ]
    );
    assert!(backend.schema_changes().iter().all(|c| c.operation == "install"));
}

#[rstest]
#[case::cycle(&["broken/cycle-a.json", "broken/cycle-b.json"], ErrorKind::CyclicDependency)]
#[case::old_dependency(&["broken/old-crm.json", "modules/sales.toml"], ErrorKind::VersionMismatch)]
#[case::missing_dependency(&["modules/support.yaml"], ErrorKind::MissingDependency)]
fn broken_batches_fail_before_touching_storage(
    #[case] files: &[&str],
    #[case] expected: ErrorKind,
) {
    let paths: Vec<PathBuf> = files.iter().map(|f| fixtures().join(f)).collect();
    let manifests = load_manifests(&paths).unwrap();

    let mut backend = MemoryBackend::new();
    let err = Installer::default()
        .install(manifests, &mut backend)
        .unwrap_err();

    assert_eq!(err.kind(), expected);
    assert!(!backend.is_initialized());
    assert_eq!(backend.models().count(), 0);
}

#[test]
fn unsafe_identifier_is_rejected_at_load() {
    let err = load_manifest(&fixtures().join("broken/unsafe.json")).unwrap_err();
    let err = forge_core::Error::from(err);
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("title; DROP TABLE report"));
}

#[test]
fn manifest_copied_to_temp_dir_loads_identically() {
    let dir = tempfile::TempDir::new().unwrap();
    let source = fixtures().join("modules/sales.toml");
    let copy = dir.path().join("sales.toml");
    std::fs::copy(&source, &copy).unwrap();

    assert_eq!(load(&source), load(&copy));
}

fn load(path: &Path) -> forge_modules::Manifest {
    load_manifest(path).unwrap()
}

//! Manifest fixtures.
//!
//! The stock batch is two modules: `crm` owns `contact`, and `sales`
//! depends on `crm@>=1.2.0`, owns `product` and applies impacts to
//! `contact`.

use forge_modules::{Manifest, ManifestDocument, ModuleDescriptor};
use forge_schema::{FieldDefinition, FieldType, ModelDefinition, RawImpact};
use serde_json::{Value, json};

/// Builds manifests in code.
///
/// # Example
///
/// ```rust
/// use forge_test_utils::ManifestBuilder;
/// use serde_json::json;
///
/// let manifest = ManifestBuilder::new("sales", "1.0.0")
///     .depends_on("crm@>=1.2.0")
///     .impact(json!({"action": "createModelTable", "targetModel": "contact"}))
///     .build();
/// assert_eq!(manifest.dependencies.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    document: ManifestDocument,
}

impl ManifestBuilder {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            document: ManifestDocument {
                module: ModuleDescriptor::new(name, version),
                models: Vec::new(),
                depends_on: Vec::new(),
                impacts: Vec::new(),
                views: None,
                workflows: None,
            },
        }
    }

    pub fn author(mut self, author: &str) -> Self {
        self.document.module.author = Some(author.to_string());
        self
    }

    pub fn depends_on(mut self, expression: &str) -> Self {
        self.document.depends_on.push(expression.to_string());
        self
    }

    pub fn model(mut self, model: ModelDefinition) -> Self {
        self.document.models.push(model);
        self
    }

    /// Add an impact from its manifest JSON form.
    ///
    /// # Panics
    ///
    /// Panics if `impact` is not an object with an `action` string.
    pub fn impact(mut self, impact: Value) -> Self {
        let raw: RawImpact =
            serde_json::from_value(impact).expect("ManifestBuilder::impact: not an impact object");
        self.document.impacts.push(raw);
        self
    }

    pub fn document(self) -> ManifestDocument {
        self.document
    }

    pub fn try_build(self) -> forge_modules::Result<Manifest> {
        Manifest::from_document(self.document)
    }

    /// # Panics
    ///
    /// Panics if the manifest does not validate.
    pub fn build(self) -> Manifest {
        self.try_build()
            .expect("ManifestBuilder::build: manifest failed validation")
    }
}

/// `contact` as declared by `crm`.
pub fn contact_model() -> ModelDefinition {
    ModelDefinition::new("contact", "crm")
        .with_field(FieldDefinition::new("name", FieldType::String).required())
        .with_field(FieldDefinition::new("email", FieldType::String))
        .with_field(FieldDefinition::selection("stage", ["lead", "customer"]))
}

/// `product` as declared by `sales`.
pub fn product_model() -> ModelDefinition {
    ModelDefinition::new("product", "sales")
        .with_field(FieldDefinition::new("title", FieldType::String).required())
        .with_field(FieldDefinition::new("price", FieldType::Number))
        .with_field(FieldDefinition::relation("contact_id", "contact"))
}

/// `crm@1.2.0`, owning `contact`.
pub fn crm_manifest() -> Manifest {
    crm_builder("1.2.0").build()
}

pub fn crm_builder(version: &str) -> ManifestBuilder {
    ManifestBuilder::new("crm", version)
        .author("ACME")
        .model(contact_model())
}

/// `sales@1.0.0`, depending on `crm@>=1.2.0`.
pub fn sales_manifest() -> Manifest {
    sales_builder().build()
}

pub fn sales_builder() -> ManifestBuilder {
    ManifestBuilder::new("sales", "1.0.0")
        .depends_on("crm@>=1.2.0")
        .model(product_model())
        .impact(json!({
            "action": "extendEnum",
            "targetModel": "contact",
            "field": "stage",
            "values": ["buyer"]
        }))
        .impact(json!({
            "action": "addField",
            "targetModel": "contact",
            "field": {"name": "loyalty_points", "type": "number"}
        }))
        .impact(json!({
            "action": "addIndex",
            "targetModel": "contact",
            "field": "email",
            "unique": true
        }))
        .impact(json!({"action": "createModelTable", "targetModel": "product"}))
}

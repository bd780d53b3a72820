//! Query options.

use serde::{Deserialize, Serialize};

use crate::filter::FilterCondition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "ASC")]
    Asc,
    #[serde(alias = "DESC")]
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    #[default]
    #[serde(alias = "INNER")]
    Inner,
    #[serde(alias = "LEFT")]
    Left,
}

/// Equality join between the queried model and one other model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinDefinition {
    pub source_model: String,
    pub target_model: String,
    pub source_field: String,
    pub target_field: String,
    #[serde(default, rename = "type", alias = "kind")]
    pub kind: JoinKind,
}

impl JoinDefinition {
    pub fn inner(
        source_model: impl Into<String>,
        source_field: impl Into<String>,
        target_model: impl Into<String>,
        target_field: impl Into<String>,
    ) -> Self {
        Self {
            source_model: source_model.into(),
            target_model: target_model.into(),
            source_field: source_field.into(),
            target_field: target_field.into(),
            kind: JoinKind::Inner,
        }
    }

    pub fn left(mut self) -> Self {
        self.kind = JoinKind::Left;
        self
    }
}

/// Related records to attach to each parent.
///
/// A child matches a parent when `child[foreign_key] == parent[target_key]`,
/// compared by string form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeSpec {
    pub model: String,
    pub foreign_key: String,
    #[serde(default = "default_target_key")]
    pub target_key: String,
    /// Drop parents that end up with no related records.
    #[serde(default)]
    pub required: bool,
    #[serde(default, rename = "where")]
    pub conditions: Vec<FilterCondition>,
    #[serde(default)]
    pub includes: Vec<IncludeSpec>,
    #[serde(default, rename = "as", skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

fn default_target_key() -> String {
    "id".to_string()
}

impl IncludeSpec {
    pub fn new(model: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            foreign_key: foreign_key.into(),
            target_key: default_target_key(),
            required: false,
            conditions: Vec::new(),
            includes: Vec::new(),
            alias: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn target_key(mut self, key: impl Into<String>) -> Self {
        self.target_key = key.into();
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn filtered(mut self, conditions: Vec<FilterCondition>) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_include(mut self, include: IncludeSpec) -> Self {
        self.includes.push(include);
        self
    }

    /// Key under which children are attached.
    pub fn key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.model)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    #[serde(default, rename = "where")]
    pub conditions: Vec<FilterCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(default)]
    pub direction: SortDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<JoinDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<IncludeSpec>,
}

impl QueryOptions {
    pub fn filtered(conditions: Vec<FilterCondition>) -> Self {
        Self {
            conditions,
            ..Self::default()
        }
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some(field.into());
        self.direction = direction;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn join(mut self, join: JoinDefinition) -> Self {
        self.join = Some(join);
        self
    }

    pub fn include(mut self, include: IncludeSpec) -> Self {
        self.includes.push(include);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Connective, FilterOperator};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_options() {
        let options: QueryOptions = serde_json::from_value(json!({
            "where": [
                {"field": "status", "operator": "=", "value": "active"},
                {"field": "age", "operator": ">", "value": 30, "connective": "OR"}
            ],
            "orderBy": "name",
            "direction": "desc",
            "limit": 10,
            "offset": 5,
            "join": {
                "sourceModel": "product",
                "targetModel": "contact",
                "sourceField": "contact_id",
                "targetField": "id",
                "type": "left"
            },
            "includes": [
                {"model": "order", "foreignKey": "contact_id", "required": true, "as": "orders",
                 "includes": [{"model": "line", "foreignKey": "order_id"}]}
            ]
        }))
        .unwrap();

        assert_eq!(options.conditions.len(), 2);
        assert_eq!(options.conditions[1].operator, FilterOperator::Gt);
        assert_eq!(options.conditions[1].connective, Connective::Or);
        assert_eq!(options.direction, SortDirection::Desc);
        assert_eq!(options.limit, Some(10));
        assert_eq!(options.offset, Some(5));
        assert_eq!(
            options.join,
            Some(JoinDefinition::inner("product", "contact_id", "contact", "id").left())
        );

        let include = &options.includes[0];
        assert!(include.required);
        assert_eq!(include.target_key, "id");
        assert_eq!(include.key(), "orders");
        assert_eq!(include.includes[0].key(), "line");
    }

    #[test]
    fn test_defaults() {
        let options: QueryOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options, QueryOptions::default());
        assert_eq!(options.direction, SortDirection::Asc);
    }

    #[test]
    fn test_builder() {
        let options = QueryOptions::default()
            .order_by("name", SortDirection::Desc)
            .limit(1)
            .offset(2)
            .include(IncludeSpec::new("order", "contact_id").required());
        assert_eq!(options.order_by.as_deref(), Some("name"));
        assert_eq!(options.limit, Some(1));
        assert_eq!(options.offset, Some(2));
        assert!(options.includes[0].required);
    }
}

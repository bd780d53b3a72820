//! Single equality join.

use serde_json::{Map, Value};

use crate::options::{JoinDefinition, JoinKind};
use crate::record::DynamicRecord;

/// Join `sources` against `targets` over the full cross product.
///
/// Each matched pair becomes one row carrying the source id and timestamps.
/// Its data map holds the source fields unprefixed, then every target field
/// as `<target_model>.<field>`, plus `<target_model>.id`. A left join keeps
/// an unmatched source row as it is.
pub fn join_records(
    join: &JoinDefinition,
    sources: Vec<DynamicRecord>,
    targets: &[DynamicRecord],
) -> Vec<DynamicRecord> {
    let mut rows = Vec::new();

    for source in sources {
        let Some(key) = source.field_text(&join.source_field) else {
            if join.kind == JoinKind::Left {
                rows.push(source);
            }
            continue;
        };

        let mut matched = false;
        for target in targets {
            if target.field_text(&join.target_field).as_deref() == Some(key.as_str()) {
                matched = true;
                rows.push(merge(&join.target_model, &source, target));
            }
        }

        if !matched && join.kind == JoinKind::Left {
            rows.push(source);
        }
    }

    rows
}

fn merge(target_model: &str, source: &DynamicRecord, target: &DynamicRecord) -> DynamicRecord {
    let mut data: Map<String, Value> = source.data.clone();
    data.insert(
        format!("{target_model}.id"),
        Value::String(target.id.clone()),
    );
    for (key, value) in &target.data {
        data.insert(format!("{target_model}.{key}"), value.clone());
    }

    DynamicRecord {
        id: source.id.clone(),
        data,
        created_at: source.created_at,
        updated_at: source.updated_at,
        includes: source.includes.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn products() -> Vec<DynamicRecord> {
        vec![
            DynamicRecord::from_value("p1", json!({"name": "Lamp", "contact_id": "c1"})),
            DynamicRecord::from_value("p2", json!({"name": "Desk", "contact_id": "c9"})),
            DynamicRecord::from_value("p3", json!({"name": "Chair"})),
        ]
    }

    fn contacts() -> Vec<DynamicRecord> {
        vec![
            DynamicRecord::from_value("c1", json!({"name": "Ada"})),
            DynamicRecord::from_value("c2", json!({"name": "Grace"})),
        ]
    }

    #[test]
    fn test_inner_join_merges_matching_pairs() {
        let join = JoinDefinition::inner("product", "contact_id", "contact", "id");
        let rows = join_records(&join, products(), &contacts());

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.id, "p1");
        assert_eq!(row.get("name"), Some(&json!("Lamp")));
        assert_eq!(row.get("contact.name"), Some(&json!("Ada")));
        assert_eq!(row.get("contact.id"), Some(&json!("c1")));
    }

    #[test]
    fn test_left_join_keeps_unmatched_rows() {
        let join = JoinDefinition::inner("product", "contact_id", "contact", "id").left();
        let rows = join_records(&join, products(), &contacts());

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
        assert_eq!(rows[1].get("contact.name"), None);
    }

    #[test]
    fn test_one_row_per_matching_pair() {
        let contacts = vec![
            DynamicRecord::from_value("x", json!({"code": "c1", "name": "A"})),
            DynamicRecord::from_value("y", json!({"code": "c1", "name": "B"})),
        ];
        let join = JoinDefinition::inner("product", "contact_id", "contact", "code");
        let rows = join_records(&join, products(), &contacts);

        let names: Vec<_> = rows.iter().map(|r| r.get("contact.name").cloned()).collect();
        assert_eq!(names, vec![Some(json!("A")), Some(json!("B"))]);
    }

    #[test]
    fn test_numeric_and_string_keys_compare_by_text() {
        let sources = vec![DynamicRecord::from_value("s", json!({"ref": 7}))];
        let targets = vec![DynamicRecord::from_value("t", json!({"code": "7"}))];
        let join = JoinDefinition::inner("a", "ref", "b", "code");
        assert_eq!(join_records(&join, sources, &targets).len(), 1);
    }
}

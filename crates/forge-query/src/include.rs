//! Nested include resolution.

use crate::engine::RecordSource;
use crate::error::Result;
use crate::filter::matches_all;
use crate::options::IncludeSpec;
use crate::record::DynamicRecord;

/// Attach related records to every parent, one include spec at a time.
///
/// Children are fetched once per spec, filtered by the spec's own conditions
/// and resolved against their nested includes before being matched to
/// parents. Parents left without children by a `required` include are
/// dropped.
pub fn attach_includes<S: RecordSource + ?Sized>(
    source: &S,
    parents: Vec<DynamicRecord>,
    specs: &[IncludeSpec],
) -> Result<Vec<DynamicRecord>> {
    let mut parents = parents;

    for spec in specs {
        let children: Vec<DynamicRecord> = source
            .scan(&spec.model)?
            .into_iter()
            .filter(|child| matches_all(&spec.conditions, child))
            .collect();
        let children = attach_includes(source, children, &spec.includes)?;

        tracing::trace!(
            model = %spec.model,
            children = children.len(),
            required = spec.required,
            "Resolving include"
        );

        parents = parents
            .into_iter()
            .filter_map(|mut parent| {
                let related: Vec<DynamicRecord> = match parent.field_text(&spec.target_key) {
                    Some(key) => children
                        .iter()
                        .filter(|child| {
                            child.field_text(&spec.foreign_key).as_deref() == Some(key.as_str())
                        })
                        .cloned()
                        .collect(),
                    None => Vec::new(),
                };

                if spec.required && related.is_empty() {
                    return None;
                }
                parent.includes.insert(spec.key().to_string(), related);
                Some(parent)
            })
            .collect();
    }

    Ok(parents)
}

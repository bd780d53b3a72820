//! Query execution.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::filter::matches_all;
use crate::include::attach_includes;
use crate::join::join_records;
use crate::options::{QueryOptions, SortDirection};
use crate::record::DynamicRecord;

/// Anything that can hand out the records of a model.
///
/// The engine only reads through this seam, so a plain map, a storage
/// backend's record tables or a test double all answer queries the same way.
pub trait RecordSource {
    /// All records of `model`, in insertion order.
    fn scan(&self, model: &str) -> Result<Vec<DynamicRecord>>;
}

impl RecordSource for BTreeMap<String, Vec<DynamicRecord>> {
    fn scan(&self, model: &str) -> Result<Vec<DynamicRecord>> {
        Ok(self.get(model).cloned().unwrap_or_default())
    }
}

impl RecordSource for HashMap<String, Vec<DynamicRecord>> {
    fn scan(&self, model: &str) -> Result<Vec<DynamicRecord>> {
        Ok(self.get(model).cloned().unwrap_or_default())
    }
}

/// Evaluates [`QueryOptions`] over a [`RecordSource`].
///
/// The pipeline runs join, filter, includes, ordering, offset and then
/// limit, in that order.
pub struct QueryEngine<'a, S: RecordSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: RecordSource + ?Sized> QueryEngine<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    pub fn run(&self, model: &str, options: &QueryOptions) -> Result<Vec<DynamicRecord>> {
        let mut rows = self.source.scan(model)?;

        if let Some(join) = &options.join {
            if join.source_model != model {
                return Err(Error::JoinSourceMismatch {
                    expected: model.to_string(),
                    found: join.source_model.clone(),
                });
            }
            let targets = self.source.scan(&join.target_model)?;
            rows = join_records(join, rows, &targets);
        }

        rows.retain(|record| matches_all(&options.conditions, record));

        if !options.includes.is_empty() {
            rows = attach_includes(self.source, rows, &options.includes)?;
        }

        if let Some(field) = &options.order_by {
            sort_rows(&mut rows, field, options.direction);
        }

        let offset = options.offset.unwrap_or(0);
        let limit = options.limit.unwrap_or(usize::MAX);
        let rows: Vec<DynamicRecord> = rows.into_iter().skip(offset).take(limit).collect();

        tracing::debug!(model, rows = rows.len(), "Query complete");
        Ok(rows)
    }

    /// Run `options` and return the first row, if any.
    pub fn first(&self, model: &str, options: &QueryOptions) -> Result<Option<DynamicRecord>> {
        let options = QueryOptions {
            limit: Some(1),
            ..options.clone()
        };
        Ok(self.run(model, &options)?.into_iter().next())
    }
}

/// Stable sort by the string form of `field`. Absent fields sort as "".
fn sort_rows(rows: &mut [DynamicRecord], field: &str, direction: SortDirection) {
    let key = |record: &DynamicRecord| record.field_text(field).unwrap_or_default();
    match direction {
        SortDirection::Asc => rows.sort_by_cached_key(key),
        SortDirection::Desc => rows.sort_by_cached_key(|record| Reverse(key(record))),
    }
}

//! The `query` command: run the query engine over a JSON record file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use forge_query::{
    DynamicRecord, FilterCondition, FilterOperator, QueryEngine, QueryOptions, SortDirection,
    value_text,
};
use serde_json::Value;

use crate::error::{CliError, Result};

/// Arguments of `forge query`.
#[derive(Debug, Clone, Default)]
pub struct QueryArgs {
    pub data: PathBuf,
    pub model: String,
    pub conditions: Vec<String>,
    pub or: bool,
    pub options: Option<PathBuf>,
    pub order_by: Option<String>,
    pub desc: bool,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl QueryArgs {
    /// Build query options: the `--options` file first, then flags on top.
    pub fn query_options(&self) -> Result<QueryOptions> {
        let mut options = match &self.options {
            Some(path) => serde_json::from_str(&read(path)?)?,
            None => QueryOptions::default(),
        };

        for text in &self.conditions {
            let condition = parse_condition(text)?;
            let condition = if self.or && !options.conditions.is_empty() {
                condition.or()
            } else {
                condition
            };
            options.conditions.push(condition);
        }

        if let Some(field) = &self.order_by {
            let direction = if self.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            options = options.order_by(field.clone(), direction);
        }
        if let Some(limit) = self.limit {
            options = options.limit(limit);
        }
        if let Some(offset) = self.offset {
            options = options.offset(offset);
        }
        Ok(options)
    }
}

/// Run the query and print the matching rows as JSON.
pub fn run_query(args: &QueryArgs) -> Result<()> {
    let tables = load_tables(&args.data)?;
    let options = args.query_options()?;

    let rows = QueryEngine::new(&tables).run(&args.model, &options)?;
    tracing::debug!(model = %args.model, rows = rows.len(), "Query finished");
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::user(format!("cannot read {}: {e}", path.display())))
}

/// Read `{ "<model>": [ {..}, .. ] }` into record tables.
///
/// A row's `id` key becomes the record id; rows without one are numbered
/// `<model>-<n>` from 1.
pub fn load_tables(path: &Path) -> Result<BTreeMap<String, Vec<DynamicRecord>>> {
    let raw: BTreeMap<String, Vec<Value>> = serde_json::from_str(&read(path)?)?;

    let tables = raw
        .into_iter()
        .map(|(model, rows)| {
            let records = rows
                .into_iter()
                .enumerate()
                .map(|(index, row)| {
                    let id = match row.get("id") {
                        Some(id) if !id.is_null() => value_text(id),
                        _ => format!("{model}-{}", index + 1),
                    };
                    DynamicRecord::from_value(id, row)
                })
                .collect();
            (model, records)
        })
        .collect();
    Ok(tables)
}

// Two-character operators first so `>=` is not read as `>`.
const OPERATORS: [&str; 7] = [">=", "<=", "!=", "=", ">", "<", "~"];

/// Parse `field<op>value`.
///
/// The value is read as JSON when it parses (`30`, `true`, `null`,
/// `"quoted"`) and as a plain string otherwise.
pub fn parse_condition(text: &str) -> Result<FilterCondition> {
    let invalid = |reason: &str| CliError::user(format!("invalid condition '{text}': {reason}"));

    let (position, operator) = text
        .char_indices()
        .find_map(|(i, _)| {
            OPERATORS
                .iter()
                .find(|op| text[i..].starts_with(**op))
                .map(|op| (i, *op))
        })
        .ok_or_else(|| invalid("expected field<op>value"))?;

    let field = text[..position].trim();
    if field.is_empty() {
        return Err(invalid("missing field name"));
    }
    let raw_value = text[position + operator.len()..].trim();
    let value = serde_json::from_str(raw_value).unwrap_or_else(|_| Value::String(raw_value.to_string()));

    Ok(FilterCondition::new(
        field,
        FilterOperator::from_str(operator)?,
        value,
    ))
}

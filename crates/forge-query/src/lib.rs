//! In-memory query engine for Module Forge records.
//!
//! A query names a model and optionally carries [`QueryOptions`]: a flat list
//! of filter conditions, an order field, pagination, one join and any number
//! of nested includes. The [`QueryEngine`] evaluates them over any
//! [`RecordSource`], which lets the same code serve a plain in-memory map and
//! a storage backend's record tables.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use forge_query::{DynamicRecord, FilterCondition, FilterOperator, QueryEngine, QueryOptions};
//! use serde_json::json;
//!
//! let mut store = BTreeMap::new();
//! store.insert(
//!     "item".to_string(),
//!     vec![
//!         DynamicRecord::from_value("1", json!({"a": 1, "b": "x"})),
//!         DynamicRecord::from_value("2", json!({"a": 2, "b": "y"})),
//!     ],
//! );
//!
//! let options = QueryOptions::filtered(vec![FilterCondition::new("a", FilterOperator::Gt, json!(1))]);
//! let rows = QueryEngine::new(&store).run("item", &options).unwrap();
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].id, "2");
//! ```

pub mod engine;
pub mod error;
pub mod filter;
pub mod include;
pub mod join;
pub mod options;
pub mod record;

pub use engine::{QueryEngine, RecordSource};
pub use error::{Error, Result};
pub use filter::{Connective, FilterCondition, FilterOperator, matches_all};
pub use options::{IncludeSpec, JoinDefinition, JoinKind, QueryOptions, SortDirection};
pub use record::{DynamicRecord, value_text};

//! Filter conditions.
//!
//! Conditions form a flat list evaluated strictly left to right. The first
//! condition seeds the result; every later condition is combined with the
//! running result through its own connective. There is no precedence and no
//! grouping, so `a OR b AND c` means `(a OR b) AND c`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::record::{DynamicRecord, value_text};

/// Comparison applied between a record field and a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    #[serde(rename = "=", alias = "eq")]
    Eq,
    #[serde(rename = "!=", alias = "ne")]
    Ne,
    #[serde(rename = ">", alias = "gt")]
    Gt,
    #[serde(rename = ">=", alias = "gte")]
    Gte,
    #[serde(rename = "<", alias = "lt")]
    Lt,
    #[serde(rename = "<=", alias = "lte")]
    Lte,
    #[serde(rename = "contains")]
    Contains,
}

impl FilterOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOperator::Eq => "=",
            FilterOperator::Ne => "!=",
            FilterOperator::Gt => ">",
            FilterOperator::Gte => ">=",
            FilterOperator::Lt => "<",
            FilterOperator::Lte => "<=",
            FilterOperator::Contains => "contains",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "=" | "==" | "eq" => Ok(FilterOperator::Eq),
            "!=" | "<>" | "ne" => Ok(FilterOperator::Ne),
            ">" | "gt" => Ok(FilterOperator::Gt),
            ">=" | "gte" => Ok(FilterOperator::Gte),
            "<" | "lt" => Ok(FilterOperator::Lt),
            "<=" | "lte" => Ok(FilterOperator::Lte),
            "contains" | "~" => Ok(FilterOperator::Contains),
            other => Err(Error::InvalidCondition {
                condition: other.to_string(),
                reason: "unknown operator".to_string(),
            }),
        }
    }
}

/// How a condition combines with the result of the conditions before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Connective {
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

/// A single `field <operator> value` test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
    /// Ignored on the first condition of a list.
    #[serde(default)]
    pub connective: Connective,
}

impl FilterCondition {
    /// An `AND` condition.
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
            connective: Connective::And,
        }
    }

    /// Switch this condition's connective to `OR`.
    pub fn or(mut self) -> Self {
        self.connective = Connective::Or;
        self
    }

    /// Evaluate this condition alone against `record`.
    ///
    /// A missing field fails every operator except `!=`.
    pub fn matches(&self, record: &DynamicRecord) -> bool {
        let Some(actual) = record.field_text(&self.field) else {
            return self.operator == FilterOperator::Ne;
        };
        let expected = value_text(&self.value);

        match self.operator {
            FilterOperator::Eq => actual == expected,
            FilterOperator::Ne => actual != expected,
            FilterOperator::Contains => actual.contains(&expected),
            FilterOperator::Gt => compare_text(&actual, &expected) == Ordering::Greater,
            FilterOperator::Gte => compare_text(&actual, &expected) != Ordering::Less,
            FilterOperator::Lt => compare_text(&actual, &expected) == Ordering::Less,
            FilterOperator::Lte => compare_text(&actual, &expected) != Ordering::Greater,
        }
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.field,
            self.operator,
            value_text(&self.value)
        )
    }
}

/// Numeric comparison when both sides parse as numbers, lexicographic otherwise.
fn compare_text(actual: &str, expected: &str) -> Ordering {
    match (actual.trim().parse::<f64>(), expected.trim().parse::<f64>()) {
        (Ok(a), Ok(b)) if !a.is_nan() && !b.is_nan() => {
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        _ => actual.cmp(expected),
    }
}

/// Left-fold a condition list over `record`. An empty list matches everything.
pub fn matches_all(conditions: &[FilterCondition], record: &DynamicRecord) -> bool {
    let mut iter = conditions.iter();
    let Some(first) = iter.next() else {
        return true;
    };
    iter.fold(first.matches(record), |acc, condition| {
        match condition.connective {
            Connective::And => acc && condition.matches(record),
            Connective::Or => acc || condition.matches(record),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn rows() -> Vec<DynamicRecord> {
        vec![
            DynamicRecord::from_value("1", json!({"a": 1, "b": "x"})),
            DynamicRecord::from_value("2", json!({"a": 2, "b": "y"})),
        ]
    }

    fn ids(conditions: &[FilterCondition]) -> Vec<String> {
        rows()
            .into_iter()
            .filter(|r| matches_all(conditions, r))
            .map(|r| r.id)
            .collect()
    }

    #[test]
    fn test_single_greater_than() {
        let conditions = [FilterCondition::new("a", FilterOperator::Gt, json!(1))];
        assert_eq!(ids(&conditions), vec!["2"]);
    }

    #[test]
    fn test_and_conditions() {
        let conditions = [
            FilterCondition::new("a", FilterOperator::Gt, json!(0)),
            FilterCondition::new("b", FilterOperator::Eq, json!("y")),
        ];
        assert_eq!(ids(&conditions), vec!["2"]);
    }

    #[test]
    fn test_or_conditions() {
        let conditions = [
            FilterCondition::new("a", FilterOperator::Eq, json!(1)),
            FilterCondition::new("b", FilterOperator::Eq, json!("y")).or(),
        ];
        assert_eq!(ids(&conditions), vec!["1", "2"]);
    }

    #[test]
    fn test_flat_left_fold_has_no_precedence() {
        // (a = 1 OR a = 2) AND b = "x", not a = 1 OR (a = 2 AND b = "x")
        let conditions = [
            FilterCondition::new("a", FilterOperator::Eq, json!(1)),
            FilterCondition::new("a", FilterOperator::Eq, json!(2)).or(),
            FilterCondition::new("b", FilterOperator::Eq, json!("x")),
        ];
        assert_eq!(ids(&conditions), vec!["1"]);

        // false AND false OR true => true for every row
        let conditions = [
            FilterCondition::new("a", FilterOperator::Eq, json!(9)),
            FilterCondition::new("b", FilterOperator::Eq, json!("z")),
            FilterCondition::new("a", FilterOperator::Gt, json!(0)).or(),
        ];
        assert_eq!(ids(&conditions), vec!["1", "2"]);
    }

    #[test]
    fn test_first_connective_is_ignored() {
        let conditions = [FilterCondition::new("a", FilterOperator::Eq, json!(2)).or()];
        assert_eq!(ids(&conditions), vec!["2"]);
    }

    #[test]
    fn test_empty_conditions_match_everything() {
        assert_eq!(ids(&[]), vec!["1", "2"]);
    }

    #[rstest]
    #[case(FilterOperator::Eq, false)]
    #[case(FilterOperator::Ne, true)]
    #[case(FilterOperator::Gt, false)]
    #[case(FilterOperator::Gte, false)]
    #[case(FilterOperator::Lt, false)]
    #[case(FilterOperator::Lte, false)]
    #[case(FilterOperator::Contains, false)]
    fn test_missing_field(#[case] operator: FilterOperator, #[case] expected: bool) {
        let record = DynamicRecord::from_value("1", json!({"a": 1}));
        let condition = FilterCondition::new("missing", operator, json!("x"));
        assert_eq!(condition.matches(&record), expected);
    }

    #[rstest]
    #[case(json!(10), FilterOperator::Gt, json!(9), true)]
    #[case(json!("10"), FilterOperator::Gt, json!("9"), true)]
    #[case(json!("b"), FilterOperator::Gt, json!("a"), true)]
    #[case(json!("10a"), FilterOperator::Gt, json!("9"), false)]
    #[case(json!(2), FilterOperator::Gte, json!(2), true)]
    #[case(json!(2), FilterOperator::Lte, json!(2.5), true)]
    #[case(json!(-1), FilterOperator::Lt, json!(0), true)]
    #[case(json!(1), FilterOperator::Eq, json!("1"), true)]
    #[case(json!(true), FilterOperator::Eq, json!("true"), true)]
    #[case(json!(1.0), FilterOperator::Eq, json!(1), false)]
    #[case(json!("hello world"), FilterOperator::Contains, json!("lo w"), true)]
    #[case(json!(12345), FilterOperator::Contains, json!(234), true)]
    #[case(json!("abc"), FilterOperator::Ne, json!("abd"), true)]
    fn test_operator_semantics(
        #[case] field: Value,
        #[case] operator: FilterOperator,
        #[case] literal: Value,
        #[case] expected: bool,
    ) {
        let record = DynamicRecord::from_value("1", json!({ "f": field }));
        let condition = FilterCondition::new("f", operator, literal);
        assert_eq!(condition.matches(&record), expected, "{condition}");
    }

    #[test]
    fn test_deserialize_condition() {
        let condition: FilterCondition = serde_json::from_value(json!({
            "field": "a", "operator": ">=", "value": 3, "connective": "OR"
        }))
        .unwrap();
        assert_eq!(condition.operator, FilterOperator::Gte);
        assert_eq!(condition.connective, Connective::Or);
    }

    #[test]
    fn test_operator_from_str() {
        assert_eq!("gte".parse::<FilterOperator>().unwrap(), FilterOperator::Gte);
        assert_eq!("~".parse::<FilterOperator>().unwrap(), FilterOperator::Contains);
        assert!("like".parse::<FilterOperator>().is_err());
    }
}

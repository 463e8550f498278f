//! Query builder and predicate language for backend collections.
//!
//! A query is a filter predicate, an ordered list of sort keys and an
//! optional limit. Queries are serializable so a remote backend can receive
//! them as-is; `Predicate::matches` and `sort_records` give any local backend
//! the reference evaluation.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::backend::Backend;
use super::error::SdkError;

// =============================================================================
// Query Model
// =============================================================================

/// Sort order for a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One sort key. Records missing the field sort last in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Filter over a JSON record. Field names may be dotted paths (`contact.email`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    Eq { field: String, value: Value },
    Ne { field: String, value: Value },
    Gt { field: String, value: Value },
    Gte { field: String, value: Value },
    Lt { field: String, value: Value },
    Lte { field: String, value: Value },
    In { field: String, values: Vec<Value> },
    /// Array field holds the value, or string field holds the substring.
    Contains { field: String, value: Value },
    And { predicates: Vec<Predicate> },
    Or { predicates: Vec<Predicate> },
    Not { predicate: Box<Predicate> },
}

impl Predicate {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ne {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gt {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gte {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lt {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lte {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn in_list<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn and(predicates: Vec<Predicate>) -> Self {
        Self::And { predicates }
    }

    pub fn or(predicates: Vec<Predicate>) -> Self {
        Self::Or { predicates }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(predicate: Predicate) -> Self {
        Self::Not {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluates the predicate against a record.
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Self::Eq { field, value } => {
                values_equal(lookup(record, field).unwrap_or(&Value::Null), value)
            }
            Self::Ne { field, value } => {
                !values_equal(lookup(record, field).unwrap_or(&Value::Null), value)
            }
            Self::Gt { field, value } => {
                compare_field(record, field, value) == Some(Ordering::Greater)
            }
            Self::Gte { field, value } => matches!(
                compare_field(record, field, value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::Lt { field, value } => {
                compare_field(record, field, value) == Some(Ordering::Less)
            }
            Self::Lte { field, value } => matches!(
                compare_field(record, field, value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Self::In { field, values } => lookup(record, field)
                .is_some_and(|actual| values.iter().any(|v| values_equal(actual, v))),
            Self::Contains { field, value } => match lookup(record, field) {
                Some(Value::Array(items)) => items.iter().any(|item| values_equal(item, value)),
                Some(Value::String(text)) => value.as_str().is_some_and(|n| text.contains(n)),
                _ => false,
            },
            Self::And { predicates } => predicates.iter().all(|p| p.matches(record)),
            Self::Or { predicates } => predicates.iter().any(|p| p.matches(record)),
            Self::Not { predicate } => !predicate.matches(record),
        }
    }
}

/// A complete collection query as shipped to a backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub filter: Option<Predicate>,
    #[serde(default)]
    pub sort: Vec<SortKey>,
    pub limit: Option<usize>,
}

impl Query {
    /// True when the record passes the filter (or there is none).
    pub fn matches(&self, record: &Value) -> bool {
        self.filter.as_ref().map_or(true, |p| p.matches(record))
    }

    /// Filters, sorts and truncates a set of records.
    pub fn apply<'a>(&self, records: impl IntoIterator<Item = &'a Value>) -> Vec<Value> {
        let mut rows: Vec<Value> = records
            .into_iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        sort_records(&mut rows, &self.sort);
        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }
        rows
    }
}

// =============================================================================
// Typed Builder
// =============================================================================

/// Fluent builder over one collection, deserializing results into `T`.
pub struct QueryBuilder<T> {
    backend: Arc<dyn Backend>,
    collection: String,
    query: Query,
    _record: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> QueryBuilder<T> {
    pub(crate) fn new(backend: Arc<dyn Backend>, collection: impl Into<String>) -> Self {
        Self {
            backend,
            collection: collection.into(),
            query: Query::default(),
            _record: PhantomData,
        }
    }

    /// Adds a filter. Repeated calls are combined with AND.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.query.filter = Some(match self.query.filter.take() {
            None => predicate,
            Some(Predicate::And { mut predicates }) => {
                predicates.push(predicate);
                Predicate::And { predicates }
            }
            Some(existing) => Predicate::And {
                predicates: vec![existing, predicate],
            },
        });
        self
    }

    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.query.sort.push(SortKey {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn sort_asc(self, field: impl Into<String>) -> Self {
        self.sort(field, SortDirection::Asc)
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.query.limit = Some(n);
        self
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Runs the query and deserializes every returned record.
    pub async fn exec(self) -> Result<Vec<T>, SdkError> {
        let rows = self.backend.find(&self.collection, &self.query).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(SdkError::from))
            .collect()
    }

    /// Runs the query with `limit(1)` and returns the first record.
    pub async fn first(self) -> Result<Option<T>, SdkError> {
        Ok(self.limit(1).exec().await?.into_iter().next())
    }
}

// =============================================================================
// Evaluation Helpers
// =============================================================================

/// Resolves a dotted field path inside a record.
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(record, |current, segment| current.as_object()?.get(segment))
}

fn compare_field(record: &Value, field: &str, value: &Value) -> Option<Ordering> {
    compare_values(lookup(record, field)?, value)
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Orders two JSON scalars: numbers numerically, RFC 3339 timestamps
/// chronologically, other strings lexically. Mixed types are unordered.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => {
            match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
                (Ok(x), Ok(y)) => Some(x.cmp(&y)),
                _ => Some(x.cmp(y)),
            }
        }
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Sort position of a value's kind: numbers, then timestamps, then other
/// strings, booleans, arrays and objects.
fn sort_rank(value: &Value) -> (u8, Option<DateTime<FixedOffset>>) {
    match value {
        Value::Null => (0, None),
        Value::Number(_) => (1, None),
        Value::String(s) => match DateTime::parse_from_rfc3339(s) {
            Ok(at) => (2, Some(at)),
            Err(_) => (3, None),
        },
        Value::Bool(_) => (4, None),
        Value::Array(_) => (5, None),
        Value::Object(_) => (6, None),
    }
}

/// Total order used for sorting. Values of different kinds order by kind, so
/// a column mixing numbers, timestamps and plain strings still sorts
/// consistently.
pub fn sort_cmp(a: &Value, b: &Value) -> Ordering {
    let (rank_a, at_a) = sort_rank(a);
    let (rank_b, at_b) = sort_rank(b);
    rank_a.cmp(&rank_b).then_with(|| match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => match (at_a, at_b) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x.cmp(y),
        },
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    })
}

/// Stable multi-key sort. Missing and null fields go last.
pub fn sort_records(records: &mut [Value], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }
    records.sort_by(|a, b| {
        keys.iter()
            .map(|key| {
                sort_order(
                    lookup(a, &key.field).filter(|v| !v.is_null()),
                    lookup(b, &key.field).filter(|v| !v.is_null()),
                    key.direction,
                )
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}

fn sort_order(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = sort_cmp(a, b);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

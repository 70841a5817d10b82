//! Queries
//!
//! A [`Query`] is an immutable value: every builder method consumes the query
//! and returns a new one with the change applied. Builders that parse a
//! dotted field path return an error for paths with empty segments.

use super::field_path::FieldPath;
use super::field_value::FieldValue;
use super::filter::{Filter, Operator};
use super::resource_path::ResourcePath;
use crate::error::Result;
use crate::firestore::document_key::DocumentKey;

/// Sort direction for query ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Smallest values first
    #[default]
    Ascending,

    /// Largest values first
    Descending,
}

/// One ordering term
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderBy {
    /// Field to order by
    pub field: FieldPath,
    /// Sort direction
    pub direction: Direction,
}

impl OrderBy {
    /// Create an ordering term
    pub fn new(field: FieldPath, direction: Direction) -> Self {
        Self { field, direction }
    }

    /// Ascending ordering on `field`
    pub fn ascending(field: FieldPath) -> Self {
        Self::new(field, Direction::Ascending)
    }

    /// Descending ordering on `field`
    pub fn descending(field: FieldPath) -> Self {
        Self::new(field, Direction::Descending)
    }

    fn is_key_ordering(&self) -> bool {
        self.field.is_key_field_path()
    }
}

/// A position in a query's ordering where results start or stop
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    /// One value per ordering term, in order
    pub position: Vec<FieldValue>,
    /// True if the bound sits just before `position`
    pub before: bool,
}

impl Bound {
    /// Create a bound
    pub fn new(position: Vec<FieldValue>, before: bool) -> Self {
        Self { position, before }
    }
}

/// A query over a collection, or a lookup of a single document
#[derive(Debug, Clone)]
pub struct Query {
    path: ResourcePath,
    filters: Vec<Filter>,
    explicit_order_by: Vec<OrderBy>,
    limit: Option<i32>,
    start_at: Option<Bound>,
    end_at: Option<Bound>,
}

impl Query {
    /// Query everything under `path`
    pub fn at_path(path: ResourcePath) -> Self {
        Self {
            path,
            filters: Vec::new(),
            explicit_order_by: Vec::new(),
            limit: None,
            start_at: None,
            end_at: None,
        }
    }

    /// Query everything under the slash-separated `path`
    pub fn from_path_string(path: &str) -> Self {
        Self::at_path(ResourcePath::from_string(path))
    }

    /// Path the query runs against
    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    /// Filters in the order they were added
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Orderings exactly as requested by the caller
    pub fn explicit_order_by(&self) -> &[OrderBy] {
        &self.explicit_order_by
    }

    /// Result limit
    pub fn limit(&self) -> Option<i32> {
        self.limit
    }

    /// Lower bound
    pub fn start_at(&self) -> Option<&Bound> {
        self.start_at.as_ref()
    }

    /// Upper bound
    pub fn end_at(&self) -> Option<&Bound> {
        self.end_at.as_ref()
    }

    /// True if the query is a plain lookup of exactly one document
    pub fn is_document_query(&self) -> bool {
        DocumentKey::is_document_key(&self.path)
            && self.filters.is_empty()
            && self.explicit_order_by.is_empty()
            && self.limit.is_none()
            && self.start_at.is_none()
            && self.end_at.is_none()
    }

    /// First field constrained by an inequality filter
    pub fn inequality_field(&self) -> Option<&FieldPath> {
        self.filters.iter().find_map(Filter::inequality_field)
    }

    /// Full ordering the backend applies.
    ///
    /// Without explicit orderings, an inequality field is sorted ascending
    /// first. The result always ends with a key ordering; an implicit one
    /// takes the direction of the last explicit term.
    pub fn order_by(&self) -> Vec<OrderBy> {
        if self.explicit_order_by.is_empty() {
            return match self.inequality_field() {
                Some(field) if !field.is_key_field_path() => vec![
                    OrderBy::ascending(field.clone()),
                    OrderBy::ascending(FieldPath::key_path()),
                ],
                _ => vec![OrderBy::ascending(FieldPath::key_path())],
            };
        }

        let mut result = self.explicit_order_by.clone();
        if !result.iter().any(OrderBy::is_key_ordering) {
            let direction = result
                .last()
                .map(|order| order.direction)
                .unwrap_or_default();
            result.push(OrderBy::new(FieldPath::key_path(), direction));
        }
        result
    }

    /// Add a filter.
    ///
    /// A composite AND is spliced into the filter list child by child, so an
    /// empty composite adds nothing.
    pub fn adding_filter(mut self, filter: Filter) -> Self {
        match filter {
            Filter::Composite { filters, .. } => filters.into_iter().fold(self, Self::adding_filter),
            filter => {
                self.filters.push(filter);
                self
            }
        }
    }

    /// Add an explicit ordering term
    pub fn adding_order_by(mut self, order_by: OrderBy) -> Self {
        self.explicit_order_by.push(order_by);
        self
    }

    /// Filter on `field op value`
    pub fn where_field(self, field: &str, op: Operator, value: FieldValue) -> Result<Self> {
        let path = FieldPath::from_dot_separated(field)?;
        Ok(self.adding_filter(Filter::create(path, op, value)))
    }

    /// Filter documents where field equals value
    pub fn where_equal_to(self, field: &str, value: FieldValue) -> Result<Self> {
        self.where_field(field, Operator::Equal, value)
    }

    /// Filter documents where field does not equal value
    pub fn where_not_equal_to(self, field: &str, value: FieldValue) -> Result<Self> {
        self.where_field(field, Operator::NotEqual, value)
    }

    /// Filter documents where field is less than value
    pub fn where_less_than(self, field: &str, value: FieldValue) -> Result<Self> {
        self.where_field(field, Operator::LessThan, value)
    }

    /// Filter documents where field is less than or equal to value
    pub fn where_less_than_or_equal_to(self, field: &str, value: FieldValue) -> Result<Self> {
        self.where_field(field, Operator::LessThanOrEqual, value)
    }

    /// Filter documents where field is greater than value
    pub fn where_greater_than(self, field: &str, value: FieldValue) -> Result<Self> {
        self.where_field(field, Operator::GreaterThan, value)
    }

    /// Filter documents where field is greater than or equal to value
    pub fn where_greater_than_or_equal_to(self, field: &str, value: FieldValue) -> Result<Self> {
        self.where_field(field, Operator::GreaterThanOrEqual, value)
    }

    /// Filter documents where array field contains value
    pub fn where_array_contains(self, field: &str, value: FieldValue) -> Result<Self> {
        self.where_field(field, Operator::ArrayContains, value)
    }

    /// Filter documents where array field contains any of the values
    pub fn where_array_contains_any(self, field: &str, values: Vec<FieldValue>) -> Result<Self> {
        self.where_field(field, Operator::ArrayContainsAny, FieldValue::Array(values))
    }

    /// Filter documents where field value is in the given list
    pub fn where_in(self, field: &str, values: Vec<FieldValue>) -> Result<Self> {
        self.where_field(field, Operator::In, FieldValue::Array(values))
    }

    /// Filter documents where field value is not in the given list
    pub fn where_not_in(self, field: &str, values: Vec<FieldValue>) -> Result<Self> {
        self.where_field(field, Operator::NotIn, FieldValue::Array(values))
    }

    /// Order results by field
    pub fn order_by_field(self, field: &str, direction: Direction) -> Result<Self> {
        let path = FieldPath::from_dot_separated(field)?;
        Ok(self.adding_order_by(OrderBy::new(path, direction)))
    }

    /// Limit the number of results
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Start results at `bound`
    pub fn starting_at(mut self, bound: Bound) -> Self {
        self.start_at = Some(bound);
        self
    }

    /// Stop results at `bound`
    pub fn ending_at(mut self, bound: Bound) -> Self {
        self.end_at = Some(bound);
        self
    }
}

/// Queries are equal when they produce the same results, so orderings are
/// compared after implicit terms are filled in.
impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.filters == other.filters
            && self.limit == other.limit
            && self.start_at == other.start_at
            && self.end_at == other.end_at
            && self.order_by() == other.order_by()
    }
}

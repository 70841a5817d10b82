//! Query filters

use super::field_path::FieldPath;
use super::field_value::FieldValue;

/// Comparison operator of a field filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// field < value
    LessThan,

    /// field <= value
    LessThanOrEqual,

    /// field == value
    Equal,

    /// field != value
    NotEqual,

    /// field >= value
    GreaterThanOrEqual,

    /// field > value
    GreaterThan,

    /// field array contains value
    ArrayContains,

    /// field array contains any value from list
    ArrayContainsAny,

    /// field value is in list
    In,

    /// field not in list
    NotIn,
}

impl Operator {
    /// True for operators that constrain a range rather than a point
    pub fn is_inequality(&self) -> bool {
        matches!(
            self,
            Self::LessThan
                | Self::LessThanOrEqual
                | Self::GreaterThan
                | Self::GreaterThanOrEqual
                | Self::NotEqual
                | Self::NotIn
        )
    }

    /// Parse the shorthand used in query strings (`<`, `==`, `array_contains`, ...)
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "<" => Self::LessThan,
            "<=" => Self::LessThanOrEqual,
            "==" => Self::Equal,
            "!=" => Self::NotEqual,
            ">=" => Self::GreaterThanOrEqual,
            ">" => Self::GreaterThan,
            "array_contains" => Self::ArrayContains,
            "array_contains_any" => Self::ArrayContainsAny,
            "in" => Self::In,
            "not_in" => Self::NotIn,
            _ => return None,
        };
        Some(op)
    }
}

/// Operator of a filter that takes no value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// field is NaN
    IsNan,

    /// field is null
    IsNull,

    /// field is not NaN
    IsNotNan,

    /// field is not null
    IsNotNull,
}

impl UnaryOperator {
    /// True for the negated forms, which constrain a range
    pub fn is_inequality(&self) -> bool {
        matches!(self, Self::IsNotNan | Self::IsNotNull)
    }
}

/// Operator joining the children of a composite filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeOperator {
    /// Every child must match
    And,
}

/// A query filter
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Compare a field against a value
    Field {
        /// Field being compared
        path: FieldPath,
        /// Comparison
        op: Operator,
        /// Right-hand side
        value: FieldValue,
    },

    /// Test a field for null / NaN
    Unary {
        /// Field being tested
        path: FieldPath,
        /// Test
        op: UnaryOperator,
    },

    /// Combination of child filters, kept in insertion order
    Composite {
        /// How the children combine
        op: CompositeOperator,
        /// Child filters
        filters: Vec<Filter>,
    },
}

impl Filter {
    /// Create a field filter.
    ///
    /// `== null`, `== NaN`, `!= null` and `!= NaN` become unary filters since
    /// the wire format cannot express them as comparisons.
    pub fn create(path: FieldPath, op: Operator, value: FieldValue) -> Self {
        let unary = match op {
            Operator::Equal if value.is_null() => Some(UnaryOperator::IsNull),
            Operator::Equal if value.is_nan() => Some(UnaryOperator::IsNan),
            Operator::NotEqual if value.is_null() => Some(UnaryOperator::IsNotNull),
            Operator::NotEqual if value.is_nan() => Some(UnaryOperator::IsNotNan),
            _ => None,
        };
        match unary {
            Some(op) => Self::Unary { path, op },
            None => Self::Field { path, op, value },
        }
    }

    /// Conjunction of `filters`
    pub fn and(filters: Vec<Filter>) -> Self {
        Self::Composite {
            op: CompositeOperator::And,
            filters,
        }
    }

    /// Field the filter applies to; `None` for composites
    pub fn field_path(&self) -> Option<&FieldPath> {
        match self {
            Self::Field { path, .. } | Self::Unary { path, .. } => Some(path),
            Self::Composite { .. } => None,
        }
    }

    /// First field constrained by an inequality, searching depth-first
    pub fn inequality_field(&self) -> Option<&FieldPath> {
        match self {
            Self::Field { path, op, .. } if op.is_inequality() => Some(path),
            Self::Unary { path, op } if op.is_inequality() => Some(path),
            Self::Composite { filters, .. } => {
                filters.iter().find_map(Filter::inequality_field)
            }
            _ => None,
        }
    }
}

//! `Target`, `StructuredQuery` and friends

use super::value_codec::{read_value, write_value};
use super::Serializer;
use crate::error::Result;
use crate::firestore::field_path::FieldPath;
use crate::firestore::filter::{Filter, Operator, UnaryOperator};
use crate::firestore::query::{Bound, Direction, OrderBy, Query};
use crate::firestore::query_data::{QueryData, QueryPurpose};
use crate::firestore::resource_path::ResourcePath;
use crate::wire::{Reader, Writer};

// Target
const TARGET_QUERY: u32 = 2;
const TARGET_DOCUMENTS: u32 = 3;
const TARGET_RESUME_TOKEN: u32 = 4;
const TARGET_ID: u32 = 5;

// Target.DocumentsTarget, Target.QueryTarget
const DOCUMENTS_TARGET_DOCUMENTS: u32 = 2;
const QUERY_TARGET_PARENT: u32 = 1;
const QUERY_TARGET_STRUCTURED_QUERY: u32 = 2;

// StructuredQuery
const QUERY_FROM: u32 = 2;
const QUERY_WHERE: u32 = 3;
const QUERY_ORDER_BY: u32 = 4;
const QUERY_LIMIT: u32 = 5;
const QUERY_START_AT: u32 = 7;
const QUERY_END_AT: u32 = 8;

// CollectionSelector, FieldReference, Int32Value
const COLLECTION_ID: u32 = 2;
const FIELD_REFERENCE_PATH: u32 = 2;
const INT32_VALUE: u32 = 1;

// Filter oneof
const FILTER_COMPOSITE: u32 = 1;
const FILTER_FIELD: u32 = 2;
const FILTER_UNARY: u32 = 3;

// CompositeFilter, FieldFilter, UnaryFilter
const COMPOSITE_OP: u32 = 1;
const COMPOSITE_FILTERS: u32 = 2;
const FIELD_FILTER_FIELD: u32 = 1;
const FIELD_FILTER_OP: u32 = 2;
const FIELD_FILTER_VALUE: u32 = 3;
const UNARY_OP: u32 = 1;
const UNARY_FIELD: u32 = 2;

// Order, Cursor
const ORDER_FIELD: u32 = 1;
const ORDER_DIRECTION: u32 = 2;
const CURSOR_VALUES: u32 = 1;
const CURSOR_BEFORE: u32 = 2;

const COMPOSITE_AND: i32 = 1;
const DIRECTION_UNSPECIFIED: i32 = 0;
const DIRECTION_ASCENDING: i32 = 1;
const DIRECTION_DESCENDING: i32 = 2;

impl Serializer {
    /// Encode listen metadata as a `Target`.
    ///
    /// Single-document queries become a documents target, everything else a
    /// query target. The resume token and target id are omitted when empty or
    /// zero.
    pub fn encode_target(&self, query_data: &QueryData) -> Vec<u8> {
        let mut writer = Writer::new();
        let query = &query_data.query;

        if query.is_document_query() {
            writer.write_nested(TARGET_DOCUMENTS, |w| {
                w.write_string(DOCUMENTS_TARGET_DOCUMENTS, &self.encode_resource_name(query.path()))
            });
        } else {
            writer.write_nested(TARGET_QUERY, |w| self.write_query_target(w, query));
        }

        if !query_data.resume_token.is_empty() {
            writer.write_bytes(TARGET_RESUME_TOKEN, &query_data.resume_token);
        }
        if query_data.target_id != 0 {
            writer.write_int32(TARGET_ID, query_data.target_id);
        }

        writer.into_bytes()
    }

    /// Decode a `Target` into listen metadata with a [`QueryPurpose::Listen`]
    /// purpose and no sequence number
    pub fn decode_target(&self, bytes: &[u8]) -> Result<QueryData> {
        let mut reader = Reader::new(bytes);

        let mut query = None;
        let mut resume_token = Vec::new();
        let mut target_id = 0;

        reader.read_message(|r, tag| match tag.field_number {
            TARGET_QUERY => {
                query = r.read_nested(tag, |r| self.read_query_target(r));
                true
            }
            TARGET_DOCUMENTS => {
                query = r.read_nested(tag, |r| self.read_documents_target(r));
                true
            }
            TARGET_RESUME_TOKEN => {
                resume_token = r.read_bytes(tag);
                true
            }
            TARGET_ID => {
                target_id = r.read_int32(tag);
                true
            }
            _ => false,
        });

        let query = query.unwrap_or_else(|| {
            reader.fail("Target has neither query nor documents set");
            Query::at_path(ResourcePath::empty())
        });
        let mut query_data = QueryData::new(query, target_id, 0, QueryPurpose::Listen);
        query_data.resume_token = resume_token;
        reader.into_result(query_data)
    }

    /// Decode a `Target.QueryTarget` message
    pub fn decode_query_target(&self, bytes: &[u8]) -> Result<Query> {
        let mut reader = Reader::new(bytes);
        let query = self.read_query_target(&mut reader);
        reader.into_result(query)
    }

    /// Decode a `Target.DocumentsTarget` message naming exactly one document
    pub fn decode_documents_target(&self, bytes: &[u8]) -> Result<Query> {
        let mut reader = Reader::new(bytes);
        let query = self.read_documents_target(&mut reader);
        reader.into_result(query)
    }

    fn write_query_target(&self, writer: &mut Writer, query: &Query) {
        let path = query.path();
        writer.write_string(
            QUERY_TARGET_PARENT,
            &self.encode_resource_name(&path.without_last()),
        );
        writer.write_nested(QUERY_TARGET_STRUCTURED_QUERY, |w| {
            w.write_nested(QUERY_FROM, |w| {
                w.write_string(COLLECTION_ID, path.last_segment().unwrap_or_default())
            });

            match query.filters() {
                [] => {}
                [filter] => w.write_nested(QUERY_WHERE, |w| write_filter(w, filter)),
                filters => w.write_nested(QUERY_WHERE, |w| {
                    w.write_nested(FILTER_COMPOSITE, |w| write_composite(w, filters))
                }),
            }

            for order_by in query.order_by() {
                w.write_nested(QUERY_ORDER_BY, |w| {
                    w.write_nested(ORDER_FIELD, |w| write_field_reference(w, &order_by.field));
                    w.write_enum(ORDER_DIRECTION, direction_to_wire(order_by.direction));
                });
            }

            if let Some(limit) = query.limit() {
                w.write_nested(QUERY_LIMIT, |w| {
                    if limit != 0 {
                        w.write_int32(INT32_VALUE, limit);
                    }
                });
            }
            if let Some(bound) = query.start_at() {
                w.write_nested(QUERY_START_AT, |w| write_cursor(w, bound));
            }
            if let Some(bound) = query.end_at() {
                w.write_nested(QUERY_END_AT, |w| write_cursor(w, bound));
            }
        });
    }

    fn read_documents_target(&self, reader: &mut Reader<'_>) -> Query {
        let mut names = Vec::new();
        reader.read_message(|r, tag| {
            if tag.field_number != DOCUMENTS_TARGET_DOCUMENTS {
                return false;
            }
            names.push(r.read_string(tag));
            true
        });

        if !reader.is_ok() {
            return Query::at_path(ResourcePath::empty());
        }
        if names.len() != 1 {
            reader.fail(format!(
                "DocumentsTarget contained {} documents, expected exactly one",
                names.len()
            ));
            return Query::at_path(ResourcePath::empty());
        }
        match self.decode_key(&names[0]) {
            Ok(key) => Query::at_path(key.into_path()),
            Err(err) => {
                reader.set_status(err);
                Query::at_path(ResourcePath::empty())
            }
        }
    }

    fn read_query_target(&self, reader: &mut Reader<'_>) -> Query {
        let mut parent = String::new();
        let mut parts = StructuredQueryParts::default();

        reader.read_message(|r, tag| match tag.field_number {
            QUERY_TARGET_PARENT => {
                parent = r.read_string(tag);
                true
            }
            QUERY_TARGET_STRUCTURED_QUERY => {
                if let Some(decoded) = r.read_nested(tag, read_structured_query) {
                    parts = decoded;
                }
                true
            }
            _ => false,
        });

        if !reader.is_ok() {
            return Query::at_path(ResourcePath::empty());
        }

        let parent = match self.decode_local_path(&parent) {
            Ok(path) => path,
            Err(err) => {
                reader.set_status(err);
                return Query::at_path(ResourcePath::empty());
            }
        };
        let collection_id = match parts.from.as_slice() {
            [collection_id] => collection_id.clone(),
            from => {
                reader.fail(format!(
                    "StructuredQuery has {} collection selectors, expected exactly one",
                    from.len()
                ));
                return Query::at_path(ResourcePath::empty());
            }
        };

        match parent.append(collection_id) {
            Ok(path) => parts.into_query(path),
            Err(err) => {
                reader.set_status(err);
                Query::at_path(ResourcePath::empty())
            }
        }
    }
}

/// Decoded `StructuredQuery` fields before they are folded into a [`Query`]
#[derive(Default)]
struct StructuredQueryParts {
    from: Vec<String>,
    filter: Option<Filter>,
    order_by: Vec<OrderBy>,
    limit: Option<i32>,
    start_at: Option<Bound>,
    end_at: Option<Bound>,
}

impl StructuredQueryParts {
    fn into_query(self, path: ResourcePath) -> Query {
        let mut query = Query::at_path(path);
        if let Some(filter) = self.filter {
            query = query.adding_filter(filter);
        }

        // The wire carries the full ordering; keep the shortest explicit
        // prefix that derives it again.
        let explicit_len = (0..=self.order_by.len())
            .find(|&len| {
                let candidate = self.order_by[..len]
                    .iter()
                    .cloned()
                    .fold(query.clone(), Query::adding_order_by);
                candidate.order_by() == self.order_by
            })
            .unwrap_or(self.order_by.len());
        for order_by in self.order_by.into_iter().take(explicit_len) {
            query = query.adding_order_by(order_by);
        }

        if let Some(limit) = self.limit {
            query = query.with_limit(limit);
        }
        if let Some(bound) = self.start_at {
            query = query.starting_at(bound);
        }
        if let Some(bound) = self.end_at {
            query = query.ending_at(bound);
        }
        query
    }
}

fn read_structured_query(reader: &mut Reader<'_>) -> StructuredQueryParts {
    let mut parts = StructuredQueryParts::default();

    reader.read_message(|r, tag| match tag.field_number {
        QUERY_FROM => {
            if let Some(collection_id) = r.read_nested(tag, read_collection_selector) {
                parts.from.push(collection_id);
            }
            true
        }
        QUERY_WHERE => {
            // a composite AND is spliced into the query's filter list
            parts.filter = r.read_nested(tag, read_filter);
            true
        }
        QUERY_ORDER_BY => {
            if let Some(order_by) = r.read_nested(tag, read_order) {
                parts.order_by.push(order_by);
            }
            true
        }
        QUERY_LIMIT => {
            parts.limit = r.read_nested(tag, read_int32_value);
            true
        }
        QUERY_START_AT => {
            parts.start_at = r.read_nested(tag, read_cursor);
            true
        }
        QUERY_END_AT => {
            parts.end_at = r.read_nested(tag, read_cursor);
            true
        }
        _ => false,
    });

    parts
}

fn read_collection_selector(reader: &mut Reader<'_>) -> String {
    let mut collection_id = String::new();
    reader.read_message(|r, tag| {
        if tag.field_number != COLLECTION_ID {
            return false;
        }
        collection_id = r.read_string(tag);
        true
    });
    collection_id
}

fn read_int32_value(reader: &mut Reader<'_>) -> i32 {
    let mut value = 0;
    reader.read_message(|r, tag| {
        if tag.field_number != INT32_VALUE {
            return false;
        }
        value = r.read_int32(tag);
        true
    });
    value
}

fn write_filter(writer: &mut Writer, filter: &Filter) {
    match filter {
        Filter::Field { path, op, value } => writer.write_nested(FILTER_FIELD, |w| {
            w.write_nested(FIELD_FILTER_FIELD, |w| write_field_reference(w, path));
            w.write_enum(FIELD_FILTER_OP, operator_to_wire(*op));
            w.write_nested(FIELD_FILTER_VALUE, |w| write_value(w, value));
        }),
        Filter::Unary { path, op } => writer.write_nested(FILTER_UNARY, |w| {
            w.write_enum(UNARY_OP, unary_operator_to_wire(*op));
            w.write_nested(UNARY_FIELD, |w| write_field_reference(w, path));
        }),
        Filter::Composite { filters, .. } => {
            writer.write_nested(FILTER_COMPOSITE, |w| write_composite(w, filters))
        }
    }
}

fn write_composite(writer: &mut Writer, filters: &[Filter]) {
    writer.write_enum(COMPOSITE_OP, COMPOSITE_AND);
    for filter in filters {
        writer.write_nested(COMPOSITE_FILTERS, |w| write_filter(w, filter));
    }
}

fn read_filter(reader: &mut Reader<'_>) -> Filter {
    let mut result = None;

    reader.read_message(|r, tag| {
        let filter = match tag.field_number {
            FILTER_COMPOSITE => r.read_nested(tag, read_composite_filter),
            FILTER_FIELD => r.read_nested(tag, read_field_filter),
            FILTER_UNARY => r.read_nested(tag, read_unary_filter),
            _ => return false,
        };
        if filter.is_some() {
            result = filter;
        }
        true
    });

    result.unwrap_or_else(|| {
        reader.fail("Filter has no recognized filter type");
        Filter::and(Vec::new())
    })
}

fn read_composite_filter(reader: &mut Reader<'_>) -> Filter {
    let mut op = 0;
    let mut filters = Vec::new();

    reader.read_message(|r, tag| match tag.field_number {
        COMPOSITE_OP => {
            op = r.read_enum(tag);
            true
        }
        COMPOSITE_FILTERS => {
            if let Some(filter) = r.read_nested(tag, read_filter) {
                filters.push(filter);
            }
            true
        }
        _ => false,
    });

    if reader.is_ok() && op != COMPOSITE_AND {
        reader.fail(format!("unsupported composite filter operator {}", op));
    }
    Filter::and(filters)
}

fn read_field_filter(reader: &mut Reader<'_>) -> Filter {
    let mut path = None;
    let mut op = 0;
    let mut value = None;

    reader.read_message(|r, tag| match tag.field_number {
        FIELD_FILTER_FIELD => {
            path = r.read_nested(tag, read_field_reference);
            true
        }
        FIELD_FILTER_OP => {
            op = r.read_enum(tag);
            true
        }
        FIELD_FILTER_VALUE => {
            value = r.read_nested(tag, read_value);
            true
        }
        _ => false,
    });

    let op = operator_from_wire(op);
    match (path, op, value) {
        (Some(path), Some(op), Some(value)) => Filter::create(path, op, value),
        (_, None, _) => {
            reader.fail("field filter has an unknown operator");
            Filter::and(Vec::new())
        }
        _ => {
            reader.fail("field filter is missing its field or value");
            Filter::and(Vec::new())
        }
    }
}

fn read_unary_filter(reader: &mut Reader<'_>) -> Filter {
    let mut path = None;
    let mut op = 0;

    reader.read_message(|r, tag| match tag.field_number {
        UNARY_OP => {
            op = r.read_enum(tag);
            true
        }
        UNARY_FIELD => {
            path = r.read_nested(tag, read_field_reference);
            true
        }
        _ => false,
    });

    match (path, unary_operator_from_wire(op)) {
        (Some(path), Some(op)) => Filter::Unary { path, op },
        (_, None) => {
            reader.fail(format!("unknown unary filter operator {}", op));
            Filter::and(Vec::new())
        }
        (None, _) => {
            reader.fail("unary filter is missing its field");
            Filter::and(Vec::new())
        }
    }
}

fn write_field_reference(writer: &mut Writer, path: &FieldPath) {
    writer.write_string(FIELD_REFERENCE_PATH, &path.canonical_string());
}

fn read_field_reference(reader: &mut Reader<'_>) -> FieldPath {
    let mut path = String::new();
    reader.read_message(|r, tag| {
        if tag.field_number != FIELD_REFERENCE_PATH {
            return false;
        }
        path = r.read_string(tag);
        true
    });

    if !reader.is_ok() {
        return FieldPath::key_path();
    }
    match FieldPath::from_server_format(&path) {
        Ok(path) => path,
        Err(err) => {
            reader.set_status(err);
            FieldPath::key_path()
        }
    }
}

fn read_order(reader: &mut Reader<'_>) -> OrderBy {
    let mut field = None;
    let mut direction = DIRECTION_UNSPECIFIED;

    reader.read_message(|r, tag| match tag.field_number {
        ORDER_FIELD => {
            field = r.read_nested(tag, read_field_reference);
            true
        }
        ORDER_DIRECTION => {
            direction = r.read_enum(tag);
            true
        }
        _ => false,
    });

    let direction = match direction {
        DIRECTION_UNSPECIFIED | DIRECTION_ASCENDING => Direction::Ascending,
        DIRECTION_DESCENDING => Direction::Descending,
        other => {
            reader.fail(format!("unknown order direction {}", other));
            Direction::Ascending
        }
    };
    match field {
        Some(field) => OrderBy::new(field, direction),
        None => {
            reader.fail("order is missing its field");
            OrderBy::ascending(FieldPath::key_path())
        }
    }
}

fn write_cursor(writer: &mut Writer, bound: &Bound) {
    for value in &bound.position {
        writer.write_nested(CURSOR_VALUES, |w| write_value(w, value));
    }
    if bound.before {
        writer.write_bool(CURSOR_BEFORE, true);
    }
}

fn read_cursor(reader: &mut Reader<'_>) -> Bound {
    let mut position = Vec::new();
    let mut before = false;

    reader.read_message(|r, tag| match tag.field_number {
        CURSOR_VALUES => {
            if let Some(value) = r.read_nested(tag, read_value) {
                position.push(value);
            }
            true
        }
        CURSOR_BEFORE => {
            before = r.read_bool(tag);
            true
        }
        _ => false,
    });

    Bound::new(position, before)
}

fn operator_to_wire(op: Operator) -> i32 {
    match op {
        Operator::LessThan => 1,
        Operator::LessThanOrEqual => 2,
        Operator::GreaterThan => 3,
        Operator::GreaterThanOrEqual => 4,
        Operator::Equal => 5,
        Operator::NotEqual => 6,
        Operator::ArrayContains => 7,
        Operator::In => 8,
        Operator::ArrayContainsAny => 9,
        Operator::NotIn => 10,
    }
}

fn operator_from_wire(op: i32) -> Option<Operator> {
    let op = match op {
        1 => Operator::LessThan,
        2 => Operator::LessThanOrEqual,
        3 => Operator::GreaterThan,
        4 => Operator::GreaterThanOrEqual,
        5 => Operator::Equal,
        6 => Operator::NotEqual,
        7 => Operator::ArrayContains,
        8 => Operator::In,
        9 => Operator::ArrayContainsAny,
        10 => Operator::NotIn,
        _ => return None,
    };
    Some(op)
}

fn unary_operator_to_wire(op: UnaryOperator) -> i32 {
    match op {
        UnaryOperator::IsNan => 2,
        UnaryOperator::IsNull => 3,
        UnaryOperator::IsNotNan => 4,
        UnaryOperator::IsNotNull => 5,
    }
}

fn unary_operator_from_wire(op: i32) -> Option<UnaryOperator> {
    let op = match op {
        2 => UnaryOperator::IsNan,
        3 => UnaryOperator::IsNull,
        4 => UnaryOperator::IsNotNan,
        5 => UnaryOperator::IsNotNull,
        _ => return None,
    };
    Some(op)
}

fn direction_to_wire(direction: Direction) -> i32 {
    match direction {
        Direction::Ascending => DIRECTION_ASCENDING,
        Direction::Descending => DIRECTION_DESCENDING,
    }
}

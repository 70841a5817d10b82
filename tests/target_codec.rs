//! Listen target codec against the prost mirror

mod common;

use common::serializer;
use common::v1::{self, filter::FilterType, target::TargetType};
use firestore_serializer::{
    Bound, Direction, FieldPath, FieldValue, Filter, Operator, OrderBy, Query, QueryData,
    QueryPurpose, SnapshotVersion,
};
use prost::Message;

const ROOT: &str = "projects/p/databases/d/documents";
const ASCENDING: i32 = 1;
const DESCENDING: i32 = 2;
const KEY: &str = "__name__";

fn query_data(query: Query) -> QueryData {
    QueryData::new(query, 1, 0, QueryPurpose::Listen)
}

/// Encoding `model` must yield `proto`, and decoding `proto` must yield
/// `model`
fn expect_round_trip(model: QueryData, proto: v1::Target) {
    let s = serializer();

    let bytes = s.encode_target(&model);
    assert_eq!(v1::Target::decode(bytes.as_slice()).unwrap(), proto);

    let decoded = s.decode_target(&proto.encode_to_vec()).unwrap();
    assert_eq!(decoded, model);

    // decoding the sub-message alone agrees with decoding the whole target
    match &proto.target_type {
        Some(TargetType::Documents(documents)) => {
            let query = s.decode_documents_target(&documents.encode_to_vec()).unwrap();
            assert_eq!(query, model.query);
        }
        Some(TargetType::Query(query_target)) => {
            let query = s.decode_query_target(&query_target.encode_to_vec()).unwrap();
            assert_eq!(query, model.query);
        }
        None => panic!("target without a target type"),
    }
}

fn query_target(parent: &str, structured_query: v1::StructuredQuery) -> v1::Target {
    v1::Target {
        target_type: Some(TargetType::Query(v1::QueryTarget {
            parent: parent.to_string(),
            structured_query: Some(structured_query),
        })),
        resume_token: Vec::new(),
        target_id: 1,
    }
}

fn from(collection_id: &str) -> Vec<v1::CollectionSelector> {
    vec![v1::CollectionSelector {
        collection_id: collection_id.to_string(),
        all_descendants: false,
    }]
}

fn field_filter(path: &str, op: i32, value: v1::Value) -> v1::Filter {
    v1::Filter {
        filter_type: Some(FilterType::FieldFilter(v1::FieldFilter {
            field: v1::field_reference(path),
            op,
            value: Some(value),
        })),
    }
}

fn unary_filter(path: &str, op: i32) -> v1::Filter {
    v1::Filter {
        filter_type: Some(FilterType::UnaryFilter(v1::UnaryFilter {
            op,
            field: v1::field_reference(path),
        })),
    }
}

#[test]
fn test_encodes_first_level_key_queries() {
    let proto = v1::Target {
        target_type: Some(TargetType::Documents(v1::DocumentsTarget {
            documents: vec![format!("{}/docs/1", ROOT)],
        })),
        resume_token: Vec::new(),
        target_id: 1,
    };
    expect_round_trip(query_data(Query::from_path_string("docs/1")), proto);
}

#[test]
fn test_encodes_first_level_ancestor_queries() {
    let proto = query_target(
        ROOT,
        v1::StructuredQuery {
            from: from("messages"),
            order_by: vec![v1::order(KEY, ASCENDING)],
            ..Default::default()
        },
    );
    expect_round_trip(query_data(Query::from_path_string("messages")), proto);
}

#[test]
fn test_encodes_nested_ancestor_queries() {
    let proto = query_target(
        &format!("{}/rooms/1/messages/10", ROOT),
        v1::StructuredQuery {
            from: from("attachments"),
            order_by: vec![v1::order(KEY, ASCENDING)],
            ..Default::default()
        },
    );
    expect_round_trip(
        query_data(Query::from_path_string("rooms/1/messages/10/attachments")),
        proto,
    );
}

#[test]
fn test_encodes_single_filters_at_first_level_collections() {
    let query = Query::from_path_string("docs")
        .where_less_than("prop", FieldValue::Integer(42))
        .unwrap();
    let proto = query_target(
        ROOT,
        v1::StructuredQuery {
            from: from("docs"),
            r#where: Some(field_filter("prop", 1, v1::integer_value(42))),
            order_by: vec![v1::order("prop", ASCENDING), v1::order(KEY, ASCENDING)],
            ..Default::default()
        },
    );
    expect_round_trip(query_data(query), proto);
}

#[test]
fn test_encodes_multiple_filters_on_deeper_collections() {
    let query = Query::from_path_string("rooms/1/messages/10/attachments")
        .where_greater_than_or_equal_to("prop", FieldValue::Integer(42))
        .unwrap()
        .where_equal_to("author", FieldValue::from("dimond"))
        .unwrap()
        .where_array_contains("tags", FieldValue::from("pending"))
        .unwrap();

    let composite = v1::Filter {
        filter_type: Some(FilterType::CompositeFilter(v1::CompositeFilter {
            op: 1,
            filters: vec![
                field_filter("prop", 4, v1::integer_value(42)),
                field_filter("author", 5, v1::string_value("dimond")),
                field_filter("tags", 7, v1::string_value("pending")),
            ],
        })),
    };
    let proto = query_target(
        &format!("{}/rooms/1/messages/10", ROOT),
        v1::StructuredQuery {
            from: from("attachments"),
            r#where: Some(composite),
            order_by: vec![v1::order("prop", ASCENDING), v1::order(KEY, ASCENDING)],
            ..Default::default()
        },
    );
    expect_round_trip(query_data(query), proto);
}

#[test]
fn test_encodes_null_filter() {
    let query = Query::from_path_string("docs")
        .where_equal_to("prop", FieldValue::Null)
        .unwrap();
    let proto = query_target(
        ROOT,
        v1::StructuredQuery {
            from: from("docs"),
            r#where: Some(unary_filter("prop", 3)),
            order_by: vec![v1::order(KEY, ASCENDING)],
            ..Default::default()
        },
    );
    expect_round_trip(query_data(query), proto);
}

#[test]
fn test_encodes_nan_filter() {
    let query = Query::from_path_string("docs")
        .where_equal_to("prop", FieldValue::Double(f64::NAN))
        .unwrap();
    let proto = query_target(
        ROOT,
        v1::StructuredQuery {
            from: from("docs"),
            r#where: Some(unary_filter("prop", 2)),
            order_by: vec![v1::order(KEY, ASCENDING)],
            ..Default::default()
        },
    );
    expect_round_trip(query_data(query), proto);
}

#[test]
fn test_encodes_sort_orders() {
    let query = Query::from_path_string("docs")
        .order_by_field("prop", Direction::Ascending)
        .unwrap();
    let proto = query_target(
        ROOT,
        v1::StructuredQuery {
            from: from("docs"),
            order_by: vec![v1::order("prop", ASCENDING), v1::order(KEY, ASCENDING)],
            ..Default::default()
        },
    );
    expect_round_trip(query_data(query), proto);
}

#[test]
fn test_encodes_sort_orders_descending() {
    let query = Query::from_path_string("rooms/1/messages/10/attachments")
        .order_by_field("prop", Direction::Descending)
        .unwrap();
    let proto = query_target(
        &format!("{}/rooms/1/messages/10", ROOT),
        v1::StructuredQuery {
            from: from("attachments"),
            order_by: vec![v1::order("prop", DESCENDING), v1::order(KEY, DESCENDING)],
            ..Default::default()
        },
    );
    expect_round_trip(query_data(query), proto);
}

#[test]
fn test_explicit_key_ordering_is_not_duplicated() {
    let query = Query::from_path_string("docs")
        .order_by_field(KEY, Direction::Descending)
        .unwrap();
    let proto = query_target(
        ROOT,
        v1::StructuredQuery {
            from: from("docs"),
            order_by: vec![v1::order(KEY, DESCENDING)],
            ..Default::default()
        },
    );
    expect_round_trip(query_data(query), proto);
}

#[test]
fn test_encodes_bounds() {
    let query = Query::from_path_string("docs")
        .starting_at(Bound::new(
            vec![FieldValue::from("prop"), FieldValue::Integer(42)],
            false,
        ))
        .ending_at(Bound::new(
            vec![FieldValue::from("author"), FieldValue::from("dimond")],
            true,
        ));
    let proto = query_target(
        ROOT,
        v1::StructuredQuery {
            from: from("docs"),
            order_by: vec![v1::order(KEY, ASCENDING)],
            start_at: Some(v1::Cursor {
                values: vec![v1::string_value("prop"), v1::integer_value(42)],
                before: false,
            }),
            end_at: Some(v1::Cursor {
                values: vec![v1::string_value("author"), v1::string_value("dimond")],
                before: true,
            }),
            ..Default::default()
        },
    );
    expect_round_trip(query_data(query), proto);
}

#[test]
fn test_encodes_limits() {
    let query = Query::from_path_string("docs").with_limit(26);
    let proto = query_target(
        ROOT,
        v1::StructuredQuery {
            from: from("docs"),
            order_by: vec![v1::order(KEY, ASCENDING)],
            limit: Some(v1::Int32Value { value: 26 }),
            ..Default::default()
        },
    );
    expect_round_trip(query_data(query), proto);
}

#[test]
fn test_encodes_resume_tokens() {
    let model = query_data(Query::from_path_string("docs"))
        .with_resume_token(vec![1, 2, 3], SnapshotVersion::none());
    let mut proto = query_target(
        ROOT,
        v1::StructuredQuery {
            from: from("docs"),
            order_by: vec![v1::order(KEY, ASCENDING)],
            ..Default::default()
        },
    );
    proto.resume_token = vec![1, 2, 3];
    expect_round_trip(model, proto);
}

#[test]
fn test_omits_zero_target_id() {
    let model = QueryData::new(Query::from_path_string("docs/1"), 0, 0, QueryPurpose::Listen);
    let bytes = serializer().encode_target(&model);
    // documents target only: tag, length, then the nested message
    assert_eq!(bytes[0], 0x1a);
    assert_eq!(bytes.len(), 2 + bytes[1] as usize);
}

#[test]
fn test_decoding_minimizes_orderings() {
    let s = serializer();
    let proto = query_target(
        ROOT,
        v1::StructuredQuery {
            from: from("docs"),
            r#where: Some(field_filter("prop", 1, v1::integer_value(42))),
            order_by: vec![v1::order("prop", ASCENDING), v1::order(KEY, ASCENDING)],
            ..Default::default()
        },
    );

    let decoded = s.decode_target(&proto.encode_to_vec()).unwrap();
    assert!(decoded.query.explicit_order_by().is_empty());

    // the same query with the ordering spelled out compares equal
    let explicit = Query::from_path_string("docs")
        .where_less_than("prop", FieldValue::Integer(42))
        .unwrap()
        .order_by_field("prop", Direction::Ascending)
        .unwrap();
    assert_eq!(decoded.query, explicit);
}

#[test]
fn test_decoding_keeps_necessary_orderings() {
    let s = serializer();
    let proto = query_target(
        ROOT,
        v1::StructuredQuery {
            from: from("docs"),
            order_by: vec![
                v1::order("a", DESCENDING),
                v1::order("b", ASCENDING),
                v1::order(KEY, ASCENDING),
            ],
            ..Default::default()
        },
    );

    let decoded = s.decode_target(&proto.encode_to_vec()).unwrap();
    assert_eq!(
        decoded.query.explicit_order_by(),
        &[
            OrderBy::descending(FieldPath::from_dot_separated("a").unwrap()),
            OrderBy::ascending(FieldPath::from_dot_separated("b").unwrap()),
        ]
    );
}

#[test]
fn test_nested_composite_filters_are_spliced() {
    let s = serializer();
    let inner = v1::Filter {
        filter_type: Some(FilterType::CompositeFilter(v1::CompositeFilter {
            op: 1,
            filters: vec![
                field_filter("a", 5, v1::integer_value(1)),
                field_filter("b", 5, v1::integer_value(2)),
            ],
        })),
    };
    let outer = v1::Filter {
        filter_type: Some(FilterType::CompositeFilter(v1::CompositeFilter {
            op: 1,
            filters: vec![inner, field_filter("c", 5, v1::integer_value(3))],
        })),
    };
    let structured_query = |filter| v1::StructuredQuery {
        from: from("docs"),
        r#where: Some(filter),
        order_by: vec![v1::order(KEY, ASCENDING)],
        ..Default::default()
    };
    let proto = query_target(ROOT, structured_query(outer));

    let decoded = s.decode_target(&proto.encode_to_vec()).unwrap();
    let filters = decoded.query.filters();
    assert_eq!(filters.len(), 3);
    assert!(filters.iter().all(|f| matches!(f, Filter::Field { .. })));

    // AND is associative, so the flat form is written back
    let flat = v1::Filter {
        filter_type: Some(FilterType::CompositeFilter(v1::CompositeFilter {
            op: 1,
            filters: vec![
                field_filter("a", 5, v1::integer_value(1)),
                field_filter("b", 5, v1::integer_value(2)),
                field_filter("c", 5, v1::integer_value(3)),
            ],
        })),
    };
    let reencoded = v1::Target::decode(s.encode_target(&decoded).as_slice()).unwrap();
    assert_eq!(reencoded, query_target(ROOT, structured_query(flat)));
}

#[test]
fn test_explicit_composite_filter_round_trips() {
    let a = Filter::create(
        FieldPath::from_dot_separated("a").unwrap(),
        Operator::Equal,
        FieldValue::Integer(1),
    );
    let b = Filter::create(
        FieldPath::from_dot_separated("b").unwrap(),
        Operator::Equal,
        FieldValue::from("x"),
    );
    let query = Query::from_path_string("docs").adding_filter(Filter::and(vec![a, b]));

    let composite = v1::Filter {
        filter_type: Some(FilterType::CompositeFilter(v1::CompositeFilter {
            op: 1,
            filters: vec![
                field_filter("a", 5, v1::integer_value(1)),
                field_filter("b", 5, v1::string_value("x")),
            ],
        })),
    };
    let proto = query_target(
        ROOT,
        v1::StructuredQuery {
            from: from("docs"),
            r#where: Some(composite),
            order_by: vec![v1::order(KEY, ASCENDING)],
            ..Default::default()
        },
    );
    expect_round_trip(query_data(query), proto);
}

#[test]
fn test_empty_composite_filter_adds_nothing() {
    let query = Query::from_path_string("docs").adding_filter(Filter::and(Vec::new()));
    let proto = query_target(
        ROOT,
        v1::StructuredQuery {
            from: from("docs"),
            order_by: vec![v1::order(KEY, ASCENDING)],
            ..Default::default()
        },
    );
    expect_round_trip(query_data(query), proto);
}

#[test]
fn test_document_path_with_ordering_and_limit_is_a_query() {
    let query = Query::from_path_string("rooms/1")
        .order_by_field("a", Direction::Descending)
        .unwrap()
        .with_limit(3);
    let proto = query_target(
        &format!("{}/rooms", ROOT),
        v1::StructuredQuery {
            from: from("1"),
            order_by: vec![v1::order("a", DESCENDING), v1::order(KEY, DESCENDING)],
            limit: Some(v1::Int32Value { value: 3 }),
            ..Default::default()
        },
    );
    expect_round_trip(query_data(query), proto);
}

#[test]
fn test_documents_target_with_several_documents_fails() {
    let proto = v1::Target {
        target_type: Some(TargetType::Documents(v1::DocumentsTarget {
            documents: vec![format!("{}/docs/1", ROOT), format!("{}/docs/2", ROOT)],
        })),
        resume_token: Vec::new(),
        target_id: 1,
    };
    let err = serializer().decode_target(&proto.encode_to_vec()).unwrap_err();
    assert!(err.is_data_loss());
}

#[test]
fn test_query_target_without_collection_fails() {
    let proto = query_target(ROOT, v1::StructuredQuery::default());
    let err = serializer().decode_target(&proto.encode_to_vec()).unwrap_err();
    assert!(err.is_data_loss());
}

#[test]
fn test_query_target_in_other_database_fails() {
    let proto = query_target(
        "projects/p/databases/elsewhere/documents",
        v1::StructuredQuery {
            from: from("docs"),
            ..Default::default()
        },
    );
    let err = serializer().decode_target(&proto.encode_to_vec()).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_collection_id_with_slash_fails() {
    let proto = query_target(
        ROOT,
        v1::StructuredQuery {
            from: from("rooms/1/messages"),
            ..Default::default()
        },
    );
    let err = serializer().decode_target(&proto.encode_to_vec()).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_target_without_type_fails() {
    let proto = v1::Target {
        target_type: None,
        resume_token: vec![1],
        target_id: 3,
    };
    let err = serializer().decode_target(&proto.encode_to_vec()).unwrap_err();
    assert!(err.is_data_loss());
}

#[test]
fn test_unknown_filter_operator_fails() {
    let proto = query_target(
        ROOT,
        v1::StructuredQuery {
            from: from("docs"),
            r#where: Some(field_filter("prop", 99, v1::integer_value(1))),
            ..Default::default()
        },
    );
    let err = serializer().decode_target(&proto.encode_to_vec()).unwrap_err();
    assert!(err.is_data_loss());
}

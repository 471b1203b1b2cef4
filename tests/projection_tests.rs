mod common;

use std::collections::BTreeSet;

use bson::doc;
use common::{path, translator, user_metadata};
use mongo_translator::ast::{BinaryComparisonOperator, Projection, QueryExpr, Sort, SortKey};
use mongo_translator::{EntityMetadata, Field, FieldType, Path, required_fields};
use serde_json::json;

fn paths(items: &[&str]) -> BTreeSet<Path> {
    items.iter().map(|s| path(s)).collect()
}

#[test]
fn test_nothing_requested_nothing_required() {
    assert!(required_fields(&user_metadata(), None, None, None).is_empty());
}

#[test]
fn test_object_projection_expands_to_leaves() {
    let p = Projection::include(path("address"));
    assert_eq!(
        required_fields(&user_metadata(), Some(&p), None, None),
        paths(&["address.city", "address.zip"])
    );
}

#[test]
fn test_object_array_projection_expands_to_element_leaves() {
    let p = Projection::include(path("lines"));
    assert_eq!(
        required_fields(&user_metadata(), Some(&p), None, None),
        paths(&["lines.*.qty", "lines.*.sku"])
    );
}

#[test]
fn test_simple_array_is_a_leaf() {
    let p = Projection::include(path("tags"));
    assert_eq!(
        required_fields(&user_metadata(), Some(&p), None, None),
        paths(&["tags"])
    );
}

#[test]
fn test_composites_never_appear() {
    let p = Projection::List(vec![
        Projection::include(path("address")),
        Projection::include(path("lines")),
        Projection::include(path("left")),
        Projection::include(path("manager")),
    ]);
    let md = user_metadata();
    let fields = required_fields(&md, Some(&p), None, None);
    for composite in ["address", "lines", "left", "lines.*", "left.*", "manager"] {
        assert!(!fields.contains(&path(composite)), "{composite} listed");
    }
    assert!(fields.contains(&path("left.*.v")));
}

fn nested_metadata() -> EntityMetadata {
    EntityMetadata::new(
        "nested",
        vec![(
            "a",
            Field::object(vec![
                ("b", Field::object(vec![("c", Field::Simple(FieldType::String))])),
                ("d", Field::Simple(FieldType::String)),
                (
                    "e",
                    Field::object_array(vec![("f", Field::Simple(FieldType::Integer))]),
                ),
            ]),
        )],
    )
}

fn include_a(recursive: bool) -> Projection {
    Projection::Field {
        field: path("a"),
        include: true,
        recursive,
    }
}

#[test]
fn test_non_recursive_include_stops_at_direct_children() {
    assert_eq!(
        required_fields(&nested_metadata(), Some(&include_a(false)), None, None),
        paths(&["a.d"])
    );
}

#[test]
fn test_recursive_include_reaches_every_descendant() {
    assert_eq!(
        required_fields(&nested_metadata(), Some(&include_a(true)), None, None),
        paths(&["a.b.c", "a.d", "a.e.*.f"])
    );
}

#[test]
fn test_excluded_projection_requires_nothing() {
    let p = Projection::exclude(path("name"));
    assert!(required_fields(&user_metadata(), Some(&p), None, None).is_empty());
}

#[test]
fn test_array_projection_with_elem_match() {
    let p = Projection::Array {
        field: path("lines"),
        include: true,
        elem_match: Some(Box::new(QueryExpr::ValueComparison {
            field: path("qty"),
            op: BinaryComparisonOperator::Gt,
            rvalue: json!(1),
        })),
        project: Box::new(Projection::include(path("sku"))),
    };
    assert_eq!(
        required_fields(&user_metadata(), Some(&p), None, None),
        paths(&["lines.*.qty", "lines.*.sku"])
    );
}

#[test]
fn test_query_and_sort_add_fields() {
    let q = QueryExpr::FieldComparison {
        field: path("age"),
        op: BinaryComparisonOperator::Lt,
        rfield: path("lines.*.qty"),
    };
    let s = Sort::Key(SortKey::desc(path("name")));
    assert_eq!(
        required_fields(&user_metadata(), None, Some(&q), Some(&s)),
        paths(&["age", "lines.*.qty", "name"])
    );
}

#[test]
fn test_elem_match_query_fields_are_under_the_array() {
    let q = QueryExpr::ArrayMatch {
        array: path("lines"),
        elem_match: Box::new(QueryExpr::ValueComparison {
            field: path("sku"),
            op: BinaryComparisonOperator::Eq,
            rvalue: json!("A1"),
        }),
    };
    let fields = required_fields(&user_metadata(), None, Some(&q), None);
    assert!(fields.contains(&path("lines.*.sku")));
}

#[test]
fn test_translate_projection_uses_storage_paths() {
    let t = translator();
    let p = Projection::List(vec![
        Projection::include(path("address.city")),
        Projection::include(path("lines.*.sku")),
    ]);
    assert_eq!(
        t.translate_projection(&user_metadata(), Some(&p), None, None),
        doc! {"address.city": 1, "lines.sku": 1}
    );
}

#[test]
fn test_sort_single_and_composite() {
    let t = translator();
    assert_eq!(
        t.translate_sort(&Sort::Key(SortKey::desc(path("age")))).unwrap(),
        doc! {"age": -1}
    );
    let composite = Sort::Composite(vec![
        SortKey::asc(path("name")),
        SortKey::desc(path("address.city")),
    ]);
    let out = t.translate_sort(&composite).unwrap();
    assert_eq!(out, doc! {"name": 1, "address.city": -1});
    assert_eq!(
        out.keys().collect::<Vec<_>>(),
        ["name", "address.city"]
    );
}

#[test]
fn test_sort_duplicate_key_overwrites_in_place() {
    let composite = Sort::Composite(vec![
        SortKey::asc(path("name")),
        SortKey::asc(path("age")),
        SortKey::desc(path("name")),
    ]);
    let out = translator().translate_sort(&composite).unwrap();
    assert_eq!(out.keys().collect::<Vec<_>>(), ["name", "age"]);
    assert_eq!(out.get_i32("name").unwrap(), -1);
}

mod common;

use bson::{Bson, Document, doc, oid::ObjectId};
use common::{path, translator, user_metadata};
use mongo_translator::ast::{
    BinaryComparisonOperator as Cmp, ContainsOperator, NaryLogicalOperator, NaryRelationalOperator,
    QueryExpr, RegexOptions, UnaryLogicalOperator,
};
use serde_json::{Value, json};

fn cmp(field: &str, op: Cmp, rvalue: Value) -> QueryExpr {
    QueryExpr::ValueComparison {
        field: path(field),
        op,
        rvalue,
    }
}

fn translate(q: &QueryExpr) -> Document {
    translator().translate_query(&user_metadata(), q).unwrap()
}

fn error_code(q: &QueryExpr) -> &'static str {
    translator()
        .translate_query(&user_metadata(), q)
        .unwrap_err()
        .code()
}

#[test]
fn test_equality_on_identifier_keeps_plain_string() {
    assert_eq!(translate(&cmp("_id", Cmp::Eq, json!("abc"))), doc! {"_id": "abc"});
}

#[test]
fn test_equality_on_identifier_builds_object_id() {
    let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
    assert_eq!(
        translate(&cmp("_id", Cmp::Eq, json!("507f1f77bcf86cd799439011"))),
        doc! {"_id": oid}
    );
}

#[test]
fn test_operators() {
    assert_eq!(translate(&cmp("age", Cmp::Gte, json!(18))), doc! {"age": {"$gte": 18_i64}});
    assert_eq!(translate(&cmp("age", Cmp::Lt, json!("7"))), doc! {"age": {"$lt": 7_i64}});
    assert_eq!(
        translate(&cmp("address.city", Cmp::Neq, json!("Oslo"))),
        doc! {"address.city": {"$ne": "Oslo"}}
    );
    assert_eq!(
        translate(&cmp("lines.*.qty", Cmp::Gt, json!(1))),
        doc! {"lines.qty": {"$gt": 1_i64}}
    );
}

#[test]
fn test_comparison_support_is_checked() {
    assert_eq!(error_code(&cmp("active", Cmp::Lt, json!(true))), "INVALID_COMPARISON");
    assert_eq!(error_code(&cmp("extra", Cmp::Eq, json!(1))), "INVALID_COMPARISON");
    assert_eq!(error_code(&cmp("address", Cmp::Eq, json!({}))), "INVALID_COMPARISON");
    assert_eq!(error_code(&cmp("nope", Cmp::Eq, json!(1))), "INVALID_FIELD");
    assert_eq!(
        translate(&cmp("active", Cmp::Eq, json!(true))),
        doc! {"active": true}
    );
}

#[test]
fn test_bad_literal_is_invalid_object() {
    let err = translator()
        .translate_query(&user_metadata(), &cmp("age", Cmp::Eq, json!("ten")))
        .unwrap_err();
    assert!(matches!(
        err,
        mongo_translator::TranslateError::InvalidObject { phase: "translate_query", .. }
    ));
}

#[test]
fn test_logical_operators() {
    let q = QueryExpr::NaryLogical {
        op: NaryLogicalOperator::Or,
        queries: vec![cmp("name", Cmp::Eq, json!("a")), cmp("age", Cmp::Gt, json!(3))],
    };
    assert_eq!(
        translate(&q),
        doc! {"$or": [{"name": "a"}, {"age": {"$gt": 3_i64}}]}
    );

    let not = QueryExpr::UnaryLogical {
        op: UnaryLogicalOperator::Not,
        query: Box::new(cmp("name", Cmp::Eq, json!("a"))),
    };
    assert_eq!(translate(&not), doc! {"$nor": [{"name": "a"}]});
}

#[test]
fn test_value_lists() {
    let q = QueryExpr::NaryValueRelational {
        field: path("age"),
        op: NaryRelationalOperator::NotIn,
        values: vec![json!(1), json!("2"), Value::Null],
    };
    assert_eq!(
        translate(&q),
        doc! {"age": {"$nin": [1_i64, 2_i64, Bson::Null]}}
    );

    let ids = QueryExpr::NaryValueRelational {
        field: path("_id"),
        op: NaryRelationalOperator::In,
        values: vec![json!("abc"), json!("507f1f77bcf86cd799439011")],
    };
    let out = translate(&ids);
    let list = out.get_document("_id").unwrap().get_array("$in").unwrap();
    assert_eq!(list[0], Bson::String("abc".into()));
    assert!(matches!(list[1], Bson::ObjectId(_)));

    let empty = QueryExpr::NaryValueRelational {
        field: path("age"),
        op: NaryRelationalOperator::In,
        values: vec![],
    };
    assert_eq!(error_code(&empty), "EMPTY_VALUE_LIST");

    let untyped = QueryExpr::NaryValueRelational {
        field: path("extra"),
        op: NaryRelationalOperator::In,
        values: vec![json!(1)],
    };
    assert_eq!(error_code(&untyped), "INVALID_FIELD");
}

#[test]
fn test_regex() {
    let q = QueryExpr::RegexMatch {
        field: path("name"),
        regex: "^an".into(),
        options: RegexOptions {
            case_insensitive: true,
            dot_all: true,
            ..Default::default()
        },
    };
    assert_eq!(
        translate(&q),
        doc! {"name": {"$regex": "^an", "$options": "is"}}
    );

    let plain = QueryExpr::RegexMatch {
        field: path("address.city"),
        regex: "o".into(),
        options: RegexOptions::default(),
    };
    assert_eq!(translate(&plain), doc! {"address.city": {"$regex": "o"}});
}

#[test]
fn test_array_contains() {
    let contains = |op| QueryExpr::ArrayContains {
        array: path("tags"),
        op,
        values: vec![json!("x"), json!("y")],
    };
    assert_eq!(
        translate(&contains(ContainsOperator::All)),
        doc! {"tags": {"$all": ["x", "y"]}}
    );
    assert_eq!(
        translate(&contains(ContainsOperator::Any)),
        doc! {"$or": [{"tags": "x"}, {"tags": "y"}]}
    );
    assert_eq!(
        translate(&contains(ContainsOperator::None)),
        doc! {"$not": {"$or": [{"tags": "x"}, {"tags": "y"}]}}
    );

    let on_objects = QueryExpr::ArrayContains {
        array: path("lines"),
        op: ContainsOperator::All,
        values: vec![json!("x")],
    };
    assert_eq!(error_code(&on_objects), "INVALID_FIELD");

    let empty = QueryExpr::ArrayContains {
        array: path("tags"),
        op: ContainsOperator::Any,
        values: vec![],
    };
    assert_eq!(error_code(&empty), "EMPTY_VALUE_LIST");
}

#[test]
fn test_elem_match_is_relative_to_element() {
    let q = QueryExpr::ArrayMatch {
        array: path("lines"),
        elem_match: Box::new(QueryExpr::NaryLogical {
            op: NaryLogicalOperator::And,
            queries: vec![
                cmp("sku", Cmp::Eq, json!("A1")),
                cmp("qty", Cmp::Gte, json!(2)),
            ],
        }),
    };
    assert_eq!(
        translate(&q),
        doc! {"lines": {"$elemMatch": {"$and": [{"sku": "A1"}, {"qty": {"$gte": 2_i64}}]}}}
    );
}

#[test]
fn test_elem_match_needs_object_elements() {
    let q = QueryExpr::ArrayMatch {
        array: path("tags"),
        elem_match: Box::new(cmp("x", Cmp::Eq, json!(1))),
    };
    assert_eq!(error_code(&q), "INVALID_FIELD");

    let unknown_member = QueryExpr::ArrayMatch {
        array: path("lines"),
        elem_match: Box::new(cmp("name", Cmp::Eq, json!("a"))),
    };
    assert_eq!(error_code(&unknown_member), "INVALID_FIELD");
}

#[test]
fn test_field_comparison_becomes_where() {
    let q = QueryExpr::FieldComparison {
        field: path("name"),
        op: Cmp::Eq,
        rfield: path("address.city"),
    };
    assert_eq!(
        translate(&q),
        doc! {"$where": "function() {if(this.name == this.address.city) {return true;}return false;}"}
    );
}

#[test]
fn test_field_comparison_inside_elem_match_is_unsupported() {
    let q = QueryExpr::ArrayMatch {
        array: path("lines"),
        elem_match: Box::new(QueryExpr::FieldComparison {
            field: path("sku"),
            op: Cmp::Eq,
            rfield: path("qty"),
        }),
    };
    assert_eq!(error_code(&q), "UNSUPPORTED_FEATURE");
}

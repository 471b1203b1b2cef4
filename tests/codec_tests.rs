mod common;

use bson::{Bson, doc};
use common::{path, translator, user_metadata};
use mongo_translator::ast::{FieldAndRValue, UpdateExpr, UpdateOperator};
use mongo_translator::{TranslateError, value_at};
use serde_json::json;

#[test]
fn test_round_trip_adds_explicit_nulls() {
    let t = translator();
    let input = json!({
        "objectType": "user",
        "name": "Ann",
        "address": { "city": "Oslo" },
        "scores": [1, 2, 3],
    });

    let record = t.encode(&input).unwrap();
    assert_eq!(
        record,
        doc! {
            "objectType": "user",
            "name": "Ann",
            "address": { "city": "Oslo" },
            "scores": [1_i64, 2_i64, 3_i64],
        }
    );

    let output = t.decode(&record).unwrap();
    assert_eq!(
        output,
        json!({
            "objectType": "user",
            "_id": null,
            "name": "Ann",
            "age": null,
            "active": null,
            "balance": null,
            "extra": null,
            "address": { "city": "Oslo", "zip": null },
            "tags": null,
            "scores": [1, 2, 3],
            "limits": null,
            "lines": null,
            "left": null,
            "right": null,
        })
    );
}

#[test]
fn test_nulls_are_stored_explicitly() {
    let record = translator()
        .encode(&json!({"objectType": "user", "name": null, "address": null}))
        .unwrap();
    assert_eq!(
        record,
        doc! {"objectType": "user", "name": Bson::Null, "address": Bson::Null}
    );
}

#[test]
fn test_empty_array_stays_a_list() {
    let record = translator()
        .encode(&json!({"objectType": "user", "tags": []}))
        .unwrap();
    assert_eq!(record.get("tags"), Some(&Bson::Array(vec![])));
}

#[test]
fn test_object_array_elements_recurse() {
    let record = translator()
        .encode(&json!({
            "objectType": "user",
            "lines": [{"sku": "A1", "qty": "2"}, {"sku": "B7"}],
        }))
        .unwrap();
    assert_eq!(
        record.get("lines"),
        Some(&bson::bson!([{"sku": "A1", "qty": 2_i64}, {"sku": "B7"}]))
    );
}

#[test]
fn test_unknown_field_fails_fast() {
    let err = translator()
        .encode(&json!({"objectType": "user", "address": {"street": "x"}}))
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_FIELD");
    assert!(err.to_string().contains("address.street"));
}

#[test]
fn test_shape_mismatch_is_invalid_field() {
    let err = translator()
        .encode(&json!({"objectType": "user", "address": "Oslo"}))
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_FIELD");
}

#[test]
fn test_entity_type_errors() {
    let t = translator();
    assert_eq!(
        t.encode(&json!({"name": "x"})).unwrap_err().code(),
        "NO_OBJECT_TYPE"
    );
    assert_eq!(
        t.encode(&json!({"objectType": "ghost"})).unwrap_err().code(),
        "INVALID_OBJECTTYPE"
    );
    assert_eq!(
        t.encode(&json!({"objectType": 5})).unwrap_err().code(),
        "INVALID_OBJECTTYPE"
    );
    assert_eq!(
        t.decode(&doc! {"name": "x"}).unwrap_err().code(),
        "NO_OBJECT_TYPE"
    );
}

#[test]
fn test_cast_failure_is_wrapped_with_phase() {
    let err = translator()
        .encode(&json!({"objectType": "user", "age": "old"}))
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_OBJECT");
    assert!(matches!(err, TranslateError::InvalidObject { phase: "encode", .. }));
}

#[test]
fn test_integer_out_of_range_is_rejected() {
    let t = translator();
    for age in [json!(u64::MAX), json!(1e20)] {
        let err = t
            .encode(&json!({"objectType": "user", "age": age}))
            .unwrap_err();
        assert!(matches!(err, TranslateError::InvalidObject { phase: "encode", .. }));
    }
    let err = t
        .translate_update(
            &user_metadata(),
            &UpdateExpr::Set {
                op: UpdateOperator::Add,
                fields: vec![FieldAndRValue::value(path("age"), json!(u64::MAX))],
            },
        )
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_OBJECT");
}

#[test]
fn test_reference_fields_are_unsupported() {
    let t = translator();
    let err = t
        .encode(&json!({"objectType": "user", "manager": "x"}))
        .unwrap_err();
    assert_eq!(err.code(), "UNSUPPORTED_FEATURE");

    let decoded = t.decode(&doc! {"objectType": "user", "manager": "x"}).unwrap();
    assert!(decoded.get("manager").is_none());
}

#[test]
fn test_big_decimal_is_stored_and_read_as_string() {
    let t = translator();
    let record = t
        .encode(&json!({"objectType": "user", "balance": "12345678901234567890.50"}))
        .unwrap();
    assert_eq!(
        record.get("balance"),
        Some(&Bson::String("12345678901234567890.50".into()))
    );
    let back = t.decode(&record).unwrap();
    assert_eq!(back["balance"], json!("12345678901234567890.50"));
}

#[test]
fn test_identifier_is_normalized_on_encode() {
    let t = translator();
    let record = t
        .encode(&json!({"objectType": "user", "_id": "507f1f77bcf86cd799439011"}))
        .unwrap();
    assert!(matches!(record.get("_id"), Some(Bson::ObjectId(_))));
    assert_eq!(
        t.decode(&record).unwrap()["_id"],
        json!("507f1f77bcf86cd799439011")
    );

    let record = t.encode(&json!({"objectType": "user", "_id": "abc"})).unwrap();
    assert_eq!(record.get("_id"), Some(&Bson::String("abc".into())));
}

#[test]
fn test_decode_skips_mismatched_shapes() {
    let decoded = translator()
        .decode(&doc! {"objectType": "user", "address": "Oslo", "name": "Ann"})
        .unwrap();
    assert!(decoded.get("address").is_none());
    assert_eq!(decoded["name"], json!("Ann"));
}

#[test]
fn test_batches() {
    let t = translator();
    let docs = vec![
        json!({"objectType": "user", "name": "a"}),
        json!({"objectType": "user", "name": "b"}),
    ];
    let records = t.encode_all(&docs).unwrap();
    assert_eq!(records.len(), 2);
    let back = t.decode_all(&records).unwrap();
    assert_eq!(back[1]["name"], json!("b"));

    let bad = vec![json!({"objectType": "user"}), json!({"name": "x"})];
    assert_eq!(t.encode_all(&bad).unwrap_err().code(), "NO_OBJECT_TYPE");
}

#[test]
fn test_replacement_keeps_unknown_stored_fields() {
    let t = translator();
    let previous = doc! {
        "objectType": "user",
        "name": "old",
        "legacyFlag": true,
        "address": { "city": "Oslo", "geo": [1.0, 2.0] },
    };
    let record = t
        .encode_replacement(
            &json!({"objectType": "user", "name": "new", "address": {"city": "Bergen"}}),
            &previous,
        )
        .unwrap();
    assert_eq!(record.get_str("name").unwrap(), "new");
    assert!(record.get_bool("legacyFlag").unwrap());
    let address = record.get_document("address").unwrap();
    assert_eq!(address.get_str("city").unwrap(), "Bergen");
    assert!(address.contains_key("geo"));
}

#[test]
fn test_preserve_unknown_fields_never_overwrites() {
    let t = translator();
    let md = user_metadata();
    let old = doc! {"name": "old", "x": 1};
    let mut new = doc! {"name": "new", "x": 2};
    t.preserve_unknown_fields(&old, &mut new, &md);
    assert_eq!(new, doc! {"name": "new", "x": 2});
}

#[test]
fn test_value_at() {
    let record = doc! {
        "address": { "city": "Oslo" },
        "scores": [1_i64, 2_i64],
        "lines": [{ "sku": "A1" }],
    };
    assert_eq!(
        value_at(&record, &path("address.city")).unwrap(),
        &Bson::String("Oslo".into())
    );
    assert_eq!(value_at(&record, &path("scores.1")).unwrap(), &Bson::Int64(2));
    assert_eq!(
        value_at(&record, &path("lines.0.sku")).unwrap(),
        &Bson::String("A1".into())
    );
    assert_eq!(
        value_at(&record, &path("lines.*.sku")).unwrap_err().code(),
        "TRANSLATION_ERROR"
    );
    assert_eq!(
        value_at(&record, &path("scores.5")).unwrap_err().code(),
        "TRANSLATION_ERROR"
    );
}

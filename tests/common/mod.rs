#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use mongo_translator::metadata::Element;
use mongo_translator::{EntityMetadata, Field, FieldType, Path, Translator};

pub type Resolver = HashMap<String, Arc<EntityMetadata>>;

/// A user entity touching every field kind.
pub fn user_metadata() -> EntityMetadata {
    EntityMetadata::new(
        "user",
        vec![
            ("objectType", Field::Simple(FieldType::String)),
            ("_id", Field::Simple(FieldType::String)),
            ("name", Field::Simple(FieldType::String)),
            ("age", Field::Simple(FieldType::Integer)),
            ("active", Field::Simple(FieldType::Boolean)),
            ("balance", Field::Simple(FieldType::BigDecimal)),
            ("extra", Field::Simple(FieldType::Any)),
            (
                "address",
                Field::object(vec![
                    ("city", Field::Simple(FieldType::String)),
                    ("zip", Field::Simple(FieldType::String)),
                ]),
            ),
            ("tags", Field::Array(Element::Simple(FieldType::String))),
            ("scores", Field::Array(Element::Simple(FieldType::Integer))),
            ("limits", Field::Array(Element::Simple(FieldType::Integer))),
            (
                "lines",
                Field::object_array(vec![
                    ("sku", Field::Simple(FieldType::String)),
                    ("qty", Field::Simple(FieldType::Integer)),
                ]),
            ),
            (
                "left",
                Field::object_array(vec![("v", Field::Simple(FieldType::Integer))]),
            ),
            (
                "right",
                Field::object_array(vec![("v", Field::Simple(FieldType::Integer))]),
            ),
            ("manager", Field::Reference("user".to_string())),
        ],
    )
}

pub fn resolver() -> Resolver {
    let mut map = HashMap::new();
    map.insert("user".to_string(), Arc::new(user_metadata()));
    map
}

pub fn translator() -> Translator<Resolver> {
    Translator::new(resolver())
}

pub fn path(s: &str) -> Path {
    Path::parse(s).unwrap()
}

//! Normalization of the reserved identifier field.

use std::sync::LazyLock;

use bson::Bson;
use bson::oid::ObjectId;
use regex::Regex;

static OBJECT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").expect("valid object id pattern"));

/// True when `s` is a 24-hex-digit object identifier.
pub fn is_object_id(s: &str) -> bool {
    OBJECT_ID.is_match(s)
}

/// Canonicalizes an identifier value.
///
/// Null stays null. Values whose string form is a 24-hex-digit object id
/// become a native [`ObjectId`]; everything else becomes its string form.
///
/// ```
/// use bson::Bson;
/// use mongo_translator::normalize_id;
///
/// assert!(matches!(
///     normalize_id(Bson::String("507f1f77bcf86cd799439011".into())),
///     Bson::ObjectId(_)
/// ));
/// assert_eq!(normalize_id(Bson::String("abc".into())), Bson::String("abc".into()));
/// assert_eq!(normalize_id(Bson::Null), Bson::Null);
/// ```
pub fn normalize_id(value: Bson) -> Bson {
    let text = match value {
        Bson::Null | Bson::Undefined => return Bson::Null,
        Bson::ObjectId(_) => return value,
        Bson::String(s) => s,
        Bson::Int32(n) => n.to_string(),
        Bson::Int64(n) => n.to_string(),
        Bson::Double(n) => n.to_string(),
        Bson::Boolean(b) => b.to_string(),
        other => other.to_string(),
    };
    if is_object_id(&text)
        && let Ok(oid) = ObjectId::parse_str(&text)
    {
        return Bson::ObjectId(oid);
    }
    Bson::String(text)
}

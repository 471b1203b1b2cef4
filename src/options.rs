use serde::Deserialize;

/// Translator configuration.
///
/// Every field has a default, so a partial JSON object is enough:
///
/// ```
/// use mongo_translator::TranslatorOptions;
///
/// let options: TranslatorOptions = serde_json::from_str(r#"{"id_field": "key"}"#).unwrap();
/// assert_eq!(options.object_type_field, "objectType");
/// assert_eq!(options.id_field, "key");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TranslatorOptions {
    /// Top-level field naming the entity type of a document or record
    pub object_type_field: String,
    /// Reserved identifier field, normalized on every write and equality test
    pub id_field: String,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        TranslatorOptions {
            object_type_field: "objectType".to_string(),
            id_field: "_id".to_string(),
        }
    }
}

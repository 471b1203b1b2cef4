//! Metadata-driven conversion between JSON documents and physical records.
//!
//! Encoding walks the document and the field tree together and fails on any
//! field metadata does not declare. Decoding walks the field tree only, so
//! every declared field appears in the output, as `null` when not stored.

use bson::{Bson, Document};
use serde_json::{Map, Value};

use crate::error::{Result, TranslateError};
use crate::merge::FieldMerge;
use crate::metadata::{EntityMetadata, FieldId, FieldKind, FieldType, MetadataResolver};
use crate::path::{Path, Segment};
use crate::translator::Translator;

impl<R: MetadataResolver, M: FieldMerge> Translator<R, M> {
    /// Encodes a document into a physical record.
    ///
    /// The document's entity-type field selects the metadata.
    pub fn encode(&self, document: &Value) -> Result<Document> {
        tracing::debug!("encode enter");
        let entity = match document.get(&self.options.object_type_field) {
            None => {
                return Err(TranslateError::NoObjectType(
                    self.options.object_type_field.clone(),
                ));
            }
            Some(Value::String(s)) => s.as_str(),
            Some(other) => return Err(TranslateError::InvalidObjectType(other.to_string())),
        };
        let md = self.metadata(entity)?;
        let record = self.encode_with(document, &md)?;
        tracing::debug!(entity, record = %record, "encode return");
        Ok(record)
    }

    /// Encodes every document; the first failure aborts the batch.
    pub fn encode_all(&self, documents: &[Value]) -> Result<Vec<Document>> {
        documents.iter().map(|d| self.encode(d)).collect()
    }

    /// Encodes a document that replaces `previous`, keeping the fields of
    /// `previous` that metadata does not describe.
    pub fn encode_replacement(&self, document: &Value, previous: &Document) -> Result<Document> {
        let mut record = self.encode(document)?;
        let entity = document
            .get(&self.options.object_type_field)
            .and_then(Value::as_str)
            .unwrap_or_default();
        let md = self.metadata(entity)?;
        self.preserve_unknown_fields(previous, &mut record, &md);
        Ok(record)
    }

    /// Copies fields of `old` that `md` does not declare into `new`.
    pub fn preserve_unknown_fields(&self, old: &Document, new: &mut Document, md: &EntityMetadata) {
        self.merge.merge(old, new, md);
    }

    /// Decodes a physical record into a document.
    ///
    /// The record's entity-type field selects the metadata.
    pub fn decode(&self, record: &Document) -> Result<Value> {
        tracing::debug!("decode enter");
        let entity = match record.get(&self.options.object_type_field) {
            None => {
                return Err(TranslateError::NoObjectType(
                    self.options.object_type_field.clone(),
                ));
            }
            Some(Bson::String(s)) => s.as_str(),
            Some(other) => return Err(TranslateError::InvalidObjectType(other.to_string())),
        };
        let md = self.metadata(entity)?;
        let document = self.decode_with(record, &md)?;
        tracing::debug!(entity, "decode return");
        Ok(document)
    }

    /// Decodes every record; the first failure aborts the batch.
    pub fn decode_all(&self, records: &[Document]) -> Result<Vec<Value>> {
        records.iter().map(|r| self.decode(r)).collect()
    }
}

impl<R, M> Translator<R, M> {
    /// Encodes `document` against known metadata.
    pub fn encode_with(&self, document: &Value, md: &EntityMetadata) -> Result<Document> {
        tracing::debug!(entity = md.name(), "encoding");
        let Value::Object(members) = document else {
            return Err(TranslateError::InvalidField(document.to_string()));
        };
        self.encode_object(md, members, md.root(), &Path::root())
            .map_err(|e| e.in_phase("encode"))
    }

    /// Decodes `record` against known metadata.
    pub fn decode_with(&self, record: &Document, md: &EntityMetadata) -> Result<Value> {
        tracing::debug!(entity = md.name(), "decoding");
        self.decode_object(md, record, md.root(), &Path::root())
            .map(Value::Object)
            .map_err(|e| e.in_phase("decode"))
    }

    fn encode_object(
        &self,
        md: &EntityMetadata,
        members: &Map<String, Value>,
        scope: FieldId,
        prefix: &Path,
    ) -> Result<Document> {
        let mut out = Document::new();
        for (name, value) in members {
            let path = prefix.child(Segment::Name(name.clone()));
            tracing::debug!(field = %path, "encode field");
            let id = md
                .child(scope, name)
                .ok_or_else(|| TranslateError::InvalidField(path.to_string()))?;
            let encoded = match (md.node(id).kind(), value) {
                (FieldKind::Simple(t), _) => self.encode_simple(*t, &path, value)?,
                (FieldKind::Object(_), Value::Object(nested)) => {
                    Bson::Document(self.encode_object(md, nested, id, &path)?)
                }
                (FieldKind::Array(el), Value::Array(items)) => {
                    Bson::Array(self.encode_array(md, items, *el, &path)?)
                }
                (FieldKind::Object(_) | FieldKind::Array(_), Value::Null) => Bson::Null,
                (FieldKind::Reference(entity), _) => {
                    return Err(TranslateError::Unsupported(format!(
                        "reference field {path} to {entity}"
                    )));
                }
                _ => return Err(TranslateError::InvalidField(path.to_string())),
            };
            out.insert(name.clone(), encoded);
        }
        Ok(out)
    }

    fn encode_simple(&self, t: FieldType, path: &Path, value: &Value) -> Result<Bson> {
        let cast = t.cast(value)?;
        if cast.is_null() {
            return Ok(Bson::Null);
        }
        let stored = cast.into_bson();
        if self.is_id(path) {
            return Ok(crate::identifier::normalize_id(stored));
        }
        Ok(stored)
    }

    fn encode_array(
        &self,
        md: &EntityMetadata,
        items: &[Value],
        element: FieldId,
        prefix: &Path,
    ) -> Result<Vec<Bson>> {
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let path = prefix.child(Segment::Index(i));
            let encoded = match (md.node(element).kind(), item) {
                (_, Value::Null) => Bson::Null,
                (FieldKind::SimpleElement(t), _) => t.cast(item)?.into_bson(),
                (FieldKind::ObjectElement(_), Value::Object(nested)) => {
                    Bson::Document(self.encode_object(md, nested, element, &path)?)
                }
                _ => return Err(TranslateError::InvalidField(path.to_string())),
            };
            out.push(encoded);
        }
        Ok(out)
    }

    fn decode_object(
        &self,
        md: &EntityMetadata,
        record: &Document,
        scope: FieldId,
        prefix: &Path,
    ) -> Result<Map<String, Value>> {
        let mut out = Map::new();
        for &id in md.node(scope).members() {
            let node = md.node(id);
            let name = node.name();
            let path = prefix.child(Segment::Name(name.to_string()));
            tracing::debug!(field = %path, "decode field");
            if let FieldKind::Reference(_) = node.kind() {
                tracing::debug!(field = %path, "reference field not translated");
                continue;
            }
            let stored = match record.get(name) {
                None | Some(Bson::Null) => {
                    out.insert(name.to_string(), Value::Null);
                    continue;
                }
                Some(stored) => stored,
            };
            match (node.kind(), stored) {
                (FieldKind::Simple(t), _) => {
                    out.insert(name.to_string(), t.to_json(stored)?);
                }
                (FieldKind::Object(_), Bson::Document(nested)) => {
                    let decoded = self.decode_object(md, nested, id, &path)?;
                    out.insert(name.to_string(), Value::Object(decoded));
                }
                (FieldKind::Array(el), Bson::Array(items)) => {
                    let decoded = self.decode_array(md, items, *el, &path)?;
                    out.insert(name.to_string(), Value::Array(decoded));
                }
                (_, other) => {
                    tracing::warn!(field = %path, stored = %other, "stored value does not match metadata");
                }
            }
        }
        Ok(out)
    }

    fn decode_array(
        &self,
        md: &EntityMetadata,
        items: &[Bson],
        element: FieldId,
        prefix: &Path,
    ) -> Result<Vec<Value>> {
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let decoded = match (md.node(element).kind(), item) {
                (_, Bson::Null) => Value::Null,
                (FieldKind::SimpleElement(t), _) => t.to_json(item)?,
                (FieldKind::ObjectElement(_), Bson::Document(nested)) => {
                    let path = prefix.child(Segment::Index(i));
                    Value::Object(self.decode_object(md, nested, element, &path)?)
                }
                (_, other) => {
                    tracing::warn!(field = %prefix, index = i, stored = %other, "expected an object element");
                    Value::Null
                }
            };
            out.push(decoded);
        }
        Ok(out)
    }
}

/// The value stored at a concrete `path` of `record`.
///
/// Wildcards and missing steps are `TRANSLATION_ERROR`.
pub fn value_at<'a>(record: &'a Document, path: &Path) -> Result<&'a Bson> {
    let missing = || TranslateError::Translation(path.to_string());
    let (first, rest) = path.segments().split_first().ok_or_else(missing)?;
    let Segment::Name(first) = first else {
        return Err(missing());
    };
    let mut at = record.get(first).ok_or_else(missing)?;
    for segment in rest {
        at = match (segment, at) {
            (Segment::Name(name), Bson::Document(nested)) => nested.get(name),
            (Segment::Index(i), Bson::Array(items)) => items.get(*i),
            _ => None,
        }
        .ok_or_else(missing)?;
    }
    Ok(at)
}

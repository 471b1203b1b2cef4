use std::collections::BTreeSet;

use bson::Document;

use crate::ast::{Projection, QueryExpr, Sort};
use crate::metadata::{EntityMetadata, FieldKind};
use crate::path::Path;
use crate::translator::Translator;

/// Leaf fields needed to evaluate `projection`, `query` and `sort`.
///
/// Any argument may be absent. Object fields, arrays of objects and array
/// elements are never returned themselves, only the leaves below them. Simple
/// arrays count as leaves. Reference fields are not stored and never appear.
pub fn required_fields(
    md: &EntityMetadata,
    projection: Option<&Projection>,
    query: Option<&QueryExpr>,
    sort: Option<&Sort>,
) -> BTreeSet<Path> {
    let mut out = BTreeSet::new();
    for (path, id) in md.fields() {
        let leaf = match md.node(id).kind() {
            FieldKind::Simple(_) => true,
            FieldKind::Array(el) => !matches!(md.node(*el).kind(), FieldKind::ObjectElement(_)),
            FieldKind::Object(_)
            | FieldKind::SimpleElement(_)
            | FieldKind::ObjectElement(_)
            | FieldKind::Reference(_) => false,
        };
        if !leaf {
            continue;
        }
        let required = projection.is_some_and(|p| p.is_field_required(&path))
            || query.is_some_and(|q| q.is_required(&path))
            || sort.is_some_and(|s| s.is_required(&path));
        tracing::debug!(field = %path, required, "required field check");
        if required {
            out.insert(path);
        }
    }
    out
}

impl<R, M> Translator<R, M> {
    /// Inclusion projection of [`required_fields`], `{field: 1}` per field.
    pub fn translate_projection(
        &self,
        md: &EntityMetadata,
        projection: Option<&Projection>,
        query: Option<&QueryExpr>,
        sort: Option<&Sort>,
    ) -> Document {
        let mut out = Document::new();
        for field in required_fields(md, projection, query, sort) {
            out.insert(field.storage_path(), 1);
        }
        tracing::debug!(projection = %out, "translate_projection return");
        out
    }
}

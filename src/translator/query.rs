//! Query expressions to native query documents.
//!
//! | Expression | Native form |
//! |---|---|
//! | `f == v` | `{f: v}` |
//! | `f op v` | `{f: {$op: v}}` |
//! | `f in [..]` | `{f: {$in: [..]}}` |
//! | `f =~ re` | `{f: {$regex: re, $options: flags}}` |
//! | `and` / `or` | `{$and: [..]}` / `{$or: [..]}` |
//! | `not q` | `{$nor: [q]}` |
//! | `a contains all` | `{a: {$all: [..]}}` |
//! | `a contains any` | `{$or: [{a: v}, ..]}` |
//! | `a contains none` | `{$not: {$or: [{a: v}, ..]}}` |
//! | `a elemMatch q` | `{a: {$elemMatch: q}}` |
//! | `f op g`, `f in g` | `{$where: "function() {..}"}` |

use bson::{Bson, Document, doc};
use serde_json::Value;

use crate::ast::{
    BinaryComparisonOperator, ContainsOperator, NaryRelationalOperator, QueryExpr, RegexOptions,
};
use crate::error::{Result, TranslateError};
use crate::metadata::{EntityMetadata, FieldId, FieldKind, FieldType};
use crate::path::Path;
use crate::translator::{Translator, predicate, resolve};

impl<R, M> Translator<R, M> {
    /// Translates `query` into a native query document.
    pub fn translate_query(&self, md: &EntityMetadata, query: &QueryExpr) -> Result<Document> {
        tracing::debug!(entity = md.name(), "translate_query enter");
        let out = self
            .query_doc(md, md.root(), query)
            .map_err(|e| e.in_phase("translate_query"))?;
        tracing::debug!(query = %out, "translate_query return");
        Ok(out)
    }

    fn query_doc(&self, md: &EntityMetadata, context: FieldId, query: &QueryExpr) -> Result<Document> {
        match query {
            QueryExpr::ValueComparison { field, op, rvalue } => {
                self.value_comparison(md, context, field, *op, rvalue)
            }
            QueryExpr::FieldComparison { .. } | QueryExpr::NaryFieldRelational { .. } => {
                top_level_only(md, context, query)?;
                let predicate = predicate::compile(md, query)?;
                Ok(doc! { "$where": predicate.render() })
            }
            QueryExpr::NaryLogical { op, queries } => {
                let key = op.mongo_operator();
                let list = queries
                    .iter()
                    .map(|q| self.query_doc(md, context, q).map(Bson::Document))
                    .collect::<Result<Vec<_>>>()?;
                Ok(doc! { key: list })
            }
            QueryExpr::UnaryLogical { op, query } => {
                let key = op.mongo_operator();
                let inner = self.query_doc(md, context, query)?;
                Ok(doc! { key: [inner] })
            }
            QueryExpr::NaryValueRelational { field, op, values } => {
                self.value_relational(md, context, field, *op, values)
            }
            QueryExpr::RegexMatch {
                field,
                regex,
                options,
            } => regex_match(md, context, field, regex, options),
            QueryExpr::ArrayContains { array, op, values } => {
                array_contains(md, context, array, *op, values)
            }
            QueryExpr::ArrayMatch { array, elem_match } => {
                let id = resolve(md, context, array)?;
                let element = match md.node(id).kind() {
                    FieldKind::Array(el)
                        if matches!(md.node(*el).kind(), FieldKind::ObjectElement(_)) =>
                    {
                        *el
                    }
                    _ => return Err(TranslateError::InvalidField(array.to_string())),
                };
                let key = array.storage_path();
                let inner = self.query_doc(md, element, elem_match)?;
                Ok(doc! { key: { "$elemMatch": inner } })
            }
        }
    }

    fn value_comparison(
        &self,
        md: &EntityMetadata,
        context: FieldId,
        field: &Path,
        op: BinaryComparisonOperator,
        rvalue: &Value,
    ) -> Result<Document> {
        let id = resolve(md, context, field)?;
        let invalid = || TranslateError::InvalidComparison(format!("{field} {op:?} {rvalue}"));
        let t = md.node(id).field_type().ok_or_else(invalid)?;
        let supported = if op.is_equality() {
            t.supports_equality()
        } else {
            t.supports_ordering()
        };
        if !supported {
            return Err(invalid());
        }

        let value = self.id_aware(md, context, field, t.cast(rvalue)?.into_bson());
        let key = field.storage_path();
        if op == BinaryComparisonOperator::Eq {
            Ok(doc! { key: value })
        } else {
            let op = op.mongo_operator();
            Ok(doc! { key: { op: value } })
        }
    }

    fn value_relational(
        &self,
        md: &EntityMetadata,
        context: FieldId,
        field: &Path,
        op: NaryRelationalOperator,
        values: &[Value],
    ) -> Result<Document> {
        let id = resolve(md, context, field)?;
        let t = md
            .node(id)
            .field_type()
            .filter(FieldType::supports_equality)
            .ok_or_else(|| TranslateError::InvalidField(field.to_string()))?;
        let values = value_list(t, field, values)?
            .into_iter()
            .map(|v| self.id_aware(md, context, field, v))
            .collect::<Vec<_>>();
        let key = field.storage_path();
        let op = op.mongo_operator();
        Ok(doc! { key: { op: values } })
    }
}

/// Generated predicates address fields from the record root.
fn top_level_only(md: &EntityMetadata, context: FieldId, query: &QueryExpr) -> Result<()> {
    if context == md.root() {
        Ok(())
    } else {
        Err(TranslateError::Unsupported(format!(
            "field comparison inside element match: {query:?}"
        )))
    }
}

fn value_list(t: FieldType, field: &Path, values: &[Value]) -> Result<Vec<Bson>> {
    if values.is_empty() {
        return Err(TranslateError::EmptyValueList(field.to_string()));
    }
    values
        .iter()
        .map(|v| Ok(t.cast(v)?.into_bson()))
        .collect()
}

fn regex_match(
    md: &EntityMetadata,
    context: FieldId,
    field: &Path,
    regex: &str,
    options: &RegexOptions,
) -> Result<Document> {
    resolve(md, context, field)?;
    let mut pattern = doc! { "$regex": regex };
    let flags = options.flags();
    if !flags.is_empty() {
        pattern.insert("$options", flags);
    }
    let key = field.storage_path();
    Ok(doc! { key: pattern })
}

fn array_contains(
    md: &EntityMetadata,
    context: FieldId,
    array: &Path,
    op: ContainsOperator,
    values: &[Value],
) -> Result<Document> {
    let id = resolve(md, context, array)?;
    let t = match md.node(id).kind() {
        FieldKind::Array(el) => md.node(*el).field_type(),
        _ => None,
    }
    .ok_or_else(|| TranslateError::InvalidField(array.to_string()))?;
    let values = value_list(t, array, values)?;
    let key = array.storage_path();

    let any = || {
        let each = values
            .iter()
            .map(|v| {
                let mut d = Document::new();
                d.insert(key.clone(), v.clone());
                Bson::Document(d)
            })
            .collect::<Vec<_>>();
        doc! { "$or": each }
    };
    Ok(match op {
        ContainsOperator::All => doc! { key.clone(): { "$all": values.clone() } },
        ContainsOperator::Any => any(),
        ContainsOperator::None => doc! { "$not": any() },
    })
}

use bson::{Bson, Document};

use crate::ast::{Sort, SortKey};
use crate::error::{Result, TranslateError};
use crate::translator::Translator;

impl<R, M> Translator<R, M> {
    /// Translates `sort` into a direction map, `1` ascending and `-1`
    /// descending, in key order.
    ///
    /// A field listed twice keeps its first position and its last direction.
    pub fn translate_sort(&self, sort: &Sort) -> Result<Document> {
        tracing::debug!(keys = sort.keys().len(), "translate_sort enter");
        let mut out = Document::new();
        for key in sort.keys() {
            let (field, direction) = sort_key(key).map_err(|e| e.in_phase("translate_sort"))?;
            if out.insert(field.clone(), direction).is_some() {
                tracing::debug!(%field, "duplicate sort key overwrites earlier entry");
            }
        }
        tracing::debug!(sort = %out, "translate_sort return");
        Ok(out)
    }
}

fn sort_key(key: &SortKey) -> Result<(String, Bson)> {
    if key.field.is_empty() {
        return Err(TranslateError::InvalidField("empty sort key".to_string()));
    }
    let direction = if key.desc { -1 } else { 1 };
    Ok((key.field.storage_path(), Bson::Int32(direction)))
}

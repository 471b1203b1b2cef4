//! Update expressions to native update documents.
//!
//! Only literal set/add/unset of fields that no array encloses have a native
//! form. Everything else comes back as [`UpdateTranslation::CannotTranslate`]
//! and must be applied by the caller's own update engine.

use bson::{Bson, Document};
use thiserror::Error;

use crate::ast::{RValue, UpdateExpr};
use crate::error::{Result, TranslateError};
use crate::metadata::{CastError, EntityMetadata, FieldId, FieldKind};
use crate::path::Path;
use crate::translator::Translator;

/// Stored for every `$unset` field.
const UNSET_MARKER: &str = "";

/// Why an update has no native form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot translate update: {reason}")]
pub struct CannotTranslate {
    pub reason: String,
}

/// Outcome of [`Translator::translate_update`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateTranslation {
    /// `{$set: {..}, $inc: {..}, $unset: {..}}`
    Native(Document),
    /// Valid, but outside the natively translatable subset
    CannotTranslate(CannotTranslate),
}

impl UpdateTranslation {
    pub fn is_native(&self) -> bool {
        matches!(self, UpdateTranslation::Native(_))
    }

    /// The native document, if there is one.
    pub fn native(self) -> Option<Document> {
        match self {
            UpdateTranslation::Native(doc) => Some(doc),
            UpdateTranslation::CannotTranslate(_) => None,
        }
    }
}

/// Why translation stopped.
enum Halt {
    Fallback(CannotTranslate),
    Fail(TranslateError),
}

impl From<TranslateError> for Halt {
    fn from(e: TranslateError) -> Self {
        Halt::Fail(e)
    }
}

impl From<CastError> for Halt {
    fn from(e: CastError) -> Self {
        Halt::Fail(e.into())
    }
}

fn fallback(reason: impl Into<String>) -> Halt {
    Halt::Fallback(CannotTranslate {
        reason: reason.into(),
    })
}

/// Operator sections in first-use order.
#[derive(Default)]
struct Pending {
    sections: Vec<(&'static str, Document)>,
}

impl Pending {
    fn section(&mut self, op: &'static str) -> &mut Document {
        let at = match self.sections.iter().position(|(o, _)| *o == op) {
            Some(at) => at,
            None => {
                self.sections.push((op, Document::new()));
                self.sections.len() - 1
            }
        };
        &mut self.sections[at].1
    }

    fn into_document(self) -> Document {
        self.sections
            .into_iter()
            .map(|(op, fields)| (op.to_string(), Bson::Document(fields)))
            .collect()
    }
}

impl<R, M> Translator<R, M> {
    /// Translates `update` into a native update document.
    ///
    /// Returns `Ok(UpdateTranslation::CannotTranslate(..))` when the update is
    /// valid but has no native form: array updates, fields inside arrays,
    /// non-simple targets and non-literal right-hand sides.
    pub fn translate_update(&self, md: &EntityMetadata, update: &UpdateExpr) -> Result<UpdateTranslation> {
        tracing::debug!(entity = md.name(), "translate_update enter");
        let mut pending = Pending::default();
        match self.update_into(md, update, &mut pending) {
            Ok(()) => {
                let out = pending.into_document();
                tracing::debug!(update = %out, "translate_update return");
                Ok(UpdateTranslation::Native(out))
            }
            Err(Halt::Fallback(reason)) => {
                tracing::debug!(%reason, "translate_update falls back");
                Ok(UpdateTranslation::CannotTranslate(reason))
            }
            Err(Halt::Fail(e)) => Err(e.in_phase("translate_update")),
        }
    }

    fn update_into(
        &self,
        md: &EntityMetadata,
        update: &UpdateExpr,
        pending: &mut Pending,
    ) -> std::result::Result<(), Halt> {
        match update {
            UpdateExpr::Array(array) => Err(fallback(format!("array update of {}", array.field()))),
            UpdateExpr::List(updates) => updates
                .iter()
                .try_for_each(|u| self.update_into(md, u, pending)),
            UpdateExpr::Set { op, fields } => {
                let section = op.mongo_operator();
                for f in fields {
                    let id = outside_arrays(md, &f.field)?;
                    let RValue::Value(value) = &f.rvalue else {
                        return Err(fallback(format!("non-literal value for {}", f.field)));
                    };
                    let FieldKind::Simple(t) = md.node(id).kind() else {
                        return Err(fallback(format!("{} is not a simple field", f.field)));
                    };
                    let stored = t.cast(value)?.into_bson();
                    let stored = self.id_aware(md, md.root(), &f.field, stored);
                    pending
                        .section(section)
                        .insert(f.field.storage_path(), stored);
                }
                Ok(())
            }
            UpdateExpr::Unset { fields } => {
                for field in fields {
                    outside_arrays(md, field)?;
                    pending
                        .section("$unset")
                        .insert(field.storage_path(), UNSET_MARKER);
                }
                Ok(())
            }
        }
    }
}

/// Resolves `field`, falling back when it is unknown or inside an array.
fn outside_arrays(md: &EntityMetadata, field: &Path) -> std::result::Result<FieldId, Halt> {
    let id = md
        .resolve(field)
        .ok_or_else(|| fallback(format!("unknown field {field}")))?;
    if has_array(md, id) {
        return Err(fallback(format!("{field} is inside an array")));
    }
    Ok(id)
}

/// True when `id` or any of its ancestors is an array or array element.
pub(crate) fn has_array(md: &EntityMetadata, id: FieldId) -> bool {
    md.ancestors(id).any(|at| {
        let node = md.node(at);
        node.is_array() || node.is_array_element()
    })
}

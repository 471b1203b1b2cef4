//! Carrying stored fields that metadata does not describe across a rewrite.

use bson::{Bson, Document};

use crate::metadata::{EntityMetadata, FieldId, FieldKind};

/// Merges fields of a previously stored record into its replacement.
pub trait FieldMerge {
    fn merge(&self, old: &Document, new: &mut Document, md: &EntityMetadata);
}

/// Copies keys that metadata does not declare from the old record.
///
/// Declared object fields are merged recursively. Keys already present in the
/// new record are never overwritten, and array elements are left alone since
/// there is no way to pair old elements with new ones.
#[derive(Debug, Default, Clone, Copy)]
pub struct InvisibleFieldMerge;

impl FieldMerge for InvisibleFieldMerge {
    fn merge(&self, old: &Document, new: &mut Document, md: &EntityMetadata) {
        merge_scope(md, md.root(), old, new);
    }
}

fn merge_scope(md: &EntityMetadata, scope: FieldId, old: &Document, new: &mut Document) {
    for (key, value) in old {
        match md.child(scope, key) {
            None => {
                if !new.contains_key(key) {
                    tracing::debug!(field = %key, "preserving field unknown to metadata");
                    new.insert(key.clone(), value.clone());
                }
            }
            Some(id) => {
                if let FieldKind::Object(_) = md.node(id).kind()
                    && let (Bson::Document(old_sub), Some(Bson::Document(new_sub))) =
                        (value, new.get_mut(key))
                {
                    merge_scope(md, id, old_sub, new_sub);
                }
            }
        }
    }
}

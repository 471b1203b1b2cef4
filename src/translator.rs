//! # Translator
//!
//! Entry points for every translation, one per concern:
//!
//! - **[codec]** - documents ⇄ physical records (`encode`, `decode`)
//! - **[query]** - query expressions → native query operators
//! - **[predicate]** - generated predicates for comparisons operators cannot express
//! - **[update]** - update expressions → native update operators, or a fallback signal
//! - **[sort]** - sort keys → direction maps
//! - **[projection]** - required leaf fields → inclusion projection
//!
//! A [`Translator`] only holds read-only collaborators, so one instance can be
//! shared between threads and reused for any number of calls.
pub mod codec;
pub mod predicate;
pub mod projection;
pub mod query;
pub mod sort;
pub mod update;

use std::sync::Arc;

use bson::Bson;

use crate::error::{Result, TranslateError};
use crate::identifier::normalize_id;
use crate::merge::InvisibleFieldMerge;
use crate::metadata::{EntityMetadata, FieldId, MetadataResolver};
use crate::options::TranslatorOptions;
use crate::path::{Path, Segment};

/// Converts between documents/expressions and their physical forms.
pub struct Translator<R, M = InvisibleFieldMerge> {
    resolver: R,
    merge: M,
    options: TranslatorOptions,
}

impl<R: MetadataResolver> Translator<R> {
    /// Translator with default options and the default merge collaborator.
    pub fn new(resolver: R) -> Self {
        Self::with_options(resolver, TranslatorOptions::default())
    }

    pub fn with_options(resolver: R, options: TranslatorOptions) -> Self {
        Translator {
            resolver,
            merge: InvisibleFieldMerge,
            options,
        }
    }
}

impl<R, M> Translator<R, M> {
    /// Translator with a custom merge collaborator.
    pub fn with_merge(resolver: R, merge: M, options: TranslatorOptions) -> Self {
        Translator {
            resolver,
            merge,
            options,
        }
    }

    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    /// True for the reserved identifier path.
    pub(crate) fn is_id(&self, path: &Path) -> bool {
        matches!(path.segments(), [Segment::Name(name)] if *name == self.options.id_field)
    }

    /// Normalizes `value` when `path` is the identifier field at the entity root.
    pub(crate) fn id_aware(&self, md: &EntityMetadata, context: FieldId, path: &Path, value: Bson) -> Bson {
        if context == md.root() && self.is_id(path) {
            normalize_id(value)
        } else {
            value
        }
    }
}

impl<R: MetadataResolver, M> Translator<R, M> {
    /// Metadata for `entity`, or `INVALID_OBJECTTYPE`.
    pub fn metadata(&self, entity: &str) -> Result<Arc<EntityMetadata>> {
        self.resolver
            .entity_metadata(entity)
            .ok_or_else(|| TranslateError::InvalidObjectType(entity.to_string()))
    }
}

/// Resolves `path` from `context`, or `INVALID_FIELD`.
pub(crate) fn resolve(md: &EntityMetadata, context: FieldId, path: &Path) -> Result<FieldId> {
    md.resolve_from(context, path)
        .ok_or_else(|| TranslateError::InvalidField(path.to_string()))
}

//! Metadata-driven translation between JSON documents and BSON records,
//! and from parsed queries, updates, sorts and projections to their native
//! document-store forms.
pub mod ast;
pub mod error;
pub mod identifier;
pub mod merge;
pub mod metadata;
pub mod options;
pub mod path;
pub mod script;
pub mod translator;

pub use error::{Result, TranslateError};
pub use identifier::normalize_id;
pub use merge::{FieldMerge, InvisibleFieldMerge};
pub use metadata::{EntityMetadata, Field, FieldType, MetadataResolver};
pub use options::TranslatorOptions;
pub use path::{Path, PathError, Segment};
pub use script::{Predicate, ScriptError};
pub use translator::Translator;
pub use translator::codec::value_at;
pub use translator::predicate::compile as compile_predicate;
pub use translator::projection::required_fields;
pub use translator::update::{CannotTranslate, UpdateTranslation};

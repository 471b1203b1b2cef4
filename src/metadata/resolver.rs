use std::collections::HashMap;
use std::sync::Arc;

use crate::metadata::EntityMetadata;

/// Looks up entity metadata by entity name.
///
/// Caching and loading policy belong to the implementor.
pub trait MetadataResolver {
    fn entity_metadata(&self, entity: &str) -> Option<Arc<EntityMetadata>>;
}

impl MetadataResolver for HashMap<String, Arc<EntityMetadata>> {
    fn entity_metadata(&self, entity: &str) -> Option<Arc<EntityMetadata>> {
        self.get(entity).cloned()
    }
}

impl<R: MetadataResolver + ?Sized> MetadataResolver for Arc<R> {
    fn entity_metadata(&self, entity: &str) -> Option<Arc<EntityMetadata>> {
        (**self).entity_metadata(entity)
    }
}

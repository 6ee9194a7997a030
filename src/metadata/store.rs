use crate::metadata::{ModuleDescriptor, ModuleToken};
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;

/// The annotation mechanism backing module declarations.
///
/// Maps module types to their recorded descriptors. A type is a valid
/// module if and only if a descriptor is present here; everything the
/// factory knows about a module graph it reads from this store.
#[derive(Default)]
pub struct MetadataStore {
    modules: DashMap<TypeId, Arc<ModuleDescriptor>>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a module descriptor. Re-declaring a module replaces its
    /// previous descriptor.
    pub fn annotate(&self, descriptor: ModuleDescriptor) {
        self.modules.insert(descriptor.token.id, Arc::new(descriptor));
    }

    pub fn module(&self, token: &ModuleToken) -> Option<Arc<ModuleDescriptor>> {
        self.modules.get(&token.id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn is_module(&self, token: &ModuleToken) -> bool {
        self.modules.contains_key(&token.id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

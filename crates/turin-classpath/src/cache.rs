use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use turin_types::{TypeDefinition, TypeError};

/// Read-through memo of definitions keyed by qualified name.
///
/// Misses are remembered too. Entries are never invalidated: binary inputs
/// are assumed immutable for the lifetime of the provider.
#[derive(Debug, Default)]
pub(crate) struct DefinitionCache {
    entries: Mutex<HashMap<String, Option<Arc<TypeDefinition>>>>,
}

impl DefinitionCache {
    pub(crate) fn get_or_load(
        &self,
        name: &str,
        load: impl FnOnce() -> Result<Option<TypeDefinition>, TypeError>,
    ) -> Result<Option<Arc<TypeDefinition>>, TypeError> {
        if let Some(cached) = self.entries.lock().get(name) {
            return Ok(cached.clone());
        }

        // Loading may recurse into the provider, so the lock is not held here.
        let loaded = load()?.map(Arc::new);

        // Keep whichever definition was stored first so repeated lookups share one `Arc`.
        let mut entries = self.entries.lock();
        Ok(entries.entry(name.to_string()).or_insert(loaded).clone())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

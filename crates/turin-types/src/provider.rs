use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::names::validate_qualified_name;
use crate::{TypeDefinition, TypeError};

/// A source of type definitions keyed by dotted binary name.
///
/// Implementations must reject syntactically invalid names with
/// [`TypeError::InvalidQualifiedName`] before doing any lookup work.
pub trait TypeProvider: fmt::Debug + Send + Sync {
    fn resolve_absolute_qualified_name(
        &self,
        name: &str,
    ) -> Result<Option<Arc<TypeDefinition>>, TypeError>;
}

impl<T: TypeProvider + ?Sized> TypeProvider for Arc<T> {
    fn resolve_absolute_qualified_name(
        &self,
        name: &str,
    ) -> Result<Option<Arc<TypeDefinition>>, TypeError> {
        (**self).resolve_absolute_qualified_name(name)
    }
}

impl<T: TypeProvider + ?Sized> TypeProvider for &T {
    fn resolve_absolute_qualified_name(
        &self,
        name: &str,
    ) -> Result<Option<Arc<TypeDefinition>>, TypeError> {
        (**self).resolve_absolute_qualified_name(name)
    }
}

/// Resolve a name that must exist, e.g. a supertype named by a loaded class.
pub fn require_type(
    provider: &dyn TypeProvider,
    name: &str,
) -> Result<Arc<TypeDefinition>, TypeError> {
    provider
        .resolve_absolute_qualified_name(name)?
        .ok_or_else(|| TypeError::MissingType(name.to_string()))
}

/// Ordered chain of providers; the first one that knows a name wins.
#[derive(Debug, Default, Clone)]
pub struct ComposedTypeProvider {
    providers: Vec<Arc<dyn TypeProvider>>,
}

impl ComposedTypeProvider {
    pub fn new(providers: Vec<Arc<dyn TypeProvider>>) -> Self {
        Self { providers }
    }

    pub fn push(&mut self, provider: Arc<dyn TypeProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn providers(&self) -> &[Arc<dyn TypeProvider>] {
        &self.providers
    }
}

impl TypeProvider for ComposedTypeProvider {
    fn resolve_absolute_qualified_name(
        &self,
        name: &str,
    ) -> Result<Option<Arc<TypeDefinition>>, TypeError> {
        validate_qualified_name(name)?;
        for (index, provider) in self.providers.iter().enumerate() {
            if let Some(definition) = provider.resolve_absolute_qualified_name(name)? {
                tracing::trace!(target: "turin.types", name, provider = index, "resolved type");
                return Ok(Some(definition));
            }
        }
        Ok(None)
    }
}

/// Provider over a fixed set of definitions.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTypeProvider {
    types: HashMap<String, Arc<TypeDefinition>>,
}

impl InMemoryTypeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the definition registered under its qualified name.
    pub fn insert(&mut self, definition: TypeDefinition) -> Arc<TypeDefinition> {
        let definition = Arc::new(definition);
        self.types
            .insert(definition.qualified_name().to_string(), Arc::clone(&definition));
        definition
    }

    pub fn with_type(mut self, definition: TypeDefinition) -> Self {
        self.insert(definition);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeProvider for InMemoryTypeProvider {
    fn resolve_absolute_qualified_name(
        &self,
        name: &str,
    ) -> Result<Option<Arc<TypeDefinition>>, TypeError> {
        validate_qualified_name(name)?;
        Ok(self.types.get(name).cloned())
    }
}

use std::path::Path;
use std::sync::Arc;

use turin_types::names::{binary_to_internal, internal_to_binary, validate_qualified_name};
use turin_types::{TypeDefinition, TypeError, TypeOrigin, TypeProvider};

use crate::archive::ArchiveIndex;
use crate::cache::DefinitionCache;
use crate::loader::load_definition;
use crate::ClasspathError;

/// Types packaged in a single jar.
#[derive(Debug)]
pub struct JarTypeProvider {
    archive: ArchiveIndex,
    origin: TypeOrigin,
    cache: DefinitionCache,
}

impl JarTypeProvider {
    /// Opens and indexes the archive. Unreadable or non-zip files fail here,
    /// before any name is queried.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ClasspathError> {
        let path = path.as_ref();
        let archive = ArchiveIndex::open(path, "")?;
        Ok(Self {
            origin: TypeOrigin::Archive(path.to_path_buf()),
            archive,
            cache: DefinitionCache::default(),
        })
    }

    pub fn path(&self) -> &Path {
        self.archive.path()
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.archive.contains(&binary_to_internal(qualified_name))
    }

    /// Dotted binary names of every class in the archive, sorted.
    pub fn class_names(&self) -> impl Iterator<Item = String> + '_ {
        self.archive.class_names().map(internal_to_binary)
    }
}

impl TypeProvider for JarTypeProvider {
    fn resolve_absolute_qualified_name(
        &self,
        name: &str,
    ) -> Result<Option<Arc<TypeDefinition>>, TypeError> {
        validate_qualified_name(name)?;
        self.cache.get_or_load(name, || {
            load_definition(name, &self.origin, |internal| self.archive.read_class(internal))
                .map_err(|err| err.into_type_error(name))
        })
    }
}

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use turin_types::names::{binary_to_internal, internal_to_binary, validate_qualified_name};
use turin_types::{TypeDefinition, TypeError, TypeOrigin, TypeProvider};

use crate::cache::DefinitionCache;
use crate::loader::{is_ignored_class, load_definition};
use crate::ClasspathError;

/// Types compiled into a directory tree, one `.class` file per type.
#[derive(Debug)]
pub struct DirClassesTypeProvider {
    root: PathBuf,
    classes: BTreeSet<String>,
    origin: TypeOrigin,
    cache: DefinitionCache,
}

impl DirClassesTypeProvider {
    /// Indexes every `*.class` file under `root`. A missing path or a regular
    /// file fails here, before any name is queried.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, ClasspathError> {
        let root = root.as_ref();
        let meta = std::fs::metadata(root).map_err(|err| ClasspathError::io(root, err))?;
        if !meta.is_dir() {
            return Err(ClasspathError::NotADirectory(root.to_path_buf()));
        }

        let mut classes = BTreeSet::new();
        for entry in walkdir::WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(root).to_path_buf();
                ClasspathError::io(path, err.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension() != Some(OsStr::new("class")) {
                continue;
            }
            let Some(internal) = internal_name_of(root, entry.path()) else {
                continue;
            };
            if !is_ignored_class(&internal) {
                classes.insert(internal);
            }
        }

        tracing::debug!(
            target: "turin.classpath",
            path = %root.display(),
            classes = classes.len(),
            "indexed class directory"
        );

        Ok(Self {
            root: root.to_path_buf(),
            classes,
            origin: TypeOrigin::Directory(root.to_path_buf()),
            cache: DefinitionCache::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.classes.contains(&binary_to_internal(qualified_name))
    }

    pub fn class_names(&self) -> impl Iterator<Item = String> + '_ {
        self.classes.iter().map(|internal| internal_to_binary(internal))
    }

    fn read_class(&self, internal_name: &str) -> Result<Option<Vec<u8>>, ClasspathError> {
        if !self.classes.contains(internal_name) {
            return Ok(None);
        }
        let path = self.root.join(format!("{internal_name}.class"));
        std::fs::read(&path)
            .map(Some)
            .map_err(|err| ClasspathError::io(path, err))
    }
}

/// `root/a/b/C.class` -> `a/b/C`, independent of the platform separator.
fn internal_name_of(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?.with_extension("");
    let segments: Vec<&str> = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(segments.join("/"))
}

impl TypeProvider for DirClassesTypeProvider {
    fn resolve_absolute_qualified_name(
        &self,
        name: &str,
    ) -> Result<Option<Arc<TypeDefinition>>, TypeError> {
        validate_qualified_name(name)?;
        self.cache.get_or_load(name, || {
            load_definition(name, &self.origin, |internal| self.read_class(internal))
                .map_err(|err| err.into_type_error(name))
        })
    }
}

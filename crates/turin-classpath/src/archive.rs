use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use zip::ZipArchive;

use crate::loader::is_ignored_class;
use crate::ClasspathError;

/// A zip archive of class files, indexed once when opened.
///
/// Jars keep classes at the root; jmods keep them under `classes/`.
#[derive(Debug)]
pub(crate) struct ArchiveIndex {
    path: PathBuf,
    prefix: &'static str,
    /// Internal names of every class entry.
    classes: BTreeSet<String>,
    archive: Mutex<ZipArchive<File>>,
}

impl ArchiveIndex {
    pub(crate) fn open(path: &Path, prefix: &'static str) -> Result<Self, ClasspathError> {
        let file = File::open(path).map_err(|err| ClasspathError::io(path, err))?;
        let archive = ZipArchive::new(file).map_err(|source| ClasspathError::Zip {
            path: path.to_path_buf(),
            source,
        })?;

        let classes: BTreeSet<String> = archive
            .file_names()
            .filter_map(|entry| entry.strip_prefix(prefix))
            .filter_map(|entry| entry.strip_suffix(".class"))
            .filter(|internal| !is_ignored_class(internal))
            .map(str::to_string)
            .collect();

        tracing::debug!(
            target: "turin.classpath",
            path = %path.display(),
            classes = classes.len(),
            "indexed archive"
        );

        Ok(Self {
            path: path.to_path_buf(),
            prefix,
            classes,
            archive: Mutex::new(archive),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn contains(&self, internal_name: &str) -> bool {
        self.classes.contains(internal_name)
    }

    pub(crate) fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub(crate) fn read_class(&self, internal_name: &str) -> Result<Option<Vec<u8>>, ClasspathError> {
        if !self.contains(internal_name) {
            return Ok(None);
        }
        let entry_name = format!("{}{internal_name}.class", self.prefix);
        let mut archive = self.archive.lock();
        let mut entry = archive.by_name(&entry_name).map_err(|source| ClasspathError::Zip {
            path: self.path.clone(),
            source,
        })?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|err| ClasspathError::io(&self.path, err))?;
        Ok(Some(bytes))
    }
}

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use turin_types::names::validate_qualified_name;
use turin_types::{TypeDefinition, TypeError, TypeOrigin, TypeProvider};

use crate::archive::ArchiveIndex;
use crate::cache::DefinitionCache;
use crate::loader::load_definition;
use crate::{builtin, ClasspathError, JdkDiscoveryError};

#[derive(Debug)]
enum JdkSource {
    /// The bootstrap catalog; no disk IO.
    Builtin,
    /// `jmods/*.jmod` (with `java.base` first) or a single `rt.jar`.
    Archives { root: PathBuf, archives: Vec<ArchiveIndex> },
}

/// Platform runtime types.
#[derive(Debug)]
pub struct JdkTypeProvider {
    source: JdkSource,
    cache: DefinitionCache,
}

impl JdkTypeProvider {
    /// The built-in catalog of core types. Needs no JDK installation.
    pub fn builtin() -> Self {
        Self {
            source: JdkSource::Builtin,
            cache: DefinitionCache::default(),
        }
    }

    /// Index a JDK installation: `jmods/` on modular JDKs, `rt.jar` on older ones.
    pub fn from_jdk_root(root: impl AsRef<Path>) -> Result<Self, ClasspathError> {
        let root = root.as_ref();
        let jmods_dir = root.join("jmods");
        let archives = if jmods_dir.is_dir() {
            let mut module_paths: Vec<PathBuf> = std::fs::read_dir(&jmods_dir)
                .map_err(|err| ClasspathError::io(&jmods_dir, err))?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "jmod"))
                .collect();

            // `java.base.jmod` holds most core types; look there first.
            module_paths.sort_by_key(|path| {
                let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                (file_name != "java.base.jmod", file_name.to_owned())
            });
            if module_paths.is_empty() {
                return Err(JdkDiscoveryError::NoModulesFound { dir: jmods_dir }.into());
            }

            module_paths
                .iter()
                .map(|path| ArchiveIndex::open(path, "classes/"))
                .collect::<Result<Vec<_>, _>>()?
        } else if let Some(rt_jar) = rt_jar(root) {
            vec![ArchiveIndex::open(&rt_jar, "")?]
        } else {
            return Err(JdkDiscoveryError::NotAJdk {
                root: root.to_path_buf(),
            }
            .into());
        };

        tracing::debug!(
            target: "turin.jdk",
            root = %root.display(),
            archives = archives.len(),
            "indexed JDK"
        );

        Ok(Self {
            source: JdkSource::Archives {
                root: root.to_path_buf(),
                archives,
            },
            cache: DefinitionCache::default(),
        })
    }

    /// Discover a JDK installation.
    ///
    /// `home_override` wins when set. Otherwise `JAVA_HOME` is tried, then the
    /// installation owning the `java` executable on `PATH`.
    pub fn discover(home_override: Option<&Path>) -> Result<Self, ClasspathError> {
        if let Some(home) = home_override {
            let root = coerce_to_jdk_root(home.to_path_buf()).unwrap_or_else(|| home.to_path_buf());
            return Self::from_jdk_root(root);
        }

        let root = discover_from_java_home()
            .or_else(discover_from_java_on_path)
            .ok_or(JdkDiscoveryError::NotFound)?;
        Self::from_jdk_root(root)
    }

    /// Process-wide provider, discovered on first use.
    ///
    /// Falls back to [`JdkTypeProvider::builtin`] when no JDK can be found.
    pub fn shared() -> Arc<JdkTypeProvider> {
        static SHARED: OnceLock<Arc<JdkTypeProvider>> = OnceLock::new();
        SHARED
            .get_or_init(|| match Self::discover(None) {
                Ok(provider) => Arc::new(provider),
                Err(err) => {
                    tracing::warn!(
                        target: "turin.jdk",
                        error = %err,
                        "no JDK found; using the built-in catalog"
                    );
                    Arc::new(Self::builtin())
                }
            })
            .clone()
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.source, JdkSource::Builtin)
    }

    /// Installation root, `None` for the built-in catalog.
    pub fn root(&self) -> Option<&Path> {
        match &self.source {
            JdkSource::Builtin => None,
            JdkSource::Archives { root, .. } => Some(root),
        }
    }

    fn load(&self, name: &str) -> Result<Option<TypeDefinition>, TypeError> {
        match &self.source {
            JdkSource::Builtin => builtin::load(name),
            JdkSource::Archives { archives, .. } => load_definition(name, &TypeOrigin::Jdk, |internal| {
                for archive in archives {
                    if let Some(bytes) = archive.read_class(internal)? {
                        return Ok(Some(bytes));
                    }
                }
                Ok(None)
            })
            .map_err(|err| err.into_type_error(name)),
        }
    }
}

impl TypeProvider for JdkTypeProvider {
    fn resolve_absolute_qualified_name(
        &self,
        name: &str,
    ) -> Result<Option<Arc<TypeDefinition>>, TypeError> {
        validate_qualified_name(name)?;
        self.cache.get_or_load(name, || self.load(name))
    }
}

fn rt_jar(root: &Path) -> Option<PathBuf> {
    ["jre/lib/rt.jar", "lib/rt.jar"]
        .iter()
        .map(|relative| root.join(relative))
        .find(|path| path.is_file())
}

fn is_jdk_root(candidate: &Path) -> bool {
    candidate.join("jmods").is_dir() || rt_jar(candidate).is_some()
}

fn discover_from_java_home() -> Option<PathBuf> {
    std::env::var_os("JAVA_HOME")
        .map(PathBuf::from)
        .and_then(coerce_to_jdk_root)
}

fn discover_from_java_on_path() -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    let exe_name = if cfg!(windows) { "java.exe" } else { "java" };
    let java_bin = std::env::split_paths(&path_var)
        .map(|dir| dir.join(exe_name))
        .find(|candidate| candidate.is_file())?;
    let java_bin = java_bin.canonicalize().ok()?;
    let root = java_bin.parent()?.parent()?.to_path_buf();
    coerce_to_jdk_root(root)
}

/// `java.home` may point at `$JDK/jre` on older installations.
fn coerce_to_jdk_root(mut candidate: PathBuf) -> Option<PathBuf> {
    if is_jdk_root(&candidate) {
        return Some(candidate);
    }
    candidate.pop();
    is_jdk_root(&candidate).then_some(candidate)
}

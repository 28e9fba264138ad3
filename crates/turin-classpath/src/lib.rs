//! Type providers backed by compiled classes: jars, class directories and the JDK.
//!
//! Every provider indexes its input when constructed (so unreadable inputs
//! fail early) and parses class files lazily on first lookup. Parsed
//! definitions are memoized per provider instance.

mod archive;
mod builtin;
mod cache;
mod dir;
mod error;
mod jar;
mod jdk;
mod loader;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use turin_types::{ComposedTypeProvider, TypeProvider};

pub use dir::DirClassesTypeProvider;
pub use error::{ClasspathError, JdkDiscoveryError};
pub use jar::JarTypeProvider;
pub use jdk::JdkTypeProvider;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClasspathEntry {
    ClassDir(PathBuf),
    Jar(PathBuf),
}

impl ClasspathEntry {
    pub fn path(&self) -> &Path {
        match self {
            ClasspathEntry::ClassDir(p) | ClasspathEntry::Jar(p) => p,
        }
    }

    pub fn open(&self) -> Result<Arc<dyn TypeProvider>, ClasspathError> {
        let provider: Arc<dyn TypeProvider> = match self {
            ClasspathEntry::ClassDir(dir) => Arc::new(DirClassesTypeProvider::open(dir)?),
            ClasspathEntry::Jar(path) => Arc::new(JarTypeProvider::open(path)?),
        };
        Ok(provider)
    }
}

/// Where the JDK sits relative to the explicit classpath entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JdkPosition {
    /// Platform types shadow classpath types of the same name.
    First,
    #[default]
    Last,
}

/// Builds the ordered provider chain. Entries keep their relative order;
/// earlier ones shadow later ones.
pub fn build_type_provider(
    entries: &[ClasspathEntry],
    jdk: Arc<JdkTypeProvider>,
    jdk_position: JdkPosition,
) -> Result<ComposedTypeProvider, ClasspathError> {
    let mut composed = ComposedTypeProvider::default();
    if jdk_position == JdkPosition::First {
        composed.push(jdk.clone());
    }
    for entry in entries {
        composed.push(entry.open()?);
    }
    if jdk_position == JdkPosition::Last {
        composed.push(jdk);
    }
    tracing::debug!(
        target: "turin.classpath",
        entries = entries.len(),
        jdk_position = ?jdk_position,
        "built type provider chain"
    );
    Ok(composed)
}

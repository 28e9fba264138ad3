use std::path::PathBuf;

use thiserror::Error;
use turin_types::TypeError;

#[derive(Debug, Error)]
pub enum ClasspathError {
    #[error("io error on `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{}` is not a readable archive: {source}", .path.display())]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("`{}` is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("malformed class file `{name}`: {source}")]
    ClassFile {
        name: String,
        #[source]
        source: turin_classfile::Error,
    },

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Jdk(#[from] JdkDiscoveryError),
}

impl ClasspathError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ClasspathError::Io {
            path: path.into(),
            source,
        }
    }

    /// Lazily loaded classes surface their failures through the provider interface.
    pub(crate) fn into_type_error(self, name: &str) -> TypeError {
        match self {
            ClasspathError::Type(err) => err,
            other => TypeError::Provider {
                name: name.to_string(),
                message: other.to_string(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum JdkDiscoveryError {
    #[error("could not discover a JDK installation (tried the configured home, JAVA_HOME and `java` on PATH)")]
    NotFound,

    #[error("`{}` contains neither `jmods/` nor `lib/rt.jar`", .root.display())]
    NotAJdk { root: PathBuf },

    #[error("no `.jmod` files found in `{}`", .dir.display())]
    NoModulesFound { dir: PathBuf },
}

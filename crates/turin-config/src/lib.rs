//! Project configuration for the Turin compiler core.
//!
//! A `turin.toml` file selects the classpath the resolver sees and how the
//! compiler logs:
//!
//! ```toml
//! [classpath]
//! jars = ["lib/guava.jar"]
//! class_dirs = ["build/classes"]
//! jdk_position = "last"
//!
//! [jdk]
//! home = "/usr/lib/jvm/java-17"
//!
//! [logging]
//! level = "debug"
//! json = false
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use turin_classpath::{
    build_type_provider, ClasspathEntry, ClasspathError, JdkPosition, JdkTypeProvider,
};
use turin_types::ComposedTypeProvider;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid turin.toml: {0}")]
    Toml(String),
    #[error(transparent)]
    Classpath(#[from] ClasspathError),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` embeds a snippet of the input; keep only the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClasspathConfig {
    /// Jar archives, searched in the order given.
    #[serde(default)]
    pub jars: Vec<PathBuf>,

    /// Directories of compiled classes, searched after every jar.
    #[serde(default)]
    pub class_dirs: Vec<PathBuf>,

    /// Whether platform types are looked up before or after the entries above.
    #[serde(default)]
    pub jdk_position: JdkPosition,
}

impl ClasspathConfig {
    /// Entries in lookup order: jars first, then class directories.
    pub fn entries(&self) -> Vec<ClasspathEntry> {
        self.jars
            .iter()
            .cloned()
            .map(ClasspathEntry::Jar)
            .chain(self.class_dirs.iter().cloned().map(ClasspathEntry::ClassDir))
            .collect()
    }

    fn rebase(&mut self, base: &Path) {
        for path in self.jars.iter_mut().chain(self.class_dirs.iter_mut()) {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JdkConfig {
    /// JDK installation to read platform classes from.
    ///
    /// When unset, `JAVA_HOME` and then `java` on `PATH` are tried; without
    /// either the built-in bootstrap catalog is used.
    #[serde(default, alias = "jdk_home")]
    pub home: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,
}

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    /// Turns the configured level into `EnvFilter` directives. Bare level
    /// names are matched case-insensitively; anything else is passed through.
    pub(crate) fn level_directives(level: &str) -> String {
        let level = level.trim();
        if level.is_empty() {
            return Self::default_level();
        }
        if level.eq_ignore_ascii_case("warning") {
            return "warn".to_owned();
        }
        LEVELS
            .iter()
            .find(|known| level.eq_ignore_ascii_case(known))
            .map_or_else(|| level.to_owned(), |known| (*known).to_owned())
    }

    /// The effective filter. `RUST_LOG`, when set, is appended to the
    /// configured directives so it can refine them per target. Unparsable
    /// input falls back to `RUST_LOG` alone, then to the configured level,
    /// then to `info`.
    pub fn env_filter(&self) -> EnvFilter {
        let configured = Self::level_directives(&self.level);
        let from_env = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let mut attempts = Vec::with_capacity(3);
        if let Some(from_env) = &from_env {
            attempts.push(format!("{configured},{from_env}"));
            attempts.push(from_env.clone());
        }
        attempts.push(configured);

        attempts
            .into_iter()
            .find_map(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::default().add_directive(LevelFilter::INFO.into()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TurinConfig {
    #[serde(default)]
    pub classpath: ClasspathConfig,

    #[serde(default)]
    pub jdk: JdkConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TurinConfig {
    /// Loads a TOML config file. Relative classpath entries are taken
    /// relative to the directory holding the file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::load_from_str(&text)?;
        if let Some(base) = path.parent() {
            config.classpath.rebase(base);
        }
        tracing::debug!(
            target: "turin.config",
            path = %path.display(),
            jars = config.classpath.jars.len(),
            class_dirs = config.classpath.class_dirs.len(),
            "loaded config"
        );
        Ok(config)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Builds the provider chain for the configured classpath.
    ///
    /// An explicit `jdk.home` must point at a readable installation; otherwise
    /// the process-wide JDK provider is used. Fails on the first unreadable
    /// classpath entry.
    pub fn type_provider(&self) -> Result<ComposedTypeProvider, ConfigError> {
        let jdk = match &self.jdk.home {
            Some(home) => Arc::new(JdkTypeProvider::discover(Some(home))?),
            None => JdkTypeProvider::shared(),
        };
        self.type_provider_with_jdk(jdk)
    }

    /// Like [`TurinConfig::type_provider`] with the platform provider given.
    pub fn type_provider_with_jdk(
        &self,
        jdk: Arc<JdkTypeProvider>,
    ) -> Result<ComposedTypeProvider, ConfigError> {
        Ok(build_type_provider(
            &self.classpath.entries(),
            jdk,
            self.classpath.jdk_position,
        )?)
    }
}

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber, writing to stderr.
///
/// Only the first call has an effect. A subscriber installed elsewhere
/// beforehand is left in place.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();
        let installed = if config.json {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
        };
        if installed.is_ok() {
            tracing::debug!(target: "turin.config", json = config.json, "tracing initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_directives_are_forgiving() {
        assert_eq!(LoggingConfig::level_directives(""), "info");
        assert_eq!(LoggingConfig::level_directives(" WARNING "), "warn");
        assert_eq!(LoggingConfig::level_directives("Debug"), "debug");
        assert_eq!(
            LoggingConfig::level_directives("turin.resolve=trace,info"),
            "turin.resolve=trace,info"
        );
    }

    #[test]
    fn init_tracing_twice_is_harmless() {
        let config = LoggingConfig {
            level: "turin=debug".to_owned(),
            json: true,
        };
        init_tracing(&config);
        init_tracing(&LoggingConfig::default());
        tracing::debug!(target: "turin.config", "still logging");
    }

    #[test]
    fn relative_entries_are_rebased() {
        let mut classpath = ClasspathConfig {
            jars: vec![PathBuf::from("lib/a.jar"), PathBuf::from("/abs/b.jar")],
            class_dirs: vec![PathBuf::from("out")],
            jdk_position: JdkPosition::Last,
        };
        classpath.rebase(Path::new("/project"));
        assert_eq!(
            classpath.entries(),
            vec![
                ClasspathEntry::Jar(PathBuf::from("/project/lib/a.jar")),
                ClasspathEntry::Jar(PathBuf::from("/abs/b.jar")),
                ClasspathEntry::ClassDir(PathBuf::from("/project/out")),
            ]
        );
    }
}

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use turin_classpath::{ClasspathEntry, JdkPosition};
use turin_config::{ConfigError, LoggingConfig, TurinConfig};

#[test]
fn empty_config_uses_defaults() {
    let config = TurinConfig::load_from_str("").unwrap();
    assert_eq!(config, TurinConfig::default());
    assert_eq!(config.classpath.jdk_position, JdkPosition::Last);
    assert_eq!(config.logging, LoggingConfig::default());
    assert_eq!(config.logging.level, "info");
    assert!(config.jdk.home.is_none());
    assert!(config.classpath.entries().is_empty());
}

#[test]
fn full_config_is_parsed() {
    let config = TurinConfig::load_from_str(
        r#"
            [classpath]
            jars = ["/libs/a.jar", "/libs/b.jar"]
            class_dirs = ["/build/classes"]
            jdk_position = "first"

            [jdk]
            home = "/opt/jdk-17"

            [logging]
            level = "debug"
            json = true
        "#,
    )
    .unwrap();

    assert_eq!(config.classpath.jdk_position, JdkPosition::First);
    assert_eq!(config.jdk.home, Some(PathBuf::from("/opt/jdk-17")));
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
    assert_eq!(
        config.classpath.entries(),
        vec![
            ClasspathEntry::Jar(PathBuf::from("/libs/a.jar")),
            ClasspathEntry::Jar(PathBuf::from("/libs/b.jar")),
            ClasspathEntry::ClassDir(PathBuf::from("/build/classes")),
        ]
    );
}

#[test]
fn unknown_keys_are_rejected() {
    let err = TurinConfig::load_from_str("[classpath]\njarz = []\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err:?}");

    let err = TurinConfig::load_from_str("[classpath]\njdk_position = \"middle\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err:?}");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TurinConfig::load_from_path(dir.path().join("turin.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "{err:?}");
}

#[test]
fn relative_paths_are_taken_from_the_config_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("turin.toml");
    std::fs::write(
        &path,
        "[classpath]\njars = [\"lib/dep.jar\"]\nclass_dirs = [\"classes\"]\n",
    )
    .unwrap();

    let config = TurinConfig::load_from_path(&path).unwrap();
    assert_eq!(
        config.classpath.entries(),
        vec![
            ClasspathEntry::Jar(dir.path().join("lib/dep.jar")),
            ClasspathEntry::ClassDir(dir.path().join("classes")),
        ]
    );
}

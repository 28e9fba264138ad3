use std::path::Path;
use std::sync::Arc;

use turin_classfile::access::ACC_PUBLIC;
use turin_classpath::{JdkPosition, JdkTypeProvider};
use turin_config::{ConfigError, TurinConfig};
use turin_test_utils::{write_class_dir, write_jar, ClassFileBuilder};
use turin_types::TypeProvider;

fn config_with(jar: &Path, class_dir: &Path, jdk_position: JdkPosition) -> TurinConfig {
    let mut config = TurinConfig::default();
    config.classpath.jars.push(jar.to_path_buf());
    config.classpath.class_dirs.push(class_dir.to_path_buf());
    config.classpath.jdk_position = jdk_position;
    config
}

/// A jar that also ships its own `java.lang.String`.
fn fixtures(root: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let jar = root.join("dep.jar");
    write_jar(
        &jar,
        &[
            (
                "com/example/Widget.class",
                ClassFileBuilder::new("com/example/Widget")
                    .method("<init>", "()V", ACC_PUBLIC)
                    .build(),
            ),
            (
                "java/lang/String.class",
                ClassFileBuilder::new("java/lang/String")
                    .field("shadow", "I", ACC_PUBLIC)
                    .build(),
            ),
        ],
    )
    .unwrap();

    let classes = root.join("classes");
    write_class_dir(
        &classes,
        &[(
            "app/Main",
            ClassFileBuilder::new("app/Main")
                .field("widget", "Lcom/example/Widget;", ACC_PUBLIC)
                .build(),
        )],
    )
    .unwrap();
    (jar, classes)
}

#[test]
fn configured_entries_feed_the_provider_chain() {
    let dir = tempfile::tempdir().unwrap();
    let (jar, classes) = fixtures(dir.path());
    let config = config_with(&jar, &classes, JdkPosition::Last);

    let types = config
        .type_provider_with_jdk(Arc::new(JdkTypeProvider::builtin()))
        .unwrap();
    assert_eq!(types.len(), 3);

    for name in ["com.example.Widget", "app.Main", "java.lang.Object", "java.io.PrintStream"] {
        assert!(
            types.resolve_absolute_qualified_name(name).unwrap().is_some(),
            "{name} should resolve"
        );
    }
    assert!(types
        .resolve_absolute_qualified_name("com.example.Missing")
        .unwrap()
        .is_none());
}

#[test]
fn jdk_position_decides_who_shadows_whom() {
    let dir = tempfile::tempdir().unwrap();
    let (jar, classes) = fixtures(dir.path());

    let last = config_with(&jar, &classes, JdkPosition::Last)
        .type_provider_with_jdk(Arc::new(JdkTypeProvider::builtin()))
        .unwrap();
    let string = last
        .resolve_absolute_qualified_name("java.lang.String")
        .unwrap()
        .unwrap();
    assert!(string.field("shadow").is_some());

    let first = config_with(&jar, &classes, JdkPosition::First)
        .type_provider_with_jdk(Arc::new(JdkTypeProvider::builtin()))
        .unwrap();
    let string = first
        .resolve_absolute_qualified_name("java.lang.String")
        .unwrap()
        .unwrap();
    assert!(string.field("shadow").is_none());
}

#[test]
fn unreadable_entry_fails_the_chain() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("bogus.jar");
    std::fs::write(&bogus, b"definitely not a zip").unwrap();

    let mut config = TurinConfig::default();
    config.classpath.jars.push(bogus);
    let err = config
        .type_provider_with_jdk(Arc::new(JdkTypeProvider::builtin()))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Classpath(_)), "{err:?}");
}

#[test]
fn explicit_jdk_home_must_be_a_jdk() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = TurinConfig::default();
    config.jdk.home = Some(dir.path().join("not-a-jdk"));

    let err = config.type_provider().unwrap_err();
    assert!(matches!(err, ConfigError::Classpath(_)), "{err:?}");
}

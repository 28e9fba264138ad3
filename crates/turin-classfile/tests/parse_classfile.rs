use pretty_assertions::assert_eq;
use turin_classfile::{access, parse_type_parameters, ClassFile, Error};
use turin_test_utils::ClassFileBuilder;

#[test]
fn parses_header_and_members() {
    let bytes = ClassFileBuilder::new("com/example/Foo")
        .implements("java/io/Serializable")
        .field("COUNT", "I", access::ACC_PUBLIC | access::ACC_STATIC | access::ACC_FINAL)
        .method("<init>", "()V", access::ACC_PUBLIC)
        .method("name", "()Ljava/lang/String;", access::ACC_PUBLIC)
        .build();

    let class = ClassFile::parse(&bytes).unwrap();
    assert_eq!(class.major_version, 52);
    assert_eq!(class.this_class, "com/example/Foo");
    assert_eq!(class.super_class.as_deref(), Some("java/lang/Object"));
    assert_eq!(class.interfaces, vec!["java/io/Serializable".to_string()]);
    assert!(!class.is_interface());

    assert_eq!(class.fields.len(), 1);
    assert!(class.fields[0].is_static());
    assert!(class.fields[0].is_final());

    let names: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["<init>", "name"]);
    assert_eq!(class.methods[1].descriptor, "()Ljava/lang/String;");
}

#[test]
fn reads_class_and_member_signatures() {
    let bytes = ClassFileBuilder::new("com/example/Box")
        .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
        .generic_method("get", "()Ljava/lang/Object;", "()TT;", access::ACC_PUBLIC)
        .build();

    let class = ClassFile::parse(&bytes).unwrap();
    let params = parse_type_parameters(class.signature.as_deref().unwrap()).unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].name, "T");
    assert_eq!(class.methods[0].signature.as_deref(), Some("()TT;"));
}

#[test]
fn interfaces_have_no_super_class_when_omitted() {
    let bytes = ClassFileBuilder::new("com/example/Marker")
        .interface()
        .super_class(None)
        .build();

    let class = ClassFile::parse(&bytes).unwrap();
    assert!(class.is_interface());
    assert_eq!(class.super_class, None);
}

#[test]
fn rejects_bad_magic_and_truncation() {
    let mut bytes = ClassFileBuilder::new("com/example/Foo").build();
    assert!(ClassFile::parse(&bytes[..bytes.len() - 1]).is_err());

    bytes.push(0);
    assert_eq!(ClassFile::parse(&bytes).unwrap_err(), Error::TrailingBytes(1));

    bytes[0] = 0;
    assert_eq!(ClassFile::parse(&bytes).unwrap_err(), Error::InvalidMagic(0x00FEBABE));
}

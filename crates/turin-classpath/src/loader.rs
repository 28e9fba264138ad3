//! Conversion of parsed class files into [`TypeDefinition`]s.

use turin_classfile::{
    parse_method_descriptor, parse_type_parameters, ClassFile, ClassMember, ReturnType,
};
use turin_types::names::{binary_to_internal, internal_to_binary, nested_binary_candidates};
use turin_types::{
    ConstructorDefinition, FieldDefinition, JvmType, MethodDefinition, PrimitiveKind,
    TypeDefinition, TypeKind, TypeOrigin, TypeParameterDefinition,
};

use crate::ClasspathError;

/// Loads `name`, retrying nested spellings (`a.Outer.Inner` as `a/Outer$Inner`).
///
/// `read` maps an internal name to the class bytes, or `None` when the
/// source has no such class.
pub(crate) fn load_definition(
    name: &str,
    origin: &TypeOrigin,
    read: impl Fn(&str) -> Result<Option<Vec<u8>>, ClasspathError>,
) -> Result<Option<TypeDefinition>, ClasspathError> {
    for candidate in nested_binary_candidates(name) {
        let internal = binary_to_internal(&candidate);
        if is_ignored_class(&internal) {
            continue;
        }
        let Some(bytes) = read(&internal)? else {
            continue;
        };
        let class_file = ClassFile::parse(&bytes).map_err(|source| ClasspathError::ClassFile {
            name: candidate.clone(),
            source,
        })?;
        return Ok(Some(definition_from_classfile(&class_file, origin.clone())?));
    }
    Ok(None)
}

pub(crate) fn is_ignored_class(internal_name: &str) -> bool {
    internal_name == "module-info"
        || internal_name == "package-info"
        || internal_name.ends_with("/package-info")
        || internal_name.starts_with("META-INF/")
}

pub(crate) fn definition_from_classfile(
    class_file: &ClassFile,
    origin: TypeOrigin,
) -> Result<TypeDefinition, ClasspathError> {
    let qualified_name = internal_to_binary(&class_file.this_class);
    let kind = if class_file.is_interface() {
        TypeKind::Interface
    } else {
        TypeKind::Class
    };

    let super_class = class_file.super_class.as_deref().map(internal_to_binary);
    let mut definition = TypeDefinition::new(qualified_name.clone(), kind)
        .with_origin(origin)
        .with_super_class(super_class.as_deref());
    for interface in &class_file.interfaces {
        definition = definition.with_interface(&internal_to_binary(interface));
    }

    if let Some(signature) = &class_file.signature {
        for parameter in type_parameters(&qualified_name, signature)? {
            definition = definition.with_type_parameter(parameter);
        }
    }

    for field in class_file.fields.iter().filter(|f| is_visible(f)) {
        definition = definition.with_field(FieldDefinition {
            name: field.name.clone(),
            jvm_type: JvmType::from_descriptor(&field.descriptor)?,
            is_static: field.is_static(),
            is_final: field.is_final(),
        });
    }

    for method in class_file.methods.iter().filter(|m| is_visible(m)) {
        if method.name == "<clinit>" {
            continue;
        }
        let (params, return_type) = method_signature(&qualified_name, &method.descriptor)?;
        if method.name == "<init>" {
            definition = definition.with_constructor(ConstructorDefinition { params });
            continue;
        }
        let type_parameters = match &method.signature {
            Some(signature) => type_parameters(&qualified_name, signature)?,
            None => Vec::new(),
        };
        definition = definition.with_method(MethodDefinition {
            name: method.name.clone(),
            params,
            return_type,
            is_static: method.is_static(),
            type_parameters,
        });
    }

    Ok(definition)
}

/// Private and compiler-generated members are never call targets.
fn is_visible(member: &ClassMember) -> bool {
    !member.is_private() && !member.is_generated()
}

fn method_signature(
    owner: &str,
    descriptor: &str,
) -> Result<(Vec<JvmType>, JvmType), ClasspathError> {
    let parsed = parse_method_descriptor(descriptor).map_err(|source| ClasspathError::ClassFile {
        name: owner.to_string(),
        source,
    })?;
    let params = parsed
        .params
        .iter()
        .map(|param| JvmType::from_descriptor(&param.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    let return_type = match parsed.return_type {
        ReturnType::Void => JvmType::primitive(PrimitiveKind::Void),
        ReturnType::Type(ty) => JvmType::from_descriptor(&ty.to_string())?,
    };
    Ok((params, return_type))
}

fn type_parameters(
    owner: &str,
    signature: &str,
) -> Result<Vec<TypeParameterDefinition>, ClasspathError> {
    let parsed = parse_type_parameters(signature).map_err(|source| ClasspathError::ClassFile {
        name: owner.to_string(),
        source,
    })?;
    parsed
        .into_iter()
        .map(|parameter| -> Result<TypeParameterDefinition, ClasspathError> {
            let bounds = parameter
                .bounds
                .iter()
                .map(|bound| JvmType::from_descriptor(bound))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeParameterDefinition {
                name: parameter.name,
                bounds,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use turin_classfile::access::*;
    use turin_test_utils::ClassFileBuilder;

    use super::*;

    #[test]
    fn converts_members_and_skips_hidden_ones() {
        let bytes = ClassFileBuilder::new("com/example/Widget")
            .implements("java/io/Serializable")
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;Ljava/io/Serializable;")
            .field("count", "I", ACC_PUBLIC | ACC_FINAL)
            .field("secret", "J", ACC_PRIVATE)
            .field("this$0", "Ljava/lang/Object;", ACC_SYNTHETIC)
            .method("<init>", "(Ljava/lang/String;)V", ACC_PUBLIC)
            .method("<clinit>", "()V", ACC_STATIC)
            .method("getComments", "()[Ljava/lang/String;", ACC_PUBLIC)
            .method("of", "(I)Lcom/example/Widget;", ACC_PUBLIC | ACC_STATIC)
            .method("bridge", "()Ljava/lang/Object;", ACC_PUBLIC | ACC_BRIDGE)
            .generic_method(
                "map",
                "(Ljava/lang/Object;)Ljava/lang/Object;",
                "<R:Ljava/lang/Number;>(TT;)TR;",
                ACC_PUBLIC,
            )
            .build();
        let class_file = ClassFile::parse(&bytes).unwrap();
        let definition = definition_from_classfile(&class_file, TypeOrigin::Memory).unwrap();

        assert_eq!(definition.qualified_name(), "com.example.Widget");
        assert_eq!(definition.super_class(), Some("java.lang.Object"));
        assert_eq!(definition.interfaces(), &["java.io.Serializable".to_string()]);
        assert_eq!(definition.type_parameters()[0].name, "T");

        let fields: Vec<_> = definition.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["count"]);
        assert!(definition.fields()[0].is_final);

        let methods: Vec<_> = definition.methods().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(methods, vec!["getComments", "of", "map"]);
        assert!(definition.methods()[1].is_static);
        assert_eq!(definition.methods()[0].descriptor(), "()[Ljava/lang/String;");
        assert_eq!(
            definition.methods()[2].type_parameters[0].bounds,
            vec![JvmType::from_descriptor("Ljava/lang/Number;").unwrap()]
        );

        assert_eq!(definition.constructors().len(), 1);
        assert_eq!(definition.constructors()[0].descriptor(), "(Ljava/lang/String;)V");
    }

    #[test]
    fn interfaces_are_marked() {
        let bytes = ClassFileBuilder::new("com/example/Api").interface().build();
        let class_file = ClassFile::parse(&bytes).unwrap();
        let definition = definition_from_classfile(&class_file, TypeOrigin::Memory).unwrap();
        assert!(definition.is_interface());
    }

    #[test]
    fn nested_names_are_retried_with_dollar() {
        let bytes = ClassFileBuilder::new("a/Outer$Inner").build();
        let found = load_definition("a.Outer.Inner", &TypeOrigin::Memory, |internal| {
            Ok((internal == "a/Outer$Inner").then(|| bytes.clone()))
        })
        .unwrap()
        .unwrap();
        assert_eq!(found.qualified_name(), "a.Outer$Inner");

        let missing = load_definition("a.Nope", &TypeOrigin::Memory, |_| Ok(None)).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn corrupt_bytes_are_reported() {
        let err = load_definition("a.Bad", &TypeOrigin::Memory, |_| Ok(Some(vec![0, 1, 2])))
            .unwrap_err();
        assert!(matches!(err, ClasspathError::ClassFile { ref name, .. } if name == "a.Bad"));
    }
}

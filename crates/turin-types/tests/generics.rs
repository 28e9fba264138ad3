use std::collections::HashMap;

use pretty_assertions::assert_eq;
use turin_types::{
    ComposedTypeProvider, GenericDeclaration, InMemoryTypeProvider, JvmType, MethodDefinition,
    TypeDefinition, TypeError, TypeKind, TypeParameterDefinition, TypeProvider, TypeUsage,
    OBJECT, STRING,
};

fn platform() -> InMemoryTypeProvider {
    InMemoryTypeProvider::new()
        .with_type(TypeDefinition::new(OBJECT, TypeKind::Class))
        .with_type(TypeDefinition::new("java.lang.CharSequence", TypeKind::Interface))
        .with_type(
            TypeDefinition::new(STRING, TypeKind::Class)
                .with_super_class(Some(OBJECT))
                .with_interface("java.lang.CharSequence"),
        )
}

/// `class Pair<K extends CharSequence, V> { <R> R fold(...) }`
fn pair() -> TypeDefinition {
    let mut fold = MethodDefinition::new(
        "fold",
        vec![JvmType::object(OBJECT)],
        JvmType::object(OBJECT),
    );
    fold.type_parameters.push(TypeParameterDefinition {
        name: "R".to_string(),
        bounds: vec![JvmType::object(OBJECT)],
    });

    TypeDefinition::new("demo.Pair", TypeKind::Class)
        .with_super_class(Some(OBJECT))
        .with_type_parameter(TypeParameterDefinition {
            name: "K".to_string(),
            bounds: vec![JvmType::object("java.lang.CharSequence")],
        })
        .with_type_parameter(TypeParameterDefinition {
            name: "V".to_string(),
            bounds: vec![JvmType::object(OBJECT)],
        })
        .with_method(fold)
}

fn reference(provider: &dyn TypeProvider, name: &str) -> TypeUsage {
    TypeUsage::reference(provider.resolve_absolute_qualified_name(name).unwrap().unwrap())
}

#[test]
fn declared_type_variables_keep_their_site_and_bounds() {
    let provider = platform().with_type(pair());
    let pair = provider.resolve_absolute_qualified_name("demo.Pair").unwrap().unwrap();

    let variables = pair.type_variables(&provider).unwrap();
    let names: Vec<_> = variables.iter().map(|variable| variable.name.as_str()).collect();
    assert_eq!(names, vec!["K", "V"]);
    assert_eq!(
        variables[0].declaration,
        GenericDeclaration::Class {
            class_name: "demo.Pair".to_string()
        }
    );
    assert_eq!(variables[0].bounds, vec![reference(&provider, "java.lang.CharSequence")]);

    let fold = &pair.methods()[0];
    let method_variables = pair.method_type_variables(fold, &provider).unwrap();
    assert_eq!(method_variables.len(), 1);
    assert_eq!(
        method_variables[0].declaration,
        GenericDeclaration::Method {
            class_name: "demo.Pair".to_string(),
            descriptor: "(Ljava/lang/Object;)Ljava/lang/Object;".to_string(),
        }
    );
}

#[test]
fn substitution_makes_a_signature_describable() {
    let provider = platform().with_type(pair());
    let pair = provider.resolve_absolute_qualified_name("demo.Pair").unwrap().unwrap();
    let mut variables = pair.type_variables(&provider).unwrap().into_iter();
    let key = TypeUsage::TypeVariable(variables.next().unwrap());
    let value = TypeUsage::TypeVariable(variables.next().unwrap());

    // (K, V[]) -> Pair<K, V>
    let generic = TypeUsage::function(
        vec![key.clone(), TypeUsage::array(value.clone())],
        TypeUsage::parameterized(pair.clone(), vec![key.clone(), value.clone()]),
    );
    assert!(matches!(
        TypeUsage::array(value.clone()).jvm_type(),
        Err(TypeError::Unsupported { .. })
    ));

    let string = reference(&provider, STRING);
    let int = TypeUsage::Primitive(turin_types::PrimitiveKind::Int);
    let bindings = HashMap::from([
        ("K".to_string(), string.clone()),
        ("V".to_string(), int.clone()),
    ]);
    let concrete = generic.substitute(&bindings);

    assert_eq!(concrete.to_string(), "(java.lang.String, int[]) -> demo.Pair<java.lang.String, int>");
    let function = concrete.as_function().unwrap();
    assert_eq!(function.params[1].jvm_type().unwrap().descriptor(), "[I");
    assert_eq!(function.return_type.jvm_type().unwrap().descriptor(), "Ldemo/Pair;");
    assert_eq!(generic.to_string(), "(K, V[]) -> demo.Pair<K, V>");

    // Partial bindings leave the other variables in place.
    let partial = generic.substitute(&HashMap::from([("K".to_string(), string)]));
    assert_eq!(partial.to_string(), "(java.lang.String, V[]) -> demo.Pair<java.lang.String, V>");
}

#[test]
fn parameterized_references_compare_their_arguments() {
    let provider = platform().with_type(pair());
    let pair = provider.resolve_absolute_qualified_name("demo.Pair").unwrap().unwrap();
    let string = reference(&provider, STRING);
    let object = reference(&provider, OBJECT);

    let of_strings = TypeUsage::parameterized(pair.clone(), vec![string.clone(), string.clone()]);
    let of_objects = TypeUsage::parameterized(pair.clone(), vec![object.clone(), object]);
    let raw = TypeUsage::reference(pair);

    assert!(of_strings.assignable_to(&of_strings, &provider).unwrap());
    assert!(!of_strings.assignable_to(&of_objects, &provider).unwrap());
    assert!(of_strings.assignable_to(&raw, &provider).unwrap());
    assert!(raw.assignable_to(&of_strings, &provider).unwrap());
}

#[test]
fn composed_chain_serves_generic_definitions_from_the_first_provider() {
    let shadowing = InMemoryTypeProvider::new().with_type(
        TypeDefinition::new("demo.Pair", TypeKind::Class).with_super_class(Some(OBJECT)),
    );
    let composed = ComposedTypeProvider::new(vec![
        std::sync::Arc::new(shadowing),
        std::sync::Arc::new(platform().with_type(pair())),
    ]);

    let pair = composed.resolve_absolute_qualified_name("demo.Pair").unwrap().unwrap();
    assert!(pair.type_parameters().is_empty());
    assert!(pair.type_variables(&composed).unwrap().is_empty());
}

//! Bootstrap catalog of core platform types.
//!
//! Used when no JDK installation is available. The catalog is closed under
//! supertype references: every superclass and interface named here is itself
//! in the catalog.

use turin_classfile::{parse_method_descriptor, ReturnType};
use turin_types::{
    ConstructorDefinition, FieldDefinition, JvmType, MethodDefinition, PrimitiveKind,
    TypeDefinition, TypeError, TypeKind, TypeOrigin, TypeParameterDefinition,
};

struct BuiltinType {
    name: &'static str,
    kind: TypeKind,
    super_class: Option<&'static str>,
    interfaces: &'static [&'static str],
    type_parameters: &'static [&'static str],
    /// `(name, descriptor, static)`
    fields: &'static [(&'static str, &'static str, bool)],
    /// `(name, descriptor, static)`
    methods: &'static [(&'static str, &'static str, bool)],
    constructors: &'static [&'static str],
}

const OBJECT: Option<&str> = Some("java.lang.Object");
const NUMBER: Option<&str> = Some("java.lang.Number");

const CLASS: TypeKind = TypeKind::Class;
const INTERFACE: TypeKind = TypeKind::Interface;

static CATALOG: &[BuiltinType] = &[
    BuiltinType {
        name: "java.lang.Object",
        kind: CLASS,
        super_class: None,
        interfaces: &[],
        type_parameters: &[],
        fields: &[],
        methods: &[
            ("toString", "()Ljava/lang/String;", false),
            ("hashCode", "()I", false),
            ("equals", "(Ljava/lang/Object;)Z", false),
        ],
        constructors: &["()V"],
    },
    BuiltinType {
        name: "java.io.Serializable",
        kind: INTERFACE,
        super_class: OBJECT,
        interfaces: &[],
        type_parameters: &[],
        fields: &[],
        methods: &[],
        constructors: &[],
    },
    BuiltinType {
        name: "java.lang.Comparable",
        kind: INTERFACE,
        super_class: OBJECT,
        interfaces: &[],
        type_parameters: &["T"],
        fields: &[],
        methods: &[("compareTo", "(Ljava/lang/Object;)I", false)],
        constructors: &[],
    },
    BuiltinType {
        name: "java.lang.CharSequence",
        kind: INTERFACE,
        super_class: OBJECT,
        interfaces: &[],
        type_parameters: &[],
        fields: &[],
        methods: &[
            ("length", "()I", false),
            ("charAt", "(I)C", false),
            ("toString", "()Ljava/lang/String;", false),
        ],
        constructors: &[],
    },
    BuiltinType {
        name: "java.lang.Runnable",
        kind: INTERFACE,
        super_class: OBJECT,
        interfaces: &[],
        type_parameters: &[],
        fields: &[],
        methods: &[("run", "()V", false)],
        constructors: &[],
    },
    BuiltinType {
        name: "java.lang.Iterable",
        kind: INTERFACE,
        super_class: OBJECT,
        interfaces: &[],
        type_parameters: &["T"],
        fields: &[],
        methods: &[],
        constructors: &[],
    },
    BuiltinType {
        name: "java.lang.String",
        kind: CLASS,
        super_class: OBJECT,
        interfaces: &[
            "java.io.Serializable",
            "java.lang.Comparable",
            "java.lang.CharSequence",
        ],
        type_parameters: &[],
        fields: &[],
        methods: &[
            ("length", "()I", false),
            ("charAt", "(I)C", false),
            ("isEmpty", "()Z", false),
            ("substring", "(I)Ljava/lang/String;", false),
            ("substring", "(II)Ljava/lang/String;", false),
            ("concat", "(Ljava/lang/String;)Ljava/lang/String;", false),
            ("toUpperCase", "()Ljava/lang/String;", false),
            ("toLowerCase", "()Ljava/lang/String;", false),
            ("trim", "()Ljava/lang/String;", false),
            ("compareTo", "(Ljava/lang/String;)I", false),
            ("toString", "()Ljava/lang/String;", false),
            ("valueOf", "(I)Ljava/lang/String;", true),
            ("valueOf", "(J)Ljava/lang/String;", true),
            ("valueOf", "(Z)Ljava/lang/String;", true),
            ("valueOf", "(C)Ljava/lang/String;", true),
            ("valueOf", "(D)Ljava/lang/String;", true),
        ],
        constructors: &["()V", "(Ljava/lang/String;)V"],
    },
    BuiltinType {
        name: "java.lang.StringBuilder",
        kind: CLASS,
        super_class: OBJECT,
        interfaces: &["java.io.Serializable", "java.lang.CharSequence"],
        type_parameters: &[],
        fields: &[],
        methods: &[
            ("append", "(Ljava/lang/String;)Ljava/lang/StringBuilder;", false),
            ("append", "(I)Ljava/lang/StringBuilder;", false),
            ("append", "(J)Ljava/lang/StringBuilder;", false),
            ("append", "(Z)Ljava/lang/StringBuilder;", false),
            ("append", "(C)Ljava/lang/StringBuilder;", false),
            ("append", "(D)Ljava/lang/StringBuilder;", false),
            ("length", "()I", false),
            ("charAt", "(I)C", false),
            ("toString", "()Ljava/lang/String;", false),
        ],
        constructors: &["()V", "(Ljava/lang/String;)V"],
    },
    BuiltinType {
        name: "java.lang.Number",
        kind: CLASS,
        super_class: OBJECT,
        interfaces: &["java.io.Serializable"],
        type_parameters: &[],
        fields: &[],
        methods: &[
            ("intValue", "()I", false),
            ("longValue", "()J", false),
            ("doubleValue", "()D", false),
        ],
        constructors: &["()V"],
    },
    BuiltinType {
        name: "java.lang.Integer",
        kind: CLASS,
        super_class: NUMBER,
        interfaces: &["java.lang.Comparable"],
        type_parameters: &[],
        fields: &[("MAX_VALUE", "I", true), ("MIN_VALUE", "I", true)],
        methods: &[
            ("valueOf", "(I)Ljava/lang/Integer;", true),
            ("parseInt", "(Ljava/lang/String;)I", true),
            ("toString", "(I)Ljava/lang/String;", true),
            ("toString", "()Ljava/lang/String;", false),
        ],
        constructors: &["(I)V"],
    },
    BuiltinType {
        name: "java.lang.Long",
        kind: CLASS,
        super_class: NUMBER,
        interfaces: &["java.lang.Comparable"],
        type_parameters: &[],
        fields: &[("MAX_VALUE", "J", true), ("MIN_VALUE", "J", true)],
        methods: &[
            ("valueOf", "(J)Ljava/lang/Long;", true),
            ("parseLong", "(Ljava/lang/String;)J", true),
            ("toString", "(J)Ljava/lang/String;", true),
            ("toString", "()Ljava/lang/String;", false),
        ],
        constructors: &["(J)V"],
    },
    BuiltinType {
        name: "java.lang.Boolean",
        kind: CLASS,
        super_class: OBJECT,
        interfaces: &["java.io.Serializable", "java.lang.Comparable"],
        type_parameters: &[],
        fields: &[
            ("TRUE", "Ljava/lang/Boolean;", true),
            ("FALSE", "Ljava/lang/Boolean;", true),
        ],
        methods: &[
            ("booleanValue", "()Z", false),
            ("valueOf", "(Z)Ljava/lang/Boolean;", true),
            ("parseBoolean", "(Ljava/lang/String;)Z", true),
        ],
        constructors: &["(Z)V"],
    },
    BuiltinType {
        name: "java.lang.Math",
        kind: CLASS,
        super_class: OBJECT,
        interfaces: &[],
        type_parameters: &[],
        fields: &[("PI", "D", true), ("E", "D", true)],
        methods: &[
            ("max", "(II)I", true),
            ("max", "(JJ)J", true),
            ("max", "(DD)D", true),
            ("min", "(II)I", true),
            ("min", "(JJ)J", true),
            ("min", "(DD)D", true),
            ("abs", "(I)I", true),
            ("abs", "(J)J", true),
            ("abs", "(D)D", true),
            ("sqrt", "(D)D", true),
        ],
        constructors: &[],
    },
    BuiltinType {
        name: "java.lang.System",
        kind: CLASS,
        super_class: OBJECT,
        interfaces: &[],
        type_parameters: &[],
        fields: &[
            ("out", "Ljava/io/PrintStream;", true),
            ("err", "Ljava/io/PrintStream;", true),
        ],
        methods: &[
            ("currentTimeMillis", "()J", true),
            ("nanoTime", "()J", true),
            ("exit", "(I)V", true),
            ("lineSeparator", "()Ljava/lang/String;", true),
        ],
        constructors: &[],
    },
    BuiltinType {
        name: "java.lang.Throwable",
        kind: CLASS,
        super_class: OBJECT,
        interfaces: &["java.io.Serializable"],
        type_parameters: &[],
        fields: &[],
        methods: &[("getMessage", "()Ljava/lang/String;", false)],
        constructors: &["()V", "(Ljava/lang/String;)V"],
    },
    BuiltinType {
        name: "java.lang.Exception",
        kind: CLASS,
        super_class: Some("java.lang.Throwable"),
        interfaces: &[],
        type_parameters: &[],
        fields: &[],
        methods: &[],
        constructors: &["()V", "(Ljava/lang/String;)V"],
    },
    BuiltinType {
        name: "java.lang.RuntimeException",
        kind: CLASS,
        super_class: Some("java.lang.Exception"),
        interfaces: &[],
        type_parameters: &[],
        fields: &[],
        methods: &[],
        constructors: &["()V", "(Ljava/lang/String;)V"],
    },
    BuiltinType {
        name: "java.io.OutputStream",
        kind: CLASS,
        super_class: OBJECT,
        interfaces: &[],
        type_parameters: &[],
        fields: &[],
        methods: &[
            ("write", "(I)V", false),
            ("flush", "()V", false),
            ("close", "()V", false),
        ],
        constructors: &["()V"],
    },
    BuiltinType {
        name: "java.io.FilterOutputStream",
        kind: CLASS,
        super_class: Some("java.io.OutputStream"),
        interfaces: &[],
        type_parameters: &[],
        fields: &[],
        methods: &[],
        constructors: &["(Ljava/io/OutputStream;)V"],
    },
    // `println(Object)`/`print(Object)` are left out: with them a `String`
    // argument would match two overloads. A discovered JDK declares both, so
    // `System.out.println("...")` is an ambiguous call there until overload
    // resolution gains a most-specific rule.
    BuiltinType {
        name: "java.io.PrintStream",
        kind: CLASS,
        super_class: Some("java.io.FilterOutputStream"),
        interfaces: &[],
        type_parameters: &[],
        fields: &[],
        methods: &[
            ("println", "()V", false),
            ("println", "(Ljava/lang/String;)V", false),
            ("println", "(I)V", false),
            ("println", "(J)V", false),
            ("println", "(Z)V", false),
            ("println", "(C)V", false),
            ("println", "(F)V", false),
            ("println", "(D)V", false),
            ("print", "(Ljava/lang/String;)V", false),
            ("print", "(I)V", false),
            ("print", "(J)V", false),
            ("print", "(Z)V", false),
            ("print", "(C)V", false),
            ("print", "(F)V", false),
            ("print", "(D)V", false),
        ],
        constructors: &["(Ljava/io/OutputStream;)V"],
    },
    BuiltinType {
        name: "java.util.Collection",
        kind: INTERFACE,
        super_class: OBJECT,
        interfaces: &["java.lang.Iterable"],
        type_parameters: &["E"],
        fields: &[],
        methods: &[
            ("size", "()I", false),
            ("isEmpty", "()Z", false),
            ("add", "(Ljava/lang/Object;)Z", false),
            ("contains", "(Ljava/lang/Object;)Z", false),
        ],
        constructors: &[],
    },
    BuiltinType {
        name: "java.util.List",
        kind: INTERFACE,
        super_class: OBJECT,
        interfaces: &["java.util.Collection"],
        type_parameters: &["E"],
        fields: &[],
        methods: &[("get", "(I)Ljava/lang/Object;", false)],
        constructors: &[],
    },
    BuiltinType {
        name: "java.util.ArrayList",
        kind: CLASS,
        super_class: OBJECT,
        interfaces: &["java.util.List", "java.io.Serializable"],
        type_parameters: &["E"],
        fields: &[],
        methods: &[
            ("get", "(I)Ljava/lang/Object;", false),
            ("size", "()I", false),
            ("add", "(Ljava/lang/Object;)Z", false),
        ],
        constructors: &["()V", "(I)V"],
    },
];

pub(crate) fn contains(name: &str) -> bool {
    CATALOG.iter().any(|ty| ty.name == name)
}

pub(crate) fn names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|ty| ty.name)
}

pub(crate) fn load(name: &str) -> Result<Option<TypeDefinition>, TypeError> {
    CATALOG
        .iter()
        .find(|ty| ty.name == name)
        .map(BuiltinType::to_definition)
        .transpose()
}

impl BuiltinType {
    fn to_definition(&self) -> Result<TypeDefinition, TypeError> {
        let mut definition = TypeDefinition::new(self.name, self.kind)
            .with_origin(TypeOrigin::Jdk)
            .with_super_class(self.super_class);
        for interface in self.interfaces {
            definition = definition.with_interface(interface);
        }
        for name in self.type_parameters {
            definition = definition.with_type_parameter(TypeParameterDefinition {
                name: name.to_string(),
                bounds: vec![JvmType::object("java.lang.Object")],
            });
        }
        for &(name, descriptor, is_static) in self.fields {
            definition = definition.with_field(FieldDefinition {
                name: name.to_string(),
                jvm_type: JvmType::from_descriptor(descriptor)?,
                is_static,
                is_final: is_static,
            });
        }
        for &(name, descriptor, is_static) in self.methods {
            let (params, return_type) = parse_signature(descriptor)?;
            definition = definition
                .with_method(MethodDefinition::new(name, params, return_type).with_static(is_static));
        }
        for descriptor in self.constructors {
            let (params, _) = parse_signature(descriptor)?;
            definition = definition.with_constructor(ConstructorDefinition { params });
        }
        Ok(definition)
    }
}

fn parse_signature(descriptor: &str) -> Result<(Vec<JvmType>, JvmType), TypeError> {
    let parsed = parse_method_descriptor(descriptor)
        .map_err(|_| TypeError::UnsupportedDescriptor(descriptor.to_string()))?;
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

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use turin_classfile::{parse_field_descriptor, FieldType};

    use super::*;

    fn referenced_classes(descriptor: &str, out: &mut HashSet<String>) {
        let field = parse_field_descriptor(descriptor).unwrap();
        let mut ty = &field;
        while let FieldType::Array(component) = ty {
            ty = component.as_ref();
        }
        if let FieldType::Object(internal) = ty {
            out.insert(internal.replace('/', "."));
        }
    }

    #[test]
    fn every_entry_converts() {
        for name in names() {
            let definition = load(name).unwrap().unwrap();
            assert_eq!(definition.qualified_name(), name);
            assert_eq!(definition.origin(), &TypeOrigin::Jdk);
        }
        assert!(load("java.lang.Missing").unwrap().is_none());
    }

    #[test]
    fn print_stream_has_no_object_overloads() {
        let print_stream = load("java.io.PrintStream").unwrap().unwrap();
        let object_overloads: Vec<_> = print_stream
            .methods()
            .iter()
            .filter(|method| method.descriptor() == "(Ljava/lang/Object;)V")
            .map(|method| method.name.as_str())
            .collect();
        assert!(object_overloads.is_empty(), "{object_overloads:?}");
    }

    #[test]
    fn catalog_is_closed() {
        let mut referenced = HashSet::new();
        for ty in CATALOG {
            referenced.extend(ty.super_class.map(str::to_string));
            referenced.extend(ty.interfaces.iter().map(|i| i.to_string()));
            for (_, descriptor, _) in ty.fields {
                referenced_classes(descriptor, &mut referenced);
            }
            for (_, descriptor, _) in ty.methods.iter() {
                let parsed = parse_method_descriptor(descriptor).unwrap();
                for param in &parsed.params {
                    referenced_classes(&param.to_string(), &mut referenced);
                }
                if let ReturnType::Type(ret) = parsed.return_type {
                    referenced_classes(&ret.to_string(), &mut referenced);
                }
            }
        }
        for name in referenced {
            assert!(contains(&name), "{name} is referenced but not in the catalog");
        }
    }
}

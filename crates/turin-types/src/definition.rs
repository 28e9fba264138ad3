use std::collections::{HashSet, VecDeque};
use std::ops::ControlFlow;
use std::path::PathBuf;

use crate::jvm::{from_binary, method_descriptor, JvmConstructorDefinition, JvmMethodDefinition};
use crate::names::{binary_to_internal, package_name, simple_name};
use crate::overload::{select_applicable, Applicability};
use crate::provider::{require_type, TypeProvider};
use crate::{GenericDeclaration, JvmType, PrimitiveKind, TypeError, TypeUsage, TypeVariable, OBJECT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
}

/// Where a definition was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeOrigin {
    Source,
    Jdk,
    Archive(PathBuf),
    Directory(PathBuf),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub jvm_type: JvmType,
    pub is_static: bool,
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameterDefinition {
    pub name: String,
    /// Erased bounds, class bound first.
    pub bounds: Vec<JvmType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDefinition {
    pub name: String,
    pub params: Vec<JvmType>,
    pub return_type: JvmType,
    pub is_static: bool,
    pub type_parameters: Vec<TypeParameterDefinition>,
}

impl MethodDefinition {
    pub fn new(name: impl Into<String>, params: Vec<JvmType>, return_type: JvmType) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
            is_static: false,
            type_parameters: Vec::new(),
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn descriptor(&self) -> String {
        method_descriptor(&self.params, &self.return_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDefinition {
    pub params: Vec<JvmType>,
}

impl ConstructorDefinition {
    pub fn descriptor(&self) -> String {
        method_descriptor(&self.params, &JvmType::primitive(PrimitiveKind::Void))
    }
}

/// A resolved class or interface, independent of where it was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    qualified_name: String,
    kind: TypeKind,
    origin: TypeOrigin,
    super_class: Option<String>,
    interfaces: Vec<String>,
    type_parameters: Vec<TypeParameterDefinition>,
    fields: Vec<FieldDefinition>,
    methods: Vec<MethodDefinition>,
    constructors: Vec<ConstructorDefinition>,
}

impl TypeDefinition {
    /// `qualified_name` is the dotted binary name (`a.b.Outer$Inner`).
    pub fn new(qualified_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
            origin: TypeOrigin::Memory,
            super_class: None,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub fn with_origin(mut self, origin: TypeOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_super_class(mut self, name: Option<&str>) -> Self {
        self.super_class = name.map(str::to_string);
        self
    }

    pub fn with_interface(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    pub fn with_type_parameter(mut self, parameter: TypeParameterDefinition) -> Self {
        self.type_parameters.push(parameter);
        self
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: MethodDefinition) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_constructor(mut self, constructor: ConstructorDefinition) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Simple name, without the package.
    pub fn name(&self) -> &str {
        simple_name(&self.qualified_name)
    }

    pub fn package_name(&self) -> &str {
        package_name(&self.qualified_name)
    }

    pub fn internal_name(&self) -> String {
        binary_to_internal(&self.qualified_name)
    }

    pub fn jvm_type(&self) -> JvmType {
        JvmType::object(&self.qualified_name)
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn origin(&self) -> &TypeOrigin {
        &self.origin
    }

    pub fn super_class(&self) -> Option<&str> {
        self.super_class.as_deref()
    }

    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    pub fn type_parameters(&self) -> &[TypeParameterDefinition] {
        &self.type_parameters
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn methods(&self) -> &[MethodDefinition] {
        &self.methods
    }

    pub fn constructors(&self) -> &[ConstructorDefinition] {
        &self.constructors
    }

    /// Declared (not inherited) field.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn has_method_named(&self, name: &str) -> bool {
        self.methods.iter().any(|method| method.name == name)
    }

    fn direct_supertypes(&self) -> impl Iterator<Item = &str> {
        self.super_class
            .as_deref()
            .into_iter()
            .chain(self.interfaces.iter().map(String::as_str))
    }

    /// Breadth-first walk over this type and its supertypes, nearest first.
    fn walk_hierarchy(
        &self,
        provider: &dyn TypeProvider,
        mut visit: impl FnMut(&TypeDefinition) -> ControlFlow<()>,
    ) -> Result<(), TypeError> {
        if visit(self).is_break() {
            return Ok(());
        }
        let mut visited = HashSet::from([self.qualified_name.clone()]);
        let mut queue: VecDeque<String> = self.direct_supertypes().map(str::to_string).collect();
        while let Some(name) = queue.pop_front() {
            if !visited.insert(name.clone()) {
                continue;
            }
            let definition = require_type(provider, &name)?;
            if visit(definition.as_ref()).is_break() {
                return Ok(());
            }
            queue.extend(definition.direct_supertypes().map(str::to_string));
        }
        Ok(())
    }

    /// Whether this type extends or implements `target` (a dotted name),
    /// directly or transitively. Every type is a subtype of itself and of
    /// `java.lang.Object`.
    pub fn is_subtype_of(
        &self,
        target: &str,
        provider: &dyn TypeProvider,
    ) -> Result<bool, TypeError> {
        if target == OBJECT || self.qualified_name == target {
            return Ok(true);
        }
        let mut visited = HashSet::new();
        let mut queue: VecDeque<String> = self.direct_supertypes().map(str::to_string).collect();
        while let Some(name) = queue.pop_front() {
            if name == target {
                return Ok(true);
            }
            // Object has no supertypes and need not be resolvable.
            if name == OBJECT || !visited.insert(name.clone()) {
                continue;
            }
            let definition = require_type(provider, &name)?;
            queue.extend(definition.direct_supertypes().map(str::to_string));
        }
        Ok(false)
    }

    /// Field declared here or inherited from a supertype.
    pub fn find_field(
        &self,
        name: &str,
        provider: &dyn TypeProvider,
    ) -> Result<Option<FieldDefinition>, TypeError> {
        let mut found = None;
        self.walk_hierarchy(provider, |definition| match definition.field(name) {
            Some(field) => {
                found = Some(field.clone());
                ControlFlow::Break(())
            }
            None => ControlFlow::Continue(()),
        })?;
        Ok(found)
    }

    pub fn field_type(
        &self,
        name: &str,
        provider: &dyn TypeProvider,
    ) -> Result<Option<TypeUsage>, TypeError> {
        match self.find_field(name, provider)? {
            Some(field) => Ok(Some(from_binary(&field.jvm_type, provider)?)),
            None => Ok(None),
        }
    }

    /// Every method named `name` visible on this type, nearest declaration
    /// first. An inherited method with a descriptor already seen is hidden.
    pub fn methods_named(
        &self,
        name: &str,
        provider: &dyn TypeProvider,
    ) -> Result<Vec<(String, MethodDefinition)>, TypeError> {
        let mut seen = HashSet::new();
        let mut methods = Vec::new();
        self.walk_hierarchy(provider, |definition| {
            for method in definition.methods.iter().filter(|m| m.name == name) {
                if seen.insert(method.descriptor()) {
                    methods.push((definition.qualified_name.clone(), method.clone()));
                }
            }
            ControlFlow::Continue(())
        })?;
        Ok(methods)
    }

    /// Selects the single method applicable to `args` in the given context.
    pub fn find_method_for(
        &self,
        name: &str,
        args: &[JvmType],
        static_context: bool,
        provider: &dyn TypeProvider,
    ) -> Result<JvmMethodDefinition, TypeError> {
        let mut candidates = self.methods_named(name, provider)?;
        candidates.retain(|(_, method)| method.is_static == static_context);

        match select_applicable(&candidates, |(_, method)| method.params.as_slice(), args, provider)? {
            Applicability::Unique((owner, method)) => Ok(JvmMethodDefinition::new(
                owner,
                &method.name,
                &method.params,
                &method.return_type,
                method.is_static,
            )),
            Applicability::None => Err(TypeError::NoApplicableMethod {
                owner: self.qualified_name.clone(),
                name: name.to_string(),
                args: describe(args),
            }),
            Applicability::Ambiguous(found) => Err(TypeError::AmbiguousCall {
                owner: self.qualified_name.clone(),
                name: name.to_string(),
                candidates: found.iter().map(|(_, method)| method.descriptor()).collect(),
            }),
        }
    }

    pub fn resolve_constructor_call(
        &self,
        args: &[JvmType],
        provider: &dyn TypeProvider,
    ) -> Result<JvmConstructorDefinition, TypeError> {
        match select_applicable(&self.constructors, |ctor| ctor.params.as_slice(), args, provider)? {
            Applicability::Unique(ctor) => {
                Ok(JvmConstructorDefinition::new(&self.qualified_name, &ctor.params))
            }
            Applicability::None => Err(TypeError::NoApplicableMethod {
                owner: self.qualified_name.clone(),
                name: "<init>".to_string(),
                args: describe(args),
            }),
            Applicability::Ambiguous(found) => Err(TypeError::AmbiguousCall {
                owner: self.qualified_name.clone(),
                name: "<init>".to_string(),
                candidates: found.iter().map(|ctor| ctor.descriptor()).collect(),
            }),
        }
    }

    /// The class-level type parameters as [`TypeVariable`]s.
    pub fn type_variables(
        &self,
        provider: &dyn TypeProvider,
    ) -> Result<Vec<TypeVariable>, TypeError> {
        let declaration = GenericDeclaration::Class {
            class_name: self.qualified_name.clone(),
        };
        type_variables(&self.type_parameters, &declaration, provider)
    }

    /// Type parameters declared by `method` on this type.
    pub fn method_type_variables(
        &self,
        method: &MethodDefinition,
        provider: &dyn TypeProvider,
    ) -> Result<Vec<TypeVariable>, TypeError> {
        let declaration = GenericDeclaration::Method {
            class_name: self.qualified_name.clone(),
            descriptor: method.descriptor(),
        };
        type_variables(&method.type_parameters, &declaration, provider)
    }
}

fn type_variables(
    parameters: &[TypeParameterDefinition],
    declaration: &GenericDeclaration,
    provider: &dyn TypeProvider,
) -> Result<Vec<TypeVariable>, TypeError> {
    parameters
        .iter()
        .map(|parameter| -> Result<TypeVariable, TypeError> {
            let bounds = parameter
                .bounds
                .iter()
                .map(|bound| from_binary(bound, provider))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeVariable {
                name: parameter.name.clone(),
                declaration: declaration.clone(),
                bounds,
            })
        })
        .collect()
}

fn describe(args: &[JvmType]) -> Vec<String> {
    args.iter().map(|arg| arg.descriptor().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{InMemoryTypeProvider, STRING};

    fn jvm(descriptor: &str) -> JvmType {
        JvmType::from_descriptor(descriptor).unwrap()
    }

    fn provider() -> InMemoryTypeProvider {
        InMemoryTypeProvider::new()
            .with_type(
                TypeDefinition::new(OBJECT, TypeKind::Class)
                    .with_method(MethodDefinition::new("toString", vec![], jvm("Ljava/lang/String;")))
                    .with_constructor(ConstructorDefinition { params: vec![] }),
            )
            .with_type(
                TypeDefinition::new("java.lang.CharSequence", TypeKind::Interface)
                    .with_super_class(Some(OBJECT)),
            )
            .with_type(
                TypeDefinition::new(STRING, TypeKind::Class)
                    .with_super_class(Some(OBJECT))
                    .with_interface("java.lang.CharSequence")
                    .with_method(MethodDefinition::new("toString", vec![], jvm("Ljava/lang/String;")))
                    .with_method(MethodDefinition::new("length", vec![], jvm("I"))),
            )
            .with_type(
                TypeDefinition::new("a.Box", TypeKind::Class)
                    .with_super_class(Some(OBJECT))
                    .with_type_parameter(TypeParameterDefinition {
                        name: "T".to_string(),
                        bounds: vec![jvm("Ljava/lang/CharSequence;")],
                    })
                    .with_field(FieldDefinition {
                        name: "size".to_string(),
                        jvm_type: jvm("I"),
                        is_static: false,
                        is_final: true,
                    })
                    .with_method(MethodDefinition::new("put", vec![jvm("I")], jvm("V")))
                    .with_method(MethodDefinition::new("put", vec![jvm("J")], jvm("V")))
                    .with_method(MethodDefinition::new("put", vec![jvm("Ljava/lang/Object;")], jvm("V")))
                    .with_method(
                        MethodDefinition::new("of", vec![jvm("I")], jvm("La/Box;")).with_static(true),
                    )
                    .with_constructor(ConstructorDefinition { params: vec![] })
                    .with_constructor(ConstructorDefinition { params: vec![jvm("I")] }),
            )
            .with_type(
                TypeDefinition::new("a.SubBox", TypeKind::Class)
                    .with_super_class(Some("a.Box"))
                    .with_method(MethodDefinition::new("put", vec![jvm("I")], jvm("V"))),
            )
    }

    fn get(provider: &InMemoryTypeProvider, name: &str) -> Arc<TypeDefinition> {
        provider.resolve_absolute_qualified_name(name).unwrap().unwrap()
    }

    #[test]
    fn names() {
        let definition = TypeDefinition::new("a.b.Outer$Inner", TypeKind::Class);
        assert_eq!(definition.name(), "Outer$Inner");
        assert_eq!(definition.package_name(), "a.b");
        assert_eq!(definition.internal_name(), "a/b/Outer$Inner");
        assert_eq!(definition.jvm_type().descriptor(), "La/b/Outer$Inner;");
    }

    #[test]
    fn subtyping_walks_classes_and_interfaces() {
        let provider = provider();
        let string = get(&provider, STRING);
        assert!(string.is_subtype_of("java.lang.CharSequence", &provider).unwrap());
        assert!(string.is_subtype_of(OBJECT, &provider).unwrap());
        assert!(string.is_subtype_of(STRING, &provider).unwrap());
        assert!(!string.is_subtype_of("a.Box", &provider).unwrap());
        assert!(get(&provider, "a.SubBox").is_subtype_of("a.Box", &provider).unwrap());
    }

    #[test]
    fn missing_supertype_is_reported() {
        let provider = InMemoryTypeProvider::new()
            .with_type(TypeDefinition::new("a.A", TypeKind::Class).with_super_class(Some("a.Gone")));
        let a = get(&provider, "a.A");
        assert_eq!(
            a.is_subtype_of("a.Other", &provider),
            Err(TypeError::MissingType("a.Gone".to_string()))
        );
    }

    #[test]
    fn overloads_select_exact_primitive() {
        let provider = provider();
        let boxed = get(&provider, "a.Box");

        let method = boxed.find_method_for("put", &[jvm("I")], false, &provider).unwrap();
        assert_eq!(method.descriptor(), "(I)V");
        assert_eq!(method.owner_internal_name(), "a/Box");
        assert!(!method.is_static());

        let method = boxed.find_method_for("put", &[jvm("J")], false, &provider).unwrap();
        assert_eq!(method.descriptor(), "(J)V");

        let method = boxed
            .find_method_for("put", &[jvm("Ljava/lang/String;")], false, &provider)
            .unwrap();
        assert_eq!(method.descriptor(), "(Ljava/lang/Object;)V");
    }

    #[test]
    fn overload_failures() {
        let provider = provider();
        let boxed = get(&provider, "a.Box");
        assert_eq!(
            boxed.find_method_for("put", &[jvm("Z")], false, &provider),
            Err(TypeError::NoApplicableMethod {
                owner: "a.Box".to_string(),
                name: "put".to_string(),
                args: vec!["Z".to_string()],
            })
        );
        assert!(matches!(
            boxed.find_method_for("of", &[jvm("I")], false, &provider),
            Err(TypeError::NoApplicableMethod { .. })
        ));
        let of = boxed.find_method_for("of", &[jvm("I")], true, &provider).unwrap();
        assert!(of.is_static());
        assert_eq!(of.return_type().unwrap().descriptor(), "La/Box;");
    }

    #[test]
    fn ambiguity_is_reported_not_tie_broken() {
        let provider = InMemoryTypeProvider::new().with_type(
            TypeDefinition::new("a.Two", TypeKind::Class)
                .with_method(MethodDefinition::new("f", vec![jvm("Ljava/lang/Object;")], jvm("V")))
                .with_method(MethodDefinition::new("f", vec![jvm("Ljava/lang/CharSequence;")], jvm("V"))),
        );
        let provider = provider.with_type(
            TypeDefinition::new(STRING, TypeKind::Class).with_interface("java.lang.CharSequence"),
        );
        let provider = provider.with_type(TypeDefinition::new("java.lang.CharSequence", TypeKind::Interface));
        let two = get(&provider, "a.Two");
        assert_eq!(
            two.find_method_for("f", &[jvm("Ljava/lang/String;")], false, &provider),
            Err(TypeError::AmbiguousCall {
                owner: "a.Two".to_string(),
                name: "f".to_string(),
                candidates: vec![
                    "(Ljava/lang/Object;)V".to_string(),
                    "(Ljava/lang/CharSequence;)V".to_string()
                ],
            })
        );
    }

    #[test]
    fn inherited_methods_are_visible_and_overrides_hide() {
        let provider = provider();
        let sub = get(&provider, "a.SubBox");

        let method = sub.find_method_for("put", &[jvm("I")], false, &provider).unwrap();
        assert_eq!(method.owner_internal_name(), "a/SubBox");

        let method = sub.find_method_for("put", &[jvm("J")], false, &provider).unwrap();
        assert_eq!(method.owner_internal_name(), "a/Box");

        let method = sub.find_method_for("toString", &[], false, &provider).unwrap();
        assert_eq!(method.owner_internal_name(), "java/lang/Object");

        let string = get(&provider, STRING);
        let method = string.find_method_for("toString", &[], false, &provider).unwrap();
        assert_eq!(method.owner_internal_name(), "java/lang/String");
    }

    #[test]
    fn constructors() {
        let provider = provider();
        let boxed = get(&provider, "a.Box");
        let ctor = boxed.resolve_constructor_call(&[], &provider).unwrap();
        assert_eq!(ctor.descriptor(), "()V");
        let ctor = boxed.resolve_constructor_call(&[jvm("I")], &provider).unwrap();
        assert_eq!(ctor.descriptor(), "(I)V");
        assert!(boxed.resolve_constructor_call(&[jvm("J")], &provider).is_err());
    }

    #[test]
    fn fields_and_type_variables() {
        let provider = provider();
        let sub = get(&provider, "a.SubBox");
        assert!(sub.field("size").is_none());
        assert_eq!(
            sub.field_type("size", &provider).unwrap(),
            Some(TypeUsage::Primitive(PrimitiveKind::Int))
        );
        assert_eq!(sub.field_type("missing", &provider).unwrap(), None);

        let boxed = get(&provider, "a.Box");
        let vars = boxed.type_variables(&provider).unwrap();
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name, "T");
        assert_eq!(
            vars[0].declaration,
            GenericDeclaration::Class {
                class_name: "a.Box".to_string()
            }
        );
        assert_eq!(vars[0].bounds[0].to_string(), "java.lang.CharSequence");
    }
}

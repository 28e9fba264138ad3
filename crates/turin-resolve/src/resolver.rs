use std::sync::Arc;

use turin_types::names::validate_qualified_name;
use turin_types::{
    from_binary, is_applicable, require_type, BasicType, ConstructorDefinition, FieldDefinition,
    JvmConstructorDefinition, JvmMethodDefinition, JvmType, MethodDefinition, PrimitiveKind,
    TypeDefinition, TypeError, TypeKind, TypeOrigin, TypeProvider, TypeUsage, DEFAULT_PACKAGE,
    OBJECT, STRING,
};

use crate::ast::{Ast, ImportKind, NodeId, NodeKind, Range, TypeRef};
use crate::error::{unsupported, ResolveError, SemanticErrorKind, TypeResultExt};

/// What a type name denotes at a given position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTarget {
    Primitive(PrimitiveKind),
    Basic(&'static BasicType),
    /// A type declared in the compilation unit being resolved.
    Source(NodeId),
    External(Arc<TypeDefinition>),
}

/// A name bound to a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Parameter(NodeId),
    Local(NodeId),
    Property(NodeId),
    Function(NodeId),
    /// Brought into scope by a single static-member import.
    StaticMember {
        owner: Arc<TypeDefinition>,
        member: String,
    },
}

/// Concrete target of a call site, as the code generator needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationTarget {
    Method(JvmMethodDefinition),
    Constructor(JvmConstructorDefinition),
}

enum Imported {
    Source(NodeId),
    Type(Arc<TypeDefinition>),
    /// A static member, i.e. not a type.
    Value,
}

/// Resolves names and types within one [`Ast`].
///
/// Lookups start from an explicit node and walk enclosing scopes upwards;
/// names not declared in the file go to the provider chain. The resolver is
/// itself a [`TypeProvider`] that answers for the file's own types first, so
/// descriptors naming source types can be mapped back.
#[derive(Debug)]
pub struct Resolver<'a> {
    ast: &'a Ast,
    types: &'a dyn TypeProvider,
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub fn new(ast: &'a Ast, types: &'a dyn TypeProvider) -> Self {
        Self { ast, types }
    }

    #[must_use]
    pub fn ast(&self) -> &'a Ast {
        self.ast
    }

    /// The value `name` refers to at `context`.
    pub fn find_symbol(&self, name: &str, context: NodeId) -> Result<Symbol, ResolveError> {
        let mut came_from = None;
        for scope in self.ast.ancestors(context) {
            if let Some(symbol) = self.symbol_declared_in(scope, name, came_from)? {
                tracing::trace!(target: "turin.resolve", name, scope, "resolved symbol");
                return Ok(symbol);
            }
            came_from = Some(scope);
        }
        Err(ResolveError::Unresolved {
            name: name.to_string(),
            range: self.ast.range(context),
        })
    }

    fn symbol_declared_in(
        &self,
        scope: NodeId,
        name: &str,
        came_from: Option<NodeId>,
    ) -> Result<Option<Symbol>, ResolveError> {
        let scope_kind = self.ast.kind(scope);
        if scope_kind.is_invokable() {
            let parameter = self.ast.formal_parameters(scope).find(|&parameter| {
                matches!(self.ast.kind(parameter), NodeKind::FormalParameter { name: n, .. } if n == name)
            });
            return Ok(parameter.map(Symbol::Parameter));
        }

        for &child in self.ast.children(scope) {
            // Locals are visible only after their declaring statement.
            if matches!(scope_kind, NodeKind::Block) && Some(child) == came_from {
                break;
            }
            match self.ast.kind(child) {
                NodeKind::LocalVarDecl { name: n, .. } if n == name => {
                    return Ok(Some(Symbol::Local(child)));
                }
                NodeKind::Property { name: n, .. } if n == name => {
                    return Ok(Some(Symbol::Property(child)));
                }
                NodeKind::Function { name: n, .. } if n == name => {
                    return Ok(Some(Symbol::Function(child)));
                }
                NodeKind::Import(import) if import.local_name() == Some(name) => {
                    if let ImportKind::SingleStaticMember {
                        type_name, member, ..
                    } = import
                    {
                        return self.static_member_symbol(type_name, member, child).map(Some);
                    }
                }
                _ => {}
            }
        }
        Ok(None)
    }

    fn static_member_symbol(
        &self,
        type_name: &str,
        member: &str,
        import: NodeId,
    ) -> Result<Symbol, ResolveError> {
        let range = self.ast.range(import);
        let owner = self.resolve_imported_type(type_name, range)?;
        if !self.has_static_member(&owner, member, range)? {
            return Err(ResolveError::Unresolved {
                name: format!("{type_name}.{member}"),
                range,
            });
        }
        Ok(Symbol::StaticMember {
            owner,
            member: member.to_string(),
        })
    }

    fn has_static_member(
        &self,
        owner: &TypeDefinition,
        member: &str,
        range: Range,
    ) -> Result<bool, ResolveError> {
        if let Some(field) = owner.find_field(member, self).at(range)? {
            if field.is_static {
                return Ok(true);
            }
        }
        Ok(owner
            .methods_named(member, self)
            .at(range)?
            .iter()
            .any(|(_, method)| method.is_static))
    }

    fn resolve_imported_type(
        &self,
        name: &str,
        range: Range,
    ) -> Result<Arc<TypeDefinition>, ResolveError> {
        self.resolve_absolute_qualified_name(name)
            .at(range)?
            .ok_or_else(|| ResolveError::Unresolved {
                name: name.to_string(),
                range,
            })
    }

    /// What the type name `name` denotes at `context`.
    ///
    /// Primitive names always win, then the reserved basic names. Otherwise
    /// each enclosing scope is searched for a type declaration (by simple or
    /// qualified name) and then its imports. At the root the name is tried in
    /// the default package, and finally as written.
    pub fn lookup_type(&self, name: &str, context: NodeId) -> Result<TypeTarget, ResolveError> {
        if let Some(kind) = PrimitiveKind::from_name(name) {
            return Ok(TypeTarget::Primitive(kind));
        }
        validate_qualified_name(name).map_err(ResolveError::Invalid)?;
        if let Some(basic) = BasicType::find_by_name(name) {
            return Ok(TypeTarget::Basic(basic));
        }

        for scope in self.ast.ancestors(context) {
            if let Some(target) = self.type_declared_in(scope, name)? {
                return Ok(target);
            }
        }

        let range = self.ast.range(context);
        let implicit = format!("{DEFAULT_PACKAGE}.{name}");
        if let Some(definition) = self
            .types
            .resolve_absolute_qualified_name(&implicit)
            .at(range)?
        {
            tracing::trace!(target: "turin.resolve", name, "resolved through the default package");
            return Ok(TypeTarget::External(definition));
        }
        match self.types.resolve_absolute_qualified_name(name).at(range)? {
            Some(definition) => Ok(TypeTarget::External(definition)),
            None => Err(ResolveError::Unresolved {
                name: name.to_string(),
                range,
            }),
        }
    }

    fn type_declared_in(&self, scope: NodeId, name: &str) -> Result<Option<TypeTarget>, ResolveError> {
        for &child in self.ast.children(scope) {
            match self.ast.kind(child) {
                NodeKind::TypeDecl { name: declared } => {
                    if declared == name || self.ast.qualify(declared) == name {
                        return Ok(Some(TypeTarget::Source(child)));
                    }
                }
                NodeKind::Import(import) => match self.find_among_imported(import, name, child)? {
                    Some(Imported::Source(type_decl)) => return Ok(Some(TypeTarget::Source(type_decl))),
                    Some(Imported::Type(definition)) => {
                        return Ok(Some(TypeTarget::External(definition)))
                    }
                    Some(Imported::Value) => {
                        return Err(ResolveError::semantic(
                            SemanticErrorKind::NotAType,
                            self.ast.range(child),
                            format!("`{name}` is not a type"),
                        ))
                    }
                    None => {}
                },
                _ => {}
            }
        }
        Ok(None)
    }

    fn find_among_imported(
        &self,
        import: &ImportKind,
        name: &str,
        import_node: NodeId,
    ) -> Result<Option<Imported>, ResolveError> {
        let range = self.ast.range(import_node);
        match import {
            ImportKind::SingleType { name: imported, .. } => {
                if import.local_name() != Some(name) && imported != name {
                    return Ok(None);
                }
                if let Some(type_decl) = self.source_type_named(imported) {
                    return Ok(Some(Imported::Source(type_decl)));
                }
                if let Some(definition) = self.types.resolve_absolute_qualified_name(imported).at(range)? {
                    return Ok(Some(Imported::Type(definition)));
                }
                // `import a.B.c` may name a static member of `a.B`.
                if let Some((owner, member)) = imported.rsplit_once('.') {
                    if let Some(owner) = self.resolve_absolute_qualified_name(owner).at(range)? {
                        if self.has_static_member(&owner, member, range)? {
                            return Ok(Some(Imported::Value));
                        }
                    }
                }
                Err(ResolveError::Unresolved {
                    name: imported.clone(),
                    range,
                })
            }
            ImportKind::PackageOnDemand { package } => {
                if name.contains('.') {
                    return Ok(None);
                }
                let qualified = format!("{package}.{name}");
                if let Some(type_decl) = self.source_type_named(&qualified) {
                    return Ok(Some(Imported::Source(type_decl)));
                }
                Ok(self
                    .types
                    .resolve_absolute_qualified_name(&qualified)
                    .at(range)?
                    .map(Imported::Type))
            }
            ImportKind::SingleStaticMember {
                type_name, member, ..
            } => {
                if import.local_name() != Some(name) {
                    return Ok(None);
                }
                self.static_member_symbol(type_name, member, import_node)?;
                Ok(Some(Imported::Value))
            }
        }
    }

    /// File-level type declaration with the binary name `qualified`.
    fn source_type_named(&self, qualified: &str) -> Option<NodeId> {
        self.ast
            .children(Ast::ROOT)
            .iter()
            .copied()
            .find(|&child| self.ast.qualified_type_name(child).as_deref() == Some(qualified))
    }

    pub fn find_type_usage_in(&self, name: &str, context: NodeId) -> Result<TypeUsage, ResolveError> {
        let target = self.lookup_type(name, context)?;
        self.usage_of(target)
    }

    fn usage_of(&self, target: TypeTarget) -> Result<TypeUsage, ResolveError> {
        Ok(match target {
            TypeTarget::Primitive(kind) => TypeUsage::Primitive(kind),
            TypeTarget::Basic(basic) => TypeUsage::Basic(basic),
            TypeTarget::Source(type_decl) => {
                TypeUsage::reference(Arc::new(self.source_definition(type_decl)?))
            }
            TypeTarget::External(definition) => TypeUsage::reference(definition),
        })
    }

    /// `None` for primitive and basic types, which have no members.
    fn definition_of(&self, target: TypeTarget) -> Result<Option<Arc<TypeDefinition>>, ResolveError> {
        Ok(match target {
            TypeTarget::Source(type_decl) => Some(Arc::new(self.source_definition(type_decl)?)),
            TypeTarget::External(definition) => Some(definition),
            TypeTarget::Primitive(_) | TypeTarget::Basic(_) => None,
        })
    }

    pub fn resolve_type_ref(&self, ty: &TypeRef, context: NodeId) -> Result<TypeUsage, ResolveError> {
        match ty {
            TypeRef::Named(name) => self.find_type_usage_in(name, context),
            TypeRef::Array(element) => Ok(TypeUsage::array(self.resolve_type_ref(element, context)?)),
            TypeRef::Function {
                params,
                return_type,
            } => {
                let params = params
                    .iter()
                    .map(|param| self.resolve_type_ref(param, context))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TypeUsage::function(
                    params,
                    self.resolve_type_ref(return_type, context)?,
                ))
            }
        }
    }

    /// JVM type of a written type. Source types are not expanded into
    /// definitions, so self-referencing declarations map without recursion.
    pub fn jvm_type_of(&self, ty: &TypeRef, context: NodeId) -> Result<JvmType, ResolveError> {
        match ty {
            TypeRef::Named(name) => Ok(match self.lookup_type(name, context)? {
                TypeTarget::Primitive(kind) => JvmType::primitive(kind),
                TypeTarget::Basic(basic) => JvmType::primitive(basic.primitive()),
                TypeTarget::Source(type_decl) => {
                    JvmType::object(&self.ast.qualified_type_name(type_decl).unwrap_or_default())
                }
                TypeTarget::External(definition) => definition.jvm_type(),
            }),
            TypeRef::Array(element) => {
                let element = self.jvm_type_of(element, context)?;
                if element.is_void() {
                    return Err(unsupported("jvm descriptor", ty));
                }
                Ok(JvmType::array_of(&element))
            }
            TypeRef::Function { .. } => Err(unsupported("jvm descriptor", ty)),
        }
    }

    /// Resolves every name in a written type without building the
    /// definitions of the source types it mentions.
    pub fn check_type_ref(&self, ty: &TypeRef, context: NodeId) -> Result<(), ResolveError> {
        match ty {
            TypeRef::Named(name) => self.lookup_type(name, context).map(drop),
            TypeRef::Array(element) => self.check_type_ref(element, context),
            TypeRef::Function {
                params,
                return_type,
            } => {
                for param in params {
                    self.check_type_ref(param, context)?;
                }
                self.check_type_ref(return_type, context)
            }
        }
    }

    /// The [`TypeDefinition`] of a type declared in this file: properties
    /// become fields, and a single constructor takes every property in
    /// declaration order.
    ///
    /// A member whose written type does not resolve is left out, and the
    /// constructor with it when that member is a property. The checker
    /// reports such names at the member itself.
    pub fn source_definition(&self, type_decl: NodeId) -> Result<TypeDefinition, ResolveError> {
        let Some(qualified) = self.ast.qualified_type_name(type_decl) else {
            return Err(unsupported("type definition", self.ast.kind(type_decl).describe()));
        };
        let mut definition = TypeDefinition::new(qualified, TypeKind::Class)
            .with_origin(TypeOrigin::Source)
            .with_super_class(Some(OBJECT));
        let mut constructor = Some(Vec::new());

        for &child in self.ast.children(type_decl) {
            match self.ast.kind(child) {
                NodeKind::Property { name, ty } => {
                    let Some(jvm_type) = self.member_type(ty, child)? else {
                        constructor = None;
                        continue;
                    };
                    if let Some(params) = constructor.as_mut() {
                        params.push(jvm_type.clone());
                    }
                    definition = definition.with_field(FieldDefinition {
                        name: name.clone(),
                        jvm_type,
                        is_static: false,
                        is_final: false,
                    });
                }
                NodeKind::Method {
                    name,
                    return_type,
                    is_static,
                } => {
                    let params = self
                        .ast
                        .formal_parameters(child)
                        .map(|parameter| match self.ast.kind(parameter) {
                            NodeKind::FormalParameter { ty, .. } => self.member_type(ty, parameter),
                            other => Err(unsupported("parameter typing", other.describe())),
                        })
                        .collect::<Result<Option<Vec<_>>, _>>()?;
                    let (Some(params), Some(return_type)) =
                        (params, self.member_type(return_type, child)?)
                    else {
                        continue;
                    };
                    definition = definition.with_method(
                        MethodDefinition::new(name.clone(), params, return_type).with_static(*is_static),
                    );
                }
                _ => {}
            }
        }

        Ok(match constructor {
            Some(params) => definition.with_constructor(ConstructorDefinition { params }),
            None => definition,
        })
    }

    /// JVM type of a member's written type; `None` when a name in it does
    /// not resolve.
    fn member_type(&self, ty: &TypeRef, member: NodeId) -> Result<Option<JvmType>, ResolveError> {
        match self.jvm_type_of(ty, member) {
            Ok(jvm_type) => Ok(Some(jvm_type)),
            Err(error) if error.is_recoverable() => {
                tracing::debug!(target: "turin.resolve", member, %error, "member left out of source type");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    fn parameter_types(&self, invokable: NodeId) -> Result<Vec<JvmType>, ResolveError> {
        self.ast
            .children(invokable)
            .iter()
            .filter_map(|&child| match self.ast.kind(child) {
                NodeKind::FormalParameter { ty, .. } => Some(self.jvm_type_of(ty, child)),
                _ => None,
            })
            .collect()
    }

    /// Type of the value a symbol names. `context` is the node using it.
    pub fn type_of_symbol(&self, symbol: &Symbol, context: NodeId) -> Result<TypeUsage, ResolveError> {
        match symbol {
            Symbol::Parameter(node) | Symbol::Property(node) => match self.ast.kind(*node) {
                NodeKind::FormalParameter { ty, .. } | NodeKind::Property { ty, .. } => {
                    self.resolve_type_ref(ty, *node)
                }
                other => Err(unsupported("symbol typing", other.describe())),
            },
            Symbol::Local(node) => match self.ast.kind(*node) {
                NodeKind::LocalVarDecl { ty: Some(ty), .. } => self.resolve_type_ref(ty, *node),
                NodeKind::LocalVarDecl { name, ty: None } => match self.ast.children(*node).first() {
                    Some(&initializer) => self.type_of(initializer),
                    None => Err(unsupported("symbol typing", format!("untyped local `{name}`"))),
                },
                other => Err(unsupported("symbol typing", other.describe())),
            },
            Symbol::Function(node) => self.function_type(*node),
            Symbol::StaticMember { owner, member } => {
                let range = self.ast.range(context);
                match owner.find_field(member, self).at(range)? {
                    Some(field) if field.is_static => from_binary(&field.jvm_type, self).at(range),
                    _ => Err(ResolveError::semantic(
                        SemanticErrorKind::UnknownField,
                        range,
                        format!("`{}` has no static field `{member}`", owner.qualified_name()),
                    )),
                }
            }
        }
    }

    fn function_type(&self, function: NodeId) -> Result<TypeUsage, ResolveError> {
        let NodeKind::Function { return_type, .. } = self.ast.kind(function) else {
            return Err(unsupported("function type", self.ast.kind(function).describe()));
        };
        let params = self
            .ast
            .children(function)
            .iter()
            .filter_map(|&child| match self.ast.kind(child) {
                NodeKind::FormalParameter { ty, .. } => Some(self.resolve_type_ref(ty, child)),
                _ => None,
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TypeUsage::function(
            params,
            self.resolve_type_ref(return_type, function)?,
        ))
    }

    /// Type of an expression node.
    pub fn type_of(&self, expr: NodeId) -> Result<TypeUsage, ResolveError> {
        let range = self.ast.range(expr);
        match self.ast.kind(expr) {
            NodeKind::IntLiteral(_) => Ok(TypeUsage::Primitive(PrimitiveKind::Int)),
            NodeKind::BoolLiteral(_) => Ok(TypeUsage::Primitive(PrimitiveKind::Boolean)),
            NodeKind::StringLiteral(_) => {
                Ok(TypeUsage::reference(require_type(self.types, STRING).at(range)?))
            }
            NodeKind::ValueReference { name } => match self.find_symbol(name, expr) {
                Ok(symbol) => self.type_of_symbol(&symbol, expr),
                Err(error @ ResolveError::Unresolved { .. }) => match self.type_named_by(name, expr)? {
                    Some(target) => self.usage_of(target),
                    None => Err(error),
                },
                Err(error) => Err(error),
            },
            NodeKind::TypeIdentifier { name } => self.find_type_usage_in(name, expr),
            NodeKind::FieldAccess { field } => {
                let subject_type = self.type_of(self.subject(expr)?)?;
                subject_type.field_type(field, self).at(range)?.ok_or_else(|| {
                    ResolveError::semantic(
                        SemanticErrorKind::UnknownField,
                        range,
                        format!("`{subject_type}` has no field `{field}`"),
                    )
                })
            }
            NodeKind::StaticFieldAccess { type_name, field } => {
                let field = self.static_field(type_name, field, expr)?;
                from_binary(&field.jvm_type, self).at(range)
            }
            NodeKind::FunctionCall => {
                let method = self.resolve_method_call(expr)?;
                from_binary(&method.return_type().at(range)?, self).at(range)
            }
            NodeKind::Creation { type_name } => {
                self.resolve_creation(expr)?;
                self.find_type_usage_in(type_name, expr)
            }
            NodeKind::This => {
                let Some(type_decl) = self
                    .ast
                    .enclosing(expr, |kind| matches!(kind, NodeKind::TypeDecl { .. }))
                else {
                    return Err(ResolveError::semantic(
                        SemanticErrorKind::MisplacedThis,
                        range,
                        "`this` used outside a type declaration",
                    ));
                };
                Ok(TypeUsage::reference(Arc::new(self.source_definition(type_decl)?)))
            }
            other => Err(unsupported("expression typing", other.describe())),
        }
    }

    /// Whether the expression names a type rather than a value, which puts a
    /// call on it in static context.
    pub fn denotes_type(&self, expr: NodeId) -> Result<bool, ResolveError> {
        match self.ast.kind(expr) {
            NodeKind::TypeIdentifier { .. } => Ok(true),
            NodeKind::ValueReference { name } => match self.find_symbol(name, expr) {
                Ok(_) => Ok(false),
                Err(ResolveError::Unresolved { .. }) => Ok(self.type_named_by(name, expr)?.is_some()),
                Err(error) => Err(error),
            },
            _ => Ok(false),
        }
    }

    /// Reference type named by a value reference that is not a symbol, as
    /// `Math` in `Math.abs(x)`.
    fn type_named_by(&self, name: &str, context: NodeId) -> Result<Option<TypeTarget>, ResolveError> {
        match self.lookup_type(name, context) {
            Ok(target @ (TypeTarget::Source(_) | TypeTarget::External(_))) => Ok(Some(target)),
            Ok(_) | Err(ResolveError::Unresolved { .. }) => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn subject(&self, access: NodeId) -> Result<NodeId, ResolveError> {
        self.ast
            .children(access)
            .first()
            .copied()
            .ok_or_else(|| unsupported("member access", "access without a subject"))
    }

    fn static_field(
        &self,
        type_name: &str,
        field: &str,
        context: NodeId,
    ) -> Result<FieldDefinition, ResolveError> {
        let range = self.ast.range(context);
        let target = self.lookup_type(type_name, context)?;
        if let Some(owner) = self.definition_of(target)? {
            if let Some(found) = owner.find_field(field, self).at(range)? {
                if found.is_static {
                    return Ok(found);
                }
            }
        }
        Err(ResolveError::semantic(
            SemanticErrorKind::UnknownField,
            range,
            format!("`{type_name}` has no static field `{field}`"),
        ))
    }

    /// Resolves a function call or creation to the method or constructor it invokes.
    pub fn resolve_call(&self, call: NodeId) -> Result<InvocationTarget, ResolveError> {
        let target = match self.ast.kind(call) {
            NodeKind::FunctionCall => InvocationTarget::Method(self.resolve_method_call(call)?),
            NodeKind::Creation { .. } => InvocationTarget::Constructor(self.resolve_creation(call)?),
            other => return Err(unsupported("call resolution", other.describe())),
        };
        tracing::trace!(target: "turin.resolve", call, ?target, "resolved call");
        Ok(target)
    }

    fn argument_types(&self, args: &[NodeId]) -> Result<Vec<JvmType>, ResolveError> {
        args.iter()
            .map(|&arg| -> Result<JvmType, ResolveError> {
                self.type_of(arg)?.jvm_type().at(self.ast.range(arg))
            })
            .collect()
    }

    fn resolve_method_call(&self, call: NodeId) -> Result<JvmMethodDefinition, ResolveError> {
        let range = self.ast.range(call);
        let Some((&callee, args)) = self.ast.children(call).split_first() else {
            return Err(unsupported("call resolution", "call without a callee"));
        };
        let args = self.argument_types(args)?;

        match self.ast.kind(callee) {
            NodeKind::ValueReference { name } => match self.find_symbol(name, callee)? {
                Symbol::Function(function) => self.source_function_target(function, &args, range),
                Symbol::StaticMember { owner, member } => {
                    owner.find_method_for(&member, &args, true, self).at(range)
                }
                _ => Err(ResolveError::semantic(
                    SemanticErrorKind::NotInvokable,
                    range,
                    format!("`{name}` is not invokable"),
                )),
            },
            NodeKind::FieldAccess { field } => {
                let subject = self.subject(callee)?;
                let static_context = self.denotes_type(subject)?;
                let subject_type = self.type_of(subject)?;
                if !subject_type.is_reference() {
                    return Err(ResolveError::semantic(
                        SemanticErrorKind::NotInvokable,
                        range,
                        format!("`{subject_type}` has no methods"),
                    ));
                }
                subject_type
                    .find_method_for(field, &args, static_context, self)
                    .at(range)
            }
            NodeKind::StaticFieldAccess { type_name, field } => {
                match self.definition_of(self.lookup_type(type_name, callee)?)? {
                    Some(owner) => owner.find_method_for(field, &args, true, self).at(range),
                    None => Err(ResolveError::semantic(
                        SemanticErrorKind::NotInvokable,
                        range,
                        format!("`{type_name}` has no methods"),
                    )),
                }
            }
            other => Err(ResolveError::semantic(
                SemanticErrorKind::NotInvokable,
                range,
                format!("a {} is not invokable", other.describe()),
            )),
        }
    }

    /// Source functions compile to the static `invoke` method of a
    /// `Function_<name>` class in the file namespace.
    fn source_function_target(
        &self,
        function: NodeId,
        args: &[JvmType],
        range: Range,
    ) -> Result<JvmMethodDefinition, ResolveError> {
        let NodeKind::Function { name, return_type } = self.ast.kind(function) else {
            return Err(unsupported("call resolution", self.ast.kind(function).describe()));
        };
        let params = self.parameter_types(function)?;
        if !is_applicable(&params, args, self).at(range)? {
            return Err(ResolveError::from_type(
                TypeError::NoApplicableMethod {
                    owner: self.ast.namespace().to_string(),
                    name: name.clone(),
                    args: args.iter().map(|arg| arg.descriptor().to_string()).collect(),
                },
                range,
            ));
        }
        let return_type = self.jvm_type_of(return_type, function)?;
        let owner = self.ast.qualify(&format!("Function_{name}"));
        Ok(JvmMethodDefinition::new(&owner, "invoke", &params, &return_type, true))
    }

    fn resolve_creation(&self, creation: NodeId) -> Result<JvmConstructorDefinition, ResolveError> {
        let range = self.ast.range(creation);
        let NodeKind::Creation { type_name } = self.ast.kind(creation) else {
            return Err(unsupported("call resolution", self.ast.kind(creation).describe()));
        };
        let args = self.argument_types(self.ast.children(creation))?;
        match self.definition_of(self.lookup_type(type_name, creation)?)? {
            Some(definition) if !definition.is_interface() => {
                definition.resolve_constructor_call(&args, self).at(range)
            }
            _ => Err(ResolveError::semantic(
                SemanticErrorKind::NotInvokable,
                range,
                format!("`{type_name}` cannot be instantiated"),
            )),
        }
    }

    /// Checks that the target of an assignment is writable and accepts the value.
    pub fn check_assignment(&self, assignment: NodeId) -> Result<(), ResolveError> {
        let range = self.ast.range(assignment);
        let &[target, value] = self.ast.children(assignment) else {
            return Err(unsupported("assignment", "assignment without target and value"));
        };
        let target_type = self.writable_type(target)?;
        let value_type = self.type_of(value)?;
        if !value_type.assignable_to(&target_type, self).at(range)? {
            return Err(ResolveError::semantic(
                SemanticErrorKind::NotAssignable,
                range,
                format!("cannot assign `{value_type}` to `{target_type}`"),
            ));
        }
        Ok(())
    }

    fn writable_type(&self, target: NodeId) -> Result<TypeUsage, ResolveError> {
        let range = self.ast.range(target);
        match self.ast.kind(target) {
            NodeKind::ValueReference { name } => match self.find_symbol(name, target)? {
                Symbol::Function(_) => Err(ResolveError::semantic(
                    SemanticErrorKind::NotAssignable,
                    range,
                    format!("function `{name}` cannot be assigned"),
                )),
                Symbol::StaticMember { owner, member } => {
                    match owner.find_field(&member, self).at(range)? {
                        Some(field) if field.is_static => self.writable_field(field, range),
                        _ => Err(ResolveError::semantic(
                            SemanticErrorKind::UnknownField,
                            range,
                            format!("`{}` has no static field `{member}`", owner.qualified_name()),
                        )),
                    }
                }
                symbol => self.type_of_symbol(&symbol, target),
            },
            NodeKind::FieldAccess { field } => {
                let subject_type = self.type_of(self.subject(target)?)?;
                let found = match subject_type.as_reference() {
                    Some(reference) => reference.definition().find_field(field, self).at(range)?,
                    None => None,
                };
                match found {
                    Some(found) => self.writable_field(found, range),
                    None => Err(ResolveError::semantic(
                        SemanticErrorKind::NotAssignable,
                        range,
                        format!("`{subject_type}` has no assignable field `{field}`"),
                    )),
                }
            }
            NodeKind::StaticFieldAccess { type_name, field } => {
                let found = self.static_field(type_name, field, target)?;
                self.writable_field(found, range)
            }
            other => Err(ResolveError::semantic(
                SemanticErrorKind::NotAssignable,
                range,
                format!("a {} cannot be assigned", other.describe()),
            )),
        }
    }

    fn writable_field(&self, field: FieldDefinition, range: Range) -> Result<TypeUsage, ResolveError> {
        if field.is_final {
            return Err(ResolveError::semantic(
                SemanticErrorKind::NotAssignable,
                range,
                format!("field `{}` is final", field.name),
            ));
        }
        from_binary(&field.jvm_type, self).at(range)
    }
}

impl TypeProvider for Resolver<'_> {
    fn resolve_absolute_qualified_name(
        &self,
        name: &str,
    ) -> Result<Option<Arc<TypeDefinition>>, TypeError> {
        validate_qualified_name(name)?;
        match self.source_type_named(name) {
            Some(type_decl) => {
                let definition = self
                    .source_definition(type_decl)
                    .map_err(|error| error.into_type_error(name))?;
                Ok(Some(Arc::new(definition)))
            }
            None => self.types.resolve_absolute_qualified_name(name),
        }
    }
}

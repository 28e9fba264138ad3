use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::jvm::{JvmMethodDefinition, JvmType};
use crate::provider::TypeProvider;
use crate::{BasicType, PrimitiveKind, TypeDefinition, TypeError};

/// A type as written at a use site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeUsage {
    Primitive(PrimitiveKind),
    Basic(&'static BasicType),
    Reference(ReferenceType),
    Array(Box<TypeUsage>),
    Function(FunctionType),
    TypeVariable(TypeVariable),
}

/// A named class or interface, optionally parameterized.
#[derive(Debug, Clone)]
pub struct ReferenceType {
    definition: Arc<TypeDefinition>,
    type_arguments: Vec<TypeUsage>,
}

impl ReferenceType {
    pub fn definition(&self) -> &Arc<TypeDefinition> {
        &self.definition
    }

    pub fn qualified_name(&self) -> &str {
        self.definition.qualified_name()
    }

    pub fn type_arguments(&self) -> &[TypeUsage] {
        &self.type_arguments
    }
}

// Definitions are identified by qualified name within one compilation.
impl PartialEq for ReferenceType {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name() == other.qualified_name()
            && self.type_arguments == other.type_arguments
    }
}

impl Eq for ReferenceType {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionType {
    pub params: Vec<TypeUsage>,
    pub return_type: Box<TypeUsage>,
}

/// Where a type variable was declared. Method and constructor sites are
/// identified by their owner and erased descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericDeclaration {
    Class {
        class_name: String,
    },
    Method {
        class_name: String,
        descriptor: String,
    },
    Constructor {
        class_name: String,
        descriptor: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeVariable {
    pub name: String,
    pub declaration: GenericDeclaration,
    /// Stored as declared; bound satisfaction is not checked here.
    pub bounds: Vec<TypeUsage>,
}

impl TypeUsage {
    pub fn reference(definition: Arc<TypeDefinition>) -> Self {
        TypeUsage::Reference(ReferenceType {
            definition,
            type_arguments: Vec::new(),
        })
    }

    pub fn parameterized(definition: Arc<TypeDefinition>, type_arguments: Vec<TypeUsage>) -> Self {
        TypeUsage::Reference(ReferenceType {
            definition,
            type_arguments,
        })
    }

    pub fn array(element: TypeUsage) -> Self {
        TypeUsage::Array(Box::new(element))
    }

    pub fn function(params: Vec<TypeUsage>, return_type: TypeUsage) -> Self {
        TypeUsage::Function(FunctionType {
            params,
            return_type: Box::new(return_type),
        })
    }

    pub fn void() -> Self {
        TypeUsage::Primitive(PrimitiveKind::Void)
    }

    /// Machine primitives other than `void`, and basic types.
    pub fn is_primitive(&self) -> bool {
        match self {
            TypeUsage::Primitive(kind) => *kind != PrimitiveKind::Void,
            TypeUsage::Basic(_) => true,
            _ => false,
        }
    }

    pub fn is_basic(&self) -> bool {
        matches!(self, TypeUsage::Basic(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, TypeUsage::Reference(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeUsage::Array(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeUsage::Primitive(PrimitiveKind::Void))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, TypeUsage::Function(_))
    }

    pub fn is_type_variable(&self) -> bool {
        matches!(self, TypeUsage::TypeVariable(_))
    }

    /// Storage primitive; basic types answer with their underlying kind.
    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            TypeUsage::Primitive(kind) => Some(*kind),
            TypeUsage::Basic(basic) => Some(basic.primitive()),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ReferenceType> {
        match self {
            TypeUsage::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            TypeUsage::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn element_type(&self) -> Option<&TypeUsage> {
        match self {
            TypeUsage::Array(element) => Some(element),
            _ => None,
        }
    }

    /// JVM projection. Function types and unsubstituted type variables have
    /// no descriptor and yield [`TypeError::Unsupported`].
    pub fn jvm_type(&self) -> Result<JvmType, TypeError> {
        match self {
            TypeUsage::Primitive(kind) => Ok(JvmType::primitive(*kind)),
            TypeUsage::Basic(basic) => Ok(JvmType::primitive(basic.primitive())),
            TypeUsage::Reference(reference) => Ok(reference.definition.jvm_type()),
            TypeUsage::Array(element) => {
                if element.is_void() {
                    return Err(TypeError::unsupported("jvm descriptor", self));
                }
                Ok(JvmType::array_of(&element.jvm_type()?))
            }
            TypeUsage::Function(_) | TypeUsage::TypeVariable(_) => {
                Err(TypeError::unsupported("jvm descriptor", self))
            }
        }
    }

    /// Whether a value of this type can be stored where `target` is expected.
    pub fn assignable_to(
        &self,
        target: &TypeUsage,
        provider: &dyn TypeProvider,
    ) -> Result<bool, TypeError> {
        match (self, target) {
            (TypeUsage::TypeVariable(_), _) => Err(TypeError::unsupported("assignability", self)),
            (_, TypeUsage::TypeVariable(_)) => Err(TypeError::unsupported("assignability", target)),
            (TypeUsage::Primitive(from), TypeUsage::Primitive(to)) => Ok(from.widens_to(*to)),
            (TypeUsage::Basic(from), TypeUsage::Primitive(to)) => Ok(from.primitive().widens_to(*to)),
            // A basic target only takes itself or its storage primitive.
            (TypeUsage::Primitive(from), TypeUsage::Basic(to)) => Ok(*from == to.primitive()),
            (TypeUsage::Basic(from), TypeUsage::Basic(to)) => Ok(from == to),
            (TypeUsage::Reference(from), TypeUsage::Reference(to)) => {
                if from.qualified_name() == to.qualified_name()
                    && !from.type_arguments.is_empty()
                    && !to.type_arguments.is_empty()
                {
                    return Ok(from.type_arguments == to.type_arguments);
                }
                from.definition.is_subtype_of(to.qualified_name(), provider)
            }
            (TypeUsage::Array(from), TypeUsage::Array(to)) => {
                if from.is_primitive() || to.is_primitive() {
                    Ok(from.as_primitive() == to.as_primitive() && from.is_basic() == to.is_basic())
                } else {
                    from.assignable_to(to, provider)
                }
            }
            (TypeUsage::Function(from), TypeUsage::Function(to)) => {
                if from.params.len() != to.params.len() {
                    return Ok(false);
                }
                for (a, b) in from.params.iter().zip(&to.params) {
                    if !a.assignable_to(b, provider)? {
                        return Ok(false);
                    }
                }
                from.return_type.assignable_to(&to.return_type, provider)
            }
            _ => Ok(false),
        }
    }

    /// Replaces bound type variables, recursing into composite types.
    pub fn substitute(&self, bindings: &HashMap<String, TypeUsage>) -> TypeUsage {
        match self {
            TypeUsage::TypeVariable(variable) => bindings
                .get(&variable.name)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            TypeUsage::Array(element) => TypeUsage::array(element.substitute(bindings)),
            TypeUsage::Function(function) => TypeUsage::function(
                function.params.iter().map(|p| p.substitute(bindings)).collect(),
                function.return_type.substitute(bindings),
            ),
            TypeUsage::Reference(reference) if !reference.type_arguments.is_empty() => {
                TypeUsage::parameterized(
                    Arc::clone(&reference.definition),
                    reference
                        .type_arguments
                        .iter()
                        .map(|arg| arg.substitute(bindings))
                        .collect(),
                )
            }
            TypeUsage::Primitive(_) | TypeUsage::Basic(_) | TypeUsage::Reference(_) => self.clone(),
        }
    }

    /// Method lookup on the type of a call's receiver.
    pub fn find_method_for(
        &self,
        name: &str,
        args: &[JvmType],
        static_context: bool,
        provider: &dyn TypeProvider,
    ) -> Result<JvmMethodDefinition, TypeError> {
        match self {
            TypeUsage::Reference(reference) => {
                reference
                    .definition
                    .find_method_for(name, args, static_context, provider)
            }
            _ => Err(TypeError::unsupported("method lookup", self)),
        }
    }

    /// Type of the field `name`, `None` when the type has no such field.
    pub fn field_type(
        &self,
        name: &str,
        provider: &dyn TypeProvider,
    ) -> Result<Option<TypeUsage>, TypeError> {
        match self {
            TypeUsage::Reference(reference) => reference.definition.field_type(name, provider),
            TypeUsage::Array(_) if name == "length" => {
                Ok(Some(TypeUsage::Primitive(PrimitiveKind::Int)))
            }
            TypeUsage::TypeVariable(_) => Err(TypeError::unsupported("field lookup", self)),
            _ => Ok(None),
        }
    }
}

impl fmt::Display for TypeUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeUsage::Primitive(kind) => write!(f, "{kind}"),
            TypeUsage::Basic(basic) => f.write_str(basic.name()),
            TypeUsage::Reference(reference) => {
                f.write_str(reference.qualified_name())?;
                if !reference.type_arguments.is_empty() {
                    f.write_str("<")?;
                    write_list(f, &reference.type_arguments)?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeUsage::Array(element) => write!(f, "{element}[]"),
            TypeUsage::Function(function) => {
                f.write_str("(")?;
                write_list(f, &function.params)?;
                write!(f, ") -> {}", function.return_type)
            }
            TypeUsage::TypeVariable(variable) => f.write_str(&variable.name),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[TypeUsage]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

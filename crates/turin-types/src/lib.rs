//! The Turin type algebra.
//!
//! [`TypeUsage`] describes a type at a use site. Named types point at a
//! [`TypeDefinition`], which is produced by a [`TypeProvider`] regardless of
//! where the declaration came from (source, JDK, jar, class directory).
//! The [`jvm`] module projects the algebra onto JVM descriptors and back.

mod definition;
mod error;
pub mod jvm;
pub mod names;
mod overload;
mod primitive;
mod provider;
mod usage;

pub use definition::{
    ConstructorDefinition, FieldDefinition, MethodDefinition, TypeDefinition, TypeKind,
    TypeOrigin, TypeParameterDefinition,
};
pub use error::TypeError;
pub use jvm::{
    from_binary, to_binary, JvmConstructorDefinition, JvmMethodDefinition, JvmType,
    JvmTypeCategory,
};
pub use overload::{is_applicable, select_applicable, Applicability};
pub use primitive::{BasicType, PrimitiveKind, BASIC_TYPES};
pub use provider::{
    require_type, ComposedTypeProvider, InMemoryTypeProvider, TypeProvider,
};
pub use usage::{FunctionType, GenericDeclaration, ReferenceType, TypeUsage, TypeVariable};

/// Binary name of the root of the reference type hierarchy.
pub const OBJECT: &str = "java.lang.Object";
/// Binary name of the platform string type.
pub const STRING: &str = "java.lang.String";
/// Package whose types are visible without an import.
pub const DEFAULT_PACKAGE: &str = "java.lang";

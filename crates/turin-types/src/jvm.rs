//! Projection of [`TypeUsage`] onto JVM descriptors and back.

use std::fmt;

use turin_classfile::{parse_field_descriptor, parse_method_descriptor};

use crate::names::{binary_to_internal, internal_to_binary};
use crate::provider::{require_type, TypeProvider};
use crate::{PrimitiveKind, TypeError, TypeUsage, OBJECT};

/// A JVM field descriptor (`I`, `[J`, `Ljava/lang/String;`) or `V`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JvmType {
    descriptor: String,
}

/// Stack/local slot category, as needed to pick load/store/return opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JvmTypeCategory {
    /// `boolean`, `byte`, `char`, `short` and `int` share the int opcodes.
    Int,
    Long,
    Float,
    Double,
    Reference,
    Void,
}

impl JvmType {
    /// Validates `descriptor` against the field descriptor grammar (`V` included).
    pub fn from_descriptor(descriptor: &str) -> Result<Self, TypeError> {
        if descriptor != "V" {
            parse_field_descriptor(descriptor)
                .map_err(|_| TypeError::UnsupportedDescriptor(descriptor.to_string()))?;
        }
        Ok(Self {
            descriptor: descriptor.to_string(),
        })
    }

    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self {
            descriptor: kind.descriptor_code().to_string(),
        }
    }

    /// Reference type from a dotted binary name.
    pub fn object(binary_name: &str) -> Self {
        Self {
            descriptor: format!("L{};", binary_to_internal(binary_name)),
        }
    }

    pub fn array_of(component: &JvmType) -> Self {
        Self {
            descriptor: format!("[{}", component.descriptor),
        }
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Generic signature. Type arguments are erased, so this equals the descriptor.
    pub fn signature(&self) -> &str {
        &self.descriptor
    }

    /// Internal name as used by `CONSTANT_Class`: `java/lang/String` for
    /// classes, the descriptor itself for arrays and primitives.
    pub fn internal_name(&self) -> &str {
        self.descriptor
            .strip_prefix('L')
            .and_then(|rest| rest.strip_suffix(';'))
            .unwrap_or(&self.descriptor)
    }

    pub fn is_void(&self) -> bool {
        self.descriptor == "V"
    }

    pub fn is_array(&self) -> bool {
        self.descriptor.starts_with('[')
    }

    pub fn is_reference(&self) -> bool {
        self.descriptor.starts_with('L') || self.is_array()
    }

    pub fn is_primitive(&self) -> bool {
        !self.is_reference() && !self.is_void()
    }

    /// Component type of an array descriptor.
    pub fn element_type(&self) -> Option<JvmType> {
        self.descriptor.strip_prefix('[').map(|rest| JvmType {
            descriptor: rest.to_string(),
        })
    }

    pub fn category(&self) -> JvmTypeCategory {
        match self.descriptor.as_bytes().first() {
            Some(b'J') => JvmTypeCategory::Long,
            Some(b'F') => JvmTypeCategory::Float,
            Some(b'D') => JvmTypeCategory::Double,
            Some(b'V') => JvmTypeCategory::Void,
            Some(b'L' | b'[') => JvmTypeCategory::Reference,
            _ => JvmTypeCategory::Int,
        }
    }

    /// Whether a value of type `actual` can be passed where `self` is expected.
    ///
    /// Primitives only accept themselves; references accept subtypes; arrays
    /// are covariant in their reference components.
    pub fn is_assignable_by(
        &self,
        actual: &JvmType,
        provider: &dyn TypeProvider,
    ) -> Result<bool, TypeError> {
        if self == actual {
            return Ok(true);
        }
        match (self.element_type(), actual.element_type()) {
            (Some(expected), Some(actual)) => {
                if expected.is_primitive() || actual.is_primitive() {
                    Ok(false)
                } else {
                    expected.is_assignable_by(&actual, provider)
                }
            }
            (None, Some(_)) => Ok(self.descriptor == JvmType::object(OBJECT).descriptor),
            (Some(_), None) => Ok(false),
            (None, None) => {
                if !self.descriptor.starts_with('L') || !actual.descriptor.starts_with('L') {
                    return Ok(false);
                }
                let expected = internal_to_binary(self.internal_name());
                let actual = require_type(provider, &internal_to_binary(actual.internal_name()))?;
                actual.is_subtype_of(&expected, provider)
            }
        }
    }
}

impl fmt::Display for JvmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor)
    }
}

/// `(params)return` descriptor.
pub(crate) fn method_descriptor(params: &[JvmType], return_type: &JvmType) -> String {
    let mut descriptor = String::from("(");
    for param in params {
        descriptor.push_str(param.descriptor());
    }
    descriptor.push(')');
    descriptor.push_str(return_type.descriptor());
    descriptor
}

/// A resolved invocation target for the code generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JvmMethodDefinition {
    owner_internal_name: String,
    name: String,
    descriptor: String,
    is_static: bool,
}

impl JvmMethodDefinition {
    /// `owner` is a dotted binary name.
    pub fn new(
        owner: &str,
        name: &str,
        params: &[JvmType],
        return_type: &JvmType,
        is_static: bool,
    ) -> Self {
        Self {
            owner_internal_name: binary_to_internal(owner),
            name: name.to_string(),
            descriptor: method_descriptor(params, return_type),
            is_static,
        }
    }

    pub fn owner_internal_name(&self) -> &str {
        &self.owner_internal_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Return type half of the descriptor.
    pub fn return_type(&self) -> Result<JvmType, TypeError> {
        let parsed = parse_method_descriptor(&self.descriptor)
            .map_err(|_| TypeError::UnsupportedDescriptor(self.descriptor.clone()))?;
        Ok(match parsed.return_type {
            turin_classfile::ReturnType::Void => JvmType::primitive(PrimitiveKind::Void),
            turin_classfile::ReturnType::Type(ty) => JvmType {
                descriptor: ty.to_string(),
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JvmConstructorDefinition {
    owner_internal_name: String,
    descriptor: String,
}

impl JvmConstructorDefinition {
    /// `owner` is a dotted binary name.
    pub fn new(owner: &str, params: &[JvmType]) -> Self {
        Self {
            owner_internal_name: binary_to_internal(owner),
            descriptor: method_descriptor(params, &JvmType::primitive(PrimitiveKind::Void)),
        }
    }

    pub fn owner_internal_name(&self) -> &str {
        &self.owner_internal_name
    }

    pub fn name(&self) -> &'static str {
        "<init>"
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

pub fn to_binary(ty: &TypeUsage) -> Result<JvmType, TypeError> {
    ty.jvm_type()
}

/// Maps a descriptor back to a [`TypeUsage`].
///
/// Reference types must be known to `provider`; a miss means the classpath
/// does not match the binaries being read and is reported as
/// [`TypeError::MissingType`].
pub fn from_binary(jvm: &JvmType, provider: &dyn TypeProvider) -> Result<TypeUsage, TypeError> {
    let descriptor = jvm.descriptor();
    if let Some(element) = jvm.element_type() {
        return Ok(TypeUsage::array(from_binary(&element, provider)?));
    }
    if let Some(internal) = descriptor
        .strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'))
    {
        let definition = require_type(provider, &internal_to_binary(internal))?;
        return Ok(TypeUsage::reference(definition));
    }
    let mut chars = descriptor.chars();
    match (chars.next().and_then(PrimitiveKind::from_descriptor_code), chars.next()) {
        (Some(kind), None) => Ok(TypeUsage::Primitive(kind)),
        _ => Err(TypeError::UnsupportedDescriptor(descriptor.to_string())),
    }
}

//! Minimal reader for JVM `.class` files.
//!
//! Only the parts the resolver consumes are decoded: the constant pool, the
//! class header, member tables and `Signature` attributes. Everything else is
//! skipped.

#![forbid(unsafe_code)]

mod classfile;
mod constant_pool;
mod descriptor;
mod error;
mod reader;
mod signature;

pub use crate::classfile::{access, ClassFile, ClassMember};
pub use crate::descriptor::{parse_field_descriptor, parse_method_descriptor};
pub use crate::descriptor::{BaseType, FieldType, MethodDescriptor, ReturnType};
pub use crate::error::{Error, Result};
pub use crate::signature::{parse_type_parameters, TypeParameter};

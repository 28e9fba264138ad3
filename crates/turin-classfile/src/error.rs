use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Why a class file could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("class file ends early")]
    UnexpectedEof,
    #[error("{0} bytes left over after the last attribute")]
    TrailingBytes(usize),
    #[error("not a class file (magic 0x{0:08x})")]
    InvalidMagic(u32),
    #[error("constant pool has no entry #{0}")]
    InvalidConstantPoolIndex(u16),
    #[error("unknown constant pool tag {0}")]
    InvalidConstantPoolTag(u8),
    #[error("constant pool entry #{index} is a {found}, wanted a {expected}")]
    ConstantPoolTypeMismatch {
        index: u16,
        expected: &'static str,
        found: &'static str,
    },
    #[error("malformed modified UTF-8 in constant pool")]
    InvalidModifiedUtf8,
    #[error("malformed descriptor `{0}`")]
    InvalidDescriptor(String),
    #[error("malformed generic signature `{0}`")]
    InvalidSignature(String),
}

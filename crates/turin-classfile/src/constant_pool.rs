use crate::error::{Error, Result};
use crate::reader::Reader;

#[derive(Debug, Clone)]
enum Constant {
    /// Slot 0 and the second slot of `Long`/`Double` entries.
    Unusable,
    Utf8(String),
    Integer,
    Float,
    Long,
    Double,
    Class { name_index: u16 },
    String,
    FieldRef,
    MethodRef,
    InterfaceMethodRef,
    NameAndType,
    MethodHandle,
    MethodType,
    Dynamic,
    InvokeDynamic,
    Module,
    Package,
}

impl Constant {
    fn kind(&self) -> &'static str {
        match self {
            Constant::Unusable => "unusable",
            Constant::Utf8(_) => "Utf8",
            Constant::Integer => "Integer",
            Constant::Float => "Float",
            Constant::Long => "Long",
            Constant::Double => "Double",
            Constant::Class { .. } => "Class",
            Constant::String => "String",
            Constant::FieldRef => "Fieldref",
            Constant::MethodRef => "Methodref",
            Constant::InterfaceMethodRef => "InterfaceMethodref",
            Constant::NameAndType => "NameAndType",
            Constant::MethodHandle => "MethodHandle",
            Constant::MethodType => "MethodType",
            Constant::Dynamic => "Dynamic",
            Constant::InvokeDynamic => "InvokeDynamic",
            Constant::Module => "Module",
            Constant::Package => "Package",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    pub(crate) fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count);
        entries.push(Constant::Unusable);

        while entries.len() < count {
            let tag = reader.read_u1()?;
            let constant = match tag {
                1 => {
                    let len = reader.read_u2()? as usize;
                    Constant::Utf8(decode_modified_utf8(reader.read_bytes(len)?)?)
                }
                3 => {
                    reader.read_u4()?;
                    Constant::Integer
                }
                4 => {
                    reader.read_u4()?;
                    Constant::Float
                }
                5 | 6 => {
                    reader.read_u4()?;
                    reader.read_u4()?;
                    entries.push(if tag == 5 {
                        Constant::Long
                    } else {
                        Constant::Double
                    });
                    entries.push(Constant::Unusable);
                    continue;
                }
                7 => Constant::Class {
                    name_index: reader.read_u2()?,
                },
                8 => {
                    reader.read_u2()?;
                    Constant::String
                }
                9 | 10 | 11 | 12 | 17 | 18 => {
                    reader.read_u2()?;
                    reader.read_u2()?;
                    match tag {
                        9 => Constant::FieldRef,
                        10 => Constant::MethodRef,
                        11 => Constant::InterfaceMethodRef,
                        12 => Constant::NameAndType,
                        17 => Constant::Dynamic,
                        _ => Constant::InvokeDynamic,
                    }
                }
                15 => {
                    reader.read_u1()?;
                    reader.read_u2()?;
                    Constant::MethodHandle
                }
                16 => {
                    reader.read_u2()?;
                    Constant::MethodType
                }
                19 => {
                    reader.read_u2()?;
                    Constant::Module
                }
                20 => {
                    reader.read_u2()?;
                    Constant::Package
                }
                other => return Err(Error::InvalidConstantPoolTag(other)),
            };
            entries.push(constant);
        }

        Ok(Self { entries })
    }

    fn get(&self, index: u16) -> Result<&Constant> {
        match self.entries.get(index as usize) {
            None | Some(Constant::Unusable) => Err(Error::InvalidConstantPoolIndex(index)),
            Some(constant) => Ok(constant),
        }
    }

    pub(crate) fn get_utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            Constant::Utf8(value) => Ok(value),
            other => Err(Error::ConstantPoolTypeMismatch {
                index,
                expected: "Utf8",
                found: other.kind(),
            }),
        }
    }

    /// Internal (slash separated) name of a `Class` constant.
    pub(crate) fn get_class_name(&self, index: u16) -> Result<String> {
        match self.get(index)? {
            Constant::Class { name_index } => Ok(self.get_utf8(*name_index)?.to_string()),
            other => Err(Error::ConstantPoolTypeMismatch {
                index,
                expected: "Class",
                found: other.kind(),
            }),
        }
    }
}

/// Decodes the JVM's "modified UTF-8": `NUL` is two bytes and supplementary
/// characters are encoded as surrogate pairs of three bytes each.
fn decode_modified_utf8(bytes: &[u8]) -> Result<String> {
    if let Ok(plain) = std::str::from_utf8(bytes) {
        if !plain.contains('\0') {
            return Ok(plain.to_string());
        }
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let a = bytes[i] as u16;
        if a & 0x80 == 0 {
            if a == 0 {
                return Err(Error::InvalidModifiedUtf8);
            }
            units.push(a);
            i += 1;
        } else if a & 0xE0 == 0xC0 {
            let b = *bytes.get(i + 1).ok_or(Error::InvalidModifiedUtf8)? as u16;
            if b & 0xC0 != 0x80 {
                return Err(Error::InvalidModifiedUtf8);
            }
            units.push(((a & 0x1F) << 6) | (b & 0x3F));
            i += 2;
        } else if a & 0xF0 == 0xE0 {
            let b = *bytes.get(i + 1).ok_or(Error::InvalidModifiedUtf8)? as u16;
            let c = *bytes.get(i + 2).ok_or(Error::InvalidModifiedUtf8)? as u16;
            if b & 0xC0 != 0x80 || c & 0xC0 != 0x80 {
                return Err(Error::InvalidModifiedUtf8);
            }
            units.push(((a & 0x0F) << 12) | ((b & 0x3F) << 6) | (c & 0x3F));
            i += 3;
        } else {
            return Err(Error::InvalidModifiedUtf8);
        }
    }

    String::from_utf16(&units).map_err(|_| Error::InvalidModifiedUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_two_byte_nul() {
        assert_eq!(decode_modified_utf8(&[b'a', 0xC0, 0x80, b'b']).unwrap(), "a\0b");
    }

    #[test]
    fn decodes_surrogate_pairs() {
        // U+1F600 as a surrogate pair (D83D DE00), three bytes per half.
        let bytes = [0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80];
        assert_eq!(decode_modified_utf8(&bytes).unwrap(), "\u{1F600}");
    }

    #[test]
    fn long_constants_take_two_slots() {
        // count = 4: #1 Long (+ #2 unusable), #3 Utf8 "x"
        let bytes = [
            0x00, 0x04, 5, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0x00, 0x01, b'x',
        ];
        let mut reader = Reader::new(&bytes);
        let pool = ConstantPool::parse(&mut reader).unwrap();
        assert_eq!(pool.get_utf8(3).unwrap(), "x");
        assert_eq!(pool.get_utf8(2), Err(Error::InvalidConstantPoolIndex(2)));
        assert!(matches!(
            pool.get_utf8(1),
            Err(Error::ConstantPoolTypeMismatch { expected: "Utf8", found: "Long", .. })
        ));
    }
}

use crate::constant_pool::ConstantPool;
use crate::error::{Error, Result};
use crate::reader::Reader;

const MAGIC: u32 = 0xCAFE_BABE;

/// Access flag bits shared by classes, fields and methods.
pub mod access {
    pub const ACC_PUBLIC: u16 = 0x0001;
    pub const ACC_PRIVATE: u16 = 0x0002;
    pub const ACC_PROTECTED: u16 = 0x0004;
    pub const ACC_STATIC: u16 = 0x0008;
    pub const ACC_FINAL: u16 = 0x0010;
    pub const ACC_BRIDGE: u16 = 0x0040;
    pub const ACC_VARARGS: u16 = 0x0080;
    pub const ACC_INTERFACE: u16 = 0x0200;
    pub const ACC_ABSTRACT: u16 = 0x0400;
    pub const ACC_SYNTHETIC: u16 = 0x1000;
}

/// The parts of a class file the type layer needs: header, hierarchy,
/// members and generic signatures. Code and annotations are skipped.
#[derive(Debug, Clone)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub access_flags: u16,
    /// Internal name, e.g. `java/lang/String`.
    pub this_class: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<ClassMember>,
    pub methods: Vec<ClassMember>,
    pub signature: Option<String>,
}

/// A field or a method.
#[derive(Debug, Clone)]
pub struct ClassMember {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
}

impl ClassMember {
    fn has(&self, flags: u16) -> bool {
        self.access_flags & flags != 0
    }

    pub fn is_static(&self) -> bool {
        self.has(access::ACC_STATIC)
    }

    pub fn is_final(&self) -> bool {
        self.has(access::ACC_FINAL)
    }

    pub fn is_private(&self) -> bool {
        self.has(access::ACC_PRIVATE)
    }

    /// Compiler-generated members (synthetic accessors, bridge methods).
    pub fn is_generated(&self) -> bool {
        self.has(access::ACC_SYNTHETIC | access::ACC_BRIDGE)
    }

    fn read(reader: &mut Reader<'_>, pool: &ConstantPool) -> Result<Self> {
        let access_flags = reader.read_u2()?;
        let name = pool.get_utf8(reader.read_u2()?)?.to_owned();
        let descriptor = pool.get_utf8(reader.read_u2()?)?.to_owned();
        Ok(Self {
            access_flags,
            name,
            descriptor,
            signature: read_attributes(reader, pool)?,
        })
    }
}

impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        match reader.read_u4()? {
            MAGIC => {}
            other => return Err(Error::InvalidMagic(other)),
        }
        let minor_version = reader.read_u2()?;
        let major_version = reader.read_u2()?;
        let pool = ConstantPool::parse(&mut reader)?;

        let access_flags = reader.read_u2()?;
        let this_class = pool.get_class_name(reader.read_u2()?)?;
        // Index 0 only appears for `java/lang/Object` and module-info.
        let super_class = match reader.read_u2()? {
            0 => None,
            index => Some(pool.get_class_name(index)?),
        };
        let interfaces = read_table(&mut reader, |reader| {
            pool.get_class_name(reader.read_u2()?)
        })?;
        let fields = read_table(&mut reader, |reader| ClassMember::read(reader, &pool))?;
        let methods = read_table(&mut reader, |reader| ClassMember::read(reader, &pool))?;
        let signature = read_attributes(&mut reader, &pool)?;
        reader.ensure_empty()?;

        Ok(Self {
            minor_version,
            major_version,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            signature,
        })
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags & access::ACC_INTERFACE != 0
    }
}

/// Reads a `u2` count followed by that many items.
fn read_table<'a, T>(
    reader: &mut Reader<'a>,
    mut item: impl FnMut(&mut Reader<'a>) -> Result<T>,
) -> Result<Vec<T>> {
    let count = usize::from(reader.read_u2()?);
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(item(reader)?);
    }
    Ok(items)
}

/// Consumes an attribute table and returns its `Signature`, if any.
fn read_attributes(reader: &mut Reader<'_>, pool: &ConstantPool) -> Result<Option<String>> {
    let mut signature = None;
    read_table(reader, |reader| {
        let name = pool.get_utf8(reader.read_u2()?)?;
        let length = reader.read_u4()? as usize;
        let body = reader.read_bytes(length)?;
        if name == "Signature" {
            let mut body = Reader::new(body);
            signature = Some(pool.get_utf8(body.read_u2()?)?.to_owned());
            body.ensure_empty()?;
        }
        Ok(())
    })?;
    Ok(signature)
}

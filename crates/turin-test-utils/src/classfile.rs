use std::collections::HashMap;

const ACC_PUBLIC: u16 = 0x0001;
const ACC_SUPER: u16 = 0x0020;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;
const MAJOR_JAVA_8: u16 = 52;

#[derive(Debug, Clone)]
struct MemberSpec {
    access_flags: u16,
    name: String,
    descriptor: String,
    signature: Option<String>,
}

/// Builds structurally valid class files without method bodies.
///
/// ```
/// use turin_test_utils::ClassFileBuilder;
///
/// let bytes = ClassFileBuilder::new("com/example/Foo")
///     .method("bar", "()V", 0x0001)
///     .build();
/// assert_eq!(&bytes[..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
/// ```
#[derive(Debug, Clone)]
pub struct ClassFileBuilder {
    access_flags: u16,
    this_class: String,
    super_class: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<MemberSpec>,
    methods: Vec<MemberSpec>,
    signature: Option<String>,
}

impl ClassFileBuilder {
    pub fn new(internal_name: &str) -> Self {
        Self {
            access_flags: ACC_PUBLIC | ACC_SUPER,
            this_class: internal_name.to_string(),
            super_class: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            signature: None,
        }
    }

    pub fn interface(mut self) -> Self {
        self.access_flags = ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT;
        self
    }

    pub fn super_class(mut self, internal_name: Option<&str>) -> Self {
        self.super_class = internal_name.map(str::to_string);
        self
    }

    pub fn implements(mut self, internal_name: &str) -> Self {
        self.interfaces.push(internal_name.to_string());
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn field(mut self, name: &str, descriptor: &str, access_flags: u16) -> Self {
        self.fields.push(MemberSpec {
            access_flags,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: None,
        });
        self
    }

    pub fn method(mut self, name: &str, descriptor: &str, access_flags: u16) -> Self {
        self.methods.push(MemberSpec {
            access_flags,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: None,
        });
        self
    }

    pub fn generic_method(
        mut self,
        name: &str,
        descriptor: &str,
        signature: &str,
        access_flags: u16,
    ) -> Self {
        self.methods.push(MemberSpec {
            access_flags,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: Some(signature.to_string()),
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = PoolWriter::default();

        let this_index = pool.class(&self.this_class);
        let super_index = self.super_class.as_deref().map(|s| pool.class(s)).unwrap_or(0);
        let interface_indices: Vec<u16> = self.interfaces.iter().map(|i| pool.class(i)).collect();

        let mut body = Vec::new();
        push_u16(&mut body, self.access_flags);
        push_u16(&mut body, this_index);
        push_u16(&mut body, super_index);
        push_u16(&mut body, interface_indices.len() as u16);
        for index in interface_indices {
            push_u16(&mut body, index);
        }

        for members in [&self.fields, &self.methods] {
            push_u16(&mut body, members.len() as u16);
            for member in members {
                push_u16(&mut body, member.access_flags);
                push_u16(&mut body, pool.utf8(&member.name));
                push_u16(&mut body, pool.utf8(&member.descriptor));
                write_signature_attribute(&mut body, &mut pool, member.signature.as_deref());
            }
        }

        write_signature_attribute(&mut body, &mut pool, self.signature.as_deref());

        let mut bytes = Vec::new();
        push_u32(&mut bytes, 0xCAFEBABE);
        push_u16(&mut bytes, 0);
        push_u16(&mut bytes, MAJOR_JAVA_8);
        push_u16(&mut bytes, pool.count);
        bytes.extend_from_slice(&pool.bytes);
        bytes.extend_from_slice(&body);
        bytes
    }
}

fn write_signature_attribute(out: &mut Vec<u8>, pool: &mut PoolWriter, signature: Option<&str>) {
    match signature {
        Some(signature) => {
            push_u16(out, 1);
            push_u16(out, pool.utf8("Signature"));
            push_u32(out, 2);
            push_u16(out, pool.utf8(signature));
        }
        None => push_u16(out, 0),
    }
}

struct PoolWriter {
    bytes: Vec<u8>,
    /// Next free index; the JVM's `constant_pool_count`.
    count: u16,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl Default for PoolWriter {
    fn default() -> Self {
        Self {
            bytes: Vec::new(),
            count: 1,
            utf8: HashMap::new(),
            classes: HashMap::new(),
        }
    }
}

impl PoolWriter {
    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(index) = self.utf8.get(value) {
            return *index;
        }
        self.bytes.push(1); // CONSTANT_Utf8
        push_u16(&mut self.bytes, value.len() as u16);
        self.bytes.extend_from_slice(value.as_bytes());
        let index = self.next_index();
        self.utf8.insert(value.to_string(), index);
        index
    }

    fn class(&mut self, internal_name: &str) -> u16 {
        if let Some(index) = self.classes.get(internal_name) {
            return *index;
        }
        let name_index = self.utf8(internal_name);
        self.bytes.push(7); // CONSTANT_Class
        push_u16(&mut self.bytes, name_index);
        let index = self.next_index();
        self.classes.insert(internal_name.to_string(), index);
        index
    }

    fn next_index(&mut self) -> u16 {
        let index = self.count;
        self.count += 1;
        index
    }
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

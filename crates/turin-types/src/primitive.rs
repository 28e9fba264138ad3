use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

/// Source name and descriptor code of every primitive kind.
const PRIMITIVES: [(PrimitiveKind, &str, char); 9] = [
    (PrimitiveKind::Boolean, "boolean", 'Z'),
    (PrimitiveKind::Char, "char", 'C'),
    (PrimitiveKind::Byte, "byte", 'B'),
    (PrimitiveKind::Short, "short", 'S'),
    (PrimitiveKind::Int, "int", 'I'),
    (PrimitiveKind::Long, "long", 'J'),
    (PrimitiveKind::Float, "float", 'F'),
    (PrimitiveKind::Double, "double", 'D'),
    (PrimitiveKind::Void, "void", 'V'),
];

impl PrimitiveKind {
    pub fn all() -> impl Iterator<Item = PrimitiveKind> {
        PRIMITIVES.iter().map(|(kind, _, _)| *kind)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        PRIMITIVES
            .iter()
            .find(|(_, n, _)| *n == name)
            .map(|(kind, _, _)| *kind)
    }

    pub fn from_descriptor_code(code: char) -> Option<Self> {
        PRIMITIVES
            .iter()
            .find(|(_, _, c)| *c == code)
            .map(|(kind, _, _)| *kind)
    }

    pub fn name(self) -> &'static str {
        self.entry().1
    }

    pub fn descriptor_code(self) -> char {
        self.entry().2
    }

    fn entry(self) -> &'static (PrimitiveKind, &'static str, char) {
        // `PRIMITIVES` is indexed by declaration order.
        &PRIMITIVES[self as usize]
    }

    /// Position on the widening chain `byte -> short -> int -> long -> float -> double`.
    fn widening_rank(self) -> Option<u8> {
        match self {
            PrimitiveKind::Byte => Some(0),
            PrimitiveKind::Short => Some(1),
            PrimitiveKind::Int => Some(2),
            PrimitiveKind::Long => Some(3),
            PrimitiveKind::Float => Some(4),
            PrimitiveKind::Double => Some(5),
            PrimitiveKind::Boolean | PrimitiveKind::Char | PrimitiveKind::Void => None,
        }
    }

    /// Identity or a widening conversion along the numeric chain.
    pub fn widens_to(self, target: PrimitiveKind) -> bool {
        if self == target {
            return true;
        }
        match (self.widening_rank(), target.widening_rank()) {
            (Some(from), Some(to)) => from <= to,
            _ => false,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An unsigned logical type stored as a signed primitive.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct BasicType {
    name: &'static str,
    primitive: PrimitiveKind,
}

/// The reserved unsigned type names. They win over any source or classpath
/// type with the same name.
pub static BASIC_TYPES: [BasicType; 6] = [
    BasicType::new("ubyte", PrimitiveKind::Byte),
    BasicType::new("ushort", PrimitiveKind::Short),
    BasicType::new("uint", PrimitiveKind::Int),
    BasicType::new("ulong", PrimitiveKind::Long),
    BasicType::new("ufloat", PrimitiveKind::Float),
    BasicType::new("udouble", PrimitiveKind::Double),
];

impl BasicType {
    const fn new(name: &'static str, primitive: PrimitiveKind) -> Self {
        Self { name, primitive }
    }

    pub fn find_by_name(name: &str) -> Option<&'static BasicType> {
        BASIC_TYPES.iter().find(|basic| basic.name == name)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn primitive(&self) -> PrimitiveKind {
        self.primitive
    }
}

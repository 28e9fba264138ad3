use std::fmt;

use crate::error::{Error, Result};

/// A JVM primitive that can appear in a field descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

const BASE_CODES: [(char, BaseType); 8] = [
    ('B', BaseType::Byte),
    ('C', BaseType::Char),
    ('D', BaseType::Double),
    ('F', BaseType::Float),
    ('I', BaseType::Int),
    ('J', BaseType::Long),
    ('S', BaseType::Short),
    ('Z', BaseType::Boolean),
];

impl BaseType {
    pub fn from_code(code: char) -> Option<Self> {
        BASE_CODES
            .iter()
            .find(|(candidate, _)| *candidate == code)
            .map(|(_, base)| *base)
    }

    pub fn code(self) -> char {
        BASE_CODES
            .iter()
            .find(|(_, base)| *base == self)
            .map_or('V', |(code, _)| *code)
    }
}

/// A parsed field descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Base(BaseType),
    /// Internal name, e.g. `java/lang/String`.
    Object(String),
    Array(Box<FieldType>),
}

impl fmt::Display for FieldType {
    /// Writes the descriptor back out (`I`, `Ljava/lang/String;`, `[J`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Base(base) => write!(f, "{}", base.code()),
            FieldType::Object(name) => write!(f, "L{name};"),
            FieldType::Array(component) => {
                f.write_str("[")?;
                component.fmt(f)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    Void,
    Type(FieldType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

pub fn parse_field_descriptor(desc: &str) -> Result<FieldType> {
    let mut cursor = Cursor::new(desc);
    let ty = cursor.field_type()?;
    cursor.finish(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let mut cursor = Cursor::new(desc);
    cursor.expect('(')?;
    let mut params = Vec::new();
    while !cursor.eat(')') {
        params.push(cursor.field_type()?);
    }
    let return_type = if cursor.eat('V') {
        ReturnType::Void
    } else {
        ReturnType::Type(cursor.field_type()?)
    };
    cursor.finish(MethodDescriptor {
        params,
        return_type,
    })
}

/// Descriptor scanner. Every error reports the whole input.
struct Cursor<'a> {
    whole: &'a str,
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(whole: &'a str) -> Self {
        Self { whole, rest: whole }
    }

    fn error(&self) -> Error {
        Error::InvalidDescriptor(self.whole.to_owned())
    }

    fn eat(&mut self, expected: char) -> bool {
        match self.rest.strip_prefix(expected) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn finish<T>(self, value: T) -> Result<T> {
        if self.rest.is_empty() {
            Ok(value)
        } else {
            Err(self.error())
        }
    }

    fn field_type(&mut self) -> Result<FieldType> {
        let mut dimensions = 0;
        while self.eat('[') {
            dimensions += 1;
        }

        let mut chars = self.rest.chars();
        let element = match chars.next() {
            Some('L') => {
                let body = chars.as_str();
                let end = body.find(';').filter(|&end| end > 0).ok_or_else(|| self.error())?;
                self.rest = &body[end + 1..];
                FieldType::Object(body[..end].to_owned())
            }
            Some(code) => {
                let base = BaseType::from_code(code).ok_or_else(|| self.error())?;
                self.rest = chars.as_str();
                FieldType::Base(base)
            }
            None => return Err(self.error()),
        };

        Ok((0..dimensions).fold(element, |ty, _| FieldType::Array(Box::new(ty))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(name: &str) -> FieldType {
        FieldType::Object(name.to_owned())
    }

    fn array(component: FieldType) -> FieldType {
        FieldType::Array(Box::new(component))
    }

    #[test]
    fn field_descriptors() {
        assert_eq!(parse_field_descriptor("Z").unwrap(), FieldType::Base(BaseType::Boolean));
        assert_eq!(
            parse_field_descriptor("[[Ljava/util/Map;").unwrap(),
            array(array(object("java/util/Map")))
        );
    }

    #[test]
    fn method_descriptors() {
        let desc = parse_method_descriptor("(J[Ljava/lang/Object;D)Ljava/lang/String;").unwrap();
        assert_eq!(
            desc.params,
            vec![
                FieldType::Base(BaseType::Long),
                array(object("java/lang/Object")),
                FieldType::Base(BaseType::Double),
            ]
        );
        assert_eq!(desc.return_type, ReturnType::Type(object("java/lang/String")));

        let desc = parse_method_descriptor("()V").unwrap();
        assert!(desc.params.is_empty());
        assert_eq!(desc.return_type, ReturnType::Void);
    }

    #[test]
    fn malformed_input_reports_the_whole_descriptor() {
        for bad in ["", "V", "L;", "Ljava/lang/String", "II", "[", "Q"] {
            assert!(parse_field_descriptor(bad).is_err(), "{bad:?} should be rejected");
        }
        for bad in ["I", "(I", "(I)", "(V)V", "(I)VV"] {
            assert!(parse_method_descriptor(bad).is_err(), "{bad:?} should be rejected");
        }
        assert_eq!(
            parse_method_descriptor("(IQ)V"),
            Err(Error::InvalidDescriptor("(IQ)V".to_owned()))
        );
    }

    #[test]
    fn base_codes_round_trip() {
        for (code, base) in BASE_CODES {
            assert_eq!(BaseType::from_code(code), Some(base));
            assert_eq!(base.code(), code);
        }
        assert_eq!(BaseType::from_code('V'), None);
    }

    #[test]
    fn display_writes_the_descriptor() {
        for desc in ["[Ljava/util/List;", "[[I", "C"] {
            assert_eq!(parse_field_descriptor(desc).unwrap().to_string(), desc);
        }
    }
}

use crate::error::{Error, Result};

/// A formal type parameter declared by a generic class or method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
    /// Erased field descriptors of the declared bounds, class bound first.
    ///
    /// Bounds that are themselves type variables erase to `Ljava/lang/Object;`.
    pub bounds: Vec<String>,
}

/// Parse the leading `<...>` section of a class or method `Signature` attribute.
///
/// Signatures without formal type parameters yield an empty list.
pub fn parse_type_parameters(signature: &str) -> Result<Vec<TypeParameter>> {
    let mut parser = SignatureParser {
        input: signature,
        pos: 0,
    };
    if parser.peek() != Some('<') {
        return Ok(Vec::new());
    }
    parser.bump();

    let mut params = Vec::new();
    while parser.peek() != Some('>') {
        let name = parser.identifier(':')?;
        let mut bounds = Vec::new();

        // Class bound: may be empty (`T::Ljava/lang/Comparable;`).
        parser.expect(':')?;
        if matches!(parser.peek(), Some('L' | 'T' | '[')) {
            bounds.push(parser.reference_type()?);
        }
        while parser.peek() == Some(':') {
            parser.bump();
            bounds.push(parser.reference_type()?);
        }

        params.push(TypeParameter { name, bounds });
    }
    parser.expect('>')?;

    if params.is_empty() {
        return Err(parser.error());
    }
    Ok(params)
}

struct SignatureParser<'a> {
    input: &'a str,
    pos: usize,
}

impl SignatureParser<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.bump() == Some(expected) {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn error(&self) -> Error {
        Error::InvalidSignature(self.input.to_string())
    }

    fn identifier(&mut self, terminator: char) -> Result<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == terminator || matches!(c, ';' | '<' | '>' | '.' | '/' | ':' | '[') {
                break;
            }
            self.bump();
        }
        if self.pos == start {
            return Err(self.error());
        }
        Ok(self.input[start..self.pos].to_string())
    }

    /// Parses a reference type signature and returns its erased descriptor.
    fn reference_type(&mut self) -> Result<String> {
        match self.bump() {
            Some('L') => {
                let mut internal = String::new();
                loop {
                    match self.peek() {
                        Some(';') => {
                            self.bump();
                            break;
                        }
                        Some('<') => self.skip_type_arguments()?,
                        Some('.') => {
                            self.bump();
                            internal.push('$');
                        }
                        Some(c) => {
                            self.bump();
                            internal.push(c);
                        }
                        None => return Err(self.error()),
                    }
                }
                if internal.is_empty() {
                    return Err(self.error());
                }
                Ok(format!("L{internal};"))
            }
            Some('T') => {
                self.identifier(';')?;
                self.expect(';')?;
                Ok("Ljava/lang/Object;".to_string())
            }
            Some('[') => {
                let component = match self.peek() {
                    Some(c) if "BCDFIJSZ".contains(c) => {
                        self.bump();
                        c.to_string()
                    }
                    _ => self.reference_type()?,
                };
                Ok(format!("[{component}"))
            }
            _ => Err(self.error()),
        }
    }

    fn skip_type_arguments(&mut self) -> Result<()> {
        self.expect('<')?;
        while self.peek() != Some('>') {
            match self.peek() {
                Some('*') => {
                    self.bump();
                }
                Some('+' | '-') => {
                    self.bump();
                    self.reference_type()?;
                }
                Some(_) => {
                    self.reference_type()?;
                }
                None => return Err(self.error()),
            }
        }
        self.expect('>')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_type_parameters() {
        assert!(parse_type_parameters("Ljava/lang/Object;").unwrap().is_empty());
        assert!(parse_type_parameters("(I)V").unwrap().is_empty());
    }

    #[test]
    fn class_and_interface_bounds() {
        let params = parse_type_parameters(
            "<K:Ljava/lang/Object;V::Ljava/lang/Comparable<TV;>;:Ljava/io/Serializable;>Ljava/lang/Object;",
        )
        .unwrap();
        assert_eq!(
            params,
            vec![
                TypeParameter {
                    name: "K".to_string(),
                    bounds: vec!["Ljava/lang/Object;".to_string()],
                },
                TypeParameter {
                    name: "V".to_string(),
                    bounds: vec![
                        "Ljava/lang/Comparable;".to_string(),
                        "Ljava/io/Serializable;".to_string()
                    ],
                },
            ]
        );
    }

    #[test]
    fn type_variable_and_nested_bounds() {
        let params =
            parse_type_parameters("<T:Ljava/lang/Object;U:TT;W:Lp/Outer<TT;>.Inner;>(TU;)V")
                .unwrap();
        assert_eq!(params[1].bounds, vec!["Ljava/lang/Object;".to_string()]);
        assert_eq!(params[2].bounds, vec!["Lp/Outer$Inner;".to_string()]);
    }

    #[test]
    fn rejects_truncated_signature() {
        assert!(parse_type_parameters("<T:Ljava/lang/Object").is_err());
        assert!(parse_type_parameters("<>").is_err());
    }
}

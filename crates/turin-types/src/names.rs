//! Qualified-name syntax shared by every resolution entry point.

use crate::TypeError;

/// Returns `true` for dot-separated identifier segments (`java.lang.String`).
///
/// A segment starts with a letter or `_` and continues with letters, digits,
/// `_` or `$` (the latter only appears in binary names of nested types).
pub fn is_valid_qualified_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_valid_segment)
}

pub fn validate_qualified_name(name: &str) -> Result<(), TypeError> {
    if is_valid_qualified_name(name) {
        Ok(())
    } else {
        Err(TypeError::InvalidQualifiedName(name.to_string()))
    }
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first == '_' || unicode_ident::is_xid_start(first) => {}
        _ => return false,
    }
    chars.all(|c| c == '$' || unicode_ident::is_xid_continue(c))
}

/// `java.lang.String` -> `java/lang/String`.
pub fn binary_to_internal(name: &str) -> String {
    name.replace('.', "/")
}

/// `java/lang/String` -> `java.lang.String`.
pub fn internal_to_binary(name: &str) -> String {
    name.replace('/', ".")
}

/// Last dot-separated segment of a qualified name.
pub fn simple_name(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, simple)| simple)
}

/// Package part of a qualified name, empty for the default package.
pub fn package_name(name: &str) -> &str {
    name.rsplit_once('.').map_or("", |(package, _)| package)
}

/// Candidate binary names for a dotted name that may denote a nested type:
/// the name itself first, then `a.b.Outer$Inner`, `a.b$Outer$Inner` and so on.
pub fn nested_binary_candidates(name: &str) -> Vec<String> {
    let mut candidates = vec![name.to_string()];
    let mut current = name.to_string();
    while let Some(idx) = current.rfind('.') {
        current.replace_range(idx..idx + 1, "$");
        candidates.push(current.clone());
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_qualified_identifiers() {
        for name in ["String", "java.lang.String", "_a.b_c.D1", "a.Outer$Inner", "é.ü"] {
            assert!(is_valid_qualified_name(name), "{name:?} should be accepted");
        }
    }

    #[test]
    fn rejects_malformed_names() {
        for name in ["", ".", ".a", "a.", "a..b", "1a", "a.1b", "a-b", "a b", "$a"] {
            assert_eq!(
                validate_qualified_name(name),
                Err(TypeError::InvalidQualifiedName(name.to_string())),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn splits_names() {
        assert_eq!(simple_name("java.lang.String"), "String");
        assert_eq!(simple_name("String"), "String");
        assert_eq!(package_name("java.lang.String"), "java.lang");
        assert_eq!(package_name("String"), "");
        assert_eq!(binary_to_internal("a.b.C"), "a/b/C");
        assert_eq!(internal_to_binary("a/b/C$D"), "a.b.C$D");
    }

    #[test]
    fn nested_candidates_replace_dots_from_the_right() {
        assert_eq!(
            nested_binary_candidates("a.Outer.Inner"),
            vec![
                "a.Outer.Inner".to_string(),
                "a.Outer$Inner".to_string(),
                "a$Outer$Inner".to_string()
            ]
        );
    }
}

use crate::jvm::JvmType;
use crate::provider::TypeProvider;
use crate::TypeError;

/// Outcome of matching a call's argument types against a candidate family.
#[derive(Debug)]
pub enum Applicability<'c, T> {
    None,
    Unique(&'c T),
    /// More than one candidate accepts the arguments. No most-specific
    /// ordering is applied.
    Ambiguous(Vec<&'c T>),
}

/// Same arity, and every formal accepts the actual in the same position.
pub fn is_applicable(
    params: &[JvmType],
    args: &[JvmType],
    provider: &dyn TypeProvider,
) -> Result<bool, TypeError> {
    if params.len() != args.len() {
        return Ok(false);
    }
    for (formal, actual) in params.iter().zip(args) {
        if !formal.is_assignable_by(actual, provider)? {
            return Ok(false);
        }
    }
    Ok(true)
}

pub fn select_applicable<'c, T>(
    candidates: &'c [T],
    params: impl Fn(&T) -> &[JvmType],
    args: &[JvmType],
    provider: &dyn TypeProvider,
) -> Result<Applicability<'c, T>, TypeError> {
    let mut applicable = Vec::new();
    for candidate in candidates {
        if is_applicable(params(candidate), args, provider)? {
            applicable.push(candidate);
        }
    }
    Ok(match applicable.len() {
        0 => Applicability::None,
        1 => Applicability::Unique(applicable[0]),
        _ => Applicability::Ambiguous(applicable),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryTypeProvider, PrimitiveKind};

    fn int() -> JvmType {
        JvmType::primitive(PrimitiveKind::Int)
    }

    fn long() -> JvmType {
        JvmType::primitive(PrimitiveKind::Long)
    }

    #[test]
    fn exact_primitive_is_unique() {
        let provider = InMemoryTypeProvider::new();
        let family = vec![vec![int()], vec![long()]];
        let selected = select_applicable(&family, |p| p.as_slice(), &[int()], &provider).unwrap();
        assert!(matches!(selected, Applicability::Unique(params) if params == &vec![int()]));
    }

    #[test]
    fn arity_mismatch_is_not_applicable() {
        let provider = InMemoryTypeProvider::new();
        assert!(!is_applicable(&[int()], &[], &provider).unwrap());
        assert!(!is_applicable(&[int()], &[int(), int()], &provider).unwrap());
        assert!(is_applicable(&[], &[], &provider).unwrap());
    }

    #[test]
    fn duplicate_signatures_are_ambiguous() {
        let provider = InMemoryTypeProvider::new();
        let family = vec![vec![int()], vec![int()]];
        let selected = select_applicable(&family, |p| p.as_slice(), &[int()], &provider).unwrap();
        assert!(matches!(selected, Applicability::Ambiguous(found) if found.len() == 2));

        let none = select_applicable(&family, |p| p.as_slice(), &[long()], &provider).unwrap();
        assert!(matches!(none, Applicability::None));
    }
}

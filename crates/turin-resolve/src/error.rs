use thiserror::Error;
use turin_types::TypeError;

use crate::ast::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticErrorKind {
    AmbiguousCall,
    NoApplicableMethod,
    /// A name used as a type resolves to something else.
    NotAType,
    NotAssignable,
    NotInvokable,
    UnknownField,
    /// `this` outside a type declaration.
    MisplacedThis,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Malformed input or an operation the value cannot support.
    #[error(transparent)]
    Invalid(TypeError),

    #[error("unresolved symbol `{name}` at {range}")]
    Unresolved { name: String, range: Range },

    #[error("{message}")]
    Semantic {
        kind: SemanticErrorKind,
        range: Range,
        message: String,
    },

    /// A provider failed to produce a definition it should have.
    #[error(transparent)]
    Provider(TypeError),
}

impl ResolveError {
    pub(crate) fn semantic(kind: SemanticErrorKind, range: Range, message: impl Into<String>) -> Self {
        ResolveError::Semantic {
            kind,
            range,
            message: message.into(),
        }
    }

    /// Classifies a type-level failure raised while resolving the node at `range`.
    pub(crate) fn from_type(error: TypeError, range: Range) -> Self {
        let kind = match error {
            TypeError::Unresolved(name) => return ResolveError::Unresolved { name, range },
            TypeError::AmbiguousCall { .. } => SemanticErrorKind::AmbiguousCall,
            TypeError::NoApplicableMethod { .. } => SemanticErrorKind::NoApplicableMethod,
            TypeError::MissingType(_) | TypeError::Provider { .. } => {
                return ResolveError::Provider(error)
            }
            TypeError::InvalidQualifiedName(_)
            | TypeError::Unsupported { .. }
            | TypeError::UnsupportedDescriptor(_) => return ResolveError::Invalid(error),
        };
        ResolveError::semantic(kind, range, error.to_string())
    }

    /// Unresolved symbols and semantic errors are reported and the walk goes
    /// on; everything else aborts the current resolution.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ResolveError::Unresolved { .. } | ResolveError::Semantic { .. }
        )
    }

    pub fn range(&self) -> Option<Range> {
        match self {
            ResolveError::Unresolved { range, .. } | ResolveError::Semantic { range, .. } => {
                Some(*range)
            }
            ResolveError::Invalid(_) | ResolveError::Provider(_) => None,
        }
    }

    /// Lowers to the provider-level error for the type `type_name` being built.
    pub(crate) fn into_type_error(self, type_name: &str) -> TypeError {
        match self {
            ResolveError::Invalid(error) | ResolveError::Provider(error) => error,
            ResolveError::Unresolved { name, .. } => TypeError::Unresolved(name),
            ResolveError::Semantic { message, .. } => TypeError::Provider {
                name: type_name.to_string(),
                message,
            },
        }
    }
}

/// Invalid-input error for an operation the node or value cannot support.
pub(crate) fn unsupported(operation: &'static str, what: impl ToString) -> ResolveError {
    ResolveError::Invalid(TypeError::Unsupported {
        operation,
        ty: what.to_string(),
    })
}

pub(crate) trait TypeResultExt<T> {
    /// Attaches the range of the node being resolved to a type-level failure.
    fn at(self, range: Range) -> Result<T, ResolveError>;
}

impl<T> TypeResultExt<T> for Result<T, TypeError> {
    fn at(self, range: Range) -> Result<T, ResolveError> {
        self.map_err(|error| ResolveError::from_type(error, range))
    }
}

/// Receives the recoverable errors found while checking a compilation unit.
pub trait ErrorCollector {
    fn record_semantic_error(&mut self, range: Range, description: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub range: Range,
    pub message: String,
}

impl ErrorCollector for Vec<Diagnostic> {
    fn record_semantic_error(&mut self, range: Range, description: &str) {
        self.push(Diagnostic {
            range,
            message: description.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overload_failures_become_semantic_errors() {
        let range = Range::line(3, 4, 20);
        let error = ResolveError::from_type(
            TypeError::AmbiguousCall {
                owner: "a.B".to_string(),
                name: "f".to_string(),
                candidates: vec!["(I)V".to_string(), "(J)V".to_string()],
            },
            range,
        );
        assert!(error.is_recoverable());
        assert_eq!(error.range(), Some(range));
        assert!(matches!(
            error,
            ResolveError::Semantic {
                kind: SemanticErrorKind::AmbiguousCall,
                ..
            }
        ));
    }

    #[test]
    fn invalid_input_and_provider_failures_abort() {
        let invalid =
            ResolveError::from_type(TypeError::InvalidQualifiedName("a..b".to_string()), Range::default());
        let missing =
            ResolveError::from_type(TypeError::MissingType("a.B".to_string()), Range::default());
        assert!(matches!(invalid, ResolveError::Invalid(_)));
        assert!(matches!(missing, ResolveError::Provider(_)));
        assert!(!invalid.is_recoverable());
        assert!(!missing.is_recoverable());
    }

    #[test]
    fn unresolved_names_stay_recoverable_through_providers() {
        let declared_at = Range::line(2, 10, 20);
        let used_at = Range::line(7, 4, 9);
        let lowered = ResolveError::Unresolved {
            name: "NoSuchType".to_string(),
            range: declared_at,
        }
        .into_type_error("demo.Pet");
        assert_eq!(lowered, TypeError::Unresolved("NoSuchType".to_string()));

        let raised = ResolveError::from_type(lowered, used_at);
        assert!(raised.is_recoverable());
        assert_eq!(
            raised,
            ResolveError::Unresolved {
                name: "NoSuchType".to_string(),
                range: used_at,
            }
        );
    }

    #[test]
    fn vec_collects_diagnostics() {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        diagnostics.record_semantic_error(Range::line(1, 0, 3), "boom");
        assert_eq!(
            diagnostics,
            vec![Diagnostic {
                range: Range::line(1, 0, 3),
                message: "boom".to_string(),
            }]
        );
    }
}

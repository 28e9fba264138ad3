use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("`{0}` is not a valid qualified name")]
    InvalidQualifiedName(String),

    #[error("{operation} is not supported on `{ty}`")]
    Unsupported { operation: &'static str, ty: String },

    #[error("unable to find definition of type `{0}`")]
    MissingType(String),

    /// A name written in source that resolves to nothing. Unlike
    /// [`TypeError::MissingType`] this is a mistake in the program, not in
    /// the classpath.
    #[error("unresolved type name `{0}`")]
    Unresolved(String),

    #[error("unsupported binary type format `{0}`")]
    UnsupportedDescriptor(String),

    #[error("no applicable method `{owner}.{name}` for argument types ({})", .args.join(", "))]
    NoApplicableMethod {
        owner: String,
        name: String,
        args: Vec<String>,
    },

    #[error("ambiguous call to `{owner}.{name}`: candidates {}", .candidates.join(", "))]
    AmbiguousCall {
        owner: String,
        name: String,
        candidates: Vec<String>,
    },

    #[error("failed to load `{name}`: {message}")]
    Provider { name: String, message: String },
}

impl TypeError {
    pub(crate) fn unsupported(operation: &'static str, ty: impl ToString) -> Self {
        TypeError::Unsupported {
            operation,
            ty: ty.to_string(),
        }
    }
}

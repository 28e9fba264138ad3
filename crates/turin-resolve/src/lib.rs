//! Name and type resolution for Turin compilation units.
//!
//! The parser hands over an [`Ast`]; a [`Resolver`] answers what a name means
//! at a given node, computes expression types and picks call targets, and
//! [`SemanticChecker`] runs it over a whole file, reporting recoverable errors
//! through an [`ErrorCollector`].

pub mod ast;
mod checker;
mod error;
mod resolver;

pub use ast::{Ast, ImportKind, NodeData, NodeId, NodeKind, Position, Range, TypeRef};
pub use checker::SemanticChecker;
pub use error::{Diagnostic, ErrorCollector, ResolveError, SemanticErrorKind};
pub use resolver::{InvocationTarget, Resolver, Symbol, TypeTarget};

use turin_types::names::validate_qualified_name;
use turin_types::{PrimitiveKind, TypeUsage};

use crate::ast::{ImportKind, NodeId, NodeKind, TypeRef};
use crate::error::{unsupported, ErrorCollector, ResolveError, SemanticErrorKind, TypeResultExt};
use crate::resolver::Resolver;

/// Resolves every declaration, statement and expression of a compilation
/// unit, reporting what it can through an [`ErrorCollector`].
#[derive(Debug)]
pub struct SemanticChecker<'r, 'a> {
    resolver: &'r Resolver<'a>,
}

impl<'r, 'a> SemanticChecker<'r, 'a> {
    #[must_use]
    pub fn new(resolver: &'r Resolver<'a>) -> Self {
        Self { resolver }
    }

    /// Checks the subtree at `root` and returns the number of errors recorded.
    ///
    /// Unresolved names and semantic errors are recorded and checking goes on
    /// with the next node; any other error stops the check and is returned.
    pub fn check(
        &self,
        root: NodeId,
        collector: &mut dyn ErrorCollector,
    ) -> Result<usize, ResolveError> {
        let ast = self.resolver.ast();
        let mut recorded = 0;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if let Err(error) = self.check_node(node) {
                if !error.is_recoverable() {
                    return Err(error);
                }
                let range = error.range().unwrap_or_else(|| ast.range(node));
                tracing::debug!(target: "turin.resolve", %range, %error, "semantic error");
                collector.record_semantic_error(range, &error.to_string());
                recorded += 1;
            }
            // Expressions are checked as a whole by their enclosing statement.
            stack.extend(
                ast.children(node)
                    .iter()
                    .rev()
                    .copied()
                    .filter(|&child| !ast.kind(child).is_expression()),
            );
        }
        tracing::debug!(target: "turin.resolve", errors = recorded, "checked compilation unit");
        Ok(recorded)
    }

    fn check_node(&self, node: NodeId) -> Result<(), ResolveError> {
        let ast = self.resolver.ast();
        match ast.kind(node) {
            NodeKind::Import(import) => self.check_import(import, node),
            NodeKind::Property { ty, .. } | NodeKind::FormalParameter { ty, .. } => {
                self.resolver.check_type_ref(ty, node)
            }
            NodeKind::Method { return_type, .. } | NodeKind::Function { return_type, .. } => {
                self.resolver.check_type_ref(return_type, node)
            }
            NodeKind::ExpressionStatement => {
                for &expr in ast.children(node) {
                    self.resolver.type_of(expr)?;
                }
                Ok(())
            }
            NodeKind::LocalVarDecl { ty, .. } => self.check_local(node, ty.as_ref()),
            NodeKind::Assignment => self.resolver.check_assignment(node),
            NodeKind::Return => self.check_return(node),
            _ => Ok(()),
        }
    }

    fn check_import(&self, import: &ImportKind, node: NodeId) -> Result<(), ResolveError> {
        match import {
            ImportKind::SingleType { name, .. } => self.resolver.lookup_type(name, node).map(drop),
            ImportKind::PackageOnDemand { package } => {
                validate_qualified_name(package).map_err(ResolveError::Invalid)
            }
            ImportKind::SingleStaticMember { .. } => match import.local_name() {
                Some(local) => self.resolver.find_symbol(local, node).map(drop),
                None => Ok(()),
            },
        }
    }

    fn check_local(&self, node: NodeId, ty: Option<&TypeRef>) -> Result<(), ResolveError> {
        let ast = self.resolver.ast();
        let initializer = ast.children(node).first().copied();
        match (ty, initializer) {
            (Some(ty), Some(initializer)) => {
                let declared = self.resolver.resolve_type_ref(ty, node)?;
                let actual = self.resolver.type_of(initializer)?;
                self.expect_assignable(&actual, &declared, node)
            }
            (Some(ty), None) => self.resolver.check_type_ref(ty, node),
            (None, Some(initializer)) => self.resolver.type_of(initializer).map(drop),
            (None, None) => Err(unsupported(
                "local variable",
                "declaration without type or initializer",
            )),
        }
    }

    fn check_return(&self, node: NodeId) -> Result<(), ResolveError> {
        let ast = self.resolver.ast();
        let range = ast.range(node);
        let Some(invokable) = ast.enclosing(node, NodeKind::is_invokable) else {
            return Err(unsupported("return", "return outside of an invokable"));
        };
        let expected = match ast.kind(invokable) {
            NodeKind::Method { return_type, .. } | NodeKind::Function { return_type, .. } => {
                self.resolver.resolve_type_ref(return_type, invokable)?
            }
            _ => TypeUsage::Primitive(PrimitiveKind::Void),
        };

        match (ast.children(node).first(), expected.is_void()) {
            (None, true) => Ok(()),
            (None, false) => Err(ResolveError::semantic(
                SemanticErrorKind::NotAssignable,
                range,
                format!("missing return value of type `{expected}`"),
            )),
            (Some(_), true) => Err(ResolveError::semantic(
                SemanticErrorKind::NotAssignable,
                range,
                "cannot return a value from a `void` invokable",
            )),
            (Some(&value), false) => {
                let actual = self.resolver.type_of(value)?;
                self.expect_assignable(&actual, &expected, node)
            }
        }
    }

    fn expect_assignable(
        &self,
        actual: &TypeUsage,
        expected: &TypeUsage,
        node: NodeId,
    ) -> Result<(), ResolveError> {
        let range = self.resolver.ast().range(node);
        if actual.assignable_to(expected, self.resolver).at(range)? {
            Ok(())
        } else {
            Err(ResolveError::semantic(
                SemanticErrorKind::NotAssignable,
                range,
                format!("cannot assign `{actual}` to `{expected}`"),
            ))
        }
    }
}

//! Arena-allocated syntax tree of one compilation unit.
//!
//! The parser appends nodes top-down with [`Ast::add_child`]; a node's parent
//! link is fixed when it is added. Lookups only ever walk parent links
//! upwards, starting from an explicit [`NodeId`].

use std::fmt;

use turin_types::names::simple_name;

pub type NodeId = usize;

/// Zero-based line/column in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Single-line range.
    pub const fn line(line: u32, start_column: u32, end_column: u32) -> Self {
        Self {
            start: Position::new(line, start_column),
            end: Position::new(line, end_column),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// A type as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Simple or qualified name; primitive and basic names included.
    Named(String),
    Array(Box<TypeRef>),
    Function {
        params: Vec<TypeRef>,
        return_type: Box<TypeRef>,
    },
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    pub fn function(params: Vec<TypeRef>, return_type: TypeRef) -> Self {
        TypeRef::Function {
            params,
            return_type: Box::new(return_type),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::Array(element) => write!(f, "{element}[]"),
            TypeRef::Function {
                params,
                return_type,
            } => {
                f.write_str("(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") -> {return_type}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// `import a.b.C` or `import a.b.C as D`
    SingleType { name: String, alias: Option<String> },
    /// `import a.b.*`
    PackageOnDemand { package: String },
    /// `import a.b.C.member` or `import a.b.C.member as m`
    SingleStaticMember {
        type_name: String,
        member: String,
        alias: Option<String>,
    },
}

impl ImportKind {
    /// Name the import introduces into its scope; `None` for on-demand imports.
    pub fn local_name(&self) -> Option<&str> {
        match self {
            ImportKind::SingleType { name, alias } => {
                Some(alias.as_deref().unwrap_or_else(|| simple_name(name)))
            }
            ImportKind::SingleStaticMember { member, alias, .. } => {
                Some(alias.as_deref().unwrap_or(member.as_str()))
            }
            ImportKind::PackageOnDemand { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Root of a compilation unit.
    File { namespace: String },
    Import(ImportKind),
    TypeDecl { name: String },
    Property { name: String, ty: TypeRef },
    /// Children: formal parameters, then an optional body block.
    Method {
        name: String,
        return_type: TypeRef,
        is_static: bool,
    },
    /// Top-level function. Children as for [`NodeKind::Method`].
    Function { name: String, return_type: TypeRef },
    /// Entry point. Children: formal parameters, then the body block.
    Program { name: String },
    FormalParameter { name: String, ty: TypeRef },
    Block,
    /// Child: the expression.
    ExpressionStatement,
    /// Child: optional initializer. The declared type may be omitted when an
    /// initializer is present.
    LocalVarDecl { name: String, ty: Option<TypeRef> },
    /// Children: target, value.
    Assignment,
    /// Child: optional value.
    Return,
    IntLiteral(i64),
    StringLiteral(String),
    BoolLiteral(bool),
    ValueReference { name: String },
    /// An expression that names a type, e.g. the receiver of a static call.
    TypeIdentifier { name: String },
    /// Child: the subject expression.
    FieldAccess { field: String },
    StaticFieldAccess { type_name: String, field: String },
    /// Children: the callee, then the actual arguments in order.
    FunctionCall,
    /// Children: the actual arguments in order.
    Creation { type_name: String },
    This,
}

impl NodeKind {
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::IntLiteral(_)
                | NodeKind::StringLiteral(_)
                | NodeKind::BoolLiteral(_)
                | NodeKind::ValueReference { .. }
                | NodeKind::TypeIdentifier { .. }
                | NodeKind::FieldAccess { .. }
                | NodeKind::StaticFieldAccess { .. }
                | NodeKind::FunctionCall
                | NodeKind::Creation { .. }
                | NodeKind::This
        )
    }

    /// Methods, functions and programs: the nodes owning formal parameters.
    pub fn is_invokable(&self) -> bool {
        matches!(
            self,
            NodeKind::Method { .. } | NodeKind::Function { .. } | NodeKind::Program { .. }
        )
    }

    pub fn describe(&self) -> &'static str {
        match self {
            NodeKind::File { .. } => "file",
            NodeKind::Import(_) => "import",
            NodeKind::TypeDecl { .. } => "type declaration",
            NodeKind::Property { .. } => "property",
            NodeKind::Method { .. } => "method",
            NodeKind::Function { .. } => "function",
            NodeKind::Program { .. } => "program",
            NodeKind::FormalParameter { .. } => "formal parameter",
            NodeKind::Block => "block",
            NodeKind::ExpressionStatement => "expression statement",
            NodeKind::LocalVarDecl { .. } => "local variable declaration",
            NodeKind::Assignment => "assignment",
            NodeKind::Return => "return statement",
            NodeKind::IntLiteral(_) => "int literal",
            NodeKind::StringLiteral(_) => "string literal",
            NodeKind::BoolLiteral(_) => "boolean literal",
            NodeKind::ValueReference { .. } => "value reference",
            NodeKind::TypeIdentifier { .. } => "type identifier",
            NodeKind::FieldAccess { .. } => "field access",
            NodeKind::StaticFieldAccess { .. } => "static field access",
            NodeKind::FunctionCall => "function call",
            NodeKind::Creation { .. } => "creation",
            NodeKind::This => "this",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    range: Range,
}

impl NodeData {
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The enclosing scope; `None` only for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn range(&self) -> Range {
        self.range
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast {
    nodes: Vec<NodeData>,
}

impl Ast {
    pub const ROOT: NodeId = 0;

    /// Creates the tree with its [`NodeKind::File`] root.
    pub fn new(namespace: impl Into<String>, range: Range) -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::File {
                    namespace: namespace.into(),
                },
                parent: None,
                children: Vec::new(),
                range,
            }],
        }
    }

    /// Appends a node under `parent`. Panics if `parent` is not in this tree.
    pub fn add_child(&mut self, parent: NodeId, kind: NodeKind, range: Range) -> NodeId {
        let id = self.nodes.len();
        self.nodes[parent].children.push(id);
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            range,
        });
        id
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id]
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id].kind
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    #[must_use]
    pub fn range(&self, id: NodeId) -> Range {
        self.nodes[id].range
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn namespace(&self) -> &str {
        match &self.nodes[Self::ROOT].kind {
            NodeKind::File { namespace } => namespace,
            _ => "",
        }
    }

    /// `id` followed by each enclosing scope up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&current| self.parent(current))
    }

    /// Nearest node at or above `id` whose kind satisfies `predicate`.
    pub fn enclosing(&self, id: NodeId, predicate: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        self.ancestors(id).find(|&node| predicate(self.kind(node)))
    }

    /// Formal parameter children of an invokable, in declaration order.
    pub fn formal_parameters(&self, invokable: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(invokable)
            .iter()
            .copied()
            .filter(move |&child| matches!(self.kind(child), NodeKind::FormalParameter { .. }))
    }

    /// Binary name of a file-level type declaration (`namespace.Name`).
    pub fn qualified_type_name(&self, type_decl: NodeId) -> Option<String> {
        match self.kind(type_decl) {
            NodeKind::TypeDecl { name } => Some(self.qualify(name)),
            _ => None,
        }
    }

    /// Prefixes `name` with the file namespace, if there is one.
    pub fn qualify(&self, name: &str) -> String {
        match self.namespace() {
            "" => name.to_string(),
            namespace => format!("{namespace}.{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_links_are_set_on_insertion() {
        let mut ast = Ast::new("registry", Range::default());
        let person = ast.add_child(
            Ast::ROOT,
            NodeKind::TypeDecl {
                name: "Person".to_string(),
            },
            Range::line(1, 0, 30),
        );
        let property = ast.add_child(
            person,
            NodeKind::Property {
                name: "firstName".to_string(),
                ty: TypeRef::named("String"),
            },
            Range::line(1, 14, 29),
        );

        assert_eq!(ast.parent(property), Some(person));
        assert_eq!(ast.parent(Ast::ROOT), None);
        assert_eq!(ast.children(Ast::ROOT), &[person]);
        assert_eq!(ast.ancestors(property).collect::<Vec<_>>(), vec![property, person, Ast::ROOT]);
        assert_eq!(ast.qualified_type_name(person).as_deref(), Some("registry.Person"));
        assert_eq!(ast.qualified_type_name(property), None);
    }

    #[test]
    fn empty_namespace_leaves_names_unqualified() {
        let ast = Ast::new("", Range::default());
        assert_eq!(ast.qualify("Main"), "Main");
    }

    #[test]
    fn import_local_names() {
        let single = ImportKind::SingleType {
            name: "java.io.PrintStream".to_string(),
            alias: None,
        };
        let aliased = ImportKind::SingleStaticMember {
            type_name: "java.lang.System".to_string(),
            member: "out".to_string(),
            alias: Some("stdout".to_string()),
        };
        let on_demand = ImportKind::PackageOnDemand {
            package: "java.util".to_string(),
        };
        assert_eq!(single.local_name(), Some("PrintStream"));
        assert_eq!(aliased.local_name(), Some("stdout"));
        assert_eq!(on_demand.local_name(), None);
    }

    #[test]
    fn type_ref_display() {
        let ty = TypeRef::function(
            vec![TypeRef::named("int"), TypeRef::array(TypeRef::named("String"))],
            TypeRef::named("void"),
        );
        assert_eq!(ty.to_string(), "(int, String[]) -> void");
        assert_eq!(Range::line(2, 4, 9).to_string(), "2:4-2:9");
    }
}

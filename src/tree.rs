//! Syntax tree consumed by the rule
//!
//! The tree is an arena of nodes with parent links. It is produced once by
//! the host (usually through [`crate::builder::TreeBuilder`]) and only read
//! afterwards.

use crate::source::{Position, SourceFile, Span};

/// Index of a node in its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Opening and closing delimiter tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub open: Span,
    pub close: Span,
}

/// A method call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub receiver: Option<NodeId>,
    /// The `.` or `&.` token
    pub dot: Option<Span>,
    /// Method name token
    pub selector: Span,
    pub arguments: Vec<NodeId>,
    /// Parentheses around the argument list
    pub parens: Option<Delimiters>,
}

/// `if`, `while` and `until`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditional {
    pub keyword: Span,
    pub condition: NodeId,
    pub body: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForLoop {
    pub keyword: Span,
    pub variable: NodeId,
    pub collection: NodeId,
    pub body: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    And { lhs: NodeId, rhs: NodeId },
    Or { lhs: NodeId, rhs: NodeId },
    Call(Call),
    Assignment { target: Span, value: NodeId },
    If(Conditional),
    While(Conditional),
    Until(Conditional),
    For(ForLoop),
    /// A `begin`-like grouping; `parens` is set when written as `( ... )`
    Grouped {
        parens: Option<Delimiters>,
        children: Vec<NodeId>,
    },
    Other { children: Vec<NodeId> },
}

impl NodeKind {
    /// Direct children in source order
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::And { lhs, rhs } | NodeKind::Or { lhs, rhs } => vec![*lhs, *rhs],
            NodeKind::Call(call) => call
                .receiver
                .into_iter()
                .chain(call.arguments.iter().copied())
                .collect(),
            NodeKind::Assignment { value, .. } => vec![*value],
            NodeKind::If(cond) | NodeKind::While(cond) | NodeKind::Until(cond) => {
                std::iter::once(cond.condition)
                    .chain(cond.body.iter().copied())
                    .collect()
            }
            NodeKind::For(for_loop) => [for_loop.variable, for_loop.collection]
                .into_iter()
                .chain(for_loop.body.iter().copied())
                .collect(),
            NodeKind::Grouped { children, .. } | NodeKind::Other { children } => children.clone(),
        }
    }

    /// Token spans held by the node itself, not by its children
    pub fn tokens(&self) -> Vec<Span> {
        match self {
            NodeKind::Call(call) => {
                let mut tokens = vec![call.selector];
                tokens.extend(call.dot);
                if let Some(parens) = call.parens {
                    tokens.extend([parens.open, parens.close]);
                }
                tokens
            }
            NodeKind::Assignment { target, .. } => vec![*target],
            NodeKind::If(cond) | NodeKind::While(cond) | NodeKind::Until(cond) => {
                vec![cond.keyword]
            }
            NodeKind::For(for_loop) => vec![for_loop.keyword],
            NodeKind::Grouped {
                parens: Some(parens),
                ..
            } => vec![parens.open, parens.close],
            NodeKind::And { .. }
            | NodeKind::Or { .. }
            | NodeKind::Grouped { parens: None, .. }
            | NodeKind::Other { .. } => Vec::new(),
        }
    }

    /// Keyword text for keyword-header kinds
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            NodeKind::If(_) => Some("if"),
            NodeKind::While(_) => Some("while"),
            NodeKind::Until(_) => Some("until"),
            NodeKind::For(_) => Some("for"),
            NodeKind::And { .. }
            | NodeKind::Or { .. }
            | NodeKind::Call(_)
            | NodeKind::Assignment { .. }
            | NodeKind::Grouped { .. }
            | NodeKind::Other { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: Span,
}

/// An immutable syntax tree over one source file
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: SourceFile,
    nodes: Vec<SyntaxNode>,
    parents: Vec<Option<NodeId>>,
    root: NodeId,
}

impl SyntaxTree {
    pub(crate) fn from_parts(
        source: SourceFile,
        nodes: Vec<SyntaxNode>,
        parents: Vec<Option<NodeId>>,
        root: NodeId,
    ) -> Self {
        Self {
            source,
            nodes,
            parents,
            root,
        }
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id.index()]
    }

    /// Ancestors from the parent outward to the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// All nodes reachable from the root, parents before children
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            let children = self.kind(id).children();
            stack.extend(children.into_iter().rev());
        }
        order
    }

    /// Position of a span in this tree's source
    pub fn position(&self, span: Span) -> Position<'_> {
        self.source.position(span)
    }
}

/// Iterator over a node's ancestors
pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

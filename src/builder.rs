//! Incremental construction of a [`SyntaxTree`]
//!
//! A host parser that already knows its node spans calls [`TreeBuilder::push`]
//! directly. Hand-written trees (tests, fixtures) locate tokens by text
//! with [`TreeBuilder::token`], which searches forward from the previous
//! token so that repeated names resolve in source order.

use crate::source::{SourceFile, Span};
use crate::tree::{
    Call, Conditional, Delimiters, ForLoop, NodeId, NodeKind, SyntaxNode, SyntaxTree,
};
use thiserror::Error;

/// Error while assembling a tree
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("token `{token}` not found after offset {offset}")]
    TokenNotFound { token: String, offset: usize },

    #[error("node {0} does not exist")]
    UnknownNode(usize),

    #[error("node {0} is a child of more than one parent")]
    MultipleParents(usize),

    #[error("node {node} has invalid span {begin}..{end}")]
    InvalidSpan {
        node: usize,
        begin: usize,
        end: usize,
    },

    #[error("node {0} is its own ancestor")]
    Cycle(usize),
}

pub struct TreeBuilder {
    source: SourceFile,
    cursor: usize,
    nodes: Vec<SyntaxNode>,
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl TreeBuilder {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: SourceFile::new(source),
            cursor: 0,
            nodes: Vec::new(),
        }
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    /// Find the next occurrence of `needle` at or after the cursor
    ///
    /// Identifier-like edges must sit on word boundaries, so `a` never
    /// matches inside `bar`.
    pub fn token(&mut self, needle: &str) -> Result<Span, TreeError> {
        let text = self.source.text();
        let rest = text.get(self.cursor..).unwrap_or("");
        let needs_left = needle.chars().next().is_some_and(is_ident_char);
        let needs_right = needle.chars().last().is_some_and(is_ident_char);

        let found = rest
            .match_indices(needle)
            .map(|(i, _)| self.cursor + i)
            .find(|&begin| {
                let end = begin + needle.len();
                let left_ok =
                    !needs_left || !text[..begin].chars().last().is_some_and(is_ident_char);
                let right_ok =
                    !needs_right || !text[end..].chars().next().is_some_and(is_ident_char);
                left_ok && right_ok
            });

        match found {
            Some(begin) if !needle.is_empty() => {
                let span = Span::new(begin, begin + needle.len());
                self.cursor = span.end;
                Ok(span)
            }
            _ => Err(TreeError::TokenNotFound {
                token: needle.to_string(),
                offset: self.cursor,
            }),
        }
    }

    /// Add a node with a known span
    pub fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SyntaxNode { kind, span });
        id
    }

    /// A leaf located by its text
    pub fn leaf(&mut self, needle: &str) -> Result<NodeId, TreeError> {
        let span = self.token(needle)?;
        Ok(self.push(NodeKind::Other { children: Vec::new() }, span))
    }

    fn span_of(&self, id: NodeId) -> Span {
        self.nodes
            .get(id.index())
            .map(|node| node.span)
            .unwrap_or_default()
    }

    fn hull(&self, ids: &[NodeId]) -> Option<Span> {
        ids.iter().map(|&id| self.span_of(id)).reduce(Span::join)
    }

    pub fn and(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        let span = self.span_of(lhs).join(self.span_of(rhs));
        self.push(NodeKind::And { lhs, rhs }, span)
    }

    pub fn or(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        let span = self.span_of(lhs).join(self.span_of(rhs));
        self.push(NodeKind::Or { lhs, rhs }, span)
    }

    pub fn call(&mut self, call: Call) -> NodeId {
        let mut span = call.selector;
        if let Some(receiver) = call.receiver {
            span = span.join(self.span_of(receiver));
        }
        if let Some(dot) = call.dot {
            span = span.join(dot);
        }
        if let Some(args) = self.hull(&call.arguments) {
            span = span.join(args);
        }
        if let Some(parens) = call.parens {
            span = span.join(parens.open).join(parens.close);
        }
        self.push(NodeKind::Call(call), span)
    }

    /// Binary operator written as a method call, e.g. `a + b`
    pub fn binary(&mut self, lhs: NodeId, operator: Span, rhs: NodeId) -> NodeId {
        self.call(Call {
            receiver: Some(lhs),
            dot: None,
            selector: operator,
            arguments: vec![rhs],
            parens: None,
        })
    }

    /// Prefix operator, e.g. `-a`
    pub fn unary(&mut self, operator: Span, operand: NodeId) -> NodeId {
        self.call(Call {
            receiver: Some(operand),
            dot: None,
            selector: operator,
            arguments: Vec::new(),
            parens: None,
        })
    }

    /// `receiver.selector` without arguments
    pub fn method(&mut self, receiver: NodeId, dot: Span, selector: Span) -> NodeId {
        self.call(Call {
            receiver: Some(receiver),
            dot: Some(dot),
            selector,
            arguments: Vec::new(),
            parens: None,
        })
    }

    pub fn assignment(&mut self, target: Span, value: NodeId) -> NodeId {
        let span = target.join(self.span_of(value));
        self.push(NodeKind::Assignment { target, value }, span)
    }

    fn conditional(
        &self,
        keyword: Span,
        condition: NodeId,
        body: Vec<NodeId>,
        end: Span,
    ) -> (Conditional, Span) {
        let span = keyword.join(end).join(self.span_of(condition));
        (
            Conditional {
                keyword,
                condition,
                body,
            },
            span,
        )
    }

    pub fn if_node(
        &mut self,
        keyword: Span,
        condition: NodeId,
        body: Vec<NodeId>,
        end: Span,
    ) -> NodeId {
        let (cond, span) = self.conditional(keyword, condition, body, end);
        self.push(NodeKind::If(cond), span)
    }

    pub fn while_node(
        &mut self,
        keyword: Span,
        condition: NodeId,
        body: Vec<NodeId>,
        end: Span,
    ) -> NodeId {
        let (cond, span) = self.conditional(keyword, condition, body, end);
        self.push(NodeKind::While(cond), span)
    }

    pub fn until_node(
        &mut self,
        keyword: Span,
        condition: NodeId,
        body: Vec<NodeId>,
        end: Span,
    ) -> NodeId {
        let (cond, span) = self.conditional(keyword, condition, body, end);
        self.push(NodeKind::Until(cond), span)
    }

    pub fn for_node(
        &mut self,
        keyword: Span,
        variable: NodeId,
        collection: NodeId,
        body: Vec<NodeId>,
        end: Span,
    ) -> NodeId {
        let span = keyword.join(end).join(self.span_of(collection));
        self.push(
            NodeKind::For(ForLoop {
                keyword,
                variable,
                collection,
                body,
            }),
            span,
        )
    }

    /// `( ... )`
    pub fn parenthesized(&mut self, open: Span, children: Vec<NodeId>, close: Span) -> NodeId {
        let span = open.join(close);
        self.push(
            NodeKind::Grouped {
                parens: Some(Delimiters { open, close }),
                children,
            },
            span,
        )
    }

    /// A sequence of statements with no delimiters
    pub fn sequence(&mut self, children: Vec<NodeId>) -> NodeId {
        let span = self.hull(&children).unwrap_or_default();
        self.push(
            NodeKind::Grouped {
                parens: None,
                children,
            },
            span,
        )
    }

    /// Link parents and freeze the tree
    pub fn finish(self, root: NodeId) -> Result<SyntaxTree, TreeError> {
        let count = self.nodes.len();
        if root.index() >= count {
            return Err(TreeError::UnknownNode(root.index()));
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            let invalid = std::iter::once(node.span)
                .chain(node.kind.tokens())
                .find(|&span| !self.source.contains_span(span));
            if let Some(span) = invalid {
                return Err(TreeError::InvalidSpan {
                    node: idx,
                    begin: span.begin,
                    end: span.end,
                });
            }
        }

        let mut parents: Vec<Option<NodeId>> = vec![None; count];
        for (idx, node) in self.nodes.iter().enumerate() {
            for child in node.kind.children() {
                let slot = parents
                    .get_mut(child.index())
                    .ok_or(TreeError::UnknownNode(child.index()))?;
                if slot.is_some() {
                    return Err(TreeError::MultipleParents(child.index()));
                }
                *slot = Some(NodeId(idx));
            }
        }
        check_acyclic(&parents)?;

        Ok(SyntaxTree::from_parts(self.source, self.nodes, parents, root))
    }
}

/// Every parent chain must end at a parentless node
fn check_acyclic(parents: &[Option<NodeId>]) -> Result<(), TreeError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        OnPath,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; parents.len()];
    let mut path = Vec::new();
    for start in 0..parents.len() {
        let mut current = Some(start);
        while let Some(idx) = current {
            match marks[idx] {
                Mark::Done => break,
                Mark::OnPath => return Err(TreeError::Cycle(idx)),
                Mark::Unvisited => {
                    marks[idx] = Mark::OnPath;
                    path.push(idx);
                    current = parents[idx].map(NodeId::index);
                }
            }
        }
        for idx in path.drain(..) {
            marks[idx] = Mark::Done;
        }
    }
    Ok(())
}

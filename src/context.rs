//! Classification of a node by its enclosing constructs

use crate::tree::{NodeId, NodeKind, SyntaxTree};

/// Nearest `if`/`while`/`until` whose condition contains `node`, or `for`
/// whose collection contains it
pub fn keyword_header(tree: &SyntaxTree, node: NodeId) -> Option<NodeId> {
    let span = tree.span(node);
    tree.ancestors(node).find(|&ancestor| {
        let header = match tree.kind(ancestor) {
            NodeKind::If(cond) | NodeKind::While(cond) | NodeKind::Until(cond) => cond.condition,
            NodeKind::For(for_loop) => for_loop.collection,
            NodeKind::And { .. }
            | NodeKind::Or { .. }
            | NodeKind::Call(_)
            | NodeKind::Assignment { .. }
            | NodeKind::Grouped { .. }
            | NodeKind::Other { .. } => return false,
        };
        span.within(&tree.span(header))
    })
}

pub fn in_assignment(tree: &SyntaxTree, node: NodeId) -> bool {
    tree.ancestors(node)
        .any(|ancestor| matches!(tree.kind(ancestor), NodeKind::Assignment { .. }))
}

/// Inside explicit parentheses, either a grouping or a call's argument list
///
/// Operands inside argument lists are governed by argument alignment and
/// are not reported here.
pub fn is_exempt(tree: &SyntaxTree, node: NodeId) -> bool {
    let span = tree.span(node);
    tree.ancestors(node).any(|ancestor| match tree.kind(ancestor) {
        NodeKind::Grouped { parens, .. } => parens.is_some(),
        NodeKind::Call(call) => call
            .parens
            .is_some_and(|p| span.begin > p.open.begin && span.end < p.close.end),
        NodeKind::And { .. }
        | NodeKind::Or { .. }
        | NodeKind::Assignment { .. }
        | NodeKind::If(_)
        | NodeKind::While(_)
        | NodeKind::Until(_)
        | NodeKind::For(_)
        | NodeKind::Other { .. } => false,
    })
}

//! Left and right operands of the nodes the rule inspects

use crate::source::Span;
use crate::tree::{Call, NodeId, NodeKind, SyntaxTree};

/// Method names that are operators rather than identifiers
pub const OPERATOR_METHODS: &[&str] = &[
    "|", "^", "&", "<=>", "==", "===", "=~", ">", ">=", "<", "<=", "<<", ">>", "+", "-", "*",
    "/", "%", "**", "~", "+@", "-@", "!@", "~@", "[]", "[]=", "!", "!=", "!~", "`",
];

/// An operation node with its two operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub node: NodeId,
    pub lhs: Span,
    pub rhs: Span,
}

impl Operation {
    /// Operands of `node` if it is an `and`/`or` or a call with a receiver
    pub fn of(tree: &SyntaxTree, node: NodeId) -> Option<Self> {
        let (lhs, rhs) = match tree.kind(node) {
            NodeKind::And { lhs, rhs } | NodeKind::Or { lhs, rhs } => {
                (tree.span(*lhs), tree.span(*rhs))
            }
            NodeKind::Call(call) => {
                let receiver = call.receiver?;
                (tree.span(receiver), right_hand_side(tree, call))
            }
            NodeKind::Assignment { .. }
            | NodeKind::If(_)
            | NodeKind::While(_)
            | NodeKind::Until(_)
            | NodeKind::For(_)
            | NodeKind::Grouped { .. }
            | NodeKind::Other { .. } => return None,
        };
        Some(Self { node, lhs, rhs })
    }
}

fn is_operator(tree: &SyntaxTree, selector: Span) -> bool {
    tree.source()
        .slice(selector)
        .is_some_and(|name| OPERATOR_METHODS.contains(&name))
}

/// The part of a call that acts as its second operand
pub fn right_hand_side(tree: &SyntaxTree, call: &Call) -> Span {
    if let Some(&first) = call.arguments.first() {
        if is_operator(tree, call.selector) {
            return tree.span(first);
        }
    }

    let source = tree.source();
    match call.dot {
        Some(dot) if source.line_of(dot.begin) == source.line_of(call.selector.begin) => {
            dot.join(call.selector)
        }
        _ => call.selector,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TreeBuilder;

    #[test]
    fn test_logical_operands() {
        let mut b = TreeBuilder::new("a and\n  b");
        let a = b.leaf("a").unwrap();
        let rhs = b.leaf("b").unwrap();
        let node = b.and(a, rhs);
        let tree = b.finish(node).unwrap();

        let op = Operation::of(&tree, node).unwrap();
        assert_eq!(op.lhs, tree.span(a));
        assert_eq!(op.rhs, tree.span(rhs));
        assert!(Operation::of(&tree, a).is_none());
    }

    #[test]
    fn test_operator_call_uses_first_argument() {
        let mut b = TreeBuilder::new("x +\n  y");
        let x = b.leaf("x").unwrap();
        let plus = b.token("+").unwrap();
        let y = b.leaf("y").unwrap();
        let node = b.binary(x, plus, y);
        let tree = b.finish(node).unwrap();

        let op = Operation::of(&tree, node).unwrap();
        assert_eq!(op.rhs, tree.span(y));
    }

    #[test]
    fn test_unary_operator_uses_selector() {
        let mut b = TreeBuilder::new("-a");
        let minus = b.token("-").unwrap();
        let a = b.leaf("a").unwrap();
        let node = b.unary(minus, a);
        let tree = b.finish(node).unwrap();

        let op = Operation::of(&tree, node).unwrap();
        assert_eq!(op.rhs, minus);
    }

    #[test]
    fn test_dot_on_selector_line_joins() {
        let mut b = TreeBuilder::new("foo\n  .bar");
        let foo = b.leaf("foo").unwrap();
        let dot = b.token(".").unwrap();
        let bar = b.token("bar").unwrap();
        let node = b.method(foo, dot, bar);
        let tree = b.finish(node).unwrap();

        let op = Operation::of(&tree, node).unwrap();
        assert_eq!(op.rhs, Span::new(dot.begin, bar.end));
    }

    #[test]
    fn test_trailing_dot_uses_selector() {
        let mut b = TreeBuilder::new("foo.\n  bar");
        let foo = b.leaf("foo").unwrap();
        let dot = b.token(".").unwrap();
        let bar = b.token("bar").unwrap();
        let node = b.method(foo, dot, bar);
        let tree = b.finish(node).unwrap();

        let op = Operation::of(&tree, node).unwrap();
        assert_eq!(op.rhs, bar);
    }

    #[test]
    fn test_named_method_with_arguments_uses_selector() {
        let mut b = TreeBuilder::new("foo.bar baz");
        let foo = b.leaf("foo").unwrap();
        let dot = b.token(".").unwrap();
        let bar = b.token("bar").unwrap();
        let baz = b.leaf("baz").unwrap();
        let node = b.call(Call {
            receiver: Some(foo),
            dot: Some(dot),
            selector: bar,
            arguments: vec![baz],
            parens: None,
        });
        let tree = b.finish(node).unwrap();

        let op = Operation::of(&tree, node).unwrap();
        assert_eq!(op.rhs, Span::new(dot.begin, bar.end));
    }

    #[test]
    fn test_call_without_receiver_is_not_an_operation() {
        let mut b = TreeBuilder::new("puts x");
        let puts = b.token("puts").unwrap();
        let x = b.leaf("x").unwrap();
        let node = b.call(Call {
            receiver: None,
            dot: None,
            selector: puts,
            arguments: vec![x],
            parens: None,
        });
        let tree = b.finish(node).unwrap();

        assert!(Operation::of(&tree, node).is_none());
    }
}

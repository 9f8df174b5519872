//! Indentation check for multi-line operations
//!
//! For an operation whose right operand starts a new line, the expected
//! column is either the left operand's column (aligned) or the left
//! operand's line indentation plus the configured width (indented). A
//! mismatch is reported with the column delta that fixes it, and the check
//! is repeated under the other style to tell the caller whether the code
//! would have passed there.

use crate::context;
use crate::operation::Operation;
use crate::source::Span;
use crate::style::StylePolicy;
use crate::tree::{NodeId, SyntaxTree};
use serde::{Deserialize, Serialize};

/// Rule identifier used in diagnostics and configuration
pub const RULE_ID: &str = "multiline-operation-indentation";

pub const RULE_DESCRIPTION: &str =
    "Checks the indentation of the right-hand operand in operations spanning multiple lines";

/// A detected indentation violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offense {
    /// From the start of the right operand to the end of the operation
    pub range: Span,
    /// Columns to add (positive) or remove (negative) on every line of `range`
    pub column_delta: isize,
    pub message: String,
}

/// An offense plus the result of checking it under the other style
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub offense: Offense,
    /// The code would be accepted under the alternative style
    pub opposite_style_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The right operand does not start a line, shares the left operand's
    /// line, or sits inside parentheses
    NotApplicable,
    /// Indented as the policy expects
    Conforming,
    Offense(Finding),
}

impl Verdict {
    pub fn is_offense(&self) -> bool {
        matches!(self, Verdict::Offense(_))
    }

    pub fn finding(&self) -> Option<&Finding> {
        match self {
            Verdict::Offense(finding) => Some(finding),
            Verdict::NotApplicable | Verdict::Conforming => None,
        }
    }

    pub fn into_finding(self) -> Option<Finding> {
        match self {
            Verdict::Offense(finding) => Some(finding),
            Verdict::NotApplicable | Verdict::Conforming => None,
        }
    }
}

/// Check one operation under `policy`, then under its alternative if it fails
pub fn evaluate(tree: &SyntaxTree, operation: &Operation, policy: &StylePolicy) -> Verdict {
    match offending(tree, operation, policy) {
        Outcome::NotApplicable => Verdict::NotApplicable,
        Outcome::Conforming => Verdict::Conforming,
        Outcome::Offense(offense) => {
            let alternative = offending(tree, operation, &policy.alternative());
            Verdict::Offense(Finding {
                offense,
                opposite_style_valid: !matches!(alternative, Outcome::Offense(_)),
            })
        }
    }
}

/// Convenience for callers holding a node rather than an [`Operation`]
pub fn evaluate_node(tree: &SyntaxTree, node: NodeId, policy: &StylePolicy) -> Verdict {
    match Operation::of(tree, node) {
        Some(operation) => evaluate(tree, &operation, policy),
        None => Verdict::NotApplicable,
    }
}

enum Outcome {
    NotApplicable,
    Conforming,
    Offense(Offense),
}

fn offending(tree: &SyntaxTree, operation: &Operation, policy: &StylePolicy) -> Outcome {
    let lhs = tree.position(operation.lhs);
    let rhs = tree.position(operation.rhs);

    if !rhs.begins_its_line() {
        return Outcome::NotApplicable;
    }
    // unary operators put their operand after the selector on one line
    if lhs.line == rhs.line {
        return Outcome::NotApplicable;
    }
    if context::is_exempt(tree, operation.node) {
        return Outcome::NotApplicable;
    }

    let aligned = policy.should_align(tree, operation.node);
    let expected = if aligned {
        lhs.column
    } else {
        lhs.indentation()
            .saturating_add(policy.correct_indentation(tree, operation.node))
    };

    let delta = column_delta(expected, rhs.column);
    if delta == 0 {
        return Outcome::Conforming;
    }

    let what = describe(tree, operation.node);
    let message = if aligned {
        format!("Align the operands of {} spanning multiple lines.", what)
    } else {
        let used = column_delta(rhs.column, lhs.indentation());
        format!(
            "Use {} (not {}) spaces for indenting {} spanning multiple lines.",
            policy.correct_indentation(tree, operation.node),
            used,
            what
        )
    };

    let end = tree.span(operation.node).end.max(operation.rhs.end);
    Outcome::Offense(Offense {
        range: Span::new(operation.rhs.begin, end),
        column_delta: delta,
        message,
    })
}

/// Signed distance from column `from` to column `to`, saturating
fn column_delta(to: usize, from: usize) -> isize {
    if to >= from {
        isize::try_from(to - from).unwrap_or(isize::MAX)
    } else {
        isize::try_from(from - to).map_or(isize::MIN, |d| -d)
    }
}

/// What kind of construct the operation belongs to, for messages
pub fn describe(tree: &SyntaxTree, node: NodeId) -> String {
    let keyword =
        context::keyword_header(tree, node).and_then(|header| tree.kind(header).keyword());
    if let Some(keyword) = keyword {
        let kind = if keyword == "for" { "collection" } else { "condition" };
        let article = if keyword.starts_with(['i', 'u']) { "an" } else { "a" };
        return format!("a {} in {} `{}` statement", kind, article, keyword);
    }

    if context::in_assignment(tree, node) {
        "an expression in an assignment".to_string()
    } else {
        "an expression".to_string()
    }
}

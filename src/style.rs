//! Indentation styles and their resolution per node

use crate::context;
use crate::tree::{NodeId, SyntaxTree};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default indentation width when none is configured
pub const DEFAULT_INDENTATION_WIDTH: usize = 2;

/// Largest width a configuration may ask for
pub const MAX_INDENTATION_WIDTH: usize = 32;

/// How continuation lines are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Continuation lines start at the left operand's column
    Aligned,
    /// Continuation lines are indented from the left operand's line
    #[default]
    Indented,
}

impl Style {
    pub fn alternative(self) -> Self {
        match self {
            Style::Aligned => Style::Indented,
            Style::Indented => Style::Aligned,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::Aligned => write!(f, "aligned"),
            Style::Indented => write!(f, "indented"),
        }
    }
}

impl std::str::FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aligned" => Ok(Style::Aligned),
            "indented" => Ok(Style::Indented),
            _ => Err(format!("Unknown style: {}", s)),
        }
    }
}

/// A resolved style together with its base indentation width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePolicy {
    pub style: Style,
    pub width: usize,
}

impl Default for StylePolicy {
    fn default() -> Self {
        Self::new(Style::default(), DEFAULT_INDENTATION_WIDTH)
    }
}

impl StylePolicy {
    pub fn new(style: Style, width: usize) -> Self {
        Self { style, width }
    }

    /// Same width, opposite style
    pub fn alternative(self) -> Self {
        Self {
            style: self.style.alternative(),
            ..self
        }
    }

    /// Alignment only applies to keyword headers and assignments;
    /// plain expressions are always indented.
    pub fn should_align(&self, tree: &SyntaxTree, node: NodeId) -> bool {
        self.style == Style::Aligned
            && (context::keyword_header(tree, node).is_some()
                || context::in_assignment(tree, node))
    }

    /// Width expected for a continuation of `node`, doubled inside
    /// keyword headers so the condition stands apart from the body.
    pub fn correct_indentation(&self, tree: &SyntaxTree, node: NodeId) -> usize {
        if context::keyword_header(tree, node).is_some() {
            self.width.saturating_mul(2)
        } else {
            self.width
        }
    }
}

/// What the inspected code says about the style it is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "style")]
pub enum DetectedStyle {
    /// Nothing conclusive seen yet
    #[default]
    Undetected,
    /// Every observation agrees on one style
    Consistent(Style),
    /// Observations disagree, or some code fits no style
    Conflicting,
}

/// Accumulates style observations across checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleDetector {
    state: DetectedStyle,
}

impl StyleDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detected(&self) -> DetectedStyle {
        self.state
    }

    /// Record code that is acceptable under `style`
    pub fn observe(&mut self, style: Style) {
        self.state = match self.state {
            DetectedStyle::Undetected => DetectedStyle::Consistent(style),
            DetectedStyle::Consistent(seen) if seen == style => DetectedStyle::Consistent(seen),
            DetectedStyle::Consistent(_) | DetectedStyle::Conflicting => DetectedStyle::Conflicting,
        };
    }

    /// Record code that no style accepts
    pub fn observe_unrecognized(&mut self) {
        self.state = DetectedStyle::Conflicting;
    }

    pub fn merge(&mut self, other: StyleDetector) {
        match other.state {
            DetectedStyle::Undetected => {}
            DetectedStyle::Consistent(style) => self.observe(style),
            DetectedStyle::Conflicting => self.observe_unrecognized(),
        }
    }
}

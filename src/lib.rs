//! contind - continuation-line indentation for multi-line operations
//!
//! Checks that the right operand of an `and`/`or`, a binary operator or a
//! method call with a receiver is indented correctly when it starts a new
//! line, and computes the column shift that fixes it.
//!
//! # Architecture
//!
//! ```text
//! Host parser -> TreeBuilder -> SyntaxTree -> Engine -> rule -> Diagnostic -> Fixer
//! ```
//!
//! The rule itself is pure: [`rule::evaluate`] takes a tree, an
//! [`Operation`] and a [`StylePolicy`] and returns a [`Verdict`]. The
//! [`Engine`] drives it over whole trees and the [`Fixer`] applies the
//! resulting column shifts to source text.
//!
//! # Styles
//!
//! ```text
//! # indented (default)       # aligned
//! total = price +            total = price +
//!   tax                              tax
//!
//! if ready &&                if ready &&
//!     valid                     valid
//!   run                        run
//! end                        end
//! ```
//!
//! Plain expressions outside assignments and keyword headers are indented
//! under both styles.

pub mod builder;
pub mod config;
pub mod context;
pub mod diagnostic;
pub mod engine;
pub mod fixer;
pub mod operation;
pub mod rule;
pub mod source;
pub mod style;
pub mod tree;

// Re-export main types
pub use builder::{TreeBuilder, TreeError};
pub use config::{Config, ConfigError};
pub use diagnostic::{Diagnostic, Fix, FixSafety, Location, Severity};
pub use engine::{Engine, InspectionResult};
pub use fixer::{FixError, FixResult, Fixer};
pub use operation::Operation;
pub use rule::{evaluate, Finding, Offense, Verdict, RULE_ID};
pub use source::{Position, SourceFile, Span};
pub use style::{DetectedStyle, Style, StyleDetector, StylePolicy};
pub use tree::{Call, Conditional, Delimiters, ForLoop, NodeId, NodeKind, SyntaxNode, SyntaxTree};

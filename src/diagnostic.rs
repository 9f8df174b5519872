//! Diagnostic types for inspection results

use crate::rule::{Finding, RULE_DESCRIPTION, RULE_ID};
use crate::style::Style;
use crate::tree::SyntaxTree;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Severity level for diagnostics
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,
    /// Warning - potential issue
    #[default]
    Warning,
    /// Error - definite problem
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" | "hint" | "note" | "convention" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            _ => Err(()),
        }
    }
}

/// Whether a fix may be applied without review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixSafety {
    /// Moves the whole block uniformly, applied automatically
    #[default]
    Safe,
    /// Some line in the block cannot move by the full delta
    Unsafe,
    /// Shown to the user but never applied
    Display,
}

impl std::fmt::Display for FixSafety {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixSafety::Safe => write!(f, "safe"),
            FixSafety::Unsafe => write!(f, "unsafe"),
            FixSafety::Display => write!(f, "display"),
        }
    }
}

/// Source code location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Length of the highlighted region
    pub length: usize,
}

impl Location {
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            length: 0,
        }
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }
}

/// A column shift over a block of lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// Description of the fix
    pub description: String,
    /// Spaces to insert (positive) or remove (negative) at each line start
    pub column_delta: isize,
    /// First line to shift (1-based)
    pub first_line: usize,
    /// Last line to shift (1-based, inclusive)
    pub last_line: usize,
    #[serde(default)]
    pub safety: FixSafety,
}

impl Fix {
    pub fn shift(first_line: usize, last_line: usize, column_delta: isize) -> Self {
        let description = if column_delta > 0 {
            format!("Indent by {} more space(s)", column_delta)
        } else {
            format!("Indent by {} fewer space(s)", -column_delta)
        };
        Self {
            description,
            column_delta,
            first_line,
            last_line,
            safety: FixSafety::Safe,
        }
    }

    pub fn with_safety(mut self, safety: FixSafety) -> Self {
        self.safety = safety;
        self
    }

    /// Check if this fix is safe to apply automatically
    pub fn is_safe(&self) -> bool {
        self.safety == FixSafety::Safe
    }

    pub fn lines(&self) -> std::ops::RangeInclusive<usize> {
        self.first_line..=self.last_line
    }
}

/// A lint diagnostic (warning, error, etc.)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule ID that triggered this diagnostic
    pub rule_id: String,
    /// Severity level
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Source location
    pub location: Location,
    /// The source line (for display)
    pub source_line: Option<String>,
    /// Help text (usually rule description)
    pub help: Option<String>,
    /// Suggested fix
    pub fix: Option<Fix>,
    /// Additional notes
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(rule_id: &str, severity: Severity, message: &str, location: Location) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity,
            message: message.to_string(),
            location,
            source_line: None,
            help: None,
            fix: None,
            notes: Vec::new(),
        }
    }

    /// Build the diagnostic for a rule finding
    ///
    /// `alternative` is the style the ambiguity note refers to.
    pub fn from_finding(
        path: &Path,
        tree: &SyntaxTree,
        finding: &Finding,
        severity: Severity,
        alternative: Style,
    ) -> Self {
        let offense = &finding.offense;
        let source = tree.source();
        let position = source.position(offense.range);
        let last_line = source.line_of(offense.range.end);
        let length = source
            .slice(offense.range)
            .and_then(|text| text.lines().next())
            .map(|first| first.chars().count())
            .unwrap_or(0);

        let location = Location::new(path.to_path_buf(), position.line, position.column + 1)
            .with_length(length);

        let mut fix = Fix::shift(position.line, last_line, offense.column_delta);
        if !shifts_uniformly(tree, &fix) {
            fix = fix.with_safety(FixSafety::Unsafe);
        }

        let mut diag = Diagnostic::new(RULE_ID, severity, &offense.message, location)
            .with_source_line(position.line_text)
            .with_help(RULE_DESCRIPTION)
            .with_fix(fix);

        if finding.opposite_style_valid {
            diag = diag.with_note(&format!(
                "This code is accepted by the `{}` style; the formatting is ambiguous.",
                alternative
            ));
        }

        diag
    }

    /// Add source line for display
    pub fn with_source_line(mut self, line: &str) -> Self {
        self.source_line = Some(line.to_string());
        self
    }

    /// Add help text
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Add a suggested fix
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Check if this diagnostic has a fix
    pub fn has_fix(&self) -> bool {
        self.fix.is_some()
    }

    /// Add a note
    pub fn with_note(mut self, note: &str) -> Self {
        self.notes.push(note.to_string());
        self
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Check if this is a warning
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// A leftward shift needs enough leading spaces or tabs on every
/// non-blank line, or the block's inner layout changes.
fn shifts_uniformly(tree: &SyntaxTree, fix: &Fix) -> bool {
    if fix.column_delta >= 0 {
        return true;
    }
    let needed = fix.column_delta.unsigned_abs();
    fix.lines()
        .filter_map(|line| tree.source().line_text(line))
        .filter(|text| !text.trim().is_empty())
        .all(|text| {
            text.chars()
                .take_while(|c| *c == ' ' || *c == '\t')
                .count()
                >= needed
        })
}

//! Applies column-shift fixes to source text
//!
//! Every fix moves a block of lines left or right by the same number of
//! columns. Blank lines are left alone and only leading whitespace is ever
//! removed. When two fixes claim the same line the one starting earlier
//! wins and the other is skipped; running the rule again picks it up.
//!
//! Unsafe fixes are only applied when asked for. Display-only fixes never are.

use crate::diagnostic::{Diagnostic, Fix, FixSafety};
use log::debug;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixError {
    #[error("fix covers lines {first}..={last} but the source has {line_count} line(s)")]
    OutOfBounds {
        first: usize,
        last: usize,
        line_count: usize,
    },
}

/// Result of applying fixes
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FixResult {
    /// Corrected source text
    pub output: String,
    /// Number of fixes applied
    pub fixes_applied: usize,
    /// Number of unsafe fixes applied
    pub unsafe_fixes_applied: usize,
    /// Number of fixes skipped: overlapping an earlier fix, or not allowed
    pub fixes_skipped: usize,
    /// Number of lines whose text changed
    pub lines_changed: usize,
}

impl FixResult {
    pub fn is_unchanged(&self) -> bool {
        self.lines_changed == 0
    }
}

/// Collects fixes and applies them to one source text
#[derive(Debug, Default)]
pub struct Fixer {
    fixes: Vec<Fix>,
    include_unsafe: bool,
}

impl Fixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include unsafe fixes
    pub fn with_unsafe_fixes(mut self, include: bool) -> Self {
        self.include_unsafe = include;
        self
    }

    fn should_apply(&self, fix: &Fix) -> bool {
        match fix.safety {
            FixSafety::Safe => true,
            FixSafety::Unsafe => self.include_unsafe,
            FixSafety::Display => false,
        }
    }

    /// Collect fixes from diagnostics
    pub fn collect_from_diagnostics(&mut self, diagnostics: &[Diagnostic]) {
        self.fixes
            .extend(diagnostics.iter().filter_map(|diag| diag.fix.clone()));
    }

    /// Add a fix manually
    pub fn add_fix(&mut self, fix: Fix) {
        self.fixes.push(fix);
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    /// Apply all collected fixes to `source`
    pub fn apply(&self, source: &str) -> Result<FixResult, FixError> {
        let line_count = source.split('\n').count();
        let mut deltas: Vec<Option<isize>> = vec![None; line_count];
        let mut result = FixResult::default();

        let mut ordered: Vec<&Fix> = self.fixes.iter().collect();
        ordered.sort_by_key(|fix| (fix.first_line, fix.last_line));

        for fix in ordered {
            if fix.first_line == 0 || fix.first_line > fix.last_line || fix.last_line > line_count
            {
                return Err(FixError::OutOfBounds {
                    first: fix.first_line,
                    last: fix.last_line,
                    line_count,
                });
            }

            if !self.should_apply(fix) {
                result.fixes_skipped += 1;
                continue;
            }

            let slots = &mut deltas[fix.first_line - 1..fix.last_line];
            if slots.iter().any(Option::is_some) {
                result.fixes_skipped += 1;
                continue;
            }
            slots.fill(Some(fix.column_delta));
            result.fixes_applied += 1;
            if !fix.is_safe() {
                result.unsafe_fixes_applied += 1;
            }
        }

        let mut output = String::with_capacity(source.len());
        for (line, delta) in source.split_inclusive('\n').zip(deltas.iter()) {
            match delta {
                Some(delta) => {
                    let shifted = shift_line(line, *delta);
                    if shifted != line {
                        result.lines_changed += 1;
                    }
                    output.push_str(&shifted);
                }
                None => output.push_str(line),
            }
        }

        debug!(
            "applied {} fix(es), skipped {}, {} line(s) changed",
            result.fixes_applied, result.fixes_skipped, result.lines_changed
        );
        result.output = output;
        Ok(result)
    }
}

/// Shift one line by `delta` columns, keeping its terminator
pub fn shift_line(line: &str, delta: isize) -> String {
    if line.trim().is_empty() || delta == 0 {
        return line.to_string();
    }

    if delta > 0 {
        let mut shifted = " ".repeat(delta as usize);
        shifted.push_str(line);
        return shifted;
    }

    let removable: usize = line
        .chars()
        .take(delta.unsigned_abs())
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(char::len_utf8)
        .sum();
    line[removable..].to_string()
}

//! Inspection engine
//!
//! Walks every node of a tree, hands `and`/`or` nodes and calls with a
//! receiver to the rule, and collects diagnostics together with what the
//! code says about the style it is written in.

use crate::config::{Config, ConfigError};
use crate::diagnostic::Diagnostic;
use crate::operation::Operation;
use crate::rule::{self, Verdict};
use crate::style::{DetectedStyle, StyleDetector, StylePolicy};
use crate::tree::SyntaxTree;
use log::{debug, trace, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Result of an inspection
#[derive(Debug, Default)]
pub struct InspectionResult {
    /// All diagnostics, in tree order then source order
    pub diagnostics: Vec<Diagnostic>,

    /// Trees processed
    pub trees_processed: usize,

    /// Operations handed to the rule
    pub operations_checked: usize,

    /// Operations indented as configured
    pub conforming: usize,

    /// Offenses the alternative style would accept
    pub ambiguous: usize,

    /// Style observations
    pub detector: StyleDetector,

    /// Processing duration
    pub duration: Duration,
}

impl InspectionResult {
    pub fn offense_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    /// Check if result is clean (no offenses)
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn detected_style(&self) -> DetectedStyle {
        self.detector.detected()
    }

    /// Get exit code (0 = clean, 1 = offenses)
    pub fn exit_code(&self) -> i32 {
        if self.is_clean() {
            0
        } else {
            1
        }
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: InspectionResult) {
        self.diagnostics.extend(other.diagnostics);
        self.trees_processed += other.trees_processed;
        self.operations_checked += other.operations_checked;
        self.conforming += other.conforming;
        self.ambiguous += other.ambiguous;
        self.detector.merge(other.detector);
    }
}

/// Runs the rule over whole trees
pub struct Engine {
    config: Config,
    policy: StylePolicy,
}

impl Engine {
    /// Create a new engine, validating the configured policy
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let policy = config.policy()?;
        debug!("enforcing {} style with width {}", policy.style, policy.width);
        Ok(Self { config, policy })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn policy(&self) -> StylePolicy {
        self.policy
    }

    /// Inspect one tree
    pub fn inspect(&self, path: &Path, tree: &SyntaxTree) -> InspectionResult {
        let start = Instant::now();
        let mut result = InspectionResult {
            trees_processed: 1,
            ..InspectionResult::default()
        };

        if !self.config.rule.is_enabled() {
            return result;
        }

        let alternative = self.policy.style.alternative();
        for node in tree.descendants() {
            let Some(operation) = Operation::of(tree, node) else {
                continue;
            };
            result.operations_checked += 1;

            match rule::evaluate(tree, &operation, &self.policy) {
                Verdict::NotApplicable => {
                    trace!("{}: node {} not applicable", path.display(), node.index());
                }
                Verdict::Conforming => {
                    result.conforming += 1;
                    result.detector.observe(self.policy.style);
                }
                Verdict::Offense(finding) => {
                    if finding.opposite_style_valid {
                        result.ambiguous += 1;
                        result.detector.observe(alternative);
                    } else {
                        result.detector.observe_unrecognized();
                    }
                    result.diagnostics.push(Diagnostic::from_finding(
                        path,
                        tree,
                        &finding,
                        self.config.rule.severity(),
                        alternative,
                    ));
                }
            }
        }

        result.duration = start.elapsed();
        result
    }

    /// Inspect several trees, in parallel when configured
    pub fn inspect_all(&self, trees: &[(PathBuf, SyntaxTree)]) -> InspectionResult {
        let start = Instant::now();

        let results: Vec<InspectionResult> = if self.config.engine.is_parallel() {
            let threads = if self.config.engine.jobs() > 0 {
                self.config.engine.jobs()
            } else {
                num_cpus::get()
            };
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(|| {
                    trees
                        .par_iter()
                        .map(|(path, tree)| self.inspect(path, tree))
                        .collect()
                }),
                Err(e) => {
                    warn!("falling back to sequential inspection: {}", e);
                    self.inspect_sequential(trees)
                }
            }
        } else {
            self.inspect_sequential(trees)
        };

        let mut combined = InspectionResult::default();
        for result in results {
            combined.merge(result);
        }

        debug!(
            "inspected {} tree(s), {} offense(s)",
            combined.trees_processed,
            combined.offense_count()
        );
        combined.duration = start.elapsed();
        combined
    }

    fn inspect_sequential(&self, trees: &[(PathBuf, SyntaxTree)]) -> Vec<InspectionResult> {
        trees
            .iter()
            .map(|(path, tree)| self.inspect(path, tree))
            .collect()
    }
}

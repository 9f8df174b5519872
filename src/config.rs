//! Configuration for the rule and its engine
//!
//! Reads configuration from:
//! - `.contindrc.yaml` / `.contindrc.json` (project-level)
//! - `~/.contindrc.yaml` (user-level)

use crate::diagnostic::Severity;
use crate::style::{Style, StylePolicy, DEFAULT_INDENTATION_WIDTH, MAX_INDENTATION_WIDTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Engine settings
///
/// Unset fields inherit from extended configs, then fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Inspect trees in parallel (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,

    /// Number of parallel jobs (0 = auto-detect)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl EngineConfig {
    pub fn is_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }

    pub fn jobs(&self) -> usize {
        self.jobs.unwrap_or(0)
    }
}

/// Project-wide layout settings shared with other layout rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indentation_width: Option<usize>,
}

impl LayoutConfig {
    pub fn width(&self) -> usize {
        self.indentation_width.unwrap_or(DEFAULT_INDENTATION_WIDTH)
    }
}

/// Settings of the operation indentation rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Enforced style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,

    /// Overrides `layout.indentation_width` for this rule (indented style only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indentation_width: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl RuleConfig {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn style(&self) -> Style {
        self.style.unwrap_or_default()
    }

    pub fn severity(&self) -> Severity {
        self.severity.unwrap_or_default()
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extend from other configuration files or presets
    pub extends: Vec<String>,

    /// Engine settings
    pub engine: EngineConfig,

    /// Layout settings
    pub layout: LayoutConfig,

    /// Rule settings
    pub rule: RuleConfig,
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a preset configuration by name
    pub fn preset(name: &str) -> Option<Self> {
        let style = name.parse::<Style>().ok()?;
        Some(Self {
            rule: RuleConfig {
                style: Some(style),
                ..RuleConfig::default()
            },
            ..Self::default()
        })
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_depth(path, 0)
    }

    /// Load with recursion depth limit (to prevent infinite loops)
    fn load_with_depth(path: &Path, depth: usize) -> Result<Self, ConfigError> {
        const MAX_DEPTH: usize = 10;
        if depth >= MAX_DEPTH {
            return Err(ConfigError::Invalid(
                "Maximum config inheritance depth exceeded".to_string(),
            ));
        }

        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let mut config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };

        if !config.extends.is_empty() {
            let base_dir = path.parent().unwrap_or(Path::new("."));
            let mut base_config = Self::default();

            for extend in &config.extends.clone() {
                let extended = if let Some(preset) = Self::preset(extend) {
                    preset
                } else {
                    let extend_path = if Path::new(extend).is_absolute() {
                        PathBuf::from(extend)
                    } else {
                        base_dir.join(extend)
                    };
                    Self::load_with_depth(&extend_path, depth + 1)?
                };
                base_config.merge(extended);
            }

            base_config.merge(config);
            config = base_config;
        }

        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    ///
    /// Only fields `other` sets explicitly override, so a child config can
    /// restore a default its parent changed.
    pub fn merge(&mut self, other: Self) {
        // Extends are not inherited

        self.engine.parallel = other.engine.parallel.or(self.engine.parallel);
        self.engine.jobs = other.engine.jobs.or(self.engine.jobs);

        self.layout.indentation_width = other
            .layout
            .indentation_width
            .or(self.layout.indentation_width);

        self.rule.enabled = other.rule.enabled.or(self.rule.enabled);
        self.rule.style = other.rule.style.or(self.rule.style);
        self.rule.indentation_width = other.rule.indentation_width.or(self.rule.indentation_width);
        self.rule.severity = other.rule.severity.or(self.rule.severity);
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_names = [
            ".contindrc.yaml",
            ".contindrc.yml",
            ".contindrc.json",
            "contind.yaml",
            "contind.yml",
            "contind.json",
        ];

        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            for name in &config_names {
                let path = home.join(name);
                if path.exists() {
                    return Self::load(&path);
                }
            }
        }

        Ok(Self::default())
    }

    /// Merge command-line overrides into configuration
    pub fn merge_cli(
        &mut self,
        style: Option<Style>,
        indentation_width: Option<usize>,
        jobs: Option<usize>,
    ) {
        if style.is_some() {
            self.rule.style = style;
        }
        if let Some(w) = indentation_width {
            self.rule.indentation_width = Some(w);
        }
        if jobs.is_some() {
            self.engine.jobs = jobs;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_width("layout.indentation_width", self.layout.indentation_width)?;
        check_width("rule.indentation_width", self.rule.indentation_width)?;
        if self.rule.style() == Style::Aligned && self.rule.indentation_width.is_some() {
            return Err(ConfigError::Invalid(
                "rule.indentation_width only applies when rule.style is `indented`".to_string(),
            ));
        }
        Ok(())
    }

    /// The style policy this configuration enforces
    pub fn policy(&self) -> Result<StylePolicy, ConfigError> {
        self.validate()?;
        let width = self
            .rule
            .indentation_width
            .unwrap_or_else(|| self.layout.width());
        Ok(StylePolicy::new(self.rule.style(), width))
    }
}

fn check_width(key: &str, width: Option<usize>) -> Result<(), ConfigError> {
    match width {
        Some(0) => Err(ConfigError::Invalid(format!("{} must be positive", key))),
        Some(w) if w > MAX_INDENTATION_WIDTH => Err(ConfigError::Invalid(format!(
            "{} must be at most {}, got {}",
            key, MAX_INDENTATION_WIDTH, w
        ))),
        _ => Ok(()),
    }
}

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

// Default value functions for serde
fn default_true() -> bool {
    true
}

/// Annotation configuration: which labels run and the ordered rule list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    /// Whether the automatic frequency labels (`has-*`, `is-*`) run
    #[serde(default = "default_true")]
    pub frequency_labels: bool,
    /// Shape rules to apply, in order
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
    /// Include the annotation profile in serialized output
    #[serde(default)]
    pub include_profile: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Shape expression, e.g. `^heading (image paragraph)+$`
    pub expression: String,
    /// Label appended to a section's types when the expression matches
    pub label: String,
    /// Whether this rule is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            frequency_labels: true,
            rules: Vec::new(),
            include_profile: false,
        }
    }
}

impl AnnotatorConfig {
    /// Load config from file path (functional approach)
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AnnotatorConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|_| {
                eprintln!("⚠️  Failed to load config from {}, using defaults", p);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

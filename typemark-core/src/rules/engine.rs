use crate::classifier::NodeClassifier;
use crate::pattern::{compile, parse, Automaton, SyntaxError};
use crate::types::Section;
use regex::Regex;

// Debug configuration for annotation tracing
#[derive(Debug, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub filter_patterns: Vec<String>,
}

impl DebugConfig {
    pub fn new(enabled: bool, filter_patterns: Vec<String>) -> Self {
        Self {
            enabled,
            filter_patterns,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            filter_patterns: Vec::new(),
        }
    }
}

/// Debug utility function to trace sections through annotation stages
pub fn debug_sections(stage: &str, sections: &[Section], debug_config: &DebugConfig) {
    if !debug_config.enabled || debug_config.filter_patterns.is_empty() {
        return;
    }

    let matching_sections: Vec<_> = sections
        .iter()
        .enumerate()
        .filter(|(_, section)| {
            debug_config.filter_patterns.iter().any(|pattern| {
                // Try regex first, fall back to simple string contains
                if let Ok(regex) = Regex::new(pattern) {
                    section.types.iter().any(|label| regex.is_match(label))
                } else {
                    section.types.iter().any(|label| label.contains(pattern))
                }
            })
        })
        .collect();

    if !matching_sections.is_empty() {
        println!(
            "🔍 [{}] {} matching sections:",
            stage,
            matching_sections.len()
        );
        for (index, section) in matching_sections {
            println!(
                "  Section {}: {} nodes, types: \"{}\"",
                index,
                section.nodes.len(),
                section.type_attr()
            );
        }
        println!();
    }
}

/// One registered rule: the source expression, its compiled automaton, and
/// the label appended on match.
#[derive(Debug, Clone)]
pub struct TypeRule {
    pub expression: String,
    pub label: String,
    automaton: Automaton,
}

impl TypeRule {
    /// Parse and compile an expression into a rule. Fails immediately on a
    /// malformed expression.
    pub fn new(expression: &str, label: &str) -> Result<Self, SyntaxError> {
        let automaton = compile(&parse(expression)?);
        Ok(Self {
            expression: expression.to_string(),
            label: label.to_string(),
            automaton,
        })
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }
}

/// Applies shape rules to a batch of sections.
///
/// Rules run in registration order against every section; a matching rule
/// appends its label unless the section already carries it. Rules are
/// independent of each other: registration order only decides label order
/// in `types`, never which rules fire.
pub struct TypeMatcher {
    sections: Vec<Section>,
    rules: Vec<TypeRule>,
    classifier: NodeClassifier,
    debug_config: DebugConfig,
}

impl TypeMatcher {
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            rules: Vec::new(),
            classifier: NodeClassifier::new(),
            debug_config: DebugConfig::disabled(),
        }
    }

    pub fn set_debug_config(&mut self, debug_config: DebugConfig) {
        self.debug_config = debug_config;
    }

    /// Register a rule. The expression is parsed and compiled here, so a
    /// bad expression fails the caller at registration time and startup can
    /// validate every configured rule before any section is touched.
    pub fn add_rule(&mut self, expression: &str, label: &str) -> Result<(), SyntaxError> {
        self.rules.push(TypeRule::new(expression, label)?);
        Ok(())
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Run every rule over every section and return the annotated batch.
    ///
    /// Consumes the matcher: the input sections go in once and the freshly
    /// annotated collection comes out, with nothing left aliased inside
    /// the engine.
    pub fn process(self) -> Vec<Section> {
        let TypeMatcher {
            mut sections,
            rules,
            classifier,
            debug_config,
        } = self;

        for section in &mut sections {
            let tokens = classifier.token_sequence(section);
            for rule in &rules {
                if rule.automaton.matches(&tokens) {
                    section.push_type(&rule.label);
                }
            }
        }

        debug_sections("TypeMatcher", &sections, &debug_config);
        sections
    }
}

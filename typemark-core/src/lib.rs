// Typemark Core Library
//
// Annotates document sections with derived structural-type labels so that
// rendering logic can select behavior by content shape rather than by
// author-declared type. Two mechanisms produce labels: an automatic
// frequency classifier, and a user-supplied pattern language matched
// against each section's content-node type sequence.

pub mod types;
pub mod classifier;
pub mod pattern;
pub mod rules;
pub mod config;
pub mod processor;

// Re-export main types and functions for easy use
pub use types::*;
pub use classifier::{FrequencyClassifier, NodeClassifier};
pub use pattern::{compile, parse, Automaton, Pattern, PatternExpr, Quantifier, SyntaxError};
pub use rules::{debug_sections, DebugConfig, TypeMatcher, TypeRule};
pub use config::{AnnotatorConfig, RuleConfig};
pub use processor::{SectionAnnotator, StepProfiler};

use crate::classifier::{FrequencyClassifier, NodeClassifier};
use crate::config::AnnotatorConfig;
use crate::rules::engine::{debug_sections, DebugConfig, TypeMatcher};
use crate::types::*;
use anyhow::{anyhow, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Simple profiler that collects timings for annotation steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        println!("⏱️  {}: {:.0}ms", step_name, elapsed.as_millis());

        result
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        println!("\n📊 Performance Summary:");
        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();

        for (step, duration) in &self.timings {
            let percentage = (duration.as_secs_f64() / total.as_secs_f64()) * 100.0;
            println!(
                "   {:.<35} {:.0}ms ({:.1}%)",
                step,
                duration.as_millis(),
                percentage
            );
        }
        println!("   {:.<35} {:.0}ms", "Total", total.as_millis());
    }
}

/// Orchestrates a full annotation run: the frequency classifier first, then
/// the configured shape rules.
///
/// Immutable input in, freshly annotated sections out; the annotator never
/// keeps a reference to caller-owned data between runs.
pub struct SectionAnnotator {
    frequency: FrequencyClassifier,
    debug_config: DebugConfig,
}

impl Default for SectionAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionAnnotator {
    pub fn new() -> Self {
        Self {
            frequency: FrequencyClassifier::new(),
            debug_config: DebugConfig::disabled(),
        }
    }

    pub fn set_debug_config(&mut self, debug_config: DebugConfig) {
        self.debug_config = debug_config;
    }

    /// Annotate sections using the default config (frequency labels only).
    pub fn annotate(&self, sections: Vec<Section>) -> Result<Vec<Section>> {
        self.annotate_with_config(sections, &AnnotatorConfig::default())
    }

    /// Annotate sections with a specific config.
    pub fn annotate_with_config(
        &self,
        sections: Vec<Section>,
        config: &AnnotatorConfig,
    ) -> Result<Vec<Section>> {
        self.annotate_with_profiling(sections, config, false)
    }

    /// Annotate with optional per-step profiling output.
    pub fn annotate_with_profiling(
        &self,
        sections: Vec<Section>,
        config: &AnnotatorConfig,
        enable_profiling: bool,
    ) -> Result<Vec<Section>> {
        let mut profiler = StepProfiler::new(enable_profiling);

        let sections = profiler.time_step("1. Frequency Labels", || {
            self.apply_frequency_labels(sections, config)
        });

        let matcher = profiler.time_step("2. Rule Compilation", || {
            self.build_matcher(sections, config)
        })?;

        let annotated = profiler.time_step("3. Rule Matching", || matcher.process());

        profiler.print_summary();
        Ok(annotated)
    }

    fn apply_frequency_labels(
        &self,
        mut sections: Vec<Section>,
        config: &AnnotatorConfig,
    ) -> Vec<Section> {
        if !config.frequency_labels {
            return sections;
        }

        for section in &mut sections {
            for label in self.frequency.classify(section) {
                section.push_type(&label);
            }
        }

        debug_sections("FrequencyClassifier", &sections, &self.debug_config);
        sections
    }

    /// Build the rule matcher from config. Every enabled rule is parsed and
    /// compiled here, so an invalid expression aborts the run before any
    /// section is annotated by it.
    fn build_matcher(
        &self,
        sections: Vec<Section>,
        config: &AnnotatorConfig,
    ) -> Result<TypeMatcher> {
        let mut matcher = TypeMatcher::new(sections);
        matcher.set_debug_config(self.debug_config.clone());

        for rule in &config.rules {
            if !rule.enabled {
                println!(
                    "   ⏭️  Skipping disabled rule: {} -> {}",
                    rule.expression, rule.label
                );
                continue;
            }
            matcher
                .add_rule(&rule.expression, &rule.label)
                .map_err(|e| anyhow!("invalid rule expression {:?}: {}", rule.expression, e))?;
        }

        Ok(matcher)
    }
}

impl AnnotationProfile {
    /// Compute the label/token distribution summary for an annotated batch.
    /// Deterministic apart from the `created_at` stamp.
    pub fn compute(sections: &[Section]) -> Self {
        let classifier = NodeClassifier::new();
        let mut label_counts: HashMap<String, usize> = HashMap::new();
        let mut token_counts: HashMap<String, usize> = HashMap::new();
        let mut total_nodes = 0;

        for section in sections {
            total_nodes += section.nodes.len();
            for label in &section.types {
                *label_counts.entry(label.clone()).or_insert(0) += 1;
            }
            for token in classifier.token_sequence(section) {
                *token_counts.entry(token.as_str().to_string()).or_insert(0) += 1;
            }
        }

        Self {
            created_at: Utc::now(),
            total_sections: sections.len(),
            total_nodes,
            label_counts,
            token_counts,
        }
    }
}

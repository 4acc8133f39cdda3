use crate::types::*;

/// Maps content nodes to type tokens.
///
/// Total function: any node yields a usable token. Kinds that would not be
/// expressible as a pattern literal (empty, leading digit, stray symbols)
/// degrade to the stable `unknown` token instead of failing.
pub struct NodeClassifier;

impl Default for NodeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Derive the type token for a single node.
    pub fn classify(&self, node: &ContentNode) -> Token {
        let kind = node.kind.trim();
        if Self::is_classifiable(kind) {
            Token::new(kind)
        } else {
            Token::new(UNKNOWN_TOKEN)
        }
    }

    /// One token per child node, in document order. This is the sequence
    /// the pattern matcher runs against.
    pub fn token_sequence(&self, section: &Section) -> Vec<Token> {
        section.nodes.iter().map(|node| self.classify(node)).collect()
    }

    // A usable kind has the same shape as a pattern literal:
    // letter first, then letters, digits, '_' or '-'.
    fn is_classifiable(kind: &str) -> bool {
        let mut chars = kind.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }
}

/// Frequency-based shape classifier.
///
/// Runs on every section unconditionally, before any user rules, and emits
/// labels derived from the section's token frequency distribution:
///
/// - `has-<t>` for every distinct token, in first-occurrence order
/// - `is-<t>-only` when exactly one distinct token is present
/// - cumulative combination labels for the top three tokens by frequency,
///   shortest first: `is-<t1>`, `is-<t1>-<t2>`, `is-<t1>-<t2>-<t3>`
///
/// Frequency ties rank by first occurrence in the section, so the output is
/// deterministic for any input.
pub struct FrequencyClassifier {
    nodes: NodeClassifier,
}

impl Default for FrequencyClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyClassifier {
    pub fn new() -> Self {
        Self {
            nodes: NodeClassifier::new(),
        }
    }

    /// Compute the frequency labels for one section. Pure function of the
    /// section's node kinds; an empty section yields no labels.
    pub fn classify(&self, section: &Section) -> Vec<String> {
        let tokens = self.nodes.token_sequence(section);

        // Count in first-occurrence order. Sections are small, so a linear
        // scan beats a map here and keeps the order for free.
        let mut counts: Vec<(Token, usize)> = Vec::new();
        for token in &tokens {
            if let Some(entry) = counts.iter_mut().find(|entry| &entry.0 == token) {
                entry.1 += 1;
            } else {
                counts.push((token.clone(), 1));
            }
        }

        let mut labels = Vec::new();
        for (token, _) in &counts {
            labels.push(format!("has-{token}"));
        }

        if counts.len() == 1 {
            labels.push(format!("is-{}-only", counts[0].0));
        }

        // Descending frequency; the stable sort keeps first-occurrence
        // order for equal counts.
        let mut ranked = counts;
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let mut combo = String::from("is");
        for (token, _) in ranked.iter().take(3) {
            combo.push('-');
            combo.push_str(token.as_str());
            labels.push(combo.clone());
        }

        labels
    }
}

use super::automaton::{Automaton, StateId};
use super::parser::{Pattern, PatternExpr, Quantifier};

/// Compile a parsed pattern into its automaton.
///
/// Thompson construction: every AST node becomes a small fragment with one
/// entry and one exit state, and fragments are wired together with epsilon
/// edges. State count stays linear in expression length, so compilation
/// cost is bounded by the expression itself.
pub fn compile(pattern: &Pattern) -> Automaton {
    let mut builder = Builder::new();
    let fragment = builder.build(&pattern.root);
    Automaton {
        start: fragment.entry,
        accept: fragment.exit,
        epsilon: builder.epsilon,
        labeled: builder.labeled,
        anchored_start: pattern.anchored_start,
        anchored_end: pattern.anchored_end,
    }
}

/// One sub-automaton under construction: enter at `entry`, accept at `exit`.
struct Fragment {
    entry: StateId,
    exit: StateId,
}

struct Builder {
    epsilon: Vec<Vec<StateId>>,
    labeled: Vec<Vec<(String, StateId)>>,
}

impl Builder {
    fn new() -> Self {
        Self {
            epsilon: Vec::new(),
            labeled: Vec::new(),
        }
    }

    fn add_state(&mut self) -> StateId {
        self.epsilon.push(Vec::new());
        self.labeled.push(Vec::new());
        self.epsilon.len() - 1
    }

    fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.epsilon[from].push(to);
    }

    fn add_labeled(&mut self, from: StateId, token: &str, to: StateId) {
        self.labeled[from].push((token.to_string(), to));
    }

    fn build(&mut self, expr: &PatternExpr) -> Fragment {
        match expr {
            PatternExpr::Literal(name) => {
                let entry = self.add_state();
                let exit = self.add_state();
                self.add_labeled(entry, name, exit);
                Fragment { entry, exit }
            }
            PatternExpr::Sequence(terms) => {
                let entry = self.add_state();
                let mut exit = entry;
                for term in terms {
                    let fragment = self.build(term);
                    self.add_epsilon(exit, fragment.entry);
                    exit = fragment.exit;
                }
                Fragment { entry, exit }
            }
            PatternExpr::Alternation(alternatives) => {
                let entry = self.add_state();
                let exit = self.add_state();
                for alternative in alternatives {
                    let fragment = self.build(alternative);
                    self.add_epsilon(entry, fragment.entry);
                    self.add_epsilon(fragment.exit, exit);
                }
                Fragment { entry, exit }
            }
            PatternExpr::Quantified(inner, quantifier) => {
                let entry = self.add_state();
                let exit = self.add_state();
                let fragment = self.build(inner);
                self.add_epsilon(entry, fragment.entry);
                self.add_epsilon(fragment.exit, exit);
                match quantifier {
                    // `?`: epsilon bypass around the fragment
                    Quantifier::Optional => {
                        self.add_epsilon(entry, exit);
                    }
                    // `*`: bypass plus a back-edge for repetition
                    Quantifier::Star => {
                        self.add_epsilon(entry, exit);
                        self.add_epsilon(fragment.exit, fragment.entry);
                    }
                    // `+`: back-edge only, the first pass is mandatory
                    Quantifier::Plus => {
                        self.add_epsilon(fragment.exit, fragment.entry);
                    }
                }
                Fragment { entry, exit }
            }
        }
    }
}

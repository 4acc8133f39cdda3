use crate::types::Token;

pub(crate) type StateId = usize;

/// A compiled pattern: a nondeterministic finite automaton over the token
/// alphabet, plus the two anchor flags.
///
/// Immutable once built. Matching allocates only per-call state, so one
/// automaton can serve any number of concurrent matches.
#[derive(Debug, Clone)]
pub struct Automaton {
    pub(crate) start: StateId,
    pub(crate) accept: StateId,
    /// Per-state epsilon edges.
    pub(crate) epsilon: Vec<Vec<StateId>>,
    /// Per-state token-labeled edges.
    pub(crate) labeled: Vec<Vec<(String, StateId)>>,
    /// `^`: the match may only begin at the first token.
    pub anchored_start: bool,
    /// `$`: the match must consume through the last token.
    pub anchored_end: bool,
}

impl Automaton {
    pub fn state_count(&self) -> usize {
        self.epsilon.len()
    }

    /// True when the pattern matches the token sequence under its anchor
    /// semantics.
    ///
    /// Unanchored patterns match any contiguous sub-sequence, so every
    /// offset `0..=len` is a candidate starting point; `^` pins the start
    /// to offset 0 and `$` requires the run to reach an accept state
    /// exactly at the end of the sequence.
    ///
    /// Pure predicate: never panics, never mutates, always terminates.
    pub fn matches(&self, tokens: &[Token]) -> bool {
        let last_start = if self.anchored_start { 0 } else { tokens.len() };
        (0..=last_start).any(|offset| self.match_at(tokens, offset))
    }

    /// Simulate every nondeterministic branch at once from one starting
    /// offset: keep the set of live states and advance it one token at a
    /// time. O(states × remaining length): redundant alternatives like
    /// `(a|a)*` collapse into the same state set instead of forking runs.
    fn match_at(&self, tokens: &[Token], offset: usize) -> bool {
        let mut live = vec![false; self.state_count()];
        self.insert_with_closure(&mut live, self.start);
        if self.is_match(&live, offset, tokens.len()) {
            return true;
        }

        for (index, token) in tokens.iter().enumerate().skip(offset) {
            let mut next = vec![false; self.state_count()];
            for state in 0..self.state_count() {
                if !live[state] {
                    continue;
                }
                for (label, target) in &self.labeled[state] {
                    if label == token.as_str() {
                        self.insert_with_closure(&mut next, *target);
                    }
                }
            }

            if !next.iter().any(|on| *on) {
                // No branch survived this token; this offset is done.
                return false;
            }
            if self.is_match(&next, index + 1, tokens.len()) {
                return true;
            }
            live = next;
        }

        false
    }

    fn is_match(&self, live: &[bool], consumed_through: usize, len: usize) -> bool {
        live[self.accept] && (!self.anchored_end || consumed_through == len)
    }

    /// Add a state and everything reachable from it over epsilon edges.
    /// Iterative with a seen-check; star-of-star patterns contain epsilon
    /// cycles.
    fn insert_with_closure(&self, live: &mut [bool], state: StateId) {
        let mut stack = vec![state];
        while let Some(state) = stack.pop() {
            if live[state] {
                continue;
            }
            live[state] = true;
            stack.extend(&self.epsilon[state]);
        }
    }
}

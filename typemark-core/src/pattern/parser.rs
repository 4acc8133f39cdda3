use thiserror::Error;

/// Error raised for a malformed pattern expression.
///
/// Carries the character offset into the expression and a human-readable
/// expectation. Raised eagerly at rule registration, never at match time,
/// so a caller can validate every configured rule during startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at offset {position}: expected {expected}")]
pub struct SyntaxError {
    pub position: usize,
    pub expected: String,
}

impl SyntaxError {
    fn new(position: usize, expected: impl Into<String>) -> Self {
        Self {
            position,
            expected: expected.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// `?`: zero or one
    Optional,
    /// `*`: zero or more
    Star,
    /// `+`: one or more
    Plus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternExpr {
    /// Terms matched one after another.
    Sequence(Vec<PatternExpr>),
    /// Parenthesized alternatives: any one of them matches.
    Alternation(Vec<PatternExpr>),
    /// A single content-node type name.
    Literal(String),
    /// An atom with a quantifier bound to it.
    Quantified(Box<PatternExpr>, Quantifier),
}

/// Parsed form of a pattern expression, before compilation.
///
/// Anchors live here as two flags on the whole pattern rather than inside
/// the expression tree: they change how a match run starts and ends, not
/// what the pattern consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub anchored_start: bool,
    pub anchored_end: bool,
    pub root: PatternExpr,
}

/// Parse a pattern expression.
///
/// Grammar (whitespace separates sequence terms, literals are
/// case-sensitive):
///
/// ```text
/// Pattern     := '^'? Sequence '$'?
/// Sequence    := Term (WS Term)*
/// Term        := Atom Quantifier?
/// Atom        := Literal | '(' Alternation ')'
/// Alternation := Sequence ('|' Sequence)*
/// Quantifier  := '?' | '*' | '+'
/// Literal     := [A-Za-z][A-Za-z0-9_-]*
/// ```
///
/// `^` is legal only at the very start, `$` only at the very end; both are
/// optional and independent. A quantifier binds to the immediately
/// preceding atom only.
pub fn parse(expression: &str) -> Result<Pattern, SyntaxError> {
    let lexemes = lex(expression)?;
    Parser {
        lexemes,
        cursor: 0,
        end: expression.len(),
    }
    .parse()
}

// ===== LEXER =====

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lexeme {
    Ident(String),
    Caret,
    Dollar,
    LParen,
    RParen,
    Pipe,
    Question,
    Star,
    Plus,
}

#[derive(Debug, Clone)]
struct Spanned {
    lexeme: Lexeme,
    position: usize,
}

fn lex(expression: &str) -> Result<Vec<Spanned>, SyntaxError> {
    let mut out = Vec::new();
    let mut chars = expression.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        let lexeme = match c {
            c if c.is_whitespace() => continue,
            '^' => Lexeme::Caret,
            '$' => Lexeme::Dollar,
            '(' => Lexeme::LParen,
            ')' => Lexeme::RParen,
            '|' => Lexeme::Pipe,
            '?' => Lexeme::Question,
            '*' => Lexeme::Star,
            '+' => Lexeme::Plus,
            c if c.is_ascii_alphabetic() => {
                let mut name = String::from(c);
                while let Some(&(_, next)) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' || next == '-' {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                Lexeme::Ident(name)
            }
            _ => return Err(SyntaxError::new(position, "a type name, '(', '^' or '$'")),
        };
        out.push(Spanned { lexeme, position });
    }

    Ok(out)
}

// ===== PARSER =====

struct Parser {
    lexemes: Vec<Spanned>,
    cursor: usize,
    /// One past the last character, for errors at end of input.
    end: usize,
}

impl Parser {
    fn parse(mut self) -> Result<Pattern, SyntaxError> {
        let anchored_start = self.eat(&Lexeme::Caret);
        let root = self.parse_sequence()?;
        let anchored_end = self.eat(&Lexeme::Dollar);

        if let Some(trailing) = self.peek() {
            return Err(SyntaxError::new(trailing.position, "end of expression"));
        }

        Ok(Pattern {
            anchored_start,
            anchored_end,
            root,
        })
    }

    fn parse_sequence(&mut self) -> Result<PatternExpr, SyntaxError> {
        let mut terms = Vec::new();
        while let Some(next) = self.peek() {
            match next.lexeme {
                Lexeme::RParen | Lexeme::Pipe | Lexeme::Dollar => break,
                _ => terms.push(self.parse_term()?),
            }
        }

        // Covers the empty expression, `()`, and the empty alternative in
        // `(a||b)`: there is always at least one term per sequence.
        if terms.is_empty() {
            return Err(SyntaxError::new(self.next_position(), "a type name or '('"));
        }

        Ok(PatternExpr::Sequence(terms))
    }

    fn parse_term(&mut self) -> Result<PatternExpr, SyntaxError> {
        let atom = self.parse_atom()?;
        match self.peek_quantifier() {
            Some(quantifier) => {
                self.cursor += 1;
                Ok(PatternExpr::Quantified(Box::new(atom), quantifier))
            }
            None => Ok(atom),
        }
    }

    fn parse_atom(&mut self) -> Result<PatternExpr, SyntaxError> {
        let next = match self.peek() {
            Some(next) => next.clone(),
            None => return Err(SyntaxError::new(self.end, "a type name or '('")),
        };

        match next.lexeme {
            Lexeme::Ident(name) => {
                self.cursor += 1;
                Ok(PatternExpr::Literal(name))
            }
            Lexeme::LParen => {
                self.cursor += 1;
                let group = self.parse_alternation()?;
                if !self.eat(&Lexeme::RParen) {
                    return Err(SyntaxError::new(self.next_position(), "')'"));
                }
                Ok(group)
            }
            // Anything else here is a dangling quantifier (`*a`, `a++`),
            // a misplaced anchor (`a^b`), or a stray ')'.
            _ => Err(SyntaxError::new(next.position, "a type name or '('")),
        }
    }

    fn parse_alternation(&mut self) -> Result<PatternExpr, SyntaxError> {
        let mut alternatives = vec![self.parse_sequence()?];
        while self.eat(&Lexeme::Pipe) {
            alternatives.push(self.parse_sequence()?);
        }

        if alternatives.len() == 1 {
            // A plain group is just its inner sequence.
            Ok(alternatives.remove(0))
        } else {
            Ok(PatternExpr::Alternation(alternatives))
        }
    }

    fn peek(&self) -> Option<&Spanned> {
        self.lexemes.get(self.cursor)
    }

    fn peek_quantifier(&self) -> Option<Quantifier> {
        match self.peek()?.lexeme {
            Lexeme::Question => Some(Quantifier::Optional),
            Lexeme::Star => Some(Quantifier::Star),
            Lexeme::Plus => Some(Quantifier::Plus),
            _ => None,
        }
    }

    fn eat(&mut self, lexeme: &Lexeme) -> bool {
        if self.peek().map(|next| &next.lexeme) == Some(lexeme) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn next_position(&self) -> usize {
        self.peek().map(|next| next.position).unwrap_or(self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(name: &str) -> PatternExpr {
        PatternExpr::Literal(name.to_string())
    }

    #[test]
    fn parses_plain_sequence() {
        let pattern = parse("heading image").unwrap();
        assert!(!pattern.anchored_start);
        assert!(!pattern.anchored_end);
        assert_eq!(
            pattern.root,
            PatternExpr::Sequence(vec![literal("heading"), literal("image")])
        );
    }

    #[test]
    fn parses_anchors_independently() {
        assert!(parse("^heading").unwrap().anchored_start);
        assert!(!parse("^heading").unwrap().anchored_end);
        assert!(parse("heading$").unwrap().anchored_end);
        let both = parse("^heading$").unwrap();
        assert!(both.anchored_start && both.anchored_end);
    }

    #[test]
    fn quantifier_binds_to_preceding_atom() {
        let pattern = parse("heading image+").unwrap();
        assert_eq!(
            pattern.root,
            PatternExpr::Sequence(vec![
                literal("heading"),
                PatternExpr::Quantified(Box::new(literal("image")), Quantifier::Plus),
            ])
        );
    }

    #[test]
    fn parses_grouped_alternation_of_sequences() {
        let pattern = parse("^heading (image paragraph)+$").unwrap();
        let PatternExpr::Sequence(terms) = &pattern.root else {
            panic!("expected top-level sequence");
        };
        assert_eq!(terms.len(), 2);
        assert_eq!(
            terms[1],
            PatternExpr::Quantified(
                Box::new(PatternExpr::Sequence(vec![
                    literal("image"),
                    literal("paragraph"),
                ])),
                Quantifier::Plus,
            )
        );

        let alt = parse("(paragraph|list)").unwrap();
        assert_eq!(
            alt.root,
            PatternExpr::Sequence(vec![PatternExpr::Alternation(vec![
                PatternExpr::Sequence(vec![literal("paragraph")]),
                PatternExpr::Sequence(vec![literal("list")]),
            ])])
        );
    }

    #[test]
    fn literals_allow_digits_underscore_and_dash() {
        let pattern = parse("pull-quote code_block h2").unwrap();
        assert_eq!(
            pattern.root,
            PatternExpr::Sequence(vec![
                literal("pull-quote"),
                literal("code_block"),
                literal("h2"),
            ])
        );
    }

    #[test]
    fn rejects_unbalanced_parentheses() {
        let err = parse("(heading").unwrap_err();
        assert_eq!(err.position, 8);
        assert_eq!(err.expected, "')'");

        let err = parse("heading)").unwrap_err();
        assert_eq!(err.position, 7);
        assert_eq!(err.expected, "end of expression");
    }

    #[test]
    fn rejects_dangling_quantifiers() {
        let err = parse("*heading").unwrap_err();
        assert_eq!(err.position, 0);

        let err = parse("heading++").unwrap_err();
        assert_eq!(err.position, 8);

        let err = parse("heading (+image)").unwrap_err();
        assert_eq!(err.position, 9);
    }

    #[test]
    fn rejects_empty_alternative() {
        let err = parse("(heading||image)").unwrap_err();
        assert_eq!(err.position, 9);
        assert_eq!(err.expected, "a type name or '('");

        assert!(parse("(|heading)").is_err());
        assert!(parse("(heading|)").is_err());
    }

    #[test]
    fn rejects_misplaced_anchors() {
        assert!(parse("^^heading").is_err());
        assert!(parse("heading^").is_err());
        assert!(parse("$heading").is_err());
        assert!(parse("heading$image").is_err());
    }

    #[test]
    fn rejects_empty_and_unknown_input() {
        let err = parse("").unwrap_err();
        assert_eq!(err.position, 0);

        let err = parse("   ").unwrap_err();
        assert_eq!(err.position, 3);

        let err = parse("heading @image").unwrap_err();
        assert_eq!(err.position, 8);
        assert_eq!(err.expected, "a type name, '(', '^' or '$'");
    }

    #[test]
    fn rejects_quantified_anchor() {
        assert!(parse("^?heading").is_err());
        assert!(parse("heading $?").is_err());
    }
}

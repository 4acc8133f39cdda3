// Content-shape pattern subsystem.
//
// A small expression language over content-node type names, e.g.
// `^heading (image paragraph)+$`, compiled to nondeterministic finite
// automata and executed with a state-set matcher:
// - parser.rs: lexer + recursive-descent parser producing the AST
// - compiler.rs: Thompson construction, AST -> Automaton
// - automaton.rs: the compiled automaton and the matching procedure

pub mod automaton;
pub mod compiler;
pub mod parser;

pub use automaton::Automaton;
pub use compiler::compile;
pub use parser::{parse, Pattern, PatternExpr, Quantifier, SyntaxError};

pub mod lexer;
pub mod cursor;
pub mod ast;
pub mod grammar;

use crate::error::ParseError;
use ast::Definition;

/// Parse protobuf schema text into a `Definition`.
///
/// This is the main entry point for the parser module. Lex and syntax errors
/// abort the whole parse; no partial tree is returned.
pub fn parse(schema_text: &str) -> Result<Definition, ParseError> {
    grammar::parse_definition(schema_text)
}

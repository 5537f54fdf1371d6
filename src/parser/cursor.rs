//! Token cursor for navigating the token stream.
//!
//! Comment tokens never reach the grammar directly. The cursor folds them
//! into a pending comment group so a declaration can claim the block that
//! sits immediately above it.

use super::lexer::{Located, Token};

/// Contiguous run of comment lines not yet claimed by a declaration.
#[derive(Debug)]
struct CommentGroup {
    lines: Vec<String>,
    end_line: usize,
}

/// Split block comment text into lines, dropping its `*` gutter (the second
/// `*` of `/**`, and the leading `*` of continuation lines).
fn block_comment_lines(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines().enumerate().map(|(i, line)| {
        let gutter = if i == 0 {
            line.strip_prefix('*')
        } else {
            line.trim_start().strip_prefix('*')
        };
        gutter.unwrap_or(line).to_string()
    })
}

/// Cursor over a fully tokenized schema.
pub struct Cursor {
    tokens: Vec<Located>,
    pos: usize,
    pending: Option<CommentGroup>,
    /// Line of the last significant token consumed.
    last_line: Option<usize>,
}

impl Cursor {
    /// Create a cursor over `tokens`, which must end with `Token::Eof`.
    pub fn new(mut tokens: Vec<Located>) -> Self {
        if !matches!(tokens.last(), Some(Located { token: Token::Eof, .. })) {
            let (line, column) = tokens.last().map_or((1, 1), |t| (t.line, t.column));
            tokens.push(Located {
                token: Token::Eof,
                line,
                column,
            });
        }
        Cursor {
            tokens,
            pos: 0,
            pending: None,
            last_line: None,
        }
    }

    fn absorb_comments(&mut self) {
        loop {
            let lines: Vec<String> = match &self.tokens[self.pos].token {
                Token::LineComment(text) => vec![text.clone()],
                Token::BlockComment(text) => block_comment_lines(text).collect(),
                _ => break,
            };
            let start = self.tokens[self.pos].line;
            let end = match &self.tokens[self.pos].token {
                Token::BlockComment(text) => start + text.matches('\n').count(),
                _ => start,
            };

            // A comment sharing a line with the previous token trails it.
            if self.last_line != Some(start) {
                match &mut self.pending {
                    Some(group) if group.end_line + 1 == start => {
                        group.lines.extend(lines);
                        group.end_line = end;
                    }
                    _ => {
                        self.pending = Some(CommentGroup {
                            lines,
                            end_line: end,
                        });
                    }
                }
            }
            self.pos += 1;
        }
    }

    /// Look at the next significant token without consuming it.
    pub fn peek(&mut self) -> &Located {
        self.absorb_comments();
        &self.tokens[self.pos]
    }

    /// Consume the next significant token. `Eof` is returned repeatedly.
    pub fn bump(&mut self) -> Located {
        self.absorb_comments();
        let tok = self.tokens[self.pos].clone();
        if tok.token != Token::Eof {
            self.pos += 1;
        }
        self.pending = None;
        self.last_line = Some(tok.line);
        tok
    }

    /// Take the comment block ending on the line right above `line`, or
    /// ending on `line` itself ahead of the declaration (`/* doc */ rpc ...`).
    ///
    /// Returns an empty vector when there is no such block, or when a blank
    /// line separates it from `line`.
    pub fn leading_comment(&mut self, line: usize) -> Vec<String> {
        self.absorb_comments();
        match self.pending.take() {
            Some(group) if group.end_line + 1 == line || group.end_line == line => group.lines,
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    fn cursor(input: &str) -> Cursor {
        Cursor::new(Lexer::new(input).tokenize().unwrap())
    }

    #[test]
    fn test_comments_are_skipped() {
        let mut c = cursor("// one\na // two\nb");
        assert_eq!(c.bump().token, Token::Ident("a".into()));
        assert_eq!(c.bump().token, Token::Ident("b".into()));
        assert_eq!(c.bump().token, Token::Eof);
        assert_eq!(c.bump().token, Token::Eof);
    }

    #[test]
    fn test_adjacent_comment_attaches() {
        let mut c = cursor("x\n// first\n// second\nrpc");
        c.bump();
        let line = c.peek().line;
        assert_eq!(c.leading_comment(line), vec![" first", " second"]);
    }

    #[test]
    fn test_blank_line_breaks_association() {
        let mut c = cursor("// detached\n\nrpc");
        let line = c.peek().line;
        assert!(c.leading_comment(line).is_empty());
    }

    #[test]
    fn test_blank_line_inside_comments_restarts_group() {
        let mut c = cursor("// old\n\n// new\nrpc");
        let line = c.peek().line;
        assert_eq!(c.leading_comment(line), vec![" new"]);
    }

    #[test]
    fn test_trailing_comment_does_not_attach() {
        let mut c = cursor("a; // trailing\nrpc");
        c.bump();
        c.bump();
        let line = c.peek().line;
        assert!(c.leading_comment(line).is_empty());
    }

    #[test]
    fn test_block_comment_lines() {
        let mut c = cursor("/* a\n b */\nrpc");
        let line = c.peek().line;
        assert_eq!(c.leading_comment(line), vec![" a", " b "]);
    }

    #[test]
    fn test_block_comment_gutter_is_stripped() {
        let mut c = cursor("/* Manages shelves.\n * Holds books. */\nservice");
        let line = c.peek().line;
        assert_eq!(c.leading_comment(line), vec![" Manages shelves.", " Holds books. "]);

        let mut c = cursor("/** Javadoc style.\n *\n */\nservice");
        let line = c.peek().line;
        assert_eq!(c.leading_comment(line), vec![" Javadoc style.", "", " "]);
    }

    #[test]
    fn test_line_comment_keeps_leading_star() {
        let mut c = cursor("//*bold\nrpc");
        let line = c.peek().line;
        assert_eq!(c.leading_comment(line), vec!["*bold"]);
    }

    #[test]
    fn test_block_comment_on_declaration_line_attaches() {
        let mut c = cursor("x {\n  /* doc */ rpc");
        c.bump();
        c.bump();
        let line = c.peek().line;
        assert_eq!(c.leading_comment(line), vec![" doc "]);
    }

    #[test]
    fn test_trailing_block_comment_does_not_attach_to_same_line_declaration() {
        let mut c = cursor("a; /* about a */ rpc");
        c.bump();
        c.bump();
        let line = c.peek().line;
        assert!(c.leading_comment(line).is_empty());
    }
}

use std::fmt;

use tracing::trace;

use crate::error::LexError;

/// Token types produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `<`
    LAngle,
    /// `>`
    RAngle,
    /// `;`
    Semicolon,
    /// `=`
    Equals,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// An identifier or keyword, possibly dotted (`google.api.http`).
    Ident(String),
    /// A quoted string literal with escapes already resolved.
    Str(String),
    /// A numeric literal, kept as written.
    Number(String),
    /// `//` comment text without its marker.
    LineComment(String),
    /// `/* */` comment text without its markers.
    BlockComment(String),
    /// End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LBrace => f.write_str("'{'"),
            Token::RBrace => f.write_str("'}'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::LBracket => f.write_str("'['"),
            Token::RBracket => f.write_str("']'"),
            Token::LAngle => f.write_str("'<'"),
            Token::RAngle => f.write_str("'>'"),
            Token::Semicolon => f.write_str("';'"),
            Token::Equals => f.write_str("'='"),
            Token::Comma => f.write_str("','"),
            Token::Colon => f.write_str("':'"),
            Token::Ident(name) => write!(f, "identifier '{name}'"),
            Token::Str(s) => write!(f, "string {s:?}"),
            Token::Number(n) => write!(f, "number {n}"),
            Token::LineComment(_) | Token::BlockComment(_) => f.write_str("comment"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

/// A token with its source location. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

/// Tokenizer for protobuf schema text.
///
/// The lexer is an iterator over `Result<Located, LexError>` that yields the
/// `Eof` token last. Cloning it before iteration gives an independent pass
/// over the same input.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.strip_prefix('\u{feff}').unwrap_or(input),
            pos: 0,
            line: 1,
            column: 1,
            done: false,
        }
    }

    /// Rewind to the start of the input.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.line = 1;
        self.column = 1;
        self.done = false;
    }

    /// Consume the lexer and collect every token up to and including `Eof`.
    pub fn tokenize(self) -> Result<Vec<Located>, LexError> {
        let tokens = self.collect::<Result<Vec<_>, _>>()?;
        trace!(count = tokens.len(), "tokenized schema");
        Ok(tokens)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn read_line_comment(&mut self) -> Token {
        // Leading "//" already consumed
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        Token::LineComment(self.input[start..self.pos].trim_end_matches('\r').to_string())
    }

    fn read_block_comment(&mut self, line: usize, column: usize) -> Result<Token, LexError> {
        // Leading "/*" already consumed
        let start = self.pos;
        loop {
            match self.peek_char() {
                None => return Err(LexError::UnterminatedComment { line, column }),
                Some('*') if self.peek_char_at(1) == Some('/') => {
                    let text = self.input[start..self.pos].to_string();
                    self.advance();
                    self.advance();
                    return Ok(Token::BlockComment(text));
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn read_ident(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                self.advance();
            } else {
                break;
            }
        }
        Token::Ident(self.input[start..self.pos].to_string())
    }

    fn read_number(&mut self) -> Token {
        let start = self.pos;
        if matches!(self.peek_char(), Some('-') | Some('+')) {
            self.advance();
        }
        let mut prev = '\0';
        while let Some(c) = self.peek_char() {
            let exponent_sign = (c == '-' || c == '+') && (prev == 'e' || prev == 'E');
            if c.is_ascii_alphanumeric() || c == '.' || exponent_sign {
                self.advance();
                prev = c;
            } else {
                break;
            }
        }
        Token::Number(self.input[start..self.pos].to_string())
    }

    fn read_string(&mut self, quote: char, line: usize, column: usize) -> Result<Token, LexError> {
        self.advance();
        let mut value = String::new();
        loop {
            let (esc_line, esc_column) = (self.line, self.column);
            match self.advance() {
                None | Some('\n') => return Err(LexError::UnterminatedString { line, column }),
                Some(c) if c == quote => return Ok(Token::Str(value)),
                Some('\\') => {
                    let escape = self
                        .advance()
                        .ok_or(LexError::UnterminatedString { line, column })?;
                    let resolved = match escape {
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        'a' => '\x07',
                        'b' => '\x08',
                        'f' => '\x0c',
                        'v' => '\x0b',
                        '\\' | '\'' | '"' | '?' => escape,
                        'x' | 'X' => self.read_escaped_code(16, 2).ok_or(LexError::InvalidEscape {
                            escape,
                            line: esc_line,
                            column: esc_column,
                        })?,
                        'u' | 'U' => {
                            let digits = if escape == 'u' { 4 } else { 8 };
                            self.read_unicode_escape(digits).ok_or(LexError::InvalidEscape {
                                escape,
                                line: esc_line,
                                column: esc_column,
                            })?
                        }
                        '0'..='7' => {
                            let first = escape.to_digit(8).unwrap_or(0);
                            let rest = self.read_digits(8, 2);
                            let code = rest.map_or(first, |(v, n)| first * 8u32.pow(n) + v);
                            char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
                        }
                        '\n' => return Err(LexError::UnterminatedString { line, column }),
                        other => {
                            return Err(LexError::InvalidEscape {
                                escape: other,
                                line: esc_line,
                                column: esc_column,
                            })
                        }
                    };
                    value.push(resolved);
                }
                Some(c) => value.push(c),
            }
        }
    }

    /// Read up to `max` digits in `radix`, returning the value and digit count.
    fn read_digits(&mut self, radix: u32, max: u32) -> Option<(u32, u32)> {
        let mut value = 0;
        let mut count = 0;
        while count < max {
            match self.peek_char().and_then(|c| c.to_digit(radix)) {
                Some(d) => {
                    value = value * radix + d;
                    count += 1;
                    self.advance();
                }
                None => break,
            }
        }
        (count > 0).then_some((value, count))
    }

    /// Exactly `digits` hex digits naming a Unicode scalar value.
    fn read_unicode_escape(&mut self, digits: u32) -> Option<char> {
        match self.read_digits(16, digits)? {
            (value, count) if count == digits => char::from_u32(value),
            _ => None,
        }
    }

    fn read_escaped_code(&mut self, radix: u32, max: u32) -> Option<char> {
        let (value, _) = self.read_digits(radix, max)?;
        char::from_u32(value)
    }

    /// Read the next token.
    pub fn next_token(&mut self) -> Result<Located, LexError> {
        self.skip_whitespace();
        let (line, column) = (self.line, self.column);

        let Some(c) = self.peek_char() else {
            return Ok(Located {
                token: Token::Eof,
                line,
                column,
            });
        };
        let next = self.peek_char_at(1);

        let token = match c {
            '{' => self.single(Token::LBrace),
            '}' => self.single(Token::RBrace),
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            '[' => self.single(Token::LBracket),
            ']' => self.single(Token::RBracket),
            '<' => self.single(Token::LAngle),
            '>' => self.single(Token::RAngle),
            ';' => self.single(Token::Semicolon),
            '=' => self.single(Token::Equals),
            ',' => self.single(Token::Comma),
            ':' => self.single(Token::Colon),
            '/' if next == Some('/') => {
                self.advance();
                self.advance();
                self.read_line_comment()
            }
            '/' if next == Some('*') => {
                self.advance();
                self.advance();
                self.read_block_comment(line, column)?
            }
            '"' | '\'' => self.read_string(c, line, column)?,
            // Signed identifiers such as `-inf` and `-nan` are numeric literals too.
            '-' | '+' if matches!(next, Some(n) if n.is_ascii_alphanumeric() || n == '.') => {
                self.read_number()
            }
            '.' if matches!(next, Some(n) if n.is_ascii_digit()) => self.read_number(),
            '.' if matches!(next, Some(n) if n.is_ascii_alphabetic() || n == '_') => {
                self.read_ident()
            }
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.read_ident(),
            other => return Err(LexError::UnexpectedChar { ch: other, line, column }),
        };

        Ok(Located {
            token,
            line,
            column,
        })
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Located, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_token();
        if matches!(&result, Ok(Located { token: Token::Eof, .. }) | Err(_)) {
            self.done = true;
        }
        Some(result)
    }
}

use std::path::PathBuf;

/// Errors from the schema tokenizer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at {line}:{column}")]
    UnexpectedChar { ch: char, line: usize, column: usize },

    #[error("unterminated string literal at {line}:{column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("invalid escape sequence '\\{escape}' at {line}:{column}")]
    InvalidEscape {
        escape: char,
        line: usize,
        column: usize,
    },

    #[error("unterminated block comment at {line}:{column}")]
    UnterminatedComment { line: usize, column: usize },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::UnexpectedChar { line, .. }
            | LexError::UnterminatedString { line, .. }
            | LexError::InvalidEscape { line, .. }
            | LexError::UnterminatedComment { line, .. } => *line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            LexError::UnexpectedChar { column, .. }
            | LexError::UnterminatedString { column, .. }
            | LexError::InvalidEscape { column, .. }
            | LexError::UnterminatedComment { column, .. } => *column,
        }
    }
}

/// Errors from the schema text parser.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("syntax error at {line}:{column}: expected {expected}, found {found}")]
    Syntax {
        line: usize,
        column: usize,
        expected: String,
        found: String,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::Lex(e) => e.line(),
            ParseError::Syntax { line, .. } => *line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            ParseError::Lex(e) => e.column(),
            ParseError::Syntax { column, .. } => *column,
        }
    }
}

/// Errors from loading schema text.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read schema '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Top-level error type that wraps all sub-errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<LexError> for Error {
    fn from(e: LexError) -> Self {
        Error::Parse(ParseError::Lex(e))
    }
}

/// Result type alias for protoroute operations.
pub type Result<T> = std::result::Result<T, Error>;

//! AST node types for parsed protobuf schema.

#[cfg(feature = "serde")]
use serde::Serialize;

/// The root of a parsed schema: top-level declarations in source order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Definition {
    pub elements: Vec<TopDecl>,
}

impl Definition {
    /// All `service` blocks in declaration order.
    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.elements.iter().filter_map(|decl| match decl {
            TopDecl::Service(s) => Some(s),
            _ => None,
        })
    }

    /// The declared package name, if any.
    pub fn package(&self) -> Option<&str> {
        self.elements.iter().find_map(|decl| match decl {
            TopDecl::Package(p) => Some(p.name.as_str()),
            _ => None,
        })
    }
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TopDecl {
    Syntax(Syntax),
    Package(Package),
    Message(Message),
    Service(Service),
    /// Anything the grammar does not model (`import`, `enum`, `extend`, ...),
    /// skipped by balancing delimiters.
    Unmodeled(Unmodeled),
}

/// `syntax = "proto3";`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Syntax {
    pub value: String,
    pub line: usize,
}

/// `package foo.bar;`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Package {
    pub name: String,
    pub line: usize,
}

/// A message declaration. Only the name is kept; the body is skipped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Message {
    pub name: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Unmodeled {
    /// The leading keyword, or a description of the leading token.
    pub keyword: String,
    pub line: usize,
}

/// A `service` block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Service {
    pub name: String,
    pub comment: Comment,
    pub options: Vec<OptionDecl>,
    pub methods: Vec<Method>,
    pub line: usize,
}

/// An `rpc` declaration inside a service.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Method {
    pub name: String,
    pub request_type: String,
    pub request_stream: bool,
    pub response_type: String,
    pub response_stream: bool,
    pub comment: Comment,
    pub options: Vec<OptionDecl>,
    pub line: usize,
    pub column: usize,
}

/// Raw comment lines directly above a declaration, markers removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Comment {
    pub lines: Vec<String>,
}

impl Comment {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Each line trimmed, blank lines dropped, joined with single spaces.
    pub fn joined(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<Vec<String>> for Comment {
    fn from(lines: Vec<String>) -> Self {
        Comment { lines }
    }
}

/// An `option name = value;` statement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OptionDecl {
    /// Name as written, parentheses included: `(google.api.http)`.
    pub name: String,
    pub value: OptionValue,
    pub line: usize,
}

/// The right-hand side of an option statement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum OptionValue {
    Scalar(Literal),
    /// A brace-delimited block of `key: literal` pairs, in source order.
    Aggregated(Vec<(String, Literal)>),
}

/// A constant value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Literal {
    /// String contents with quotes removed and escapes resolved.
    String(String),
    /// Numeric literal as written.
    Number(String),
    /// Bare identifier: `true`, `false`, enum values, `inf`.
    Ident(String),
    /// Nested message value inside an aggregated block.
    Block(Vec<(String, Literal)>),
    List(Vec<Literal>),
}

impl Literal {
    /// The text of a scalar literal. Blocks and lists have none.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Literal::String(s) | Literal::Number(s) | Literal::Ident(s) => Some(s),
            Literal::Block(_) | Literal::List(_) => None,
        }
    }
}

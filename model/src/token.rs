// Lexical tokens shared between the lexer and the parser
use std::fmt;

/// Token classes, in the order the lexer tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Number,
    Identifier,
    LogicalAnd, // &&
    LogicalOr,  // ||
    Equal,      // ==
    NotEqual,   // !=
    LessEqual,  // <=
    GreaterEqual, // >=
    Caret,      // ^
    Symbol,
    Unknown,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Keyword => "KEYWORD",
            Self::Number => "NUMBER",
            Self::Identifier => "IDENTIFIER",
            Self::LogicalAnd => "LAND",
            Self::LogicalOr => "LOR",
            Self::Equal => "EQ",
            Self::NotEqual => "NEQ",
            Self::LessEqual => "LE",
            Self::GreaterEqual => "GE",
            Self::Caret => "EXP",
            Self::Symbol => "SYMBOL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// True if this token has the given kind and, when `text` is given, exactly that spelling.
    pub fn is(&self, kind: TokenKind, text: Option<&str>) -> bool {
        self.kind == kind && text.is_none_or(|text| self.text == text)
    }

    /// Column just past the last character of the token.
    pub fn end_column(&self) -> usize {
        self.column + self.text.chars().count()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.text)
    }
}

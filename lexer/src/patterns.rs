use model::TokenKind;
use regex::Regex;
use std::sync::LazyLock;

/// Named token patterns in match priority order. Keywords must come before
/// identifiers and every multi-character operator before the symbol class.
/// A `None` kind marks input that is matched but never emitted. `\w`, `\s`
/// and `\b` are Unicode-aware.
pub(crate) const TOKEN_PATTERNS: &[(&str, Option<TokenKind>, &str)] = &[
    ("KEYWORD", Some(TokenKind::Keyword), r"\b(?:int|bool|return|if|else|while|true|false)\b"),
    ("NUMBER", Some(TokenKind::Number), r"\b\d+\b"),
    ("IDENTIFIER", Some(TokenKind::Identifier), r"\b[A-Za-z_]\w*\b"),
    ("LAND", Some(TokenKind::LogicalAnd), r"&&"),
    ("LOR", Some(TokenKind::LogicalOr), r"\|\|"),
    ("EQ", Some(TokenKind::Equal), r"=="),
    ("NEQ", Some(TokenKind::NotEqual), r"!="),
    ("LE", Some(TokenKind::LessEqual), r"<="),
    ("GE", Some(TokenKind::GreaterEqual), r">="),
    ("EXP", Some(TokenKind::Caret), r"\^"),
    ("SYMBOL", Some(TokenKind::Symbol), r"[<>+\-*/%();={}\[\],]"),
    ("WHITESPACE", None, r"\s+"),
    ("UNKNOWN", Some(TokenKind::Unknown), r"."),
];

pub(crate) static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = TOKEN_PATTERNS
        .iter()
        .map(|(name, _, pattern)| format!("(?P<{name}>{pattern})"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).expect("token patterns are valid")
});

pub(crate) static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//.*").expect("comment pattern is valid"));

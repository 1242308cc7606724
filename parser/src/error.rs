use thiserror::Error;

/// First syntax error of a parse; there is no recovery.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error at {line}:{column}: expected {expected}, found {found}")]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub expected: String,
    pub found: String,
}

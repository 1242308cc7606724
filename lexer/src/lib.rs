mod patterns;

use log::{debug, trace};
use model::Token;
use patterns::{LINE_COMMENT, TOKEN_PATTERNS, TOKEN_REGEX};

/// Main lexer entry point.
///
/// Never fails: characters outside the language come back as `UNKNOWN`
/// tokens and it is up to the parser to reject them. Line comments are
/// stripped first, whitespace is matched but not emitted.
pub fn tokenize(source: &str) -> Vec<Token> {
    let code = LINE_COMMENT.replace_all(source, "");
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut line_start = 0;

    for caps in TOKEN_REGEX.captures_iter(&code) {
        let Some((kind, found)) = TOKEN_PATTERNS
            .iter()
            .find_map(|(name, kind, _)| caps.name(name).map(|m| (*kind, m)))
        else {
            continue;
        };

        let start = found.start();
        let line_breaks = code[line_start..start].matches('\n').count();
        if line_breaks > 0 {
            line += line_breaks;
            line_start = code[..start].rfind('\n').map_or(0, |i| i + 1);
        }
        let column = code[line_start..start].chars().count() + 1;

        // Whitespace
        let Some(kind) = kind else {
            continue;
        };

        let token = Token::new(kind, found.as_str(), line, column);
        if kind == model::TokenKind::Unknown {
            trace!("unrecognized character {:?} at {}:{}", token.text, line, column);
        }
        tokens.push(token);
    }

    debug!("tokenized {} tokens", tokens.len());
    tokens
}

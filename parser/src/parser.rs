use model::{Declaration, FunctionDefinition, Program, Token, TokenKind, Type, VariableDeclaration};
use crate::error::SyntaxError;
use crate::expressions::ExpressionParser;
use crate::statements::StatementParser;
use log::debug;

pub(crate) type ParseResult<T> = Result<T, SyntaxError>;

/// Core parser struct that maintains parsing state
pub(crate) struct Parser<'a> {
    pub(crate) tokens: &'a [Token],
    pub(crate) pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser { tokens, pos: 0 }
    }

    /// Parse the entire program (global variables and function definitions)
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let mut declarations = Vec::new();
        while !self.is_at_end() {
            declarations.push(self.parse_global_declaration()?);
        }

        debug!("parsed {} top-level declarations", declarations.len());
        Ok(Program { declarations })
    }

    /// `type name` followed by `(` is a function, anything else a global variable
    fn parse_global_declaration(&mut self) -> ParseResult<Declaration> {
        let r#type = self.parse_type()?;
        let name = self.expect(TokenKind::Identifier, None)?.text.clone();

        if self.check(TokenKind::Symbol, Some("(")) {
            self.parse_function(r#type, name).map(Declaration::Function)
        } else {
            self.parse_initializer(r#type, name).map(Declaration::Variable)
        }
    }

    fn parse_function(&mut self, return_type: Type, name: String) -> ParseResult<FunctionDefinition> {
        self.expect(TokenKind::Symbol, Some("("))?;
        let mut params = Vec::new();
        if !self.check(TokenKind::Symbol, Some(")")) {
            loop {
                let param_type = self.parse_type()?;
                let param_name = self.expect(TokenKind::Identifier, None)?.text.clone();
                params.push((param_type, param_name));
                if !self.match_token(TokenKind::Symbol, Some(",")) {
                    break;
                }
            }
        }
        self.expect(TokenKind::Symbol, Some(")"))?;

        let body = self.parse_block()?;
        Ok(FunctionDefinition {
            return_type,
            name,
            params,
            body,
        })
    }

    /// The `= expr ;` tail shared by global and local declarations
    pub(crate) fn parse_initializer(&mut self, r#type: Type, name: String) -> ParseResult<VariableDeclaration> {
        self.expect(TokenKind::Symbol, Some("="))?;
        let init = self.parse_expr()?;
        self.expect(TokenKind::Symbol, Some(";"))?;
        Ok(VariableDeclaration { r#type, name, init })
    }

    pub(crate) fn parse_type(&mut self) -> ParseResult<Type> {
        if self.match_token(TokenKind::Keyword, Some("int")) {
            Ok(Type::Int)
        } else if self.match_token(TokenKind::Keyword, Some("bool")) {
            Ok(Type::Bool)
        } else {
            Err(self.error("type keyword"))
        }
    }

    pub(crate) fn check_is_type(&self) -> bool {
        self.check(TokenKind::Keyword, Some("int")) || self.check(TokenKind::Keyword, Some("bool"))
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn check(&self, kind: TokenKind, text: Option<&str>) -> bool {
        self.check_at(0, kind, text)
    }

    pub(crate) fn check_at(&self, offset: usize, kind: TokenKind, text: Option<&str>) -> bool {
        self.tokens
            .get(self.pos + offset)
            .is_some_and(|tok| tok.is(kind, text))
    }

    /// Optional token: consumed through `expect` only after `check` succeeded
    pub(crate) fn match_token(&mut self, kind: TokenKind, text: Option<&str>) -> bool {
        self.check(kind, text) && self.expect(kind, text).is_ok()
    }

    /// The only consuming primitive: the current token must have `kind` (and
    /// `text`, if given) or the whole parse fails here. Every other way of
    /// moving past a token goes through this.
    pub(crate) fn expect(&mut self, kind: TokenKind, text: Option<&str>) -> ParseResult<&'a Token> {
        match self.peek() {
            Some(tok) if tok.is(kind, text) => {
                self.pos += 1;
                Ok(tok)
            }
            _ => {
                let expected = match text {
                    Some(text) => format!("{kind} '{text}'"),
                    None => kind.to_string(),
                };
                Err(self.error(expected))
            }
        }
    }

    /// Error at the current token, or just past the last one at end of input
    pub(crate) fn error(&self, expected: impl Into<String>) -> SyntaxError {
        let expected = expected.into();
        match self.peek() {
            Some(tok) => SyntaxError {
                line: tok.line,
                column: tok.column,
                expected,
                found: tok.to_string(),
            },
            None => {
                let (line, column) = self
                    .tokens
                    .last()
                    .map_or((1, 1), |tok| (tok.line, tok.end_column()));
                SyntaxError {
                    line,
                    column,
                    expected,
                    found: "end of input".to_string(),
                }
            }
        }
    }
}

use model::{BinaryOp, Expr, FunctionCall, TokenKind};
use crate::parser::{ParseResult, Parser};

/// Expression parsing functionality using precedence climbing
pub(crate) trait ExpressionParser {
    fn parse_expr(&mut self) -> ParseResult<Expr>;
}

impl<'a> ExpressionParser for Parser<'a> {
    fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_logical_or()
    }
}

type OperatorTable = [(TokenKind, Option<&'static str>, BinaryOp)];

const EQUALITY: &OperatorTable = &[
    (TokenKind::Equal, None, BinaryOp::EqualEqual),
    (TokenKind::NotEqual, None, BinaryOp::NotEqual),
];

const RELATIONAL: &OperatorTable = &[
    (TokenKind::Symbol, Some("<"), BinaryOp::Less),
    (TokenKind::Symbol, Some(">"), BinaryOp::Greater),
    (TokenKind::LessEqual, None, BinaryOp::LessEqual),
    (TokenKind::GreaterEqual, None, BinaryOp::GreaterEqual),
];

const ADDITIVE: &OperatorTable = &[
    (TokenKind::Symbol, Some("+"), BinaryOp::Add),
    (TokenKind::Symbol, Some("-"), BinaryOp::Sub),
];

const MULTIPLICATIVE: &OperatorTable = &[
    (TokenKind::Symbol, Some("*"), BinaryOp::Mul),
    (TokenKind::Symbol, Some("/"), BinaryOp::Div),
    (TokenKind::Symbol, Some("%"), BinaryOp::Mod),
];

impl<'a> Parser<'a> {
    /// Consume the current token if it is one of the operators of a level
    fn match_operator(&mut self, table: &OperatorTable) -> Option<BinaryOp> {
        let &(kind, text, op) = table.iter().find(|(kind, text, _)| self.check(*kind, *text))?;
        self.expect(kind, text).ok().map(|_| op)
    }

    // Logical OR (lowest precedence)
    pub(crate) fn parse_logical_or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_logical_and()?;
        while self.match_token(TokenKind::LogicalOr, None) {
            let right = self.parse_logical_and()?;
            expr = Expr::binary(expr, BinaryOp::LogicalOr, right);
        }
        Ok(expr)
    }

    // Logical AND
    pub(crate) fn parse_logical_and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_equality()?;
        while self.match_token(TokenKind::LogicalAnd, None) {
            let right = self.parse_equality()?;
            expr = Expr::binary(expr, BinaryOp::LogicalAnd, right);
        }
        Ok(expr)
    }

    // Equality (== !=)
    pub(crate) fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_relational()?;
        while let Some(op) = self.match_operator(EQUALITY) {
            let right = self.parse_relational()?;
            expr = Expr::binary(expr, op, right);
        }
        Ok(expr)
    }

    // Relational (< > <= >=)
    pub(crate) fn parse_relational(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_additive()?;
        while let Some(op) = self.match_operator(RELATIONAL) {
            let right = self.parse_additive()?;
            expr = Expr::binary(expr, op, right);
        }
        Ok(expr)
    }

    // Additive (+ -)
    pub(crate) fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_multiplicative()?;
        while let Some(op) = self.match_operator(ADDITIVE) {
            let right = self.parse_multiplicative()?;
            expr = Expr::binary(expr, op, right);
        }
        Ok(expr)
    }

    // Multiplicative (* / %)
    pub(crate) fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_exponent()?;
        while let Some(op) = self.match_operator(MULTIPLICATIVE) {
            let right = self.parse_exponent()?;
            expr = Expr::binary(expr, op, right);
        }
        Ok(expr)
    }

    // Exponent (^), right-associative: the right side recurses into this level
    pub(crate) fn parse_exponent(&mut self) -> ParseResult<Expr> {
        let base = self.parse_primary()?;
        if self.match_token(TokenKind::Caret, None) {
            let exponent = self.parse_exponent()?;
            return Ok(Expr::binary(base, BinaryOp::Pow, exponent));
        }
        Ok(base)
    }

    pub(crate) fn parse_primary(&mut self) -> ParseResult<Expr> {
        let Some(tok) = self.peek() else {
            return Err(self.error("expression"));
        };

        match tok.kind {
            TokenKind::Number => {
                let value = tok
                    .text
                    .parse::<i64>()
                    .map_err(|_| self.error("integer literal within 64-bit range"))?;
                self.expect(TokenKind::Number, None)?;
                Ok(Expr::Int(value))
            }
            TokenKind::Keyword if tok.text == "true" || tok.text == "false" => {
                self.expect(TokenKind::Keyword, Some(tok.text.as_str()))?;
                Ok(Expr::Bool(tok.text == "true"))
            }
            TokenKind::Identifier if self.check_at(1, TokenKind::Symbol, Some("(")) => {
                self.parse_call().map(Expr::Call)
            }
            TokenKind::Identifier => {
                self.expect(TokenKind::Identifier, None)?;
                Ok(Expr::Variable(tok.text.clone()))
            }
            TokenKind::Symbol if tok.text == "(" => {
                self.expect(TokenKind::Symbol, Some("("))?;
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Symbol, Some(")"))?;
                Ok(expr)
            }
            _ => Err(self.error("expression")),
        }
    }

    /// `name(arg, ...)`; each argument is a full expression
    pub(crate) fn parse_call(&mut self) -> ParseResult<FunctionCall> {
        let name = self.expect(TokenKind::Identifier, None)?.text.clone();
        self.expect(TokenKind::Symbol, Some("("))?;
        let mut args = Vec::new();
        if !self.check(TokenKind::Symbol, Some(")")) {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_token(TokenKind::Symbol, Some(",")) {
                    break;
                }
            }
        }
        self.expect(TokenKind::Symbol, Some(")"))?;
        Ok(FunctionCall { name, args })
    }
}

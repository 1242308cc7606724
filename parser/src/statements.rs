use model::{Block, Stmt, TokenKind};
use crate::expressions::ExpressionParser;
use crate::parser::{ParseResult, Parser};

/// Statement parsing functionality
pub(crate) trait StatementParser {
    fn parse_stmt(&mut self) -> ParseResult<Stmt>;
    fn parse_block(&mut self) -> ParseResult<Block>;
}

impl<'a> StatementParser for Parser<'a> {
    fn parse_block(&mut self) -> ParseResult<Block> {
        self.expect(TokenKind::Symbol, Some("{"))?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::Symbol, Some("}")) && !self.is_at_end() {
            statements.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::Symbol, Some("}"))?;
        Ok(Block { statements })
    }

    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        // Local variable declaration
        if self.check_is_type() {
            let r#type = self.parse_type()?;
            let name = self.expect(TokenKind::Identifier, None)?.text.clone();
            return self.parse_initializer(r#type, name).map(Stmt::Declaration);
        }

        if self.check(TokenKind::Keyword, Some("return")) {
            return self.parse_return_stmt();
        }

        if self.check(TokenKind::Keyword, Some("if")) {
            return self.parse_if_stmt();
        }

        if self.check(TokenKind::Keyword, Some("while")) {
            return self.parse_while_stmt();
        }

        if self.check(TokenKind::Symbol, Some("{")) {
            return self.parse_block().map(Stmt::Block);
        }

        // `name(` is a call statement, anything else after a name is an assignment
        if self.check(TokenKind::Identifier, None) {
            if self.check_at(1, TokenKind::Symbol, Some("(")) {
                let call = self.parse_call()?;
                self.expect(TokenKind::Symbol, Some(";"))?;
                return Ok(Stmt::Call(call));
            }
            return self.parse_assignment();
        }

        Err(self.error("statement"))
    }
}

impl<'a> Parser<'a> {
    fn parse_return_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Keyword, Some("return"))?;
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Symbol, Some(";"))?;
        Ok(Stmt::Return(expr))
    }

    fn parse_assignment(&mut self) -> ParseResult<Stmt> {
        let name = self.expect(TokenKind::Identifier, None)?.text.clone();
        self.expect(TokenKind::Symbol, Some("="))?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Symbol, Some(";"))?;
        Ok(Stmt::Assignment { name, value })
    }

    // `else` is only looked for right after a then-branch, so it binds to the nearest `if`
    fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Keyword, Some("if"))?;
        self.expect(TokenKind::Symbol, Some("("))?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Symbol, Some(")"))?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.match_token(TokenKind::Keyword, Some("else")) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_while_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Keyword, Some("while"))?;
        self.expect(TokenKind::Symbol, Some("("))?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Symbol, Some(")"))?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::While { cond, body })
    }
}

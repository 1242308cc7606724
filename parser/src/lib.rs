// Parser module: Converts a list of tokens into an abstract syntax tree (AST)
//
// Module organization:
// - parser.rs: Core Parser struct, token primitives and top-level declarations
// - expressions.rs: Expression parsing with precedence climbing
// - statements.rs: Statement parsing (if, while, return, assignment, etc.)

mod error;
mod expressions;
mod parser;
mod statements;

pub use error::SyntaxError;

use model::{Program, Token};
use parser::Parser;

/// Parse a list of tokens into a Program AST
///
/// # Arguments
/// * `tokens` - Slice of tokens from the lexer
///
/// # Returns
/// * `Ok(Program)` - Every token was consumed into global declarations
/// * `Err(SyntaxError)` - The first mismatch, with its line and column
pub fn parse_program(tokens: &[Token]) -> Result<Program, SyntaxError> {
    let mut parser = Parser::new(tokens);
    parser.parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexer::tokenize;
    use model::{BinaryOp, Declaration, Expr, FunctionCall, Stmt, Type};

    fn parse(src: &str) -> Result<Program, SyntaxError> {
        parse_program(&tokenize(src))
    }

    /// Parse `int main() { return <expr>; }` and hand back the expression
    fn parse_return_expr(expr: &str) -> Expr {
        let program = parse(&format!("int main() {{ return {expr}; }}")).unwrap();
        let function = program.functions().next().unwrap();
        match &function.body.statements[0] {
            Stmt::Return(expr) => expr.clone(),
            other => panic!("expected return, got {:?}", other),
        }
    }

    fn var(name: &str) -> Expr {
        Expr::Variable(name.to_string())
    }

    #[test]
    fn parse_simple_main() {
        let program = parse("int main() { return 0; }").unwrap();
        let functions: Vec<_> = program.functions().collect();
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].name, "main");
        assert_eq!(functions[0].return_type, Type::Int);
        assert!(functions[0].params.is_empty());
        assert_eq!(functions[0].body.statements, vec![Stmt::Return(Expr::Int(0))]);
    }

    #[test]
    fn parse_globals_and_functions_in_order() {
        let src = "int g = 42; bool flag = false; int add(int x, int y) { return x + y; } int h = 1;";
        let program = parse(src).unwrap();
        assert_eq!(program.declarations.len(), 4);
        assert!(matches!(&program.declarations[0], Declaration::Variable(v) if v.name == "g"));
        assert!(matches!(&program.declarations[1], Declaration::Variable(v)
            if v.r#type == Type::Bool && v.init == Expr::Bool(false)));
        assert!(matches!(&program.declarations[2], Declaration::Function(f)
            if f.params == vec![(Type::Int, "x".to_string()), (Type::Int, "y".to_string())]));
        assert!(matches!(&program.declarations[3], Declaration::Variable(v) if v.name == "h"));
    }

    #[test]
    fn parse_empty_program() {
        assert_eq!(parse("").unwrap(), Program::default());
    }

    #[test]
    fn parse_multiplication_binds_tighter() {
        assert_eq!(
            parse_return_expr("a + b * c"),
            Expr::binary(var("a"), BinaryOp::Add, Expr::binary(var("b"), BinaryOp::Mul, var("c")))
        );
    }

    #[test]
    fn parse_subtraction_is_left_associative() {
        assert_eq!(
            parse_return_expr("a - b - c"),
            Expr::binary(Expr::binary(var("a"), BinaryOp::Sub, var("b")), BinaryOp::Sub, var("c"))
        );
    }

    #[test]
    fn parse_exponent_is_right_associative() {
        assert_eq!(
            parse_return_expr("2 ^ 3 ^ 2"),
            Expr::binary(
                Expr::Int(2),
                BinaryOp::Pow,
                Expr::binary(Expr::Int(3), BinaryOp::Pow, Expr::Int(2))
            )
        );
    }

    #[test]
    fn parse_exponent_binds_tighter_than_multiplication() {
        assert_eq!(
            parse_return_expr("a * b ^ 2"),
            Expr::binary(var("a"), BinaryOp::Mul, Expr::binary(var("b"), BinaryOp::Pow, Expr::Int(2)))
        );
    }

    #[test]
    fn parse_logical_and_relational_levels() {
        assert_eq!(
            parse_return_expr("a < b == c >= d && e || f"),
            Expr::binary(
                Expr::binary(
                    Expr::binary(
                        Expr::binary(var("a"), BinaryOp::Less, var("b")),
                        BinaryOp::EqualEqual,
                        Expr::binary(var("c"), BinaryOp::GreaterEqual, var("d")),
                    ),
                    BinaryOp::LogicalAnd,
                    var("e"),
                ),
                BinaryOp::LogicalOr,
                var("f"),
            )
        );
    }

    #[test]
    fn parse_parenthesized_expression() {
        assert_eq!(
            parse_return_expr("(a + b) % 3"),
            Expr::binary(Expr::binary(var("a"), BinaryOp::Add, var("b")), BinaryOp::Mod, Expr::Int(3))
        );
    }

    #[test]
    fn parse_nested_call_arguments() {
        assert_eq!(
            parse_return_expr("f(g(1), a + 2, true)"),
            Expr::Call(FunctionCall {
                name: "f".to_string(),
                args: vec![
                    Expr::Call(FunctionCall { name: "g".to_string(), args: vec![Expr::Int(1)] }),
                    Expr::binary(var("a"), BinaryOp::Add, Expr::Int(2)),
                    Expr::Bool(true),
                ],
            })
        );
    }

    #[test]
    fn parse_call_statement_and_assignment() {
        let program = parse("int main() { tick(); x = tick() + 1; return x; }").unwrap();
        let body = &program.functions().next().unwrap().body.statements;
        assert_eq!(body[0], Stmt::Call(FunctionCall { name: "tick".to_string(), args: vec![] }));
        assert!(matches!(&body[1], Stmt::Assignment { name, value: Expr::Binary { .. } } if name == "x"));
    }

    #[test]
    fn parse_dangling_else_binds_to_inner_if() {
        let program = parse("int main() { if (a) if (b) x = 1; else x = 2; return 0; }").unwrap();
        let body = &program.functions().next().unwrap().body.statements;
        match &body[0] {
            Stmt::If { else_branch: None, then_branch, .. } => {
                assert!(matches!(then_branch.as_ref(), Stmt::If { else_branch: Some(_), .. }));
            }
            other => panic!("expected outer if without else, got {:?}", other),
        }
    }

    #[test]
    fn parse_while_with_block_body() {
        let program = parse("int main() { while (a < 10) { a = a + 1; } return a; }").unwrap();
        let body = &program.functions().next().unwrap().body.statements;
        match &body[0] {
            Stmt::While { cond, body } => {
                assert_eq!(*cond, Expr::binary(var("a"), BinaryOp::Less, Expr::Int(10)));
                assert!(matches!(body.as_ref(), Stmt::Block(block) if block.statements.len() == 1));
            }
            other => panic!("expected while, got {:?}", other),
        }
    }

    #[test]
    fn parse_missing_semicolon_reports_position() {
        let err = parse("int main() {\n  int a = 2\n  return a;\n}").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.column, 3);
        assert_eq!(err.expected, "SYMBOL ';'");
        assert_eq!(err.found, "KEYWORD 'return'");
    }

    #[test]
    fn parse_missing_closing_brace_at_end_of_input() {
        let err = parse("int main() { return 1;").unwrap_err();
        assert_eq!(err.expected, "SYMBOL '}'");
        assert_eq!(err.found, "end of input");
        assert_eq!((err.line, err.column), (1, 23));
    }

    #[test]
    fn parse_rejects_non_type_at_top_level() {
        let err = parse("return 1;").unwrap_err();
        assert_eq!(err.expected, "type keyword");
        assert_eq!((err.line, err.column), (1, 1));
    }

    #[test]
    fn parse_rejects_unknown_token() {
        let err = parse("int main() { return !a; }").unwrap_err();
        assert_eq!(err.expected, "expression");
        assert_eq!(err.found, "UNKNOWN '!'");
    }

    #[test]
    fn parse_rejects_bad_statement() {
        let err = parse("int main() { 5; }").unwrap_err();
        assert_eq!(err.expected, "statement");
    }

    #[test]
    fn parse_every_token_kind_is_consumed() {
        let src = "bool f(int a, bool b) { if (b && a <= 2 || false) { return (a ^ 2) != 1; } while (true) g(a, 1); return b; }";
        let program = parse(src).unwrap();
        let function = program.functions().next().unwrap();
        assert_eq!(function.return_type, Type::Bool);
        assert_eq!(function.params, vec![(Type::Int, "a".to_string()), (Type::Bool, "b".to_string())]);
        assert_eq!(function.body.statements.len(), 3);
    }

    #[test]
    fn parse_unclosed_parenthesis() {
        let err = parse("int main() { return (1 + 2; }").unwrap_err();
        assert_eq!(err.expected, "SYMBOL ')'");
        assert_eq!(err.found, "SYMBOL ';'");
        assert_eq!((err.line, err.column), (1, 27));
    }

    #[test]
    fn parse_rejects_overflowing_literal() {
        let err = parse("int a = 99999999999999999999;").unwrap_err();
        assert_eq!(err.expected, "integer literal within 64-bit range");
    }
}

mod control_flow;
mod expressions;
mod pseudo;

pub use pseudo::{Condition, Instruction, Label, Operand, Temp, emit, render};

use log::trace;
use model::{Block, FunctionCall, FunctionDefinition, Program, Stmt, VariableDeclaration};
use std::collections::HashMap;
use thiserror::Error;

/// Raised only for trees that semantic analysis should already have rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    #[error("internal error: function {0} was lowered twice")]
    DuplicateFunction(String),
}

/// Lower an analyzed program with a fresh generator.
pub fn generate(program: &Program) -> Result<Vec<Instruction>, CodegenError> {
    CodeGenerator::new().gen_program(program)
}

/// Single-use lowering state. Temporary and label counters only ever grow,
/// so every `t<n>` and every label in one listing is distinct.
pub struct CodeGenerator {
    instructions: Vec<Instruction>,
    next_temp: usize,
    // Shared by all label prefixes
    next_label: usize,
    function_labels: HashMap<String, Label>,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            instructions: Vec::new(),
            next_temp: 0,
            next_label: 0,
            function_labels: HashMap::new(),
        }
    }

    /// Globals first, then functions, both in source order. A defined `main`
    /// gets an entry call and a halt appended.
    pub fn gen_program(mut self, program: &Program) -> Result<Vec<Instruction>, CodegenError> {
        for global in program.globals() {
            self.gen_declaration(global);
        }

        for function in program.functions() {
            self.gen_function(function)?;
        }

        if self.function_labels.contains_key("main") {
            self.push(Instruction::Call {
                name: "main".to_string(),
                args: Vec::new(),
                dst: None,
            });
            self.push(Instruction::Halt);
        }

        Ok(self.finish())
    }

    /// Take the instructions emitted so far.
    pub fn finish(self) -> Vec<Instruction> {
        self.instructions
    }

    fn gen_function(&mut self, function: &FunctionDefinition) -> Result<(), CodegenError> {
        let label = self.fresh_label(&format!("func_{}", function.name));
        if self
            .function_labels
            .insert(function.name.clone(), label.clone())
            .is_some()
        {
            return Err(CodegenError::DuplicateFunction(function.name.clone()));
        }

        self.push(Instruction::Label(label));
        self.gen_block(&function.body);
        // Unconditional, even when the body already ended in a return
        self.push(Instruction::Ret);
        Ok(())
    }

    fn gen_block(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.gen_stmt(stmt);
        }
    }

    fn gen_declaration(&mut self, var: &VariableDeclaration) {
        let value = self.gen_expr(&var.init);
        self.push(Instruction::Mov(Operand::Var(var.name.clone()), value));
    }

    fn gen_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Declaration(var) => self.gen_declaration(var),
            Stmt::Assignment { name, value } => {
                let value = self.gen_expr(value);
                self.push(Instruction::Mov(Operand::Var(name.clone()), value));
            }
            Stmt::Return(expr) => {
                let value = self.gen_expr(expr);
                self.push(Instruction::Mov(Operand::Ret, value));
                self.push(Instruction::Ret);
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => self.gen_if(cond, then_branch, else_branch.as_deref()),
            Stmt::While { cond, body } => self.gen_while(cond, body),
            Stmt::Block(block) => self.gen_block(block),
            Stmt::Call(call) => self.gen_call_stmt(call),
        }
    }

    fn gen_call_stmt(&mut self, call: &FunctionCall) {
        let args = call.args.iter().map(|arg| self.gen_expr(arg)).collect();
        self.push(Instruction::Call {
            name: call.name.clone(),
            args,
            dst: None,
        });
    }

    pub(crate) fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub(crate) fn fresh_temp(&mut self) -> Temp {
        self.next_temp += 1;
        Temp(self.next_temp)
    }

    pub(crate) fn fresh_label(&mut self, prefix: &str) -> Label {
        self.next_label += 1;
        let label = Label(format!("{}_{}", prefix, self.next_label));
        trace!("allocated label {}", label);
        label
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexer::tokenize;
    use model::{BinaryOp, Declaration, Expr, Type};
    use parser::parse_program;

    fn compile(src: &str) -> Vec<String> {
        let program = parse_program(&tokenize(src)).expect("test source should parse");
        render(&generate(&program).expect("codegen should succeed"))
    }

    fn lower_expr(expr: &Expr) -> Vec<String> {
        let mut cg = CodeGenerator::new();
        cg.gen_expr(expr);
        render(&cg.finish())
    }

    #[test]
    fn add_and_main_end_to_end() {
        let src = "int add(int x, int y) { return x + y; }
                   int main() { int a = 2; int b = 3; return add(a, b); }";
        assert_eq!(
            compile(src),
            vec![
                "LABEL func_add_1",
                "ADD t1, x, y",
                "MOV ret, t1",
                "RET",
                "RET",
                "LABEL func_main_2",
                "MOV a, 2",
                "MOV b, 3",
                "CALL add, a, b -> t2",
                "MOV ret, t2",
                "RET",
                "RET",
                "CALL main",
                "HALT",
            ]
        );
    }

    #[test]
    fn modulo_lowers_to_subtraction_loop() {
        let expr = Expr::binary(Expr::Int(7), BinaryOp::Mod, Expr::Int(3));
        assert_eq!(
            lower_expr(&expr),
            vec![
                "MOV t1, 7",
                "LABEL mod_loop_1",
                "CMP t1, 3",
                "JL mod_end_2",
                "ADD t1, t1, -3",
                "JMP mod_loop_1",
                "LABEL mod_end_2",
            ]
        );
    }

    #[test]
    fn power_lowers_to_multiplication_loop() {
        let expr = Expr::binary(Expr::Variable("b".to_string()), BinaryOp::Pow, Expr::Int(3));
        assert_eq!(
            lower_expr(&expr),
            vec![
                "MOV t1, 1",
                "MOV t2, 3",
                "LABEL pow_loop_1",
                "CMP t2, 0",
                "JE pow_end_2",
                "MUL t1, t1, b",
                "ADD t2, t2, -1",
                "JMP pow_loop_1",
                "LABEL pow_end_2",
            ]
        );
    }

    #[test]
    fn subtraction_negates_right_operand_text() {
        let expr = Expr::binary(Expr::Variable("a".to_string()), BinaryOp::Sub, Expr::Int(1));
        assert_eq!(lower_expr(&expr), vec!["ADD t1, a, -1"]);

        // A temporary on the right is negated textually too
        let nested = Expr::binary(
            Expr::Variable("a".to_string()),
            BinaryOp::Sub,
            Expr::binary(Expr::Variable("b".to_string()), BinaryOp::Mul, Expr::Int(2)),
        );
        assert_eq!(lower_expr(&nested), vec!["MUL t1, b, 2", "ADD t2, a, -t1"]);
    }

    #[test]
    fn relational_and_logical_operators() {
        let expr = Expr::binary(
            Expr::Variable("flag".to_string()),
            BinaryOp::LogicalAnd,
            Expr::binary(Expr::Variable("c".to_string()), BinaryOp::Greater, Expr::Int(10)),
        );
        assert_eq!(lower_expr(&expr), vec!["CMP c, 10", "SETG t1", "AND t2, flag, t1"]);

        let ne = Expr::binary(Expr::Variable("a".to_string()), BinaryOp::NotEqual, Expr::Int(0));
        assert_eq!(lower_expr(&ne), vec!["CMP a, 0", "SETNE t1"]);

        let or = Expr::binary(Expr::Bool(true), BinaryOp::LogicalOr, Expr::Bool(false));
        assert_eq!(lower_expr(&or), vec!["OR t1, true, false"]);
    }

    #[test]
    fn if_else_lowering() {
        let src = "int main() { int a = 1; if (a < 2) { a = 3; } else { a = 4; } return a; }";
        assert_eq!(
            compile(src),
            vec![
                "LABEL func_main_1",
                "MOV a, 1",
                "CMP a, 2",
                "SETL t1",
                "CMP t1, 0",
                "JE else_2",
                "MOV a, 3",
                "JMP endif_3",
                "LABEL else_2",
                "MOV a, 4",
                "LABEL endif_3",
                "MOV ret, a",
                "RET",
                "RET",
                "CALL main",
                "HALT",
            ]
        );
    }

    #[test]
    fn if_without_else_jumps_to_end() {
        let src = "int f(bool p) { if (p) return 1; return 0; }";
        assert_eq!(
            compile(src),
            vec![
                "LABEL func_f_1",
                "CMP p, 0",
                "JE endif_2",
                "MOV ret, 1",
                "RET",
                "JMP endif_2",
                "LABEL endif_2",
                "MOV ret, 0",
                "RET",
                "RET",
            ]
        );
    }

    #[test]
    fn while_lowering() {
        let src = "int main() { int a = 0; while (a < 5) { a = a + 2; } return a; }";
        assert_eq!(
            compile(src),
            vec![
                "LABEL func_main_1",
                "MOV a, 0",
                "LABEL while_start_2",
                "CMP a, 5",
                "SETL t1",
                "CMP t1, 0",
                "JE while_end_3",
                "ADD t2, a, 2",
                "MOV a, t2",
                "JMP while_start_2",
                "LABEL while_end_3",
                "MOV ret, a",
                "RET",
                "RET",
                "CALL main",
                "HALT",
            ]
        );
    }

    #[test]
    fn globals_come_before_functions() {
        let src = "int f() { return g; } int g = 4 * 2; bool on = true;";
        assert_eq!(
            compile(src),
            vec![
                "MUL t1, 4, 2",
                "MOV g, t1",
                "MOV on, true",
                "LABEL func_f_1",
                "MOV ret, g",
                "RET",
                "RET",
            ]
        );
    }

    #[test]
    fn call_statement_has_no_destination() {
        let src = "int tick(int n) { return n; } int main() { tick(1 + 2); tick(0); return 0; }";
        let listing = compile(src);
        assert!(listing.contains(&"ADD t1, 1, 2".to_string()));
        assert!(listing.contains(&"CALL tick, t1".to_string()));
        assert!(listing.contains(&"CALL tick, 0".to_string()));
    }

    #[test]
    fn nested_call_arguments_evaluate_left_to_right() {
        let src = "int f(int a, int b) { return a; } int main() { return f(f(1, 2), 3 * 4); }";
        let listing = compile(src);
        let main_start = listing.iter().position(|l| l == "LABEL func_main_2").unwrap();
        assert_eq!(
            &listing[main_start + 1..main_start + 5],
            &["CALL f, 1, 2 -> t1", "MUL t2, 3, 4", "CALL f, t1, t2 -> t3", "MOV ret, t3"]
        );
    }

    #[test]
    fn no_main_means_no_entry_call() {
        let listing = compile("int helper() { return 1; }");
        assert_eq!(listing.last().map(String::as_str), Some("RET"));
        assert!(!listing.iter().any(|l| l == "HALT"));
    }

    #[test]
    fn fresh_generators_are_deterministic() {
        let src = "int main() { int a = 7 % 3; int b = a ^ 2; while (a < b) { a = a + 1; } return a; }";
        let program = parse_program(&tokenize(src)).unwrap();
        let copy = program.clone();
        assert_eq!(generate(&program).unwrap(), generate(&copy).unwrap());
    }

    #[test]
    fn labels_are_unique_across_prefixes() {
        let src = "int main() { int a = 9 % 4; int b = a ^ 2; if (a < b) { a = 1; } else { a = 2; } while (true) { a = a % 2; } return a; }";
        let listing = compile(src);
        let labels: Vec<_> = listing.iter().filter(|l| l.starts_with("LABEL ")).collect();
        let mut unique = labels.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(labels.len(), unique.len());
    }

    #[test]
    fn entry_labels_are_recorded() {
        let mut cg = CodeGenerator::new();
        let program = parse_program(&tokenize("int main() { return 0; }")).unwrap();
        for function in program.functions() {
            cg.gen_function(function).unwrap();
        }
        assert_eq!(cg.function_labels.get("main"), Some(&Label("func_main_1".to_string())));
        assert_eq!(cg.function_labels.get("other"), None);
    }

    #[test]
    fn duplicate_function_is_an_internal_error() {
        // Only reachable when semantic analysis was skipped
        let function = FunctionDefinition {
            return_type: Type::Int,
            name: "f".to_string(),
            params: vec![],
            body: Block::default(),
        };
        let program = Program {
            declarations: vec![Declaration::Function(function.clone()), Declaration::Function(function)],
        };
        assert_eq!(generate(&program), Err(CodegenError::DuplicateFunction("f".to_string())));
    }

    #[test]
    fn float_literal_keeps_its_textual_form() {
        let expr = Expr::binary(Expr::Float(1.5), BinaryOp::Mul, Expr::Int(2));
        assert_eq!(lower_expr(&expr), vec!["MUL t1, 1.5, 2"]);
    }
}

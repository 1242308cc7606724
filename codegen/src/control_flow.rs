// Control flow code generation: if/else and while lowering
// Both test their condition with `CMP cond, 0` and branch on equality (false)

use crate::CodeGenerator;
use crate::pseudo::{Instruction, Operand};
use model::{Expr, Stmt};

impl CodeGenerator {
    pub(crate) fn gen_if(&mut self, cond: &Expr, then_branch: &Stmt, else_branch: Option<&Stmt>) {
        let cond = self.gen_expr(cond);
        // Else label is allocated first so it numbers below the end label
        let else_label = else_branch.map(|_| self.fresh_label("else"));
        let end_label = self.fresh_label("endif");

        self.push(Instruction::Cmp(cond, Operand::Int(0)));
        let false_target = else_label.clone().unwrap_or_else(|| end_label.clone());
        self.push(Instruction::Je(false_target));

        self.gen_stmt(then_branch);
        self.push(Instruction::Jmp(end_label.clone()));

        if let (Some(label), Some(stmt)) = (else_label, else_branch) {
            self.push(Instruction::Label(label));
            self.gen_stmt(stmt);
        }
        self.push(Instruction::Label(end_label));
    }

    pub(crate) fn gen_while(&mut self, cond: &Expr, body: &Stmt) {
        let start = self.fresh_label("while_start");
        let end = self.fresh_label("while_end");

        self.push(Instruction::Label(start.clone()));
        let cond = self.gen_expr(cond);
        self.push(Instruction::Cmp(cond, Operand::Int(0)));
        self.push(Instruction::Je(end.clone()));

        self.gen_stmt(body);
        self.push(Instruction::Jmp(start));
        self.push(Instruction::Label(end));
    }
}

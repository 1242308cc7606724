// Expression lowering
//
// Every expression lowers to an Operand: literals and variables stand for
// themselves, everything else lands in a fresh temporary. `%` and `^` have no
// primitive instruction and expand into counted loops.

use crate::CodeGenerator;
use crate::pseudo::{Condition, Instruction, Operand};
use model::{BinaryOp, Expr, FunctionCall};

impl CodeGenerator {
    /// Lower `expr`, appending any instructions it needs, and return the
    /// operand holding its value.
    pub fn gen_expr(&mut self, expr: &Expr) -> Operand {
        match expr {
            Expr::Int(i) => Operand::Int(*i),
            Expr::Float(x) => Operand::Float(*x),
            Expr::Bool(b) => Operand::Bool(*b),
            Expr::Variable(name) => Operand::Var(name.clone()),
            Expr::Call(call) => self.gen_call_expr(call),
            Expr::Binary { left, op, right } => {
                let left = self.gen_expr(left);
                let right = self.gen_expr(right);
                self.gen_binary(*op, left, right)
            }
        }
    }

    fn gen_call_expr(&mut self, call: &FunctionCall) -> Operand {
        let args = call.args.iter().map(|arg| self.gen_expr(arg)).collect();
        let dst = self.fresh_temp();
        self.push(Instruction::Call {
            name: call.name.clone(),
            args,
            dst: Some(dst),
        });
        dst.into()
    }

    fn gen_binary(&mut self, op: BinaryOp, left: Operand, right: Operand) -> Operand {
        match op {
            BinaryOp::Add => self.gen_arith(Instruction::Add, left, right),
            BinaryOp::Mul => self.gen_arith(Instruction::Mul, left, right),
            BinaryOp::Div => self.gen_arith(Instruction::Div, left, right),
            // a - b  =>  ADD t, a, -b
            BinaryOp::Sub => self.gen_arith(Instruction::Add, left, right.negated()),
            BinaryOp::Mod => self.gen_modulo(left, right),
            BinaryOp::Pow => self.gen_power(left, right),
            BinaryOp::Less => self.gen_compare(Condition::Less, left, right),
            BinaryOp::Greater => self.gen_compare(Condition::Greater, left, right),
            BinaryOp::LessEqual => self.gen_compare(Condition::LessEqual, left, right),
            BinaryOp::GreaterEqual => self.gen_compare(Condition::GreaterEqual, left, right),
            BinaryOp::EqualEqual => self.gen_compare(Condition::Equal, left, right),
            BinaryOp::NotEqual => self.gen_compare(Condition::NotEqual, left, right),
            BinaryOp::LogicalAnd => self.gen_arith(Instruction::And, left, right),
            BinaryOp::LogicalOr => self.gen_arith(Instruction::Or, left, right),
        }
    }

    fn gen_arith<F>(&mut self, make: F, left: Operand, right: Operand) -> Operand
    where
        F: FnOnce(Operand, Operand, Operand) -> Instruction,
    {
        let dst: Operand = self.fresh_temp().into();
        self.push(make(dst.clone(), left, right));
        dst
    }

    fn gen_compare(&mut self, cond: Condition, left: Operand, right: Operand) -> Operand {
        self.push(Instruction::Cmp(left, right));
        let dst: Operand = self.fresh_temp().into();
        self.push(Instruction::Set(cond, dst.clone()));
        dst
    }

    /// Repeated subtraction: the remainder temporary is the result.
    fn gen_modulo(&mut self, left: Operand, right: Operand) -> Operand {
        let rem: Operand = self.fresh_temp().into();
        self.push(Instruction::Mov(rem.clone(), left));

        let loop_label = self.fresh_label("mod_loop");
        let end_label = self.fresh_label("mod_end");

        self.push(Instruction::Label(loop_label.clone()));
        self.push(Instruction::Cmp(rem.clone(), right.clone()));
        self.push(Instruction::Jl(end_label.clone()));
        self.push(Instruction::Add(rem.clone(), rem.clone(), right.negated()));
        self.push(Instruction::Jmp(loop_label));
        self.push(Instruction::Label(end_label));
        rem
    }

    /// Repeated multiplication counting the exponent down to zero. A negative
    /// exponent never reaches zero.
    fn gen_power(&mut self, base: Operand, exponent: Operand) -> Operand {
        let result: Operand = self.fresh_temp().into();
        self.push(Instruction::Mov(result.clone(), Operand::Int(1)));
        let counter: Operand = self.fresh_temp().into();
        self.push(Instruction::Mov(counter.clone(), exponent));

        let loop_label = self.fresh_label("pow_loop");
        let end_label = self.fresh_label("pow_end");

        self.push(Instruction::Label(loop_label.clone()));
        self.push(Instruction::Cmp(counter.clone(), Operand::Int(0)));
        self.push(Instruction::Je(end_label.clone()));
        self.push(Instruction::Mul(result.clone(), result.clone(), base));
        self.push(Instruction::Add(counter.clone(), counter.clone(), Operand::Int(-1)));
        self.push(Instruction::Jmp(loop_label));
        self.push(Instruction::Label(end_label));
        result
    }
}

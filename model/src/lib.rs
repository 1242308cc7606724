mod token;

pub use token::{Token, TokenKind};

use std::fmt;

/// Declared type of a variable, parameter or function result.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Type {
    Int,
    Bool,
    Float,
}

impl Type {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Type::Int => "int",
            Type::Bool => "bool",
            Type::Float => "float",
        })
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub declarations: Vec<Declaration>,
}

impl Program {
    pub fn globals(&self) -> impl Iterator<Item = &VariableDeclaration> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Variable(var) => Some(var),
            Declaration::Function(_) => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDefinition> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Function(function) => Some(function),
            Declaration::Variable(_) => None,
        })
    }
}

/// Top-level item, kept in source order.
#[derive(Debug, PartialEq, Clone)]
pub enum Declaration {
    Variable(VariableDeclaration),
    Function(FunctionDefinition),
}

#[derive(Debug, PartialEq, Clone)]
pub struct VariableDeclaration {
    pub r#type: Type,
    pub name: String,
    pub init: Expr,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionDefinition {
    pub return_type: Type,
    pub name: String,
    pub params: Vec<(Type, String)>,
    pub body: Block,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Stmt {
    Declaration(VariableDeclaration),
    Assignment {
        name: String,
        value: Expr,
    },
    Return(Expr),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    Block(Block),
    Call(FunctionCall),
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Int(i64),
    // Never produced by the parser: the source language has no float literal.
    Float(f64),
    Bool(bool),
    Variable(String),
    Call(FunctionCall),
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    EqualEqual,
    NotEqual,
    LogicalAnd,
    LogicalOr,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "^",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::EqualEqual => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

use model::{BinaryOp, Type};
use thiserror::Error;

/// First rule violation found by the analyzer. Carries no source position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("Redefinition of function {0}")]
    FunctionRedefinition(String),

    #[error("Redeclaration of variable {0}")]
    Redeclaration(String),

    #[error("Variable {name} declared as {declared} but initialized with {found}")]
    InitializerMismatch {
        name: String,
        declared: Type,
        found: Type,
    },

    #[error("Assignment to undeclared variable {0}")]
    UndeclaredAssignment(String),

    #[error("Cannot assign {found} to variable {name} of type {declared}")]
    AssignmentMismatch {
        name: String,
        declared: Type,
        found: Type,
    },

    #[error("Undeclared variable {0}")]
    UndeclaredVariable(String),

    #[error("Condition of '{statement}' must be bool, found {found}")]
    NonBoolCondition { statement: &'static str, found: Type },

    #[error("Call to undefined function {0}")]
    UndefinedFunction(String),

    #[error("Function {name} expects {expected} arguments, got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Operator '{op}' requires numeric operands, found {left} and {right}")]
    NonNumericOperands { op: BinaryOp, left: Type, right: Type },

    #[error("Operator '{op}' requires operands of the same type, found {left} and {right}")]
    MismatchedOperands { op: BinaryOp, left: Type, right: Type },

    #[error("Operator '{op}' requires bool operands, found {left} and {right}")]
    NonBoolOperands { op: BinaryOp, left: Type, right: Type },
}

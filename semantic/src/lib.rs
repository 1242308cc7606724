mod error;

pub use error::SemanticError;

use log::debug;
use model::{
    BinaryOp, Block, Declaration, Expr, FunctionCall, FunctionDefinition, Program, Stmt, Type,
    VariableDeclaration,
};
use std::collections::HashMap;

type Scope = HashMap<String, Type>;

/// Check a program with a fresh analyzer.
pub fn analyze(program: &Program) -> Result<(), SemanticError> {
    SemanticAnalyzer::new().analyze(program)
}

pub struct SemanticAnalyzer<'a> {
    global_scope: Scope,
    // One frame per function being analyzed; function bodies are one flat scope.
    scopes: Vec<Scope>,
    functions: HashMap<&'a str, &'a FunctionDefinition>,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new() -> Self {
        Self {
            global_scope: HashMap::new(),
            scopes: Vec::new(),
            functions: HashMap::new(),
        }
    }

    pub fn analyze(&mut self, program: &'a Program) -> Result<(), SemanticError> {
        self.global_scope.clear();
        self.scopes.clear();
        self.functions.clear();

        // Every function is callable from everywhere, whatever the declaration order
        for function in program.functions() {
            if self.functions.insert(&function.name, function).is_some() {
                return Err(SemanticError::FunctionRedefinition(function.name.clone()));
            }
        }

        for declaration in &program.declarations {
            match declaration {
                Declaration::Variable(var) => self.analyze_declaration(var)?,
                Declaration::Function(function) => self.analyze_function(function)?,
            }
        }
        Ok(())
    }

    fn analyze_function(&mut self, function: &FunctionDefinition) -> Result<(), SemanticError> {
        debug!("analyzing function {} ({} params)", function.name, function.params.len());

        self.enter_scope();
        let result = self
            .bind_params(function)
            .and_then(|()| self.analyze_block(&function.body));
        self.exit_scope();
        result
    }

    // Parameters may shadow globals but not each other
    fn bind_params(&mut self, function: &FunctionDefinition) -> Result<(), SemanticError> {
        for (r#type, name) in &function.params {
            if self.scopes.last().is_some_and(|scope| scope.contains_key(name)) {
                return Err(SemanticError::Redeclaration(name.clone()));
            }
            self.add_symbol(name.clone(), *r#type);
        }
        Ok(())
    }

    fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn exit_scope(&mut self) {
        self.scopes.pop();
    }

    fn add_symbol(&mut self, name: String, r#type: Type) {
        match self.scopes.last_mut() {
            Some(scope) => scope.insert(name, r#type),
            None => self.global_scope.insert(name, r#type),
        };
    }

    fn lookup_symbol(&self, name: &str) -> Option<Type> {
        self.scopes
            .last()
            .and_then(|scope| scope.get(name))
            .or_else(|| self.global_scope.get(name))
            .copied()
    }

    fn is_declared_here(&self, name: &str) -> bool {
        self.global_scope.contains_key(name)
            || self.scopes.last().is_some_and(|scope| scope.contains_key(name))
    }

    fn analyze_block(&mut self, block: &Block) -> Result<(), SemanticError> {
        for stmt in &block.statements {
            self.analyze_stmt(stmt)?;
        }
        Ok(())
    }

    fn analyze_declaration(&mut self, var: &VariableDeclaration) -> Result<(), SemanticError> {
        if self.is_declared_here(&var.name) {
            return Err(SemanticError::Redeclaration(var.name.clone()));
        }

        // No widening here, even though arithmetic widens int to float
        let found = self.infer_expr(&var.init)?;
        if found != var.r#type {
            return Err(SemanticError::InitializerMismatch {
                name: var.name.clone(),
                declared: var.r#type,
                found,
            });
        }

        self.add_symbol(var.name.clone(), var.r#type);
        Ok(())
    }

    fn analyze_stmt(&mut self, stmt: &Stmt) -> Result<(), SemanticError> {
        match stmt {
            Stmt::Declaration(var) => self.analyze_declaration(var)?,
            Stmt::Assignment { name, value } => {
                let declared = self
                    .lookup_symbol(name)
                    .ok_or_else(|| SemanticError::UndeclaredAssignment(name.clone()))?;
                let found = self.infer_expr(value)?;
                if found != declared {
                    return Err(SemanticError::AssignmentMismatch {
                        name: name.clone(),
                        declared,
                        found,
                    });
                }
            }
            Stmt::Return(expr) => {
                self.infer_expr(expr)?;
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.expect_condition("if", cond)?;
                self.analyze_stmt(then_branch)?;
                if let Some(else_stmt) = else_branch {
                    self.analyze_stmt(else_stmt)?;
                }
            }
            Stmt::While { cond, body } => {
                self.expect_condition("while", cond)?;
                self.analyze_stmt(body)?;
            }
            // Nested blocks share the function's scope
            Stmt::Block(block) => self.analyze_block(block)?,
            Stmt::Call(call) => {
                self.analyze_call(call)?;
            }
        }
        Ok(())
    }

    fn expect_condition(&mut self, statement: &'static str, cond: &Expr) -> Result<(), SemanticError> {
        match self.infer_expr(cond)? {
            Type::Bool => Ok(()),
            found => Err(SemanticError::NonBoolCondition { statement, found }),
        }
    }

    /// A call always yields `int`, and argument types are not matched against
    /// the parameters; only existence and arity are checked.
    fn analyze_call(&mut self, call: &FunctionCall) -> Result<Type, SemanticError> {
        let function = self
            .functions
            .get(call.name.as_str())
            .copied()
            .ok_or_else(|| SemanticError::UndefinedFunction(call.name.clone()))?;

        if call.args.len() != function.params.len() {
            return Err(SemanticError::ArityMismatch {
                name: call.name.clone(),
                expected: function.params.len(),
                found: call.args.len(),
            });
        }

        for arg in &call.args {
            self.infer_expr(arg)?;
        }
        Ok(Type::Int)
    }

    fn infer_expr(&mut self, expr: &Expr) -> Result<Type, SemanticError> {
        match expr {
            Expr::Int(_) => Ok(Type::Int),
            Expr::Float(_) => Ok(Type::Float),
            Expr::Bool(_) => Ok(Type::Bool),
            Expr::Variable(name) => self
                .lookup_symbol(name)
                .ok_or_else(|| SemanticError::UndeclaredVariable(name.clone())),
            Expr::Call(call) => self.analyze_call(call),
            Expr::Binary { left, op, right } => {
                let left = self.infer_expr(left)?;
                let right = self.infer_expr(right)?;
                infer_binary(*op, left, right)
            }
        }
    }
}

impl Default for SemanticAnalyzer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn infer_binary(op: BinaryOp, left: Type, right: Type) -> Result<Type, SemanticError> {
    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod | BinaryOp::Pow => {
            if !left.is_numeric() || !right.is_numeric() {
                return Err(SemanticError::NonNumericOperands { op, left, right });
            }
            if left == Type::Float || right == Type::Float {
                Ok(Type::Float)
            } else {
                Ok(Type::Int)
            }
        }
        BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEqual | BinaryOp::GreaterEqual => {
            if !left.is_numeric() || !right.is_numeric() {
                return Err(SemanticError::NonNumericOperands { op, left, right });
            }
            Ok(Type::Bool)
        }
        BinaryOp::EqualEqual | BinaryOp::NotEqual => {
            if left != right {
                return Err(SemanticError::MismatchedOperands { op, left, right });
            }
            Ok(Type::Bool)
        }
        BinaryOp::LogicalAnd | BinaryOp::LogicalOr => {
            if left != Type::Bool || right != Type::Bool {
                return Err(SemanticError::NonBoolOperands { op, left, right });
            }
            Ok(Type::Bool)
        }
    }
}

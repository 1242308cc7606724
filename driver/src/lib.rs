// Driver library: runs the full pipeline over one source text
//
// Tokenize -> parse -> analyze -> generate. The first failing stage ends the
// compilation and its error is the only one reported.

use codegen::Instruction;
use log::debug;
use model::Program;
use thiserror::Error;

pub use codegen::{emit, render};

#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Syntax(#[from] parser::SyntaxError),

    #[error("semantic error: {0}")]
    Semantic(#[from] semantic::SemanticError),

    #[error(transparent)]
    Codegen(#[from] codegen::CodegenError),
}

/// Tokenize and parse only.
pub fn parse(source: &str) -> Result<Program, CompileError> {
    let tokens = lexer::tokenize(source);
    Ok(parser::parse_program(&tokens)?)
}

/// Parse and run semantic analysis, handing back the checked tree.
pub fn check(source: &str) -> Result<Program, CompileError> {
    let program = parse(source)?;
    semantic::analyze(&program)?;
    Ok(program)
}

/// Compile source text to a pseudo-assembly listing.
pub fn compile(source: &str) -> Result<Vec<Instruction>, CompileError> {
    let program = check(source)?;
    let instructions = codegen::generate(&program)?;
    debug!("compiled {} instructions", instructions.len());
    Ok(instructions)
}

/// Same as [`compile`], rendered as newline-terminated text.
pub fn compile_to_text(source: &str) -> Result<String, CompileError> {
    compile(source).map(|instructions| emit(&instructions))
}

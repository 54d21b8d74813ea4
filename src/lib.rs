//! .projet to C translator
//!
//! Compiles programs written in a small line-numbered assembly language
//! (`Var` declarations followed by numbered `Instructions`) into a single
//! self-contained C translation unit.
//!
//! The pipeline is lexer → parser → semantic analysis → C emission. Each
//! stage stops at its first error.

pub mod ast;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod semantic;
pub mod token;

use std::fs;
use std::path::Path;

pub use error::{CompileError, Result, SemanticError};

/// Pipeline configuration
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Reject stray tokens in declaration and instruction lists instead of
    /// skipping them
    pub strict: bool,
}

/// Result of a successful compilation
#[derive(Debug, Clone)]
pub struct Compilation {
    pub program: ast::Program,
    pub symbols: semantic::SymbolTable,
    pub c_code: String,
    /// Tokens skipped by the lenient parser
    pub warnings: Vec<parser::SkippedToken>,
}

/// Run every stage on `source` and keep the intermediate results
pub fn compile_program(source: &str, options: &Options) -> Result<Compilation> {
    let tokens = lexer::tokenize(source)?;

    let mut parser = parser::Parser::with_options(tokens, options);
    let program = parser.parse_program()?;
    let warnings = parser.into_warnings();

    let symbols = semantic::analyse(&program)?;
    let c_code = codegen::generate_c(&program, &symbols);

    Ok(Compilation {
        program,
        symbols,
        c_code,
        warnings,
    })
}

/// Translate source text to C with default options
pub fn compile(source: &str) -> Result<String> {
    compile_with(source, &Options::default())
}

pub fn compile_with(source: &str, options: &Options) -> Result<String> {
    compile_program(source, options).map(|c| c.c_code)
}

/// Read and translate a `.projet` file
pub fn compile_file(path: impl AsRef<Path>, options: &Options) -> Result<Compilation> {
    let source = fs::read_to_string(path)?;
    compile_program(&source, options)
}

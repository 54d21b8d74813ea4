//! Error types for the .projet translator

use thiserror::Error;

use crate::ast::OperationKind;

/// Semantic rule violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("variable '{name}' is already declared")]
    DuplicateDeclaration { name: String },

    #[error("invalid size {size} for array '{name}' (must be positive)")]
    InvalidArraySize { name: String, size: i64 },

    #[error("variable '{name}' is not declared")]
    UndeclaredVariable { name: String },

    #[error("'{name}' is not an array")]
    NotAnArray { name: String },

    #[error("'{name}' is an array and cannot be used as a scalar")]
    NotAScalar { name: String },

    #[error("index {index} is out of range for array '{name}' of size {size}")]
    IndexOutOfRange { name: String, index: i64, size: i64 },

    #[error("instruction {instruction}: '{operation}' cannot write to a literal")]
    NotAssignable {
        instruction: i64,
        operation: OperationKind,
    },

    #[error("instruction {instruction}: jump target must be an instruction number")]
    InvalidJumpTarget { instruction: i64 },

    #[error("instruction {instruction}: jumps to undefined instruction {target}")]
    UndefinedLabel { instruction: i64, target: i64 },

    #[error("instruction number {number} is defined more than once")]
    DuplicateLabel { number: i64 },

    #[error("instruction {instruction}: call operand must be an identifier")]
    InvalidProcedure { instruction: i64 },

    #[error("procedure '{name}' is not declared")]
    UndeclaredProcedure { name: String },

    #[error("instruction {instruction}: division by zero")]
    DivisionByZero { instruction: i64 },
}

/// Compiler error
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexer error at line {line}, column {column}: invalid character '{character}'")]
    Lexer {
        character: char,
        line: usize,
        column: usize,
    },

    #[error("Syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Semantic error at line {line}: {kind}")]
    Semantic { line: usize, kind: SemanticError },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn lexer(character: char, line: usize, column: usize) -> Self {
        Self::Lexer {
            character,
            line,
            column,
        }
    }

    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    pub fn semantic(line: usize, kind: SemanticError) -> Self {
        Self::Semantic { line, kind }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;

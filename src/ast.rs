//! .projet Abstract Syntax Tree
//!
//! A program is a declaration block followed by numbered instructions, each
//! wrapping at most one operation.

use std::fmt;

use crate::token::TokenKind;

/// A complete .projet program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub declarations: Vec<Declaration>,
    pub instructions: Vec<Instruction>,
}

// =============================================================================
// Declarations
// =============================================================================

/// Declaration node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// name: byte
    Scalar { name: String, line: usize },

    /// name: Array[size]
    Array { name: String, size: i64, line: usize },
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Scalar { name, .. } => name,
            Declaration::Array { name, .. } => name,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Declaration::Scalar { line, .. } => *line,
            Declaration::Array { line, .. } => *line,
        }
    }
}

// =============================================================================
// Instructions
// =============================================================================

/// `number : operation ;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub number: i64,
    /// `None` for a no-op body
    pub operation: Option<Operation>,
    pub line: usize,
}

/// How many operands an operation takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// halt, isFull
    Nullary,
    /// not, input, print, push, pop, call
    Unary,
    /// jmp, jz, js, jo: a single instruction number
    Jump,
    /// mov, add, sub, mult, div, and, or
    Binary,
}

/// Operation verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Mov,
    Add,
    Sub,
    Mult,
    Div,
    And,
    Or,
    Not,
    Jmp,
    Jz,
    Js,
    Jo,
    Input,
    Print,
    Halt,
    Push,
    Pop,
    IsFull,
    Call,
}

impl OperationKind {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Mov => Self::Mov,
            TokenKind::Add => Self::Add,
            TokenKind::Sub => Self::Sub,
            TokenKind::Mult => Self::Mult,
            TokenKind::Div => Self::Div,
            TokenKind::And => Self::And,
            TokenKind::Or => Self::Or,
            TokenKind::Not => Self::Not,
            TokenKind::Jmp => Self::Jmp,
            TokenKind::Jz => Self::Jz,
            TokenKind::Js => Self::Js,
            TokenKind::Jo => Self::Jo,
            TokenKind::Input => Self::Input,
            TokenKind::Print => Self::Print,
            TokenKind::Halt => Self::Halt,
            TokenKind::Push => Self::Push,
            TokenKind::Pop => Self::Pop,
            TokenKind::IsFull => Self::IsFull,
            TokenKind::Call => Self::Call,
            _ => return None,
        };
        Some(op)
    }

    pub fn arity(self) -> Arity {
        match self {
            Self::Halt | Self::IsFull => Arity::Nullary,
            Self::Not | Self::Input | Self::Print | Self::Push | Self::Pop | Self::Call => {
                Arity::Unary
            }
            Self::Jmp | Self::Jz | Self::Js | Self::Jo => Arity::Jump,
            Self::Mov | Self::Add | Self::Sub | Self::Mult | Self::Div | Self::And | Self::Or => {
                Arity::Binary
            }
        }
    }

    /// Whether operand1 is written to
    pub fn writes_first_operand(self) -> bool {
        matches!(
            self,
            Self::Mov
                | Self::Add
                | Self::Sub
                | Self::Mult
                | Self::Div
                | Self::And
                | Self::Or
                | Self::Not
                | Self::Input
                | Self::Pop
        )
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Mov => "mov",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mult => "mult",
            Self::Div => "div",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Jmp => "jmp",
            Self::Jz => "jz",
            Self::Js => "js",
            Self::Jo => "jo",
            Self::Input => "input",
            Self::Print => "print",
            Self::Halt => "halt",
            Self::Push => "push",
            Self::Pop => "pop",
            Self::IsFull => "isFull",
            Self::Call => "call",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// An operation and its operands; how many are present follows `kind.arity()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub kind: OperationKind,
    pub operand1: Option<Operand>,
    pub operand2: Option<Operand>,
}

impl Operation {
    pub fn nullary(kind: OperationKind) -> Self {
        Self {
            kind,
            operand1: None,
            operand2: None,
        }
    }

    pub fn unary(kind: OperationKind, operand: Operand) -> Self {
        Self {
            kind,
            operand1: Some(operand),
            operand2: None,
        }
    }

    pub fn binary(kind: OperationKind, operand1: Operand, operand2: Operand) -> Self {
        Self {
            kind,
            operand1: Some(operand1),
            operand2: Some(operand2),
        }
    }
}

// =============================================================================
// Operands
// =============================================================================

/// Operand node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Number(i64),
    Variable(String),
    Register(String),
    /// Index is a `Number` or a `Variable`, never nested
    ArrayAccess { name: String, index: Box<Operand> },
}

//! Token model shared by the lexer and the parser.

use std::fmt;

use logos::Logos;

/// Lexical categories of the .projet language.
///
/// Keywords and register names are case-sensitive; any other word is an
/// identifier.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f\v]+")]
#[logos(skip r"#[^\n]*")]
pub enum TokenKind {
    // === Block keywords ===
    #[token("Var")]
    Var,

    #[token("Instructions")]
    Instructions,

    // === Type keywords ===
    #[token("byte")]
    Byte,

    #[token("Array")]
    Array,

    // === Operations ===
    #[token("mov")]
    Mov,

    #[token("add")]
    Add,

    #[token("sub")]
    Sub,

    #[token("mult")]
    Mult,

    #[token("div")]
    Div,

    #[token("and")]
    And,

    #[token("or")]
    Or,

    #[token("not")]
    Not,

    #[token("jmp")]
    Jmp,

    #[token("jz")]
    Jz,

    #[token("js")]
    Js,

    #[token("jo")]
    Jo,

    #[token("input")]
    Input,

    #[token("print")]
    Print,

    #[token("halt")]
    Halt,

    #[token("push")]
    Push,

    #[token("pop")]
    Pop,

    #[token("isFull")]
    IsFull,

    #[token("call")]
    Call,

    // === Operands ===
    #[token("AX")]
    #[token("BX")]
    #[token("CX")]
    #[token("DX")]
    Register,

    #[regex(r"[A-Za-z][A-Za-z0-9_]*")]
    Identifier,

    /// Decimal, non-negative
    #[regex(r"[0-9]+")]
    Number,

    // === Punctuation ===
    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Multiply,

    #[token("/")]
    Divide,

    /// No-op instruction body. `#` in source text always opens a comment,
    /// so only hand-built token streams carry this.
    Hash,

    Eof,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Var => "VAR",
            TokenKind::Instructions => "INSTRUCTIONS",
            TokenKind::Byte => "BYTE",
            TokenKind::Array => "ARRAY",
            TokenKind::Mov => "MOV",
            TokenKind::Add => "ADD",
            TokenKind::Sub => "SUB",
            TokenKind::Mult => "MULT",
            TokenKind::Div => "DIV",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Jmp => "JMP",
            TokenKind::Jz => "JZ",
            TokenKind::Js => "JS",
            TokenKind::Jo => "JO",
            TokenKind::Input => "INPUT",
            TokenKind::Print => "PRINT",
            TokenKind::Halt => "HALT",
            TokenKind::Push => "PUSH",
            TokenKind::Pop => "POP",
            TokenKind::IsFull => "IS_FULL",
            TokenKind::Call => "CALL",
            TokenKind::Register => "REGISTER",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::Colon => "COLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Multiply => "MULTIPLY",
            TokenKind::Divide => "DIVIDE",
            TokenKind::Hash => "HASH",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token with its source text and 1-based position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// `None` only for EOF
    pub text: Option<String>,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: Some(text.into()),
            line,
            column,
        }
    }

    pub fn eof(line: usize, column: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            text: None,
            line,
            column,
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => write!(
                f,
                "Token({}, {}, line={}, col={})",
                self.kind, text, self.line, self.column
            ),
            None => write!(f, "Token({}, line={}, col={})", self.kind, self.line, self.column),
        }
    }
}

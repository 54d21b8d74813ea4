//! .projet Parser
//!
//! Recursive descent parser over the token stream.
//!
//! ```text
//! program     := 'Var' declaration* 'Instructions' instruction*
//! declaration := IDENT ':' ('byte' | 'Array' '[' NUMBER ']') ','?
//! instruction := NUMBER ':' operation ';'
//! operation   := '#' | OP operand? (',' operand)?
//! operand     := NUMBER | REGISTER | IDENT ('[' (NUMBER | IDENT) ']')?
//! ```
//!
//! Outside strict mode, tokens that cannot start a declaration or an
//! instruction are skipped and reported through [`Parser::warnings`].

use std::fmt;

use crate::ast::*;
use crate::error::{CompileError, Result};
use crate::token::{Token, TokenKind};
use crate::Options;

/// A token dropped while scanning a declaration or instruction list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedToken {
    pub token: Token,
    pub context: &'static str,
}

impl fmt::Display for SkippedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: skipped {} '{}' in {}",
            self.token.line,
            self.token.kind,
            self.token.text(),
            self.context
        )
    }
}

/// Parser state
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    strict: bool,
    warnings: Vec<SkippedToken>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_options(tokens, &Options::default())
    }

    pub fn with_options(mut tokens: Vec<Token>, options: &Options) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (line, column) = tokens.last().map(|t| (t.line, t.column)).unwrap_or((1, 1));
            tokens.push(Token::eof(line, column));
        }
        Self {
            tokens,
            pos: 0,
            strict: options.strict,
            warnings: Vec::new(),
        }
    }

    /// Tokens skipped so far in lenient mode
    pub fn warnings(&self) -> &[SkippedToken] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<SkippedToken> {
        self.warnings
    }

    /// Parse a complete program
    pub fn parse_program(&mut self) -> Result<Program> {
        self.expect(TokenKind::Var)?;
        let declarations = self.parse_declarations()?;

        self.expect(TokenKind::Instructions)?;
        let instructions = self.parse_instructions()?;

        Ok(Program {
            declarations,
            instructions,
        })
    }

    // =========================================================================
    // Token Management
    // =========================================================================

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn error(&self, expected: impl fmt::Display) -> CompileError {
        CompileError::syntax(
            self.current().line,
            format!("Expected {}, found {}", expected, self.current_kind()),
        )
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(kind))
        }
    }

    fn expect_number(&mut self) -> Result<i64> {
        let token = self.expect(TokenKind::Number)?;
        token.text().parse().map_err(|_| {
            CompileError::syntax(
                token.line,
                format!("integer literal '{}' is out of range", token.text()),
            )
        })
    }

    /// Drop the current token, or reject it in strict mode
    fn skip(&mut self, expected: TokenKind, context: &'static str) -> Result<()> {
        if self.strict {
            return Err(self.error(expected));
        }
        let token = self.advance();
        self.warnings.push(SkippedToken { token, context });
        Ok(())
    }

    // =========================================================================
    // Declaration Parsing
    // =========================================================================

    fn parse_declarations(&mut self) -> Result<Vec<Declaration>> {
        let mut declarations = Vec::new();

        while !self.check(TokenKind::Instructions) {
            match self.current_kind() {
                TokenKind::Eof => return Err(self.error(TokenKind::Instructions)),
                TokenKind::Identifier => {
                    declarations.push(self.parse_declaration()?);
                    if self.check(TokenKind::Comma) {
                        self.advance();
                    } else if self.strict && !self.check(TokenKind::Instructions) {
                        return Err(self.error(TokenKind::Comma));
                    }
                }
                _ => self.skip(TokenKind::Identifier, "declarations")?,
            }
        }

        Ok(declarations)
    }

    fn parse_declaration(&mut self) -> Result<Declaration> {
        let name_token = self.expect(TokenKind::Identifier)?;
        let line = name_token.line;
        let name = name_token.text().to_string();
        self.expect(TokenKind::Colon)?;

        match self.current_kind() {
            TokenKind::Byte => {
                self.advance();
                Ok(Declaration::Scalar { name, line })
            }
            TokenKind::Array => {
                self.advance();
                self.expect(TokenKind::LBracket)?;
                let size = self.expect_number()?;
                self.expect(TokenKind::RBracket)?;
                Ok(Declaration::Array { name, size, line })
            }
            _ => Err(self.error("variable type (byte or Array)")),
        }
    }

    // =========================================================================
    // Instruction Parsing
    // =========================================================================

    fn parse_instructions(&mut self) -> Result<Vec<Instruction>> {
        let mut instructions = Vec::new();

        while !self.check(TokenKind::Eof) {
            if self.check(TokenKind::Number) {
                instructions.push(self.parse_instruction()?);
            } else {
                self.skip(TokenKind::Number, "instructions")?;
            }
        }

        Ok(instructions)
    }

    fn parse_instruction(&mut self) -> Result<Instruction> {
        let line = self.current().line;
        let number = self.expect_number()?;
        self.expect(TokenKind::Colon)?;
        let operation = self.parse_operation()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Instruction {
            number,
            operation,
            line,
        })
    }

    fn parse_operation(&mut self) -> Result<Option<Operation>> {
        if self.check(TokenKind::Hash) {
            self.advance();
            return Ok(None);
        }

        let kind = OperationKind::from_token(self.current_kind())
            .ok_or_else(|| self.error("operation"))?;
        self.advance();

        let operation = match kind.arity() {
            Arity::Nullary => Operation::nullary(kind),
            Arity::Unary => Operation::unary(kind, self.parse_operand()?),
            Arity::Jump => Operation::unary(kind, Operand::Number(self.expect_number()?)),
            Arity::Binary => {
                let operand1 = self.parse_operand()?;
                self.expect(TokenKind::Comma)?;
                let operand2 = self.parse_operand()?;
                Operation::binary(kind, operand1, operand2)
            }
        };

        Ok(Some(operation))
    }

    // =========================================================================
    // Operand Parsing
    // =========================================================================

    fn parse_operand(&mut self) -> Result<Operand> {
        match self.current_kind() {
            TokenKind::Number => Ok(Operand::Number(self.expect_number()?)),
            TokenKind::Register => {
                let token = self.advance();
                Ok(Operand::Register(token.text().to_string()))
            }
            TokenKind::Identifier => {
                let name = self.advance().text().to_string();
                if self.check(TokenKind::LBracket) {
                    self.advance();
                    let index = self.parse_array_index()?;
                    self.expect(TokenKind::RBracket)?;
                    return Ok(Operand::ArrayAccess {
                        name,
                        index: Box::new(index),
                    });
                }
                Ok(Operand::Variable(name))
            }
            _ => Err(self.error("operand")),
        }
    }

    fn parse_array_index(&mut self) -> Result<Operand> {
        match self.current_kind() {
            TokenKind::Number => Ok(Operand::Number(self.expect_number()?)),
            TokenKind::Identifier => Ok(Operand::Variable(self.advance().text().to_string())),
            _ => Err(self.error("array index")),
        }
    }
}

/// Parse a token stream into a program
pub fn parse(tokens: Vec<Token>) -> Result<Program> {
    Parser::new(tokens).parse_program()
}

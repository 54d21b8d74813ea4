//! Semantic Analysis for .projet programs
//!
//! Symbol resolution, array bounds on literal indices, jump target and
//! division checks. Stops at the first violation.

use indexmap::{IndexMap, IndexSet};

use crate::ast::*;
use crate::error::{CompileError, Result, SemanticError};

/// Symbol kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Scalar,
    Array,
}

/// Symbol information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Element count, arrays only
    pub size: Option<i64>,
}

/// Declared variables in declaration order, plus the instruction labels
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: IndexMap<String, Symbol>,
    labels: IndexSet<i64>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, symbol: Symbol) -> std::result::Result<(), SemanticError> {
        if self.symbols.contains_key(&symbol.name) {
            return Err(SemanticError::DuplicateDeclaration { name: symbol.name });
        }
        self.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns false if the label was already present
    pub fn add_label(&mut self, number: i64) -> bool {
        self.labels.insert(number)
    }

    pub fn has_label(&self, number: i64) -> bool {
        self.labels.contains(&number)
    }

    pub fn labels(&self) -> impl Iterator<Item = i64> + '_ {
        self.labels.iter().copied()
    }
}

/// A jump seen during the instruction walk, resolved once every label is known
struct PendingJump {
    target: i64,
    instruction: i64,
    line: usize,
}

/// Semantic analyser
pub struct Analyser {
    symbols: SymbolTable,
    jumps: Vec<PendingJump>,
    /// Line of the declaration or instruction being checked
    line: usize,
}

impl Analyser {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            jumps: Vec::new(),
            line: 0,
        }
    }

    /// Analyse a program, consuming the analyser and returning its symbol table
    pub fn analyse(mut self, program: &Program) -> Result<SymbolTable> {
        for decl in &program.declarations {
            self.line = decl.line();
            self.declare(decl).map_err(|kind| self.error(kind))?;
        }

        for instruction in &program.instructions {
            self.line = instruction.line;
            self.check_instruction(instruction)
                .map_err(|kind| self.error(kind))?;
        }

        self.verify_jump_targets()?;

        Ok(self.symbols)
    }

    fn error(&self, kind: SemanticError) -> CompileError {
        CompileError::semantic(self.line, kind)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn declare(&mut self, decl: &Declaration) -> std::result::Result<(), SemanticError> {
        let symbol = match decl {
            Declaration::Scalar { name, .. } => Symbol {
                name: name.clone(),
                kind: SymbolKind::Scalar,
                size: None,
            },
            Declaration::Array { name, size, .. } => {
                if *size <= 0 {
                    return Err(SemanticError::InvalidArraySize {
                        name: name.clone(),
                        size: *size,
                    });
                }
                Symbol {
                    name: name.clone(),
                    kind: SymbolKind::Array,
                    size: Some(*size),
                }
            }
        };

        self.symbols.define(symbol)
    }

    // =========================================================================
    // Instructions
    // =========================================================================

    fn check_instruction(
        &mut self,
        instruction: &Instruction,
    ) -> std::result::Result<(), SemanticError> {
        if !self.symbols.add_label(instruction.number) {
            return Err(SemanticError::DuplicateLabel {
                number: instruction.number,
            });
        }

        match &instruction.operation {
            Some(operation) => self.check_operation(instruction.number, operation),
            None => Ok(()),
        }
    }

    fn check_operation(
        &mut self,
        number: i64,
        operation: &Operation,
    ) -> std::result::Result<(), SemanticError> {
        if operation.kind.writes_first_operand()
            && matches!(operation.operand1, Some(Operand::Number(_)))
        {
            return Err(SemanticError::NotAssignable {
                instruction: number,
                operation: operation.kind,
            });
        }

        match operation.kind.arity() {
            Arity::Nullary => Ok(()),
            Arity::Jump => match operation.operand1 {
                Some(Operand::Number(target)) => {
                    self.jumps.push(PendingJump {
                        target,
                        instruction: number,
                        line: self.line,
                    });
                    Ok(())
                }
                _ => Err(SemanticError::InvalidJumpTarget { instruction: number }),
            },
            Arity::Unary if operation.kind == OperationKind::Call => {
                self.check_procedure_call(number, operation.operand1.as_ref())
            }
            Arity::Unary => self.check_optional_operand(operation.operand1.as_ref()),
            Arity::Binary => {
                self.check_optional_operand(operation.operand1.as_ref())?;
                self.check_optional_operand(operation.operand2.as_ref())?;
                if operation.kind == OperationKind::Div
                    && matches!(operation.operand2, Some(Operand::Number(0)))
                {
                    return Err(SemanticError::DivisionByZero { instruction: number });
                }
                Ok(())
            }
        }
    }

    fn check_optional_operand(
        &self,
        operand: Option<&Operand>,
    ) -> std::result::Result<(), SemanticError> {
        operand.map_or(Ok(()), |operand| self.check_operand(operand))
    }

    fn check_operand(&self, operand: &Operand) -> std::result::Result<(), SemanticError> {
        match operand {
            Operand::Number(_) | Operand::Register(_) => Ok(()),
            Operand::Variable(name) => self.check_scalar(name),
            Operand::ArrayAccess { name, index } => {
                let symbol = self
                    .symbols
                    .lookup(name)
                    .ok_or_else(|| SemanticError::UndeclaredVariable { name: name.clone() })?;
                let size = match (symbol.kind, symbol.size) {
                    (SymbolKind::Array, Some(size)) => size,
                    _ => return Err(SemanticError::NotAnArray { name: name.clone() }),
                };
                self.check_array_index(name, size, index)
            }
        }
    }

    fn check_scalar(&self, name: &str) -> std::result::Result<(), SemanticError> {
        match self.symbols.lookup(name) {
            None => Err(SemanticError::UndeclaredVariable {
                name: name.to_string(),
            }),
            Some(symbol) if symbol.kind == SymbolKind::Array => Err(SemanticError::NotAScalar {
                name: name.to_string(),
            }),
            Some(_) => Ok(()),
        }
    }

    /// Literal indices must lie in `[0, size)`; variable indices are only
    /// resolved, their value is a runtime matter
    fn check_array_index(
        &self,
        name: &str,
        size: i64,
        index: &Operand,
    ) -> std::result::Result<(), SemanticError> {
        match index {
            Operand::Number(value) if *value < 0 || *value >= size => {
                Err(SemanticError::IndexOutOfRange {
                    name: name.to_string(),
                    index: *value,
                    size,
                })
            }
            Operand::Number(_) => Ok(()),
            Operand::Variable(index_name) => self.check_scalar(index_name),
            other => self.check_operand(other),
        }
    }

    /// `call` takes a bare identifier naming any declared variable
    fn check_procedure_call(
        &self,
        number: i64,
        operand: Option<&Operand>,
    ) -> std::result::Result<(), SemanticError> {
        match operand {
            Some(Operand::Variable(name)) if self.symbols.lookup(name).is_some() => Ok(()),
            Some(Operand::Variable(name)) => Err(SemanticError::UndeclaredProcedure {
                name: name.clone(),
            }),
            _ => Err(SemanticError::InvalidProcedure { instruction: number }),
        }
    }

    // =========================================================================
    // Labels
    // =========================================================================

    fn verify_jump_targets(&self) -> Result<()> {
        for jump in &self.jumps {
            if !self.symbols.has_label(jump.target) {
                return Err(CompileError::semantic(
                    jump.line,
                    SemanticError::UndefinedLabel {
                        instruction: jump.instruction,
                        target: jump.target,
                    },
                ));
            }
        }
        Ok(())
    }
}

impl Default for Analyser {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyse a program and build its symbol table
pub fn analyse(program: &Program) -> Result<SymbolTable> {
    Analyser::new().analyse(program)
}

//! C Code Generation for .projet programs
//!
//! Direct syntax-directed translation: each instruction becomes a labelled
//! block `L<number>:` inside `main`, so jumps map onto `goto`. Declared
//! variables live in their own `v_` namespace; registers keep bare names.

use crate::ast::*;
use crate::semantic::{SymbolKind, SymbolTable};

/// Capacity of the emitted stack
pub const STACK_SIZE: usize = 1024;

/// Registers, in declaration order
pub const REGISTERS: [&str; 4] = ["AX", "BX", "CX", "DX"];

/// Register tested by conditional jumps and set by `isFull`
const PRIMARY_REGISTER: &str = "AX";

/// Prefix giving declared variables their own C namespace
pub const VARIABLE_PREFIX: &str = "v_";

/// C identifier of a declared variable
pub fn variable_to_c(name: &str) -> String {
    format!("{}{}", VARIABLE_PREFIX, name)
}

/// C code generator
pub struct CodeGenerator<'a> {
    symbols: &'a SymbolTable,
    output: String,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            output: String::new(),
        }
    }

    /// Generate a complete translation unit. Expects a program that passed
    /// semantic analysis.
    pub fn generate(mut self, program: &Program) -> String {
        self.generate_preamble();
        self.generate_globals();
        self.generate_helpers();

        self.line("int main(void) {");
        for instruction in &program.instructions {
            self.generate_instruction(instruction);
        }
        self.line("    return 0;");
        self.line("}");

        self.output
    }

    fn line(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn stmt(&mut self, text: &str) {
        self.output.push_str("    ");
        self.line(text);
    }

    // =========================================================================
    // Globals
    // =========================================================================

    fn generate_preamble(&mut self) {
        self.line("/* Generated by projetc */");
        self.line("#include <stdio.h>");
        self.line("#include <stdint.h>");
        self.line("");
        self.line(&format!("#define STACK_SIZE {}", STACK_SIZE));
        self.line("");

        let registers: Vec<String> = REGISTERS.iter().map(|r| format!("{} = 0", r)).collect();
        self.line(&format!("int16_t {};", registers.join(", ")));
        self.line("int16_t stack[STACK_SIZE];");
        self.line("int stack_ptr = 0;");
        self.line("int OF = 0;");
        self.line("");
    }

    fn generate_globals(&mut self) {
        let symbols = self.symbols;
        for symbol in symbols.symbols() {
            match (symbol.kind, symbol.size) {
                (SymbolKind::Array, Some(size)) => {
                    let name = variable_to_c(&symbol.name);
                    self.line(&format!("int16_t {}[{}] = {{0}};", name, size));
                }
                _ => self.line(&format!("int16_t {} = 0;", variable_to_c(&symbol.name))),
            }
        }
        if !symbols.is_empty() {
            self.line("");
        }
    }

    fn generate_helpers(&mut self) {
        // Overflow silently drops the value, underflow yields zero
        self.line("static void push(int16_t value) {");
        self.line("    if (stack_ptr < STACK_SIZE) {");
        self.line("        stack[stack_ptr++] = value;");
        self.line("    }");
        self.line("}");
        self.line("");
        self.line("static int16_t pop(void) {");
        self.line("    if (stack_ptr > 0) {");
        self.line("        return stack[--stack_ptr];");
        self.line("    }");
        self.line("    return 0;");
        self.line("}");
        self.line("");
        self.line("static int overflows(int32_t value) {");
        self.line("    return value < INT16_MIN || value > INT16_MAX;");
        self.line("}");
        self.line("");
    }

    // =========================================================================
    // Instructions
    // =========================================================================

    fn generate_instruction(&mut self, instruction: &Instruction) {
        self.line(&format!("L{}:", instruction.number));

        let Some(op) = &instruction.operation else {
            self.stmt(";");
            return;
        };

        let dest = op.operand1.as_ref().map(Self::operand_to_c).unwrap_or_default();
        let src = op.operand2.as_ref().map(Self::operand_to_c).unwrap_or_default();

        match op.kind {
            OperationKind::Mov => self.stmt(&format!("{} = {};", dest, src)),
            OperationKind::Add => self.arithmetic(&dest, &src, "+"),
            OperationKind::Sub => self.arithmetic(&dest, &src, "-"),
            OperationKind::Mult => self.arithmetic(&dest, &src, "*"),
            OperationKind::Div => self.stmt(&format!("{} /= {};", dest, src)),
            OperationKind::And => self.stmt(&format!("{} &= {};", dest, src)),
            OperationKind::Or => self.stmt(&format!("{} |= {};", dest, src)),
            OperationKind::Not => self.stmt(&format!("{} = ~{};", dest, dest)),
            OperationKind::Input => {
                self.stmt("printf(\"Input: \");");
                self.stmt(&format!("scanf(\"%hd\", &{});", dest));
            }
            OperationKind::Print => self.stmt(&format!("printf(\"%hd\\n\", {});", dest)),
            OperationKind::Push => self.stmt(&format!("push({});", dest)),
            OperationKind::Pop => self.stmt(&format!("{} = pop();", dest)),
            OperationKind::IsFull => self.stmt(&format!(
                "{} = (stack_ptr >= STACK_SIZE);",
                PRIMARY_REGISTER
            )),
            OperationKind::Call => {
                if let Some(Operand::Variable(name)) = &op.operand1 {
                    self.stmt(&format!("/* call {} */", name));
                }
            }
            OperationKind::Jmp => self.stmt(&format!("goto L{};", dest)),
            OperationKind::Jz => self.stmt(&format!(
                "if ({} == 0) goto L{};",
                PRIMARY_REGISTER, dest
            )),
            OperationKind::Js => self.stmt(&format!(
                "if ({} < 0) goto L{};",
                PRIMARY_REGISTER, dest
            )),
            OperationKind::Jo => self.stmt(&format!("if (OF) goto L{};", dest)),
            OperationKind::Halt => self.stmt("return 0;"),
        }
    }

    /// Compound assignment that records 16-bit overflow in `OF` first
    fn arithmetic(&mut self, dest: &str, src: &str, op: &str) {
        self.stmt(&format!(
            "OF = overflows((int32_t){} {} (int32_t){});",
            dest, op, src
        ));
        self.stmt(&format!("{} {}= {};", dest, op, src));
    }

    fn operand_to_c(operand: &Operand) -> String {
        match operand {
            Operand::Number(value) => value.to_string(),
            Operand::Variable(name) => variable_to_c(name),
            Operand::Register(name) => name.clone(),
            Operand::ArrayAccess { name, index } => {
                format!("{}[{}]", variable_to_c(name), Self::operand_to_c(index))
            }
        }
    }
}

/// Generate C code from an analysed program
pub fn generate_c(program: &Program, symbols: &SymbolTable) -> String {
    CodeGenerator::new(symbols).generate(program)
}

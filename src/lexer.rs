//! .projet Lexer
//!
//! Turns source text into tokens carrying 1-based line/column positions.
//! Whitespace and `#` line comments are dropped.

use logos::Logos;

use crate::error::{CompileError, Result};
use crate::token::{Token, TokenKind};

/// Maps byte offsets to line/column pairs
struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|&(_, c)| c == '\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let column = self.source[line_start..offset].chars().count() + 1;
        (line, column)
    }
}

/// Tokenize source code. The result always ends with a single EOF token.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let index = LineIndex::new(source);
    let mut tokens = Vec::new();

    for (result, span) in TokenKind::lexer(source).spanned() {
        let (line, column) = index.position(span.start);
        match result {
            Ok(kind) => tokens.push(Token::new(kind, &source[span.clone()], line, column)),
            Err(()) => {
                let character = source[span.start..].chars().next().unwrap_or('\0');
                return Err(CompileError::lexer(character, line, column));
            }
        }
    }

    let (line, column) = index.position(source.len());
    tokens.push(Token::eof(line, column));
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_instruction() {
        assert_eq!(
            kinds("1: mov x, AX;"),
            vec![
                TokenKind::Number,
                TokenKind::Colon,
                TokenKind::Mov,
                TokenKind::Identifier,
                TokenKind::Comma,
                TokenKind::Register,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(
            kinds("Var var Array array isFull isfull ax"),
            vec![
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::Array,
                TokenKind::Identifier,
                TokenKind::IsFull,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        let tokens = tokenize("movx AXE jz_1").unwrap();
        assert!(tokens[..3].iter().all(|t| t.kind == TokenKind::Identifier));
        assert_eq!(tokens[2].text(), "jz_1");
    }

    #[test]
    fn test_number_then_word() {
        let tokens = tokenize("12ab").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].text(), "12");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text(), "ab");
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("[]:,;+-*/"),
            vec![
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Multiply,
                TokenKind::Divide,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokenize("# header\n1: halt; # trailing ; mov\n").unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[2].kind, TokenKind::Halt);
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Hash));
    }

    #[test]
    fn test_line_and_column() {
        let tokens = tokenize("Var\n  x: byte").unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
        assert_eq!((tokens[2].line, tokens[2].column), (2, 4));
        assert_eq!((tokens[3].line, tokens[3].column), (2, 6));
    }

    #[test]
    fn test_eof_position() {
        let tokens = tokenize("halt\nab").unwrap();
        let eof = tokens.last().unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.text, None);
        assert_eq!((eof.line, eof.column), (2, 3));

        let tokens = tokenize("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
    }

    #[test]
    fn test_invalid_character() {
        let err = tokenize("1: mov x, 5;\n2: mov y = 3;").unwrap_err();
        match err {
            CompileError::Lexer {
                character,
                line,
                column,
            } => {
                assert_eq!(character, '=');
                assert_eq!(line, 2);
                assert_eq!(column, 10);
            }
            other => panic!("Expected lexer error, got {:?}", other),
        }
    }

    #[test]
    fn test_underscore_cannot_start_identifier() {
        assert!(matches!(
            tokenize("_tmp"),
            Err(CompileError::Lexer { character: '_', .. })
        ));
    }

    #[test]
    fn test_token_texts_rebuild_significant_source() {
        let source = "Var x: byte, arr: Array[2] # decls\nInstructions\n\t1: mov arr[0], x;\n";
        let rebuilt: String = tokenize(source)
            .unwrap()
            .iter()
            .map(|t| t.text())
            .collect();
        assert_eq!(rebuilt, "Varx:byte,arr:Array[2]Instructions1:movarr[0],x;");
    }
}

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use projet::semantic::{Symbol, SymbolKind};
use projet::{compile, compile_file, compile_with, CompileError, Options, SemanticError};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn semantic_rule(source: &str) -> SemanticError {
    match compile(source) {
        Err(CompileError::Semantic { kind, .. }) => kind,
        other => panic!("Expected semantic error, got {:?}", other),
    }
}

#[test]
fn scenario_symbols_and_labels_in_order() {
    let compilation = compile_file(fixture("scenario.projet"), &Options::default()).unwrap();

    let symbols: Vec<&Symbol> = compilation.symbols.symbols().collect();
    assert_eq!(symbols.len(), 2);
    assert_eq!(symbols[0].name, "x");
    assert_eq!(symbols[0].kind, SymbolKind::Scalar);
    assert_eq!(symbols[1].name, "arr");
    assert_eq!(symbols[1].kind, SymbolKind::Array);
    assert_eq!(symbols[1].size, Some(2));

    let c = &compilation.c_code;
    let positions: Vec<usize> = [
        "L1:\n    v_x = 5;",
        "L2:\n",
        "    v_x += v_x;",
        "L3:\n    printf(\"%hd\\n\", v_x);",
        "L4:\n    return 0;",
    ]
    .iter()
    .map(|needle| c.find(needle).unwrap_or_else(|| panic!("missing {:?}", needle)))
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(compilation.warnings.is_empty());
}

#[test]
fn countdown_translates_every_instruction() {
    let compilation = compile_file(fixture("countdown.projet"), &Options { strict: true }).unwrap();
    let c = &compilation.c_code;

    for number in 1..=13 {
        assert!(c.contains(&format!("\nL{}:\n", number)), "missing label L{}", number);
    }
    assert!(c.contains("int16_t v_history[4] = {0};"));
    assert!(c.contains("    scanf(\"%hd\", &v_n);\n"));
    assert!(c.contains("    if (AX == 0) goto L10;\n"));
    assert!(c.contains("    v_history[v_i] = v_n;\n"));
    assert!(c.contains("    BX = pop();\n"));
    assert!(c.contains("    goto L3;\n"));
}

#[test]
fn pipeline_is_deterministic() {
    let source = fs::read_to_string(fixture("countdown.projet")).unwrap();
    assert_eq!(compile(&source).unwrap(), compile(&source).unwrap());
}

#[test]
fn undefined_jump_target_fails() {
    let err = compile_file(fixture("bad_jump.projet"), &Options::default()).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Semantic {
            line: 4,
            kind: SemanticError::UndefinedLabel {
                instruction: 5,
                target: 99
            }
        }
    ));
}

#[test]
fn missing_file_is_io_error() {
    let err = compile_file(fixture("does_not_exist.projet"), &Options::default()).unwrap_err();
    assert!(matches!(err, CompileError::Io(_)));
}

#[test]
fn each_stage_reports_its_own_error() {
    assert!(matches!(
        compile("Var x: byte Instructions 1: mov x, 1 % 2;"),
        Err(CompileError::Lexer { character: '%', .. })
    ));
    assert!(matches!(
        compile("Var x: byte Instructions 1: mov x;"),
        Err(CompileError::Syntax { .. })
    ));
    assert_eq!(
        semantic_rule("Var x: byte, x: byte Instructions"),
        SemanticError::DuplicateDeclaration { name: "x".into() }
    );
    assert_eq!(
        semantic_rule("Var arr: Array[3] Instructions 1: print arr[5];"),
        SemanticError::IndexOutOfRange {
            name: "arr".into(),
            index: 5,
            size: 3
        }
    );
    assert_eq!(
        semantic_rule("Var x: byte Instructions 1: mov y, AX;"),
        SemanticError::UndeclaredVariable { name: "y".into() }
    );
}

#[test]
fn strict_option_reaches_parser() {
    let source = "Var x: byte ; Instructions 1: halt;";
    assert!(compile_with(source, &Options::default()).is_ok());
    assert!(matches!(
        compile_with(source, &Options { strict: true }),
        Err(CompileError::Syntax { .. })
    ));
}

#[test]
fn error_messages_are_readable() {
    let err = compile("Var\nInstructions\n1: jmp 2;").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Semantic error at line 3: instruction 1: jumps to undefined instruction 2"
    );
}

#[test]
fn header_names_are_plain_variables() {
    let c = compile("Var exit: byte Instructions 1: mov exit, 3; 2: print exit;").unwrap();
    assert!(c.contains("int16_t v_exit = 0;\n"));
    assert!(c.contains("L1:\n    v_exit = 3;\n"));
    assert!(!c.contains("int16_t exit"));
}

/// Runs `cc -fsyntax-only` over the C generated for every fixture that
/// compiles. Skipped when no C compiler is installed.
#[test]
fn generated_c_is_accepted_by_cc() {
    if Command::new("cc").arg("--version").output().is_err() {
        eprintln!("cc not found, skipping");
        return;
    }

    let dir = std::env::temp_dir().join(format!("projetc-cc-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");

    for name in ["scenario.projet", "countdown.projet", "header_names.projet"] {
        let c_code = compile_file(fixture(name), &Options::default())
            .unwrap_or_else(|e| panic!("{}: {}", name, e))
            .c_code;
        let c_path = dir.join(name).with_extension("c");
        fs::write(&c_path, c_code).expect("write C file");

        let output = Command::new("cc")
            .arg("-std=c11")
            .arg("-fsyntax-only")
            .arg(&c_path)
            .output()
            .expect("run cc");
        assert!(
            output.status.success(),
            "{} rejected by cc:\n{}",
            name,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let _ = fs::remove_dir_all(&dir);
}

//! .projet translator CLI
//!
//! Usage: projetc <input.projet> [-o output] [-f format] [--strict]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use clap::Parser as ClapParser;

use projet::lexer::tokenize;
use projet::semantic::{SymbolKind, SymbolTable};
use projet::{compile_file, Compilation, Options};

#[derive(ClapParser)]
#[command(name = "projetc")]
#[command(version = "0.1.0")]
#[command(about = "Translates .projet assembly programs to C", long_about = None)]
struct Cli {
    /// Input .projet source file
    input: PathBuf,

    /// Output file (default: stdout for text formats)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "c")]
    format: OutputFormat,

    /// Reject stray tokens instead of skipping them
    #[arg(long)]
    strict: bool,

    /// C compiler used for the exe format
    #[arg(long, default_value = "cc")]
    cc: String,

    /// Suppress warnings and progress messages
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// C source code
    C,
    /// Token stream (for debugging)
    Tokens,
    /// AST dump (for debugging)
    Ast,
    /// Symbol table and instruction labels
    Symbols,
    /// Executable (writes C and runs the C compiler)
    Exe,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.format {
        OutputFormat::Tokens => {
            let source = fs::read_to_string(&cli.input)?;
            let output: String = tokenize(&source)?
                .iter()
                .map(|t| format!("{}\n", t))
                .collect();
            emit(&cli, &output)
        }
        OutputFormat::C => emit(&cli, &translate(&cli)?.c_code),
        OutputFormat::Ast => emit(&cli, &format!("{:#?}\n", translate(&cli)?.program)),
        OutputFormat::Symbols => emit(&cli, &dump_symbols(&translate(&cli)?.symbols)),
        OutputFormat::Exe => build_executable(&cli),
    }
}

/// Runs the full pipeline and reports its warnings
fn translate(cli: &Cli) -> projet::Result<Compilation> {
    let compilation = compile_file(&cli.input, &Options { strict: cli.strict })?;
    if !cli.quiet {
        for warning in &compilation.warnings {
            eprintln!("warning: {}", warning);
        }
    }
    Ok(compilation)
}

fn emit(cli: &Cli, output: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &cli.output {
        fs::write(path, output)?;
        if !cli.quiet {
            eprintln!("Wrote {}", path.display());
        }
    } else {
        print!("{}", output);
    }
    Ok(())
}

fn dump_symbols(symbols: &SymbolTable) -> String {
    let mut output = String::new();
    for symbol in symbols.symbols() {
        match (symbol.kind, symbol.size) {
            (SymbolKind::Array, Some(size)) => {
                output.push_str(&format!("{}: Array[{}]\n", symbol.name, size))
            }
            _ => output.push_str(&format!("{}: byte\n", symbol.name)),
        }
    }
    let labels: Vec<String> = symbols.labels().map(|l| l.to_string()).collect();
    output.push_str(&format!("labels: {}\n", labels.join(", ")));
    output
}

fn executable_path(input: &Path, output: Option<&Path>) -> Result<PathBuf, String> {
    let exe_ext = if cfg!(windows) { "exe" } else { "" };
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension(exe_ext));

    let same_file = match (fs::canonicalize(&path), fs::canonicalize(input)) {
        (Ok(a), Ok(b)) => a == b,
        _ => path == input,
    };
    if same_file {
        return Err(format!(
            "Refusing to overwrite input {} with the executable (use -o)",
            input.display()
        ));
    }
    Ok(path)
}

/// Intermediate C file in the temp directory, never next to the user's files
fn intermediate_c_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    std::env::temp_dir().join(format!("projetc-{}-{}.c", std::process::id(), stem))
}

fn build_executable(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let output_path = executable_path(&cli.input, cli.output.as_deref())?;
    let c_code = translate(cli)?.c_code;

    let c_path = intermediate_c_path(&cli.input);
    fs::write(&c_path, c_code)?;

    let status = Command::new(&cli.cc)
        .arg(&c_path)
        .arg("-o")
        .arg(&output_path)
        .status();

    let _ = fs::remove_file(&c_path);

    let status = status.map_err(|e| format!("Failed to run C compiler ({}): {}", cli.cc, e))?;
    if !status.success() {
        return Err(format!("C compiler failed with exit code: {:?}", status.code()).into());
    }

    if !cli.quiet {
        eprintln!("Wrote {}", output_path.display());
    }
    Ok(())
}

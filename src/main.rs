use std::path::PathBuf;

use clap::Parser as ClapParser;
use log::LevelFilter;

use cactus::compiler;

use cactus::interpreter::Interpreter;
use cactus::lexer;
use cactus::parser;
use cactus::repl::Repl;
use cactus::vm;

const EXTENSIONS: [&str; 3] = ["cact", "cactus", "cus"];

#[derive(ClapParser, Debug)]
#[command(name = "cactus", author, version, about = "Cactus - a scripting language for the Cactus Protocol")]
struct Cli {
    /// Cactus file to run (.cact, .cactus, .cus)
    file: Option<PathBuf>,

    /// Use the bytecode VM instead of the tree-walking interpreter
    #[arg(long)]
    vm: bool,

    /// Display tokenized output
    #[arg(long)]
    tokens: bool,

    /// Display the parsed syntax tree
    #[arg(long)]
    ast: bool,

    /// Display compiled bytecode (only meaningful with --vm)
    #[arg(long)]
    bytecode: bool,

    /// Start the interactive REPL
    #[arg(short, long)]
    interactive: bool,
}

fn main() {
    let cli = Cli::parse();

    simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()
        .expect("failed to initialize logger");

    if cli.interactive || cli.file.is_none() {
        Repl::new(cli.vm).run();
        return;
    }

    let file = cli.file.expect("checked above");
    if let Err(code) = run_file(&file, cli.vm, cli.tokens, cli.ast, cli.bytecode) {
        std::process::exit(code);
    }
}

fn run_file(path: &PathBuf, use_vm: bool, show_tokens: bool, show_ast: bool, show_bytecode: bool) -> Result<(), i32> {
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        return Err(1);
    }

    let has_known_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext));
    if !has_known_extension {
        log::warn!("File does not have a Cactus extension (.cact, .cactus, .cus)");
    }

    let source = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("Error: could not read {}: {e}", path.display());
        1
    })?;

    let tokens = lexer::tokenize(&source).map_err(|e| {
        eprintln!("Lexer Error in {}:\n  {e}", path.display());
        1
    })?;
    if show_tokens {
        println!("=== Tokens ===");
        for token in &tokens {
            println!("  {token:?}");
        }
        println!();
    }

    let program = parser::parse(tokens).map_err(|e| {
        eprintln!("Parser Error in {}:\n  {e}", path.display());
        1
    })?;
    if show_ast {
        println!("=== AST ===");
        println!("{program:#?}");
        println!();
    }

    let result = if use_vm {
        let (code, constants) = compiler::compile(&program).map_err(|e| {
            eprintln!("Compile Error in {}:\n  {e}", path.display());
            1
        })?;
        if show_bytecode {
            println!("=== Bytecode ===");
            for (i, instr) in code.iter().enumerate() {
                println!("  {i:04}: {instr:?}");
            }
            println!();
        }
        vm::run(&code, constants).map_err(|e| {
            eprintln!("Runtime Error in {}:\n  {e}", path.display());
            1
        })?
    } else {
        Interpreter::new().run(&program).map_err(|e| {
            eprintln!("Runtime Error in {}:\n  {e}", path.display());
            1
        })?
    };

    if !matches!(result, cactus::value::Value::None) {
        println!("{result}");
    }

    Ok(())
}

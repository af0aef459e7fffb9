//! Interactive read-eval-print loop. Grounded on the reference REPL's
//! prompt/meta-command/brace-counting design: `>>> ` for a fresh line,
//! `... ` while a multi-line block is still open, meta-commands handled
//! before the brace counter ever sees the line.
use std::io::{self, Write};

use crate::compiler;
use crate::interpreter::Interpreter;
use crate::lexer;
use crate::parser;
use crate::value::Value;
use crate::vm;

const BANNER: &str = "Cactus \u{2014} a little scripting language for the Cactus Protocol.\nType 'help' for commands, 'exit' or Ctrl+D to quit.";

const HELP_TEXT: &str = "\
Commands:
  help        show this message
  exit/quit   leave the REPL
  clear       clear the screen
  reset       reset interpreter state
  tokens      toggle token display
  ast         toggle AST display
  vm          switch to the bytecode VM
  interp      switch to the tree-walking interpreter

Built-ins: print println len range str int float type input append pop
keys values abs min max sum";

pub struct Repl {
    interpreter: Interpreter,
    use_vm: bool,
    show_tokens: bool,
    show_ast: bool,
    buffer: Vec<String>,
    brace_count: i64,
}

impl Repl {
    pub fn new(use_vm: bool) -> Self {
        Self {
            interpreter: Interpreter::new(),
            use_vm,
            show_tokens: false,
            show_ast: false,
            buffer: Vec::new(),
            brace_count: 0,
        }
    }

    pub fn run(&mut self) {
        println!("{BANNER}");
        let stdin = io::stdin();
        loop {
            let prompt = if self.buffer.is_empty() { ">>> " } else { "... " };
            print!("{prompt}");
            let _ = io::stdout().flush();

            let mut line = String::new();
            let bytes_read = stdin.read_line(&mut line).unwrap_or(0);
            if bytes_read == 0 {
                println!("\nGoodbye!");
                break;
            }
            let line = line.trim_end_matches('\n').to_string();

            match self.accept_line(line) {
                Some(source) => {
                    if let Some(value) = self.execute(&source) {
                        println!("=> {value}");
                    }
                }
                None => continue,
            }
        }
    }

    /// Feeds one line into the multi-line buffer, handling meta-commands
    /// up front. Returns `Some(source)` once braces balance back to zero.
    fn accept_line(&mut self, line: String) -> Option<String> {
        if self.buffer.is_empty() {
            match line.trim().to_lowercase().as_str() {
                "exit" | "quit" => {
                    println!("Goodbye!");
                    std::process::exit(0);
                }
                "help" => {
                    println!("{HELP_TEXT}");
                    return None;
                }
                "clear" => {
                    print!("\x1b[2J\x1b[H");
                    let _ = io::stdout().flush();
                    return None;
                }
                "reset" => {
                    self.interpreter = Interpreter::new();
                    println!("Interpreter state reset.");
                    return None;
                }
                "tokens" => {
                    self.show_tokens = !self.show_tokens;
                    println!("Token display: {}", if self.show_tokens { "ON" } else { "OFF" });
                    return None;
                }
                "ast" => {
                    self.show_ast = !self.show_ast;
                    println!("AST display: {}", if self.show_ast { "ON" } else { "OFF" });
                    return None;
                }
                "vm" => {
                    self.use_vm = true;
                    println!("Switched to VM execution mode.");
                    return None;
                }
                "interp" => {
                    self.use_vm = false;
                    println!("Switched to interpreter execution mode.");
                    return None;
                }
                _ => {}
            }
        }

        self.brace_count += line.matches('{').count() as i64 - line.matches('}').count() as i64;
        self.buffer.push(line);

        if self.brace_count <= 0 {
            let source = self.buffer.join("\n");
            self.buffer.clear();
            self.brace_count = 0;
            Some(source)
        } else {
            None
        }
    }

    fn execute(&mut self, source: &str) -> Option<Value> {
        if source.trim().is_empty() {
            return None;
        }

        let tokens = match lexer::tokenize(source) {
            Ok(tokens) => tokens,
            Err(e) => {
                eprintln!("Lexer Error: {e}");
                return None;
            }
        };
        if self.show_tokens {
            println!("Tokens:");
            for token in &tokens {
                println!("  {token:?}");
            }
        }

        let program = match parser::parse(tokens) {
            Ok(program) => program,
            Err(e) => {
                eprintln!("Parser Error: {e}");
                return None;
            }
        };
        if self.show_ast {
            println!("AST:");
            println!("  {program:#?}");
        }

        if self.use_vm {
            let (code, constants) = match compiler::compile(&program) {
                Ok(pair) => pair,
                Err(e) => {
                    eprintln!("Compile Error: {e}");
                    return None;
                }
            };
            match vm::run(&code, constants) {
                Ok(value) => Some(value),
                Err(e) => {
                    eprintln!("Runtime Error: {e}");
                    None
                }
            }
        } else {
            match self.interpreter.run(&program) {
                Ok(value) => Some(value),
                Err(e) => {
                    eprintln!("Runtime Error: {e}");
                    None
                }
            }
        }
    }
}

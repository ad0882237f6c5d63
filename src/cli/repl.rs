//! # REPL - Read-Eval-Print Loop
//!
//! The main interactive loop for the climdex CLI. Handles:
//!
//! - Reading input with rustyline (history, line editing)
//! - Dispatching commands to the [`CommandHandler`]
//! - Printing results and errors
//!
//! Commands are single-line; there is no continuation mode. Errors are
//! displayed but do not terminate the session. Use `quit` or Ctrl+D to
//! exit; Ctrl+C cancels the current line.

use eyre::{Result, WrapErr};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::cli::commands::{CommandHandler, CommandResult};
use crate::cli::history::history_path;
use crate::tree::AvlIndex;

const PROMPT: &str = "climdex> ";

pub struct Repl {
    index: AvlIndex,
    editor: DefaultEditor,
}

impl Repl {
    pub fn new(index: AvlIndex) -> Result<Self> {
        let mut editor = DefaultEditor::new().wrap_err("failed to initialize line editor")?;

        if let Some(history_file) = history_path() {
            let _ = editor.load_history(&history_file);
        }

        Ok(Self { index, editor })
    }

    pub fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(trimmed).ok();
                    if !self.handle_line(trimmed) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye");
                    break;
                }
                Err(err) => {
                    eprintln!("Error reading input: {}", err);
                    break;
                }
            }
        }

        self.save_history();
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> bool {
        match CommandHandler::execute(line, &mut self.index) {
            CommandResult::Exit => false,
            CommandResult::Output(text) => {
                println!("{}", text);
                true
            }
            CommandResult::Continue => true,
            CommandResult::Error(msg) => {
                eprintln!("Error: {}", msg);
                true
            }
        }
    }

    fn print_welcome(&self) {
        println!("climdex {} - AVL record index", env!("CARGO_PKG_VERSION"));
        println!(
            "{} record{} indexed. Type help for commands.",
            self.index.len(),
            if self.index.len() == 1 { "" } else { "s" }
        );
    }

    fn save_history(&mut self) {
        if let Some(history_file) = history_path() {
            let _ = self.editor.save_history(&history_file);
        }
    }
}

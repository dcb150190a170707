//! Line-based user interaction surface.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::error::KitError;

/// Everything the session loop and selector need from the terminal.
///
/// Prompts return [`KitError::UserCancelled`] when the user interrupts them.
pub trait Interaction {
    /// Reads one line of input; `Ok(None)` signals end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, KitError>;

    /// Reads one answer, returning `default` for blank input or end of input.
    fn ask_with_default(&mut self, prompt: &str, default: &str) -> Result<String, KitError>;

    fn info(&mut self, message: &str);

    fn success(&mut self, message: &str);

    fn warn(&mut self, message: &str);

    fn error(&mut self, message: &str);

    /// Shows a model reply.
    fn reply(&mut self, text: &str);
}

/// [`Interaction`] over a `rustyline` editor with colored status lines.
pub struct TerminalInteraction {
    editor: DefaultEditor,
}

impl TerminalInteraction {
    pub fn new() -> Result<Self, KitError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }

    fn readline(&mut self, prompt: &str) -> Result<Option<String>, KitError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) => Err(KitError::UserCancelled),
            Err(ReadlineError::Eof) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}

impl Interaction for TerminalInteraction {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, KitError> {
        let line = self.readline(prompt)?;
        if let Some(line) = line.as_deref().filter(|line| !line.trim().is_empty()) {
            // Losing a history entry never fails the turn.
            let _ = self.editor.add_history_entry(line);
        }
        Ok(line)
    }

    fn ask_with_default(&mut self, prompt: &str, default: &str) -> Result<String, KitError> {
        let line = self.readline(&format!("{prompt} [{default}]: "))?;
        Ok(line
            .map(|answer| answer.trim().to_string())
            .filter(|answer| !answer.is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    fn info(&mut self, message: &str) {
        println!("{message}");
    }

    fn success(&mut self, message: &str) {
        println!("{}", format!("✓ {message}").green());
    }

    fn warn(&mut self, message: &str) {
        println!("{}", format!("⚠ {message}").yellow());
    }

    fn error(&mut self, message: &str) {
        eprintln!("{}", format!("✗ {message}").red());
    }

    fn reply(&mut self, text: &str) {
        println!("\n{}\n", text.trim_end());
    }
}

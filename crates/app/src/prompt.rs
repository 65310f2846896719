//! Interactive prompts.

use std::io::{self, BufRead, Write};

use mockall::automock;

/// Reads confirmations and answers from whoever drives the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.ask(&format!("{message} [y/N]"))
            .is_some_and(|answer| matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn ask(&self, message: &str) -> Option<String> {
        let mut stdout = io::stdout().lock();

        write!(stdout, "{message} ").ok()?;
        stdout.flush().ok()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line).ok()?;

        (read > 0).then(|| line.trim().to_string())
    }
}

#[automock]
pub trait Prompt: Send + Sync {
    /// Ask a yes/no question; anything but yes is a no.
    fn confirm(&self, message: &str) -> bool;

    /// Ask for a line of text; `None` on end of input.
    fn ask(&self, message: &str) -> Option<String>;
}

//! Yes/no confirmation before destructive steps.
use crate::error::{Error, Result};
use std::io::{BufRead, Write};

/// Asks the operator whether to go ahead.
pub trait Confirm: Send + Sync {
    /// Show `question` and return the answer; an empty answer means `default`.
    fn confirm(&self, question: &str, default: bool) -> Result<bool>;
}

/// [`Confirm`] that prompts on stdout and reads the answer from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&self, question: &str, default: bool) -> Result<bool> {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{}", question)
            .and_then(|_| stdout.flush())
            .map_err(|e| Error::Other(format!("Failed to write prompt: {}", e)))?;

        let mut answer = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut answer)
            .map_err(|e| Error::Other(format!("Failed to read answer: {}", e)))?;

        Ok(parse_answer(&answer, default))
    }
}

/// [`Confirm`] for non-interactive runs: every question is answered yes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, question: &str, _default: bool) -> Result<bool> {
        tracing::debug!(question = question.trim(), "Confirmed without asking");
        Ok(true)
    }
}

fn parse_answer(answer: &str, default: bool) -> bool {
    match answer.trim().to_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers() {
        assert!(parse_answer("\n", true));
        assert!(!parse_answer("", false));
        assert!(parse_answer("Y\n", false));
        assert!(parse_answer("yes", false));
        assert!(!parse_answer("n", true));
        assert!(!parse_answer("nope", true));
    }
}

//! Interactive yes/no confirmation before destructive actions.
//!
//! Prompts block until the operator answers. There is no timeout.

use std::io::{self, BufRead, Write};

use crate::error::DedupeResult;

/// Asks the operator to confirm an action.
pub trait Confirm {
    /// Show `question` and return whether the answer was affirmative.
    fn confirm(&mut self, question: &str) -> DedupeResult<bool>;
}

impl<T: Confirm + ?Sized> Confirm for &mut T {
    fn confirm(&mut self, question: &str) -> DedupeResult<bool> {
        (**self).confirm(question)
    }
}

/// Prompts on a writer and reads the answer line from a reader.
#[derive(Debug)]
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl LinePrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on stdout and read from stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for LinePrompt<R, W> {
    fn confirm(&mut self, question: &str) -> DedupeResult<bool> {
        write!(self.output, "{question} (Y/n): ")?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(is_affirmative(&answer))
    }
}

/// Only an explicit `y` or `yes` counts; an empty answer does not.
fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

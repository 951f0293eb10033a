//! User input and interaction handling.
//! The [`Prompter`] trait is the only way the rest of the crate talks to the
//! user, which lets tests script the answers.

use crate::error::{Error, Result};
use dialoguer::{Confirm, Input, Select};

/// Asks the user for values.
///
/// Implementations block until an answer is available. An aborted prompt is
/// reported as `Error::PromptError`.
pub trait Prompter: Send + Sync {
    /// Asks a yes/no question.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Asks for free text, offering `default` when the user just hits enter.
    fn input(&self, prompt: &str, default: &str) -> Result<String>;

    /// Asks the user to pick one of `choices`, returning its index.
    fn select(&self, prompt: &str, choices: &[String], default: usize) -> Result<usize>;
}

/// Terminal prompter backed by dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| Error::PromptError(e.to_string()))
    }

    fn input(&self, prompt: &str, default: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::PromptError(e.to_string()))
    }

    fn select(&self, prompt: &str, choices: &[String], default: usize) -> Result<usize> {
        Select::new()
            .with_prompt(prompt)
            .default(default)
            .items(choices)
            .interact()
            .map_err(|e| Error::PromptError(e.to_string()))
    }
}

/// Prompter for runs without a terminal. Every question fails.
#[derive(Debug, Default)]
pub struct NoPrompter;

impl Prompter for NoPrompter {
    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
        Err(unavailable(prompt))
    }

    fn input(&self, prompt: &str, _default: &str) -> Result<String> {
        Err(unavailable(prompt))
    }

    fn select(&self, prompt: &str, _choices: &[String], _default: usize) -> Result<usize> {
        Err(unavailable(prompt))
    }
}

fn unavailable(prompt: &str) -> Error {
    Error::PromptError(format!("cannot ask '{prompt}' without an interactive terminal"))
}

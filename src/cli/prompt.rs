use std::io::{self, BufRead};

use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use super::output;
use super::CliError;
use crate::validation::ValidationResult;

/// Source of operator answers.
pub trait Prompter {
    /// Reads one free-form answer.
    fn text(&mut self, prompt: &str) -> Result<String, CliError>;

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, CliError>;
}

/// Terminal prompts backed by dialoguer.
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn text(&mut self, prompt: &str) -> Result<String, CliError> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(CliError::from)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, CliError> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(CliError::from)
    }
}

/// Answers read line by line, used when stdin is a script.
pub struct ScriptPrompter<B> {
    input: B,
}

impl<B: BufRead> ScriptPrompter<B> {
    pub fn new(input: B) -> Self {
        Self { input }
    }

    fn next_line(&mut self, prompt: &str) -> Result<String, CliError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(CliError::InputExhausted(prompt.to_string()));
        }
        let answer = line.trim_end_matches(['\r', '\n']).to_string();
        println!("{}: {}", prompt, answer);
        Ok(answer)
    }
}

impl ScriptPrompter<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<B: BufRead> Prompter for ScriptPrompter<B> {
    fn text(&mut self, prompt: &str) -> Result<String, CliError> {
        self.next_line(prompt)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, CliError> {
        let answer = self.next_line(&format!("{} (y/n)", prompt))?;
        let answer = answer.trim().to_ascii_lowercase();
        Ok(match answer.as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        })
    }
}

/// Asks until `validate` accepts the answer, printing each rejection.
pub fn ask<P, T, F>(prompter: &mut P, prompt: &str, validate: F) -> Result<T, CliError>
where
    P: Prompter + ?Sized,
    F: Fn(&str) -> ValidationResult<T>,
{
    loop {
        let answer = prompter.text(prompt)?;
        match validate(&answer) {
            Ok(value) => return Ok(value),
            Err(err) => output::error(err),
        }
    }
}

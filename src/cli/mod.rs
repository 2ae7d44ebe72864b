//! Interactive front end: prompts, output helpers and the run loop.

pub mod output;
pub mod prompt;
pub mod session;

use std::io;

use thiserror::Error;

use crate::config::ConfigManager;
use crate::errors::ReceiptError;
use crate::generator::ReceiptGenerator;
use output::OutputPreferences;
use prompt::{DialoguerPrompter, Prompter, ScriptPrompter};

pub use session::{collect_input, run_session, SessionInput, SessionOutcome};

/// Set to read answers line by line from stdin instead of the terminal.
pub const SCRIPT_ENV: &str = "RECEIPT_CORE_CLI_SCRIPT";

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("input ended before `{0}` was answered")]
    InputExhausted(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

impl CliMode {
    pub fn from_env() -> Self {
        if std::env::var_os(SCRIPT_ENV).is_some() {
            CliMode::Script
        } else {
            CliMode::Interactive
        }
    }
}

pub fn run_cli() -> Result<(), CliError> {
    let mode = CliMode::from_env();
    output::set_preferences(OutputPreferences {
        plain_mode: mode == CliMode::Script || std::env::var_os("NO_COLOR").is_some(),
    });

    let manager = ConfigManager::new()?;
    let mut config = manager.load()?;
    config.apply_env_overrides()?;
    tracing::debug!(path = %manager.path().display(), seed = ?config.seed, "loaded configuration");

    let mut generator = ReceiptGenerator::new(config)?;
    let mut prompter: Box<dyn Prompter> = match mode {
        CliMode::Interactive => Box::new(DialoguerPrompter::new()),
        CliMode::Script => Box::new(ScriptPrompter::stdin()),
    };

    let outcome = run_session(prompter.as_mut(), &mut generator)?;
    tracing::info!(
        months = outcome.months_generated,
        fallbacks = outcome.fallback_months,
        saved = outcome.saved_to.is_some(),
        "session finished"
    );
    Ok(())
}

//! Non-interactive UI for scripted runs.
//!
//! Prompts are answered from `FIMS_PROMPT_<KEY>` environment variables
//! (the prompt key upper-cased), then from the prompt's default. Text
//! inputs without either are answered with an empty string, which leaves
//! optional fields blank.

use std::collections::HashMap;

use crate::error::{FimsError, Result};

use super::spinner::NoopSpinner;
use super::{
    parse_answer, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface,
};

/// Prefix of environment variables answering prompts.
pub const PROMPT_ENV_PREFIX: &str = "FIMS_PROMPT_";

/// UI implementation for non-interactive mode.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a UI answering from the process environment.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();
        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }

    fn answer(&self, key: &str) -> Option<&String> {
        self.env_overrides
            .get(&format!("{}{}", PROMPT_ENV_PREFIX, key.to_uppercase()))
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let value = self.answer(&prompt.key).or(prompt.default.as_ref()).cloned();

        match (&prompt.prompt_type, value) {
            (PromptType::Confirm, Some(value)) => parse_answer(&value)
                .map(PromptResult::Bool)
                .ok_or_else(|| FimsError::InvalidField {
                    key: prompt.key.clone(),
                    message: format!("'{}' is not a yes/no answer", value),
                }),
            (PromptType::Select { options }, Some(value)) => {
                if options.iter().any(|o| o.value == value) {
                    Ok(PromptResult::String(value))
                } else {
                    Err(FimsError::InvalidField {
                        key: prompt.key.clone(),
                        message: format!("'{}' is not one of the offered choices", value),
                    })
                }
            }
            (PromptType::Input, Some(value)) => Ok(PromptResult::String(value)),
            (PromptType::Input, None) => Ok(PromptResult::String(String::new())),
            (_, None) => Err(FimsError::ConfigValidationError {
                message: format!(
                    "Cannot prompt for '{}' in non-interactive mode (set {}{})",
                    prompt.key,
                    PROMPT_ENV_PREFIX,
                    prompt.key.to_uppercase()
                ),
            }),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("{}", message);
        }
        Box::new(NoopSpinner)
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        if self.mode.shows_status() {
            println!("[{}/{}]", current, total);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

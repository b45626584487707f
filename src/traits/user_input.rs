use anyhow::{bail, Result};
use inquire::{Confirm, InquireError};

/// Interactive prompts; the only point where a run waits on the operator
pub trait UserInput: Send + Sync {
    /// Yes/no question
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

pub struct InquireUserInput;

impl UserInput for InquireUserInput {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        match Confirm::new(prompt).with_default(default).prompt() {
            Ok(answer) => Ok(answer),
            // Ctrl-C / Esc count as "no"
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
            Err(InquireError::NotTTY) => {
                bail!("Confirmation needs an interactive terminal; pass --auto-approve")
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Scripted answer for MockUserInput
#[cfg(test)]
#[derive(Debug, Clone)]
pub enum MockResponse {
    Confirm(bool),
    /// The prompt itself fails, e.g. stdin is not a terminal
    Fail(String),
}

/// Replays scripted answers and records every prompt
#[cfg(test)]
pub struct MockUserInput {
    responses: std::sync::Mutex<std::collections::VecDeque<MockResponse>>,
    prompts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockUserInput {
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.into()),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Prompts shown so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Default for MockUserInput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl UserInput for MockUserInput {
    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.responses.lock().unwrap().pop_front() {
            Some(MockResponse::Confirm(answer)) => Ok(answer),
            Some(MockResponse::Fail(reason)) => bail!(reason),
            None => bail!("No more mock responses available"),
        }
    }
}

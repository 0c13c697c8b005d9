//! Presentation → runner commands

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::SharedError;

/// A click-originated (or typed) command for the run controller
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RunnerCommand {
    /// Execute the current step, optionally with an edited payload
    Run { payload: Option<String> },
    Advance,
    Retreat,
    /// Move to a 0-based step index without executing it
    Jump { index: usize },
    AutoRun,
    Reset,
}

impl FromStr for RunnerCommand {
    type Err = SharedError;

    /// Parse the terminal form, e.g. `run {"otp":"123456"}`, `next`, `jump 4`.
    /// Step numbers in `jump` are 1-based like the ones shown to the user.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (trimmed, ""),
        };

        match word.to_lowercase().as_str() {
            "run" | "send" => Ok(RunnerCommand::Run {
                payload: (!rest.is_empty()).then(|| rest.to_string()),
            }),
            "next" | "advance" => Ok(RunnerCommand::Advance),
            "back" | "prev" | "retreat" => Ok(RunnerCommand::Retreat),
            "jump" | "goto" => {
                let number: usize = rest
                    .parse()
                    .map_err(|_| SharedError::InvalidStepNumber { input: rest.to_string() })?;
                if number == 0 {
                    return Err(SharedError::InvalidStepNumber { input: rest.to_string() });
                }
                Ok(RunnerCommand::Jump { index: number - 1 })
            }
            "auto" | "auto-run" => Ok(RunnerCommand::AutoRun),
            "reset" => Ok(RunnerCommand::Reset),
            _ => Err(SharedError::InvalidCommand { input: trimmed.to_string() }),
        }
    }
}

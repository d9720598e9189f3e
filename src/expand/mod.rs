//! Parameter expansion applied to split words before parsing.

mod gsub;

pub use gsub::gsub;

use std::fmt;
use std::path::Path;

use crate::core::state::ShellState;

const HOME_PREFIX: &str = "~/";
const SHELL_PID: &str = "$$";
const LAST_STATUS: &str = "$?";
const LAST_BACKGROUND: &str = "$!";
const COMMENT: char = '#';

#[derive(Debug)]
pub enum ExpandError {
    HomeDirNotFound,
}

impl fmt::Display for ExpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpandError::HomeDirNotFound => write!(f, "cannot expand ~/: home directory not set"),
        }
    }
}

impl std::error::Error for ExpandError {}

#[derive(Debug, Clone)]
pub struct Expander {
    home: Option<String>,
    pid: String,
}

impl Expander {
    pub fn new(home: Option<&Path>, pid: u32) -> Self {
        Self {
            home: home.map(|p| p.to_string_lossy().into_owned()),
            pid: pid.to_string(),
        }
    }

    /// Expands every word and drops everything from the first comment word on.
    pub fn expand(
        &self,
        words: Vec<String>,
        state: &ShellState,
    ) -> Result<Vec<String>, ExpandError> {
        words
            .into_iter()
            .take_while(|word| !word.starts_with(COMMENT))
            .map(|word| self.expand_word(word, state))
            .collect()
    }

    pub fn expand_word(&self, mut word: String, state: &ShellState) -> Result<String, ExpandError> {
        if word.starts_with(HOME_PREFIX) {
            let home = self.home.as_deref().ok_or(ExpandError::HomeDirNotFound)?;
            word.replace_range(..HOME_PREFIX.len(), &format!("{}/", home));
        }

        gsub(&mut word, SHELL_PID, &self.pid);
        gsub(&mut word, LAST_STATUS, &state.last_status().to_string());

        let background = state
            .last_background()
            .map(|pid| pid.to_string())
            .unwrap_or_default();
        gsub(&mut word, LAST_BACKGROUND, &background);

        Ok(word)
    }
}

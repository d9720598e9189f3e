mod editor;
mod stdin;
mod words;

pub use editor::EditorSource;
pub use stdin::StdinSource;
pub use words::split_words;

use std::fmt;

use crate::error::ShellError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    NotUnicode,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NotUnicode => write!(f, "input is not valid UTF-8"),
        }
    }
}

impl std::error::Error for InputError {}

/// Result of one blocking read for the next command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    Interrupted,
    Eof,
}

/// Where command lines come from.
pub trait LineSource {
    /// Shows `prompt` and blocks until a full line, an interrupt or end of input.
    /// The returned line never includes its terminating newline.
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError>;
}

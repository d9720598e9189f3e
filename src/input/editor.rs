use rustyline::{
    config::{Behavior, Config},
    error::ReadlineError,
    DefaultEditor,
};

use super::{InputError, LineSource, ReadOutcome};
use crate::error::ShellError;

/// Line editor for interactive terminals. History lives only for the session.
///
/// rustyline draws the prompt on the terminal it edits, which is stdout;
/// `StdinSource` writes it to stderr.
pub struct EditorSource {
    editor: DefaultEditor,
}

impl EditorSource {
    pub fn new() -> Result<Self, ShellError> {
        let config = Config::builder()
            .auto_add_history(true)
            .behavior(Behavior::PreferTerm)
            .build();
        let editor = DefaultEditor::with_config(config)?;

        Ok(Self { editor })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(ReadlineError::Io(ref e)) if e.kind() == std::io::ErrorKind::InvalidData => {
                Err(InputError::NotUnicode.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

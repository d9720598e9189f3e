use tracing::trace;

use super::parser;
use crate::core::commands::Dispatch;
use crate::error::ShellError;
use crate::input::split_words;

pub(crate) trait CommandHandler {
    fn execute_command(&mut self, line: &str) -> Result<Dispatch, ShellError>;
}

impl CommandHandler for super::Shell {
    /// Split, expand, parse, then run one line as a builtin or external command.
    fn execute_command(&mut self, line: &str) -> Result<Dispatch, ShellError> {
        let words = split_words(line, self.config.separators());
        if words.is_empty() {
            return Ok(Dispatch::Continue);
        }

        let words = self.expander.expand(words, &self.state)?;
        if words.is_empty() {
            // Comment-only line
            return Ok(Dispatch::Continue);
        }

        let command = parser::parse(words)?;
        trace!(?command, "parsed command");

        match self.builtins.dispatch(&command, &mut self.state)? {
            Dispatch::NotBuiltin => {}
            handled => return Ok(handled),
        }

        self.launcher.launch(&command, &mut self.state)?;
        Ok(Dispatch::Continue)
    }
}

use crate::core::commands::CommandError;
use crate::core::config::ConfigError;
use crate::expand::ExpandError;
use crate::input::InputError;
use crate::process::ProcessError;
use crate::shell::parser::ParseError;

#[derive(Debug)]
pub enum ShellError {
    Readline(rustyline::error::ReadlineError),
    Io(std::io::Error),
    ConfigError(ConfigError),
    InputError(InputError),
    ExpandError(ExpandError),
    ParseError(ParseError),
    CommandError(CommandError),
    ProcessError(ProcessError),
}

impl ShellError {
    /// Fatal errors end the shell; everything else abandons the current line.
    pub fn is_fatal(&self) -> bool {
        match self {
            ShellError::Readline(_) | ShellError::Io(_) | ShellError::ConfigError(_) => true,
            ShellError::ProcessError(e) => e.is_fatal(),
            ShellError::InputError(_)
            | ShellError::ExpandError(_)
            | ShellError::ParseError(_)
            | ShellError::CommandError(_) => false,
        }
    }
}

impl From<rustyline::error::ReadlineError> for ShellError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        ShellError::Readline(err)
    }
}

impl From<std::io::Error> for ShellError {
    fn from(err: std::io::Error) -> Self {
        ShellError::Io(err)
    }
}

impl From<ConfigError> for ShellError {
    fn from(err: ConfigError) -> Self {
        ShellError::ConfigError(err)
    }
}

impl From<InputError> for ShellError {
    fn from(err: InputError) -> Self {
        ShellError::InputError(err)
    }
}

impl From<ExpandError> for ShellError {
    fn from(err: ExpandError) -> Self {
        ShellError::ExpandError(err)
    }
}

impl From<ParseError> for ShellError {
    fn from(err: ParseError) -> Self {
        ShellError::ParseError(err)
    }
}

impl From<CommandError> for ShellError {
    fn from(err: CommandError) -> Self {
        ShellError::CommandError(err)
    }
}

impl From<ProcessError> for ShellError {
    fn from(err: ProcessError) -> Self {
        ShellError::ProcessError(err)
    }
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellError::Readline(e) => write!(f, "readline error: {}", e),
            ShellError::Io(e) => write!(f, "IO error: {}", e),
            ShellError::ConfigError(e) => write!(f, "config error: {}", e),
            ShellError::InputError(e) => write!(f, "{}", e),
            ShellError::ExpandError(e) => write!(f, "{}", e),
            ShellError::ParseError(e) => write!(f, "syntax error: {}", e),
            ShellError::CommandError(e) => write!(f, "{}", e),
            ShellError::ProcessError(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ShellError {}

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::debug;

mod cd;
mod exit;

pub use cd::CdCommand;
pub use exit::ExitCommand;

use crate::core::config::Config;
use crate::core::state::ShellState;
use crate::shell::parser::Command;

#[derive(Debug)]
pub enum CommandError {
    InvalidArguments(String),
    ChangeDir(PathBuf, std::io::Error),
    HomeDirNotFound,
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::InvalidArguments(msg) => write!(f, "{}", msg),
            CommandError::ChangeDir(path, err) => write!(f, "cd: {}: {}", path.display(), err),
            CommandError::HomeDirNotFound => write!(f, "cd: HOME not set"),
        }
    }
}

impl std::error::Error for CommandError {}

/// What the control loop should do after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    NotBuiltin,
    Continue,
    Exit(i32),
}

/// A command run inside the shell process.
pub trait Builtin {
    fn execute(&self, args: &[String], state: &mut ShellState) -> Result<Dispatch, CommandError>;
}

#[derive(Clone)]
enum BuiltinType {
    Cd(CdCommand),
    Exit(ExitCommand),
}

impl Builtin for BuiltinType {
    fn execute(&self, args: &[String], state: &mut ShellState) -> Result<Dispatch, CommandError> {
        match self {
            BuiltinType::Cd(cmd) => cmd.execute(args, state),
            BuiltinType::Exit(cmd) => cmd.execute(args, state),
        }
    }
}

#[derive(Clone)]
pub struct Builtins {
    commands: BTreeMap<String, BuiltinType>,
}

impl Builtins {
    pub fn new(config: &Config) -> Self {
        let mut commands = BTreeMap::new();
        commands.insert(
            "cd".to_string(),
            BuiltinType::Cd(CdCommand::new(config.home().map(PathBuf::from))),
        );
        commands.insert("exit".to_string(), BuiltinType::Exit(ExitCommand::new()));

        Self { commands }
    }

    /// Runs `command` in-process if it names a builtin; redirections and the
    /// background flag do not apply to builtins.
    pub fn dispatch(&self, command: &Command, state: &mut ShellState) -> Result<Dispatch, CommandError> {
        match self.commands.get(command.name()) {
            Some(builtin) => {
                debug!(builtin = command.name(), args = ?command.args(), "dispatching builtin");
                builtin.execute(command.args(), state)
            }
            None => Ok(Dispatch::NotBuiltin),
        }
    }
}

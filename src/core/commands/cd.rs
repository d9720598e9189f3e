use super::{Builtin, CommandError, Dispatch};
use crate::core::state::ShellState;
use std::env;
use std::path::PathBuf;

#[derive(Clone)]
pub struct CdCommand {
    home: Option<PathBuf>,
}

impl CdCommand {
    pub fn new(home: Option<PathBuf>) -> Self {
        Self { home }
    }
}

impl Builtin for CdCommand {
    fn execute(&self, args: &[String], _state: &mut ShellState) -> Result<Dispatch, CommandError> {
        let target = match args {
            [] => self.home.clone().ok_or(CommandError::HomeDirNotFound)?,
            [path] => PathBuf::from(path),
            _ => {
                return Err(CommandError::InvalidArguments(
                    "cd: too many arguments".to_string(),
                ))
            }
        };

        env::set_current_dir(&target).map_err(|e| CommandError::ChangeDir(target, e))?;
        Ok(Dispatch::Continue)
    }
}

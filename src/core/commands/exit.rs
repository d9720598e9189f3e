use super::{Builtin, CommandError, Dispatch};
use crate::core::state::ShellState;
use crate::process::signal;

#[derive(Clone, Default)]
pub struct ExitCommand;

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Builtin for ExitCommand {
    /// Interrupts every tracked job and asks the control loop to terminate.
    fn execute(&self, args: &[String], state: &mut ShellState) -> Result<Dispatch, CommandError> {
        let code = match args {
            [] => state.last_status(),
            [code] => code.parse::<i32>().map_err(|_| {
                CommandError::InvalidArguments(format!("exit: {}: numeric argument required", code))
            })?,
            _ => {
                return Err(CommandError::InvalidArguments(
                    "exit: too many arguments".to_string(),
                ))
            }
        };

        signal::interrupt_jobs(state);
        Ok(Dispatch::Exit(code))
    }
}

use std::fmt;
use std::io;

pub mod executor;
pub mod jobs;
pub mod signal;
#[cfg(test)]
pub(crate) mod testing;

pub use executor::{Launcher, RedirectPlan};
pub use jobs::JobTracker;

#[derive(Debug)]
pub enum ProcessError {
    Fork(io::Error),
    Wait(io::Error),
    Signal(libc::c_int, io::Error),
    InvalidArgument(String),
    EmptyCommand,
}

impl ProcessError {
    /// Fork and wait failures leave the shell unable to manage children.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProcessError::Fork(_) | ProcessError::Wait(_))
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Fork(e) => write!(f, "fork() failed: {}", e),
            ProcessError::Wait(e) => write!(f, "waitpid() failed: {}", e),
            ProcessError::Signal(sig, e) => write!(f, "signal {} failed: {}", sig, e),
            ProcessError::InvalidArgument(arg) => {
                write!(f, "argument contains a NUL byte: {:?}", arg)
            }
            ProcessError::EmptyCommand => write!(f, "no command to run"),
        }
    }
}

impl std::error::Error for ProcessError {}

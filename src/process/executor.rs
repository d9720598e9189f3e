use std::ffi::{CStr, CString};
use std::fmt;
use std::io;

use libc::{c_char, c_int};
use signal_hook::consts::SIGCONT;
use tracing::{debug, warn};

use super::jobs::{decode_status, status_line};
use super::{signal, ProcessError};
use crate::core::state::{JobState, Pid, ShellState, SignalMode};
use crate::shell::parser::Command;

/// Permission bits for files created by output redirection (before umask).
const OUTPUT_MODE: libc::c_uint = 0o777;
/// Exit code of a child whose exec failed.
const EXEC_FAILURE: c_int = 1;

/// Where a child's stdin and stdout go. Built in the parent, applied in the
/// child between fork and exec.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectPlan {
    input: Option<CString>,
    output: Option<CString>,
}

#[derive(Debug)]
enum RedirectError {
    Open(String, io::Error),
    Dup(io::Error),
}

impl RedirectError {
    fn exit_code(&self) -> c_int {
        match self {
            RedirectError::Open(..) => 1,
            RedirectError::Dup(_) => 2,
        }
    }
}

impl fmt::Display for RedirectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectError::Open(path, e) => write!(f, "cannot open {}: {}", path, e),
            RedirectError::Dup(e) => write!(f, "dup2() failed: {}", e),
        }
    }
}

impl RedirectPlan {
    pub fn new(input: Option<&str>, output: Option<&str>) -> Result<Self, ProcessError> {
        Ok(Self {
            input: input.map(to_cstring).transpose()?,
            output: output.map(to_cstring).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none()
    }

    fn apply(&self) -> Result<(), RedirectError> {
        if let Some(path) = &self.input {
            redirect(path, libc::O_RDONLY, libc::STDIN_FILENO)?;
        }
        if let Some(path) = &self.output {
            redirect(
                path,
                libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC,
                libc::STDOUT_FILENO,
            )?;
        }
        Ok(())
    }
}

fn redirect(path: &CStr, flags: c_int, target: c_int) -> Result<(), RedirectError> {
    // SAFETY: path is NUL-terminated; the mode argument is ignored without O_CREAT.
    let fd = unsafe { libc::open(path.as_ptr(), flags, OUTPUT_MODE) };
    if fd == -1 {
        return Err(RedirectError::Open(
            path.to_string_lossy().into_owned(),
            io::Error::last_os_error(),
        ));
    }

    if fd != target {
        // SAFETY: both descriptors are valid; fd is ours to close.
        unsafe {
            if libc::dup2(fd, target) == -1 {
                return Err(RedirectError::Dup(io::Error::last_os_error()));
            }
            libc::close(fd);
        }
    }
    Ok(())
}

fn to_cstring(arg: &str) -> Result<CString, ProcessError> {
    CString::new(arg).map_err(|_| ProcessError::InvalidArgument(arg.to_string()))
}

/// Forks and execs external commands.
#[derive(Debug, Clone, Default)]
pub struct Launcher;

impl Launcher {
    pub fn new() -> Self {
        Self
    }

    /// Runs `command`. Foreground commands are waited for and their status
    /// recorded; background commands are tracked and left running.
    pub fn launch(&self, command: &Command, state: &mut ShellState) -> Result<(), ProcessError> {
        let argv = command
            .argv
            .iter()
            .map(|arg| to_cstring(arg))
            .collect::<Result<Vec<_>, _>>()?;
        if argv.is_empty() {
            return Err(ProcessError::EmptyCommand);
        }
        let plan = RedirectPlan::new(command.input.as_deref(), command.output.as_deref())?;

        if command.background {
            // Background children keep the shell's ignore dispositions
            let pid = spawn(&argv, &plan, None)?;
            state.track(pid);
            debug!(pid, program = %command.name(), "background job started");
            return Ok(());
        }

        let pid = spawn(&argv, &plan, Some(SignalMode::ChildDefault))?;
        debug!(pid, program = %command.name(), redirected = !plan.is_empty(), "foreground child started");

        match wait_foreground(pid)? {
            JobState::Stopped => {
                if let Err(e) = signal::send(pid, SIGCONT) {
                    warn!(pid, error = %e, "could not continue stopped child");
                }
                if let Some(line) = status_line(pid, JobState::Stopped) {
                    eprintln!("{}", line);
                }
                state.track(pid);
            }
            finished => {
                debug!(pid, state = ?finished, "foreground child finished");
                state.record_foreground(finished);
            }
        }
        Ok(())
    }
}

fn spawn(
    argv: &[CString],
    plan: &RedirectPlan,
    child_mode: Option<SignalMode>,
) -> Result<Pid, ProcessError> {
    let mut argv_ptrs: Vec<*const c_char> = argv.iter().map(|arg| arg.as_ptr()).collect();
    argv_ptrs.push(std::ptr::null());

    // SAFETY: the shell runs a single thread, so the child owns a consistent
    // copy of the heap until it execs or exits.
    match unsafe { libc::fork() } {
        -1 => Err(ProcessError::Fork(io::Error::last_os_error())),
        0 => exec_child(argv, &argv_ptrs, plan, child_mode),
        pid => Ok(pid),
    }
}

/// Child side of `spawn`. Never returns to the shell's control loop.
fn exec_child(
    argv: &[CString],
    argv_ptrs: &[*const c_char],
    plan: &RedirectPlan,
    child_mode: Option<SignalMode>,
) -> ! {
    if let Some(mode) = child_mode {
        if let Err(e) = signal::apply(mode) {
            eprintln!("smallsh: {}", e);
            exit_child(1);
        }
    }

    if let Err(e) = plan.apply() {
        eprintln!("smallsh: {}", e);
        exit_child(e.exit_code());
    }

    // SAFETY: argv_ptrs is a NULL-terminated array of pointers into argv.
    unsafe { libc::execvp(argv_ptrs[0], argv_ptrs.as_ptr()) };

    let err = io::Error::last_os_error();
    eprintln!("smallsh: {}: {}", argv[0].to_string_lossy(), err);
    exit_child(EXEC_FAILURE)
}

fn exit_child(code: c_int) -> ! {
    // SAFETY: _exit skips the parent's atexit handlers and buffered output.
    unsafe { libc::_exit(code) }
}

fn wait_foreground(pid: Pid) -> Result<JobState, ProcessError> {
    loop {
        let mut status: c_int = 0;
        // SAFETY: status is a valid out-pointer for the duration of the call.
        if unsafe { libc::waitpid(pid, &mut status, libc::WUNTRACED) } == -1 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EINTR) {
                continue;
            }
            return Err(ProcessError::Wait(err));
        }
        return Ok(decode_status(status));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_plan_empty() -> Result<(), ProcessError> {
        assert!(RedirectPlan::new(None, None)?.is_empty());
        assert!(!RedirectPlan::new(Some("in.txt"), None)?.is_empty());
        assert!(!RedirectPlan::new(None, Some("out.txt"))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_redirect_plan_rejects_nul() {
        let result = RedirectPlan::new(Some("bad\0name"), None);
        assert!(matches!(result, Err(ProcessError::InvalidArgument(_))));
    }

    #[test]
    fn test_launch_rejects_nul_in_argv() {
        let mut state = ShellState::new();
        let command = Command {
            argv: vec!["echo".to_string(), "a\0b".to_string()],
            ..Command::default()
        };
        let result = Launcher::new().launch(&command, &mut state);
        assert!(matches!(result, Err(ProcessError::InvalidArgument(_))));
        assert_eq!(state.last_status(), 0);
    }

    #[test]
    fn test_launch_rejects_empty_command() {
        let mut state = ShellState::new();
        let result = Launcher::new().launch(&Command::default(), &mut state);
        assert!(matches!(result, Err(ProcessError::EmptyCommand)));
    }

    #[test]
    fn test_redirect_error_exit_codes() {
        let open = RedirectError::Open("x".into(), io::Error::from_raw_os_error(libc::ENOENT));
        let dup = RedirectError::Dup(io::Error::from_raw_os_error(libc::EBADF));
        assert_eq!(open.exit_code(), 1);
        assert_eq!(dup.exit_code(), 2);
        assert!(open.to_string().starts_with("cannot open x"));
    }
}

use std::io;

use libc::c_int;
use signal_hook::consts::SIGCONT;
use tracing::{debug, warn};

use super::{signal, ProcessError};
use crate::core::state::{JobState, Pid, ShellState};

/// Interprets a raw `waitpid` status word.
pub fn decode_status(status: c_int) -> JobState {
    if libc::WIFEXITED(status) {
        JobState::Exited(libc::WEXITSTATUS(status))
    } else if libc::WIFSIGNALED(status) {
        JobState::Signaled(libc::WTERMSIG(status))
    } else if libc::WIFSTOPPED(status) {
        JobState::Stopped
    } else {
        JobState::Running
    }
}

/// Line reported on stderr when a child changes state.
pub fn status_line(pid: Pid, state: JobState) -> Option<String> {
    match state {
        JobState::Exited(code) => Some(format!("Child process {} done. Exit status {}.", pid, code)),
        JobState::Signaled(sig) => Some(format!("Child process {} done. Signaled {}.", pid, sig)),
        JobState::Stopped => Some(format!("Child process {} stopped. Continuing.", pid)),
        JobState::Running => None,
    }
}

/// Collects finished and stopped children between prompts.
#[derive(Debug, Clone, Default)]
pub struct JobTracker;

impl JobTracker {
    pub fn new() -> Self {
        Self
    }

    /// Drains every child that changed state without blocking, reporting each
    /// one and updating the job table.
    pub fn reap(&self, state: &mut ShellState) -> Result<(), ProcessError> {
        while let Some((pid, job_state)) = poll_child()? {
            if let Some(line) = status_line(pid, job_state) {
                eprintln!("{}", line);
            }
            if job_state == JobState::Stopped {
                if let Err(e) = signal::send(pid, SIGCONT) {
                    warn!(pid, error = %e, "could not continue stopped child");
                }
            }
            self.record(state, pid, job_state);
        }
        Ok(())
    }

    /// Bookkeeping for one reaped child. A stopped child has just been sent
    /// SIGCONT, so its job goes back to `Running`.
    pub fn record(&self, state: &mut ShellState, pid: Pid, job_state: JobState) {
        let tracked_state = match job_state {
            JobState::Stopped => JobState::Running,
            other => other,
        };

        match state.update(pid, tracked_state) {
            Some(job) => debug!(pid, state = ?job.state, "job updated"),
            None => debug!(pid, state = ?job_state, "reaped untracked child"),
        }
    }
}

fn poll_child() -> Result<Option<(Pid, JobState)>, ProcessError> {
    loop {
        let mut status: c_int = 0;
        // SAFETY: status is a valid out-pointer for the duration of the call.
        let pid = unsafe { libc::waitpid(-1, &mut status, libc::WNOHANG | libc::WUNTRACED) };
        match pid {
            0 => return Ok(None),
            -1 => {
                let err = io::Error::last_os_error();
                match err.raw_os_error() {
                    Some(libc::ECHILD) => return Ok(None),
                    Some(libc::EINTR) => continue,
                    _ => return Err(ProcessError::Wait(err)),
                }
            }
            pid => return Ok(Some((pid, decode_status(status)))),
        }
    }
}

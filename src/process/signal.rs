use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use libc::{c_int, sighandler_t, SIG_DFL, SIG_IGN};
use signal_hook::consts::{SIGINT, SIGTSTP};
use tracing::{trace, warn};

use super::ProcessError;
use crate::core::state::{Pid, ShellState, SignalMode};

static READ_INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Installed for SIGINT while the shell blocks on input. Installed without
/// `SA_RESTART`, so the pending read fails with `EINTR`.
pub(super) extern "C" fn interrupt_read(_: c_int) {
    READ_INTERRUPTED.store(true, Ordering::SeqCst);
}

fn set_disposition(signal: c_int, handler: sighandler_t) -> Result<(), ProcessError> {
    // SAFETY: the action is fully initialised and the only custom handler
    // touches nothing but an atomic.
    let rc = unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = handler;
        action.sa_flags = 0;
        libc::sigfillset(&mut action.sa_mask);
        libc::sigaction(signal, &action, std::ptr::null_mut())
    };

    if rc == -1 {
        return Err(ProcessError::Signal(signal, io::Error::last_os_error()));
    }
    Ok(())
}

/// Installs the SIGINT/SIGTSTP dispositions for `mode` in the calling process.
pub fn apply(mode: SignalMode) -> Result<(), ProcessError> {
    match mode {
        SignalMode::Ignoring => {
            set_disposition(SIGINT, SIG_IGN)?;
            set_disposition(SIGTSTP, SIG_IGN)
        }
        SignalMode::InterruptibleRead => {
            set_disposition(SIGINT, interrupt_read as sighandler_t)?;
            set_disposition(SIGTSTP, SIG_IGN)
        }
        SignalMode::ChildDefault => {
            set_disposition(SIGINT, SIG_DFL)?;
            set_disposition(SIGTSTP, SIG_DFL)
        }
    }
}

/// Switches the shell's own dispositions and records the new mode.
pub fn switch(state: &mut ShellState, mode: SignalMode) -> Result<(), ProcessError> {
    if state.signal_mode() == mode {
        return Ok(());
    }
    apply(mode)?;
    trace!(from = ?state.signal_mode(), to = ?mode, "signal disposition switched");
    state.set_signal_mode(mode);
    Ok(())
}

/// Returns whether SIGINT arrived since the last call, clearing the flag.
pub fn take_interrupt() -> bool {
    READ_INTERRUPTED.swap(false, Ordering::SeqCst)
}

pub fn send(pid: Pid, signal: c_int) -> Result<(), ProcessError> {
    // SAFETY: kill has no memory-safety preconditions.
    if unsafe { libc::kill(pid, signal) } == -1 {
        return Err(ProcessError::Signal(signal, io::Error::last_os_error()));
    }
    trace!(pid, signal = name(signal), "signal sent");
    Ok(())
}

/// Sends SIGINT to every tracked job. Jobs that already vanished are skipped.
pub fn interrupt_jobs(state: &ShellState) {
    for pid in state.tracked_pids() {
        if let Err(e) = send(pid, SIGINT) {
            warn!(pid, error = %e, "could not interrupt job");
        }
    }
}

pub fn name(signal: c_int) -> &'static str {
    signal_hook::low_level::signal_name(signal).unwrap_or("unknown")
}

//! Helpers for tests that touch process-wide signal state or need a real
//! child to signal.

use std::io;
use std::sync::{Mutex, MutexGuard};

use libc::c_int;

use super::jobs::decode_status;
use crate::core::state::{JobState, Pid};

static SIGNALS: Mutex<()> = Mutex::new(());

/// Serialises tests that install dispositions or use the interrupt flag.
pub(crate) fn lock_signals() -> MutexGuard<'static, ()> {
    SIGNALS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Sets the interrupt flag as if SIGINT had arrived during a read.
pub(crate) fn flag_interrupt() {
    super::signal::interrupt_read(libc::SIGINT);
}

/// Forks a child that restores the default SIGINT disposition and sleeps until
/// a signal ends it. Returns once the child is ready to be interrupted. The
/// child gives up on its own after 30 seconds.
pub(crate) fn spawn_interruptible() -> io::Result<Pid> {
    let mut fds: [c_int; 2] = [0; 2];
    // SAFETY: fds is a valid two-element out-array.
    if unsafe { libc::pipe(fds.as_mut_ptr()) } == -1 {
        return Err(io::Error::last_os_error());
    }
    let [read_end, write_end] = fds;

    // SAFETY: the child only calls async-signal-safe functions before it ends.
    match unsafe { libc::fork() } {
        -1 => Err(io::Error::last_os_error()),
        0 => unsafe {
            let mut mask: libc::sigset_t = std::mem::zeroed();
            libc::sigemptyset(&mut mask);
            libc::sigprocmask(libc::SIG_SETMASK, &mask, std::ptr::null_mut());
            libc::signal(libc::SIGINT, libc::SIG_DFL);
            libc::alarm(30);
            libc::close(read_end);
            libc::write(write_end, b"r".as_ptr().cast(), 1);
            loop {
                libc::pause();
            }
        },
        pid => {
            // SAFETY: both descriptors came from pipe() above.
            let ready = unsafe {
                libc::close(write_end);
                let mut byte = 0u8;
                let n = loop {
                    let n = libc::read(read_end, (&mut byte as *mut u8).cast(), 1);
                    if n != -1 || io::Error::last_os_error().kind() != io::ErrorKind::Interrupted {
                        break n;
                    }
                };
                libc::close(read_end);
                n == 1
            };

            if !ready {
                // SAFETY: pid is our own child.
                unsafe { libc::kill(pid, libc::SIGKILL) };
                wait_for(pid)?;
                return Err(io::Error::other("child never became ready"));
            }
            Ok(pid)
        }
    }
}

/// Blocks until `pid` terminates and returns how it ended.
pub(crate) fn wait_for(pid: Pid) -> io::Result<JobState> {
    loop {
        let mut status: c_int = 0;
        // SAFETY: status is a valid out-pointer for the duration of the call.
        if unsafe { libc::waitpid(pid, &mut status, 0) } == -1 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        return Ok(decode_status(status));
    }
}

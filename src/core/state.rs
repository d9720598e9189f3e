use std::collections::BTreeMap;

pub type Pid = libc::pid_t;

/// Last known state of a child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Running,
    Stopped,
    Exited(i32),
    Signaled(i32),
}

impl JobState {
    pub fn is_terminated(&self) -> bool {
        matches!(self, JobState::Exited(_) | JobState::Signaled(_))
    }

    /// Shell-visible status code: the exit code, or `128 + signal`.
    pub fn status_code(&self) -> Option<i32> {
        match self {
            JobState::Exited(code) => Some(*code),
            JobState::Signaled(signal) => Some(128 + signal),
            JobState::Running | JobState::Stopped => None,
        }
    }
}

/// Disposition currently installed for SIGINT and SIGTSTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalMode {
    Ignoring,
    InterruptibleRead,
    ChildDefault,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub pid: Pid,
    pub state: JobState,
}

/// Everything the control loop carries from one line to the next.
#[derive(Debug)]
pub struct ShellState {
    last_status: i32,
    last_background: Option<Pid>,
    jobs: BTreeMap<Pid, Job>,
    signal_mode: SignalMode,
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellState {
    pub fn new() -> Self {
        Self {
            last_status: 0,
            last_background: None,
            jobs: BTreeMap::new(),
            signal_mode: SignalMode::Ignoring,
        }
    }

    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    /// Records the outcome of a foreground wait. Non-terminal states are ignored.
    pub fn record_foreground(&mut self, state: JobState) {
        if let Some(code) = state.status_code() {
            self.last_status = code;
        }
    }

    pub fn last_background(&self) -> Option<Pid> {
        self.last_background
    }

    /// Starts tracking `pid` as a running background job and makes it `$!`.
    pub fn track(&mut self, pid: Pid) {
        self.jobs.insert(
            pid,
            Job {
                pid,
                state: JobState::Running,
            },
        );
        self.last_background = Some(pid);
    }

    /// Applies a reaped state to a tracked job. Terminated jobs are removed and
    /// returned; live ones are updated in place. Returns `None` for unknown pids.
    pub fn update(&mut self, pid: Pid, state: JobState) -> Option<Job> {
        if state.is_terminated() {
            return self.jobs.remove(&pid).map(|mut job| {
                job.state = state;
                job
            });
        }

        let job = self.jobs.get_mut(&pid)?;
        job.state = state;
        Some(job.clone())
    }

    pub fn is_tracked(&self, pid: Pid) -> bool {
        self.jobs.contains_key(&pid)
    }

    pub fn tracked_pids(&self) -> Vec<Pid> {
        self.jobs.keys().copied().collect()
    }

    pub fn signal_mode(&self) -> SignalMode {
        self.signal_mode
    }

    pub fn set_signal_mode(&mut self, mode: SignalMode) {
        self.signal_mode = mode;
    }
}

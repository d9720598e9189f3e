use std::io::{self, IsTerminal};

use tracing::debug;

mod executor;
pub mod parser;

use crate::{
    core::{
        commands::{Builtins, Dispatch},
        config::Config,
        state::{ShellState, SignalMode},
    },
    error::ShellError,
    expand::Expander,
    input::{EditorSource, LineSource, ReadOutcome, StdinSource},
    process::{signal, JobTracker, Launcher},
};

use executor::CommandHandler;

pub struct Shell {
    pub(crate) source: Box<dyn LineSource>,
    pub(crate) config: Config,
    pub(crate) expander: Expander,
    pub(crate) builtins: Builtins,
    pub(crate) launcher: Launcher,
    pub(crate) tracker: JobTracker,
    pub(crate) state: ShellState,
}

impl Shell {
    /// Builds a shell from the process environment, editing lines with
    /// rustyline when stdin is a terminal.
    pub fn new() -> Result<Self, ShellError> {
        let config = Config::from_env()?;
        let source: Box<dyn LineSource> = if io::stdin().is_terminal() {
            Box::new(EditorSource::new()?)
        } else {
            Box::new(StdinSource::stdin())
        };

        Ok(Self::with_source(config, source))
    }

    pub fn with_source(config: Config, source: Box<dyn LineSource>) -> Self {
        debug!(
            prompt = config.prompt(),
            separators = ?config.separators(),
            home = ?config.home(),
            "shell configured"
        );

        Shell {
            source,
            expander: Expander::new(config.home(), std::process::id()),
            builtins: Builtins::new(&config),
            launcher: Launcher::new(),
            tracker: JobTracker::new(),
            state: ShellState::new(),
            config,
        }
    }

    /// Runs the read-execute loop until `exit` or end of input and returns
    /// the code the process should exit with.
    pub fn run(&mut self) -> Result<i32, ShellError> {
        signal::apply(SignalMode::Ignoring)?;
        self.state.set_signal_mode(SignalMode::Ignoring);

        loop {
            self.reap()?;

            let line = match self.read() {
                Ok(ReadOutcome::Line(line)) => line,
                Ok(ReadOutcome::Interrupted) => {
                    eprintln!();
                    continue;
                }
                Ok(ReadOutcome::Eof) => return Ok(self.end_of_input()),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    eprintln!("smallsh: {}", e);
                    continue;
                }
            };

            match self.execute_command(&line) {
                Ok(Dispatch::Exit(code)) => return Ok(self.finish(code)),
                Ok(_) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => eprintln!("smallsh: {}", e),
            }
        }
    }

    fn reap(&mut self) -> Result<(), ShellError> {
        self.tracker.reap(&mut self.state)?;
        Ok(())
    }

    /// Blocks for the next line with SIGINT able to abort the read. An
    /// interrupt that lands after the handler is installed but before the
    /// read starts skips the read.
    fn read(&mut self) -> Result<ReadOutcome, ShellError> {
        signal::switch(&mut self.state, SignalMode::InterruptibleRead)?;
        let outcome = if signal::take_interrupt() {
            Ok(ReadOutcome::Interrupted)
        } else {
            self.source.read_line(self.config.prompt())
        };
        signal::switch(&mut self.state, SignalMode::Ignoring)?;

        if signal::take_interrupt() {
            debug!("input read interrupted");
        }
        outcome
    }

    /// End of input behaves like `exit` without an argument.
    fn end_of_input(&self) -> i32 {
        signal::interrupt_jobs(&self.state);
        self.finish(self.state.last_status())
    }

    fn finish(&self, code: i32) -> i32 {
        eprintln!("\nexit");
        debug!(code, "shell exiting");
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::JobState;
    use crate::process::testing;
    use std::cell::Cell;
    use std::io::Cursor;
    use std::rc::Rc;

    struct CountingSource {
        reads: Rc<Cell<usize>>,
    }

    impl LineSource for CountingSource {
        fn read_line(&mut self, _prompt: &str) -> Result<ReadOutcome, ShellError> {
            self.reads.set(self.reads.get() + 1);
            Ok(ReadOutcome::Line("true".into()))
        }
    }

    fn config() -> Config {
        Config::from_vars(Vec::<(String, String)>::new()).unwrap()
    }

    #[test]
    fn test_pending_interrupt_skips_the_read() {
        let _guard = testing::lock_signals();
        let reads = Rc::new(Cell::new(0));
        let source = CountingSource {
            reads: Rc::clone(&reads),
        };
        let mut shell = Shell::with_source(config(), Box::new(source));

        testing::flag_interrupt();
        assert_eq!(shell.read().unwrap(), ReadOutcome::Interrupted);
        assert_eq!(reads.get(), 0);
        assert!(!signal::take_interrupt());

        assert_eq!(shell.read().unwrap(), ReadOutcome::Line("true".into()));
        assert_eq!(reads.get(), 1);
        assert_eq!(shell.state.signal_mode(), SignalMode::Ignoring);
    }

    #[test]
    fn test_end_of_input_interrupts_jobs() {
        let source = StdinSource::new(Cursor::new(Vec::new()), io::sink());
        let mut shell = Shell::with_source(config(), Box::new(source));
        shell.state.record_foreground(JobState::Exited(5));

        let pid = testing::spawn_interruptible().unwrap();
        shell.state.track(pid);

        assert_eq!(shell.end_of_input(), 5);
        assert_eq!(
            testing::wait_for(pid).unwrap(),
            JobState::Signaled(libc::SIGINT)
        );
    }
}

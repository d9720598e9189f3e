use std::io::{self, IsTerminal};
use std::process;

use smallsh::shell::Shell;
use tracing_subscriber::EnvFilter;

fn main() {
    // SMALLSH_LOG takes an EnvFilter directive, e.g. "smallsh=debug"
    let filter = EnvFilter::try_from_env("SMALLSH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(true)
        .init();

    let code = match Shell::new().and_then(|mut shell| shell.run()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("smallsh: {}", e);
            1
        }
    };

    process::exit(code);
}

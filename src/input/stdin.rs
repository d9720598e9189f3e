use std::io::{self, BufRead, Write};

use super::{InputError, LineSource, ReadOutcome};
use crate::error::ShellError;

/// Reads lines from a plain byte stream, writing the prompt to `prompt_out`.
///
/// Unlike `BufRead::read_line`, an `EINTR` from the underlying read is not
/// retried: it ends the read with `ReadOutcome::Interrupted` and the partial
/// line is discarded. A line that is not valid UTF-8 is consumed and rejected
/// with `InputError::NotUnicode` rather than being rewritten.
pub struct StdinSource<R, W> {
    reader: R,
    prompt_out: W,
}

impl StdinSource<io::StdinLock<'static>, io::Stderr> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> StdinSource<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }

    fn read_raw_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        loop {
            let available = self.reader.fill_buf()?;
            if available.is_empty() {
                return Ok(if line.is_empty() { None } else { Some(line) });
            }

            match available.iter().position(|&b| b == b'\n') {
                Some(newline) => {
                    line.extend_from_slice(&available[..newline]);
                    self.reader.consume(newline + 1);
                    return Ok(Some(line));
                }
                None => {
                    let len = available.len();
                    line.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> LineSource for StdinSource<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        self.prompt_out.write_all(prompt.as_bytes())?;
        self.prompt_out.flush()?;

        match self.read_raw_line() {
            Ok(Some(bytes)) => String::from_utf8(bytes)
                .map(ReadOutcome::Line)
                .map_err(|_| InputError::NotUnicode.into()),
            Ok(None) => Ok(ReadOutcome::Eof),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(ReadOutcome::Interrupted),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn source(input: &str) -> StdinSource<Cursor<Vec<u8>>, Vec<u8>> {
        StdinSource::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_reads_lines_then_eof() -> Result<(), ShellError> {
        let mut src = source("echo hi\nls\n");
        assert_eq!(src.read_line("> ")?, ReadOutcome::Line("echo hi".into()));
        assert_eq!(src.read_line("> ")?, ReadOutcome::Line("ls".into()));
        assert_eq!(src.read_line("> ")?, ReadOutcome::Eof);
        assert_eq!(src.prompt_out, b"> > > ".to_vec());
        Ok(())
    }

    #[test]
    fn test_last_line_without_newline() -> Result<(), ShellError> {
        let mut src = source("exit 3");
        assert_eq!(src.read_line("")?, ReadOutcome::Line("exit 3".into()));
        assert_eq!(src.read_line("")?, ReadOutcome::Eof);
        Ok(())
    }

    #[test]
    fn test_empty_line() -> Result<(), ShellError> {
        let mut src = source("\n");
        assert_eq!(src.read_line("")?, ReadOutcome::Line(String::new()));
        Ok(())
    }

    #[test]
    fn test_line_spanning_buffer_refills() -> Result<(), ShellError> {
        let long = "x".repeat(100);
        let input = format!("{}\n", long);
        let reader = io::BufReader::with_capacity(8, Cursor::new(input.into_bytes()));
        let mut src = StdinSource::new(reader, io::sink());
        assert_eq!(src.read_line("")?, ReadOutcome::Line(long));
        Ok(())
    }

    #[test]
    fn test_invalid_utf8_line_is_rejected() -> Result<(), ShellError> {
        let input = b"cat f\xff\nls\n".to_vec();
        let mut src = StdinSource::new(Cursor::new(input), io::sink());
        assert!(matches!(
            src.read_line(""),
            Err(ShellError::InputError(InputError::NotUnicode))
        ));
        // the bad line is gone, the next one reads normally
        assert_eq!(src.read_line("")?, ReadOutcome::Line("ls".into()));
        Ok(())
    }

    struct InterruptOnce {
        interrupted: bool,
        rest: Cursor<Vec<u8>>,
    }

    impl Read for InterruptOnce {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            self.rest.read(buf)
        }
    }

    #[test]
    fn test_interrupted_read_is_reported() -> Result<(), ShellError> {
        let reader = io::BufReader::new(InterruptOnce {
            interrupted: false,
            rest: Cursor::new(b"pwd\n".to_vec()),
        });
        let mut src = StdinSource::new(reader, io::sink());
        assert_eq!(src.read_line("")?, ReadOutcome::Interrupted);
        assert_eq!(src.read_line("")?, ReadOutcome::Line("pwd".into()));
        Ok(())
    }
}

use std::fmt;

const INPUT_MARKER: &str = "<";
const OUTPUT_MARKER: &str = ">";
const BACKGROUND_MARKER: &str = "&";

/// One classified command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub argv: Vec<String>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub background: bool,
}

impl Command {
    pub fn name(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    MissingRedirectTarget(String),
    EmptyCommand,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingRedirectTarget(marker) => {
                write!(f, "missing file name after '{}'", marker)
            }
            ParseError::EmptyCommand => write!(f, "missing command"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Classifies expanded words into argv, redirections and the background flag.
///
/// `<` and `>` take the following word as their path and may appear anywhere,
/// in any order; a repeated marker overrides the earlier one. A trailing `&`
/// left over after redirections are stripped marks the command as background.
pub fn parse(words: Vec<String>) -> Result<Command, ParseError> {
    let mut command = Command::default();
    let mut words = words.into_iter();

    while let Some(word) = words.next() {
        let slot = match word.as_str() {
            INPUT_MARKER => &mut command.input,
            OUTPUT_MARKER => &mut command.output,
            _ => {
                command.argv.push(word);
                continue;
            }
        };
        let target = words
            .next()
            .ok_or_else(|| ParseError::MissingRedirectTarget(word.clone()))?;
        *slot = Some(target);
    }

    if command.argv.last().map(String::as_str) == Some(BACKGROUND_MARKER) {
        command.argv.pop();
        command.background = true;
    }

    if command.argv.is_empty() {
        return Err(ParseError::EmptyCommand);
    }
    Ok(command)
}

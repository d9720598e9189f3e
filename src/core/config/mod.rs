use std::{ffi::OsString, fmt, path::{Path, PathBuf}};

/// Prompt used when `PS1` is unset.
pub const DEFAULT_PROMPT: &str = " ";
/// Field separators used when `IFS` is unset.
pub const DEFAULT_IFS: &str = "\t\n";

/// Snapshot of the environment values the shell consults, taken once at startup.
/// `PATH` is not kept here; `execvp` reads it from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    prompt: String,
    separators: String,
    home: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            separators: DEFAULT_IFS.to_string(),
            home: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::from_vars(std::env::vars_os())?;
        if config.home.is_none() {
            config.home = dirs::home_dir();
        }
        Ok(config)
    }

    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let mut config = Config::default();

        for (key, value) in vars {
            let key: OsString = key.into();
            let value: OsString = value.into();
            match key.to_str() {
                Some("PS1") => config.prompt = unicode_value("PS1", value)?,
                Some("IFS") => config.separators = unicode_value("IFS", value)?,
                Some("HOME") if !value.is_empty() => config.home = Some(PathBuf::from(value)),
                _ => {}
            }
        }

        Ok(config)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn separators(&self) -> &str {
        &self.separators
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }
}

fn unicode_value(name: &str, value: OsString) -> Result<String, ConfigError> {
    value
        .into_string()
        .map_err(|_| ConfigError::NotUnicode(name.to_string()))
}

#[derive(Debug)]
pub enum ConfigError {
    NotUnicode(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotUnicode(var) => {
                write!(f, "Environment variable is not valid unicode: {}", var)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

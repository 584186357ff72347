//! Credential acquisition.
//!
//! The password is resolved once, before any request is made:
//!
//! 1. `GERRIT_PASSWORD` in the environment
//! 2. `--password-file` (first line)
//! 3. an interactive prompt; input is hidden when stdin is a terminal,
//!    otherwise one line is read from stdin
//!
//! Any failure here is fatal to the run.

use std::fmt;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable holding the HTTP password.
pub const PASSWORD_ENV: &str = "GERRIT_PASSWORD";

/// Prompt shown when asking for the password interactively.
pub const PASSWORD_PROMPT: &str = "Gerrit password";

/// Errors acquiring credentials.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to read password file {path}: {source}")]
    PasswordFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read password from stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("failed to read password from terminal: {0}")]
    Prompt(String),

    #[error("empty password from {0}")]
    Empty(&'static str),
}

/// Username and HTTP password for the review service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where to look for the password, in priority order.
#[derive(Debug, Clone, Default)]
pub struct CredentialSource {
    /// Value of `GERRIT_PASSWORD`, if set.
    pub env_password: Option<String>,
    pub password_file: Option<PathBuf>,
}

impl CredentialSource {
    pub fn from_env(password_file: Option<PathBuf>) -> Self {
        Self {
            env_password: std::env::var(PASSWORD_ENV).ok(),
            password_file,
        }
    }

    /// Resolves the password for `username`, prompting if nothing else is configured.
    ///
    /// Blocks on stdin when prompting.
    pub fn resolve(self, username: &str) -> Result<Credentials, CredentialError> {
        let password = match (self.env_password, self.password_file) {
            (Some(password), _) => non_empty(password, PASSWORD_ENV)?,
            (None, Some(path)) => read_password_file(&path)?,
            (None, None) => prompt_password()?,
        };
        Ok(Credentials::new(username, password))
    }
}

fn non_empty(password: String, source: &'static str) -> Result<String, CredentialError> {
    if password.is_empty() {
        return Err(CredentialError::Empty(source));
    }
    Ok(password)
}

/// Reads the first line of `path`, trimmed.
pub fn read_password_file(path: &Path) -> Result<String, CredentialError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CredentialError::PasswordFile {
        path: path.to_path_buf(),
        source,
    })?;
    let first_line = contents.lines().next().unwrap_or("").trim().to_string();
    non_empty(first_line, "password file")
}

fn prompt_password() -> Result<String, CredentialError> {
    if io::stdin().is_terminal() {
        let password = dialoguer::Password::new()
            .with_prompt(PASSWORD_PROMPT)
            .allow_empty_password(false)
            .interact()
            .map_err(|e| CredentialError::Prompt(e.to_string()))?;
        return Ok(password);
    }

    eprint!("{}: ", PASSWORD_PROMPT);
    io::stderr().flush().map_err(CredentialError::Stdin)?;
    let line = read_line(io::stdin().lock())?;
    eprintln!();
    non_empty(line, "stdin")
}

/// Reads one line, without its line terminator or surrounding whitespace.
fn read_line(mut reader: impl BufRead) -> Result<String, CredentialError> {
    let mut line = String::new();
    reader.read_line(&mut line).map_err(CredentialError::Stdin)?;
    Ok(line.trim().to_string())
}

mod token;

pub use token::Token;

use base64::{engine::general_purpose::STANDARD, Engine};
use log::debug;

use crate::error::{JobStatsError, Result};

/// Jenkins login used for HTTP Basic authentication.
#[derive(Debug)]
pub struct Credentials {
    user: String,
    token: Token,
}

impl Credentials {
    pub fn new(user: impl Into<String>, token: Token) -> Self {
        Self {
            user: user.into(),
            token,
        }
    }

    /// Fills in whatever the caller did not supply.
    ///
    /// A missing user falls back to the account running the process. A missing
    /// token is requested through `prompt`, which lets tests swap out the
    /// interactive terminal read.
    pub fn resolve<P>(user: Option<String>, token: Option<Token>, prompt: P) -> Result<Self>
    where
        P: FnOnce() -> std::io::Result<String>,
    {
        let user = match user.filter(|u| !u.is_empty()) {
            Some(user) => user,
            None => os_user().ok_or_else(|| {
                JobStatsError::Config("No user given and the OS user is unknown".into())
            })?,
        };

        let token = match token.filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => {
                debug!("No API token configured, prompting");
                Token::from(prompt()?)
            }
        };

        Ok(Self { user, token })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Value for the `Authorization` header: `Basic base64(user:token)`.
    pub fn basic_auth_header(&self) -> String {
        let raw = format!("{}:{}", self.user, self.token.as_str());
        format!("Basic {}", STANDARD.encode(raw))
    }
}

/// Reads the API token from the terminal without echoing it.
pub fn prompt_token() -> std::io::Result<String> {
    let term = console::Term::stderr();
    term.write_str("API Token: ")?;
    term.read_secure_line()
}

fn os_user() -> Option<String> {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|u| !u.is_empty())
}

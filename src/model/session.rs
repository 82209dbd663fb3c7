use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Length of a list token.
pub const TOKEN_LEN: usize = 32;

/// Error type for list token handling
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("invalid list token '{0}': expected 32 letters or digits")]
    InvalidToken(String),
    #[error("no list token in '{0}'")]
    MissingToken(String),
}

/// Opaque token naming one shared list. Possessing it grants full access.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionToken(String);

impl SessionToken {
    pub fn parse(s: &str) -> Result<Self, SessionError> {
        if s.len() == TOKEN_LEN && s.chars().all(|c| c.is_ascii_alphanumeric()) {
            Ok(SessionToken(s.to_string()))
        } else {
            Err(SessionError::InvalidToken(s.to_string()))
        }
    }

    /// Accept either a bare token or a share URL of the form `<origin>/<token>`.
    pub fn from_share_input(input: &str) -> Result<Self, SessionError> {
        let input = input.trim();
        if !input.contains("://") {
            return Self::parse(input);
        }
        let url = Url::parse(input).map_err(|_| SessionError::InvalidToken(input.to_string()))?;
        let path = url.path().trim_matches('/');
        if path.is_empty() {
            return Err(SessionError::MissingToken(input.to_string()));
        }
        Self::parse(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Share URL for this list under the given web origin.
    pub fn share_url(&self, web_url: &str) -> String {
        format!("{}/{}", web_url.trim_end_matches('/'), self.0)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SessionToken {
    type Error = SessionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<SessionToken> for String {
    fn from(token: SessionToken) -> Self {
        token.0
    }
}

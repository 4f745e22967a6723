//! Installation identity and naming-convention matching
//!
//! Every resource belonging to an installation carries the installation id
//! somewhere in its name. Matching is token-based: the id must be bounded by
//! a delimiter (`-` or `_`) or the start/end of the name, so that `abc123`
//! never matches a resource owned by installation `abc1234`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Characters accepted as token boundaries in resource names
const DELIMITERS: &[char] = &['-', '_'];

/// Errors produced when parsing an installation id
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInstallationId {
    #[error("installation id must not be empty")]
    Empty,

    #[error("installation id must not contain whitespace: {0:?}")]
    Whitespace(String),
}

/// Opaque correlation key shared by every resource of one installation
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct InstallationId(String);

impl InstallationId {
    /// Validate and wrap an installation id
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidInstallationId> {
        let id = id.into();
        if id.is_empty() {
            return Err(InvalidInstallationId::Empty);
        }
        if id.chars().any(char::is_whitespace) {
            return Err(InvalidInstallationId::Whitespace(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if `name` contains this id as a delimited token.
    ///
    /// Every start position is checked, including occurrences that overlap
    /// an earlier rejected one, so `xa-a-a` still matches `a-a` at its end.
    pub fn is_token_of(&self, name: &str) -> bool {
        let id = self.0.as_str();
        let mut from = 0;
        while let Some(offset) = name[from..].find(id) {
            let start = from + offset;
            let end = start + id.len();
            let before_ok = name[..start]
                .chars()
                .next_back()
                .is_none_or(|c| DELIMITERS.contains(&c));
            let after_ok = name[end..]
                .chars()
                .next()
                .is_none_or(|c| DELIMITERS.contains(&c));
            if before_ok && after_ok {
                return true;
            }
            // Advance one character, not past the match
            from = start + name[start..].chars().next().map_or(1, char::len_utf8);
        }
        false
    }

    /// True if `name` ends with `-<id>`
    pub fn is_dash_suffix_of(&self, name: &str) -> bool {
        name.strip_suffix(self.0.as_str())
            .is_some_and(|rest| rest.ends_with('-'))
    }
}

impl fmt::Display for InstallationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for InstallationId {
    type Err = InvalidInstallationId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for InstallationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

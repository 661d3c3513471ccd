// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fmt, str::FromStr, sync::Arc};

use displaydoc::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{SplitError, split_identifier};

const USER_ID_SIGIL: char = '@';

/// Identifies a logged-in session by the fully qualified id of its user, e.g.
/// `@alice:matrix.org`
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId {
    value: Arc<str>,
}

impl SessionId {
    pub fn new(value: String) -> Result<Self, SessionIdError> {
        split_identifier(USER_ID_SIGIL, &value)?;
        Ok(Self {
            value: value.into(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn localpart(&self) -> &str {
        self.value
            .strip_prefix(USER_ID_SIGIL)
            .and_then(|rest| rest.split_once(':'))
            .map(|(localpart, _)| localpart)
            .unwrap_or_default()
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionId").field(&self.value).finish()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for SessionId {
    type Err = SessionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl TryFrom<String> for SessionId {
    type Error = SessionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(session_id: SessionId) -> Self {
        session_id.value.as_ref().to_owned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Display)]
pub enum SessionIdError {
    /// Session id is empty
    Empty,
    /// Session id does not start with '@'
    MissingSigil,
    /// Session id has no server name
    MissingServerName,
    /// Session id has an empty localpart
    EmptyLocalpart,
}

impl From<SplitError> for SessionIdError {
    fn from(error: SplitError) -> Self {
        match error {
            SplitError::Empty => Self::Empty,
            SplitError::MissingSigil => Self::MissingSigil,
            SplitError::MissingServerName => Self::MissingServerName,
            SplitError::EmptyLocalpart => Self::EmptyLocalpart,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_session_id() {
        let session_id: SessionId = "@alice:matrix.org".parse().unwrap();
        assert_eq!(session_id.localpart(), "alice");
        assert_eq!(session_id.to_string(), "@alice:matrix.org");
    }

    #[test]
    fn invalid_session_ids() {
        assert_eq!("".parse::<SessionId>(), Err(SessionIdError::Empty));
        assert_eq!(
            "!abc:matrix.org".parse::<SessionId>(),
            Err(SessionIdError::MissingSigil)
        );
        assert_eq!(
            "@alice".parse::<SessionId>(),
            Err(SessionIdError::MissingServerName)
        );
        assert_eq!(
            "@:matrix.org".parse::<SessionId>(),
            Err(SessionIdError::EmptyLocalpart)
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            SessionIdError::MissingSigil.to_string(),
            "Session id does not start with '@'"
        );
    }
}

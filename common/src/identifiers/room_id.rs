// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fmt, str::FromStr, sync::Arc};

use displaydoc::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{SplitError, split_identifier};

const ROOM_ID_SIGIL: char = '!';

/// Validated identifier of a room, e.g. `!OGEhHVWSdvArJzumhm:matrix.org`
///
/// The localpart is opaque to the client. Cloning is cheap.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId {
    value: Arc<str>,
}

impl RoomId {
    pub fn new(value: String) -> Result<Self, RoomIdError> {
        split_identifier(ROOM_ID_SIGIL, &value)?;
        Ok(Self {
            value: value.into(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Server name part of the identifier, i.e. everything after the first
    /// colon.
    pub fn server_name(&self) -> &str {
        self.value
            .split_once(':')
            .map(|(_, server_name)| server_name)
            .unwrap_or_default()
    }
}

impl fmt::Debug for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RoomId").field(&self.value).finish()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for RoomId {
    type Err = RoomIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl TryFrom<String> for RoomId {
    type Error = RoomIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoomId> for String {
    fn from(room_id: RoomId) -> Self {
        room_id.value.as_ref().to_owned()
    }
}

impl AsRef<str> for RoomId {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Display)]
pub enum RoomIdError {
    /// Room id is empty
    Empty,
    /// Room id does not start with '!'
    MissingSigil,
    /// Room id has no server name
    MissingServerName,
    /// Room id has an empty localpart
    EmptyLocalpart,
}

impl From<SplitError> for RoomIdError {
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
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn valid_room_id() {
        let room_id: RoomId = "!OGEhHVWSdvArJzumhm:matrix.org".parse().unwrap();
        assert_eq!(room_id.as_str(), "!OGEhHVWSdvArJzumhm:matrix.org");
        assert_eq!(room_id.server_name(), "matrix.org");
        assert_eq!(room_id.to_string(), "!OGEhHVWSdvArJzumhm:matrix.org");
    }

    #[test]
    fn server_name_with_port() {
        let room_id: RoomId = "!abc:localhost:8448".parse().unwrap();
        assert_eq!(room_id.server_name(), "localhost:8448");
    }

    #[test]
    fn invalid_room_ids() {
        assert_eq!("".parse::<RoomId>(), Err(RoomIdError::Empty));
        assert_eq!(
            "#alias:matrix.org".parse::<RoomId>(),
            Err(RoomIdError::MissingSigil)
        );
        assert_eq!(
            "!abc".parse::<RoomId>(),
            Err(RoomIdError::MissingServerName)
        );
        assert_eq!(
            "!abc:".parse::<RoomId>(),
            Err(RoomIdError::MissingServerName)
        );
        assert_eq!(
            "!:matrix.org".parse::<RoomId>(),
            Err(RoomIdError::EmptyLocalpart)
        );
    }

    #[test]
    fn serde_validates() {
        let room_id: RoomId = serde_json::from_str(r#""!abc:matrix.org""#).unwrap();
        assert_eq!(room_id.as_str(), "!abc:matrix.org");
        assert_eq!(
            serde_json::to_string(&room_id).unwrap(),
            r#""!abc:matrix.org""#
        );
        assert!(serde_json::from_str::<RoomId>(r#""abc:matrix.org""#).is_err());
    }

    #[test]
    fn value_equality() {
        let a: RoomId = "!abc:matrix.org".parse().unwrap();
        let b: RoomId = "!abc:matrix.org".parse().unwrap();
        let c: RoomId = "!abd:matrix.org".parse().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[quickcheck]
    fn well_formed_ids_are_accepted(localpart: String, server_name: String) -> bool {
        if localpart.is_empty() || localpart.contains(':') || server_name.is_empty() {
            return true;
        }
        let value = format!("!{localpart}:{server_name}");
        match RoomId::new(value.clone()) {
            Ok(room_id) => room_id.as_str() == value && room_id.server_name() == server_name,
            Err(_) => false,
        }
    }

    #[quickcheck]
    fn ids_without_sigil_are_rejected(value: String) -> bool {
        value.starts_with(ROOM_ID_SIGIL) || RoomId::new(value).is_err()
    }
}

// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

pub use room_id::{RoomId, RoomIdError};
pub use session_id::{SessionId, SessionIdError};

mod room_id;
mod session_id;

/// Splits a sigil-prefixed identifier `<sigil><localpart>:<server>` into its
/// localpart and server name.
///
/// Only the first colon separates the parts since server names may carry a
/// port.
fn split_identifier(sigil: char, value: &str) -> Result<(&str, &str), SplitError> {
    if value.is_empty() {
        return Err(SplitError::Empty);
    }
    let rest = value.strip_prefix(sigil).ok_or(SplitError::MissingSigil)?;
    let (localpart, server_name) = rest
        .split_once(':')
        .ok_or(SplitError::MissingServerName)?;
    if localpart.is_empty() {
        return Err(SplitError::EmptyLocalpart);
    }
    if server_name.is_empty() {
        return Err(SplitError::MissingServerName);
    }
    Ok((localpart, server_name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitError {
    Empty,
    MissingSigil,
    MissingServerName,
    EmptyLocalpart,
}

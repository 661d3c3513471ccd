// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Session and room logic of the client, independent of the UI

pub mod logout;
pub mod push;
pub mod room;

pub use msgcommon::identifiers::{RoomId, SessionId};

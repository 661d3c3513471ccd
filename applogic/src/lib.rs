// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Multi-platform client application logic

pub mod logging;
pub mod room_list;
pub mod settings;

pub use logging::init_logger;
pub use room_list::RoomListSubscriptionTask;
pub use settings::{ClientSettings, Environment, get_configuration, get_configuration_from_str};

// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Subscriptions of rooms to the sync service

pub use service::{RoomListService, SyncServiceError};
pub use settings::{DEFAULT_TIMELINE_LIMIT, RequiredState, StateEventType, SubscriptionSettings};
pub use subscriber::{RoomSyncSubscriber, SubscriptionCancelled};

mod service;
mod settings;
mod subscriber;

// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use msgcommon::identifiers::RoomId;
use thiserror::Error;

use super::SubscriptionSettings;

/// Room list of the sync service
///
/// Calls are never issued concurrently by the [`super::RoomSyncSubscriber`].
#[allow(async_fn_in_trait, reason = "trait is only used in the workspace")]
#[trait_variant::make(Send)]
pub trait RoomListService {
    /// Requests live updates for the given rooms.
    async fn subscribe_to_rooms(
        &self,
        room_ids: &[RoomId],
        settings: &SubscriptionSettings,
    ) -> Result<(), SyncServiceError>;
}

#[derive(Debug, Error)]
pub enum SyncServiceError {
    /// The operation was cancelled by the sync service's own task scope.
    #[error("sync service operation was cancelled")]
    Cancelled,
    #[error("sync service error: {0}")]
    Service(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SyncServiceError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

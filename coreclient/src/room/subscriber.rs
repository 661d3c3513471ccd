// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{collections::HashSet, slice};

use msgcommon::identifiers::RoomId;
use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::{RoomListService, SubscriptionSettings, SyncServiceError};

/// Subscribing to rooms was cancelled.
///
/// The rooms involved were not marked as subscribed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("room subscription was cancelled")]
pub struct SubscriptionCancelled;

/// Subscribes rooms to the sync service at most once
///
/// All subscribe operations are serialized: the check of the subscribed set
/// and the call to the [`RoomListService`] happen under one exclusive lock,
/// so there is never more than one subscription request in flight.
///
/// Failures of the sync service are logged and otherwise ignored. The rooms
/// are marked as subscribed nevertheless and are not retried. Only
/// cancellation is reported to the caller, either via the session's
/// [`CancellationToken`] or via [`SyncServiceError::Cancelled`].
pub struct RoomSyncSubscriber<S> {
    room_list_service: S,
    settings: SubscriptionSettings,
    // Only written while `lock` is held.
    subscribed_room_ids: RwLock<HashSet<RoomId>>,
    lock: Mutex<()>,
    cancel: CancellationToken,
}

impl<S: RoomListService> RoomSyncSubscriber<S> {
    pub fn new(
        room_list_service: S,
        settings: SubscriptionSettings,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            room_list_service,
            settings,
            subscribed_room_ids: Default::default(),
            lock: Mutex::new(()),
            cancel,
        }
    }

    pub fn settings(&self) -> &SubscriptionSettings {
        &self.settings
    }

    /// Subscribes a single room unless it is already subscribed.
    pub async fn subscribe(&self, room_id: RoomId) -> Result<(), SubscriptionCancelled> {
        let _guard = self.acquire().await?;
        if self.is_subscribed_to(&room_id) {
            return Ok(());
        }
        debug!(%room_id, "subscribing to room");
        self.subscribe_to_rooms(slice::from_ref(&room_id)).await?;
        self.subscribed_room_ids.write().insert(room_id);
        Ok(())
    }

    /// Subscribes all rooms of the batch which are not subscribed yet with a
    /// single request.
    ///
    /// No request is made if there is nothing to subscribe.
    pub async fn batch_subscribe(
        &self,
        room_ids: impl IntoIterator<Item = RoomId>,
    ) -> Result<(), SubscriptionCancelled> {
        let room_ids: Vec<RoomId> = room_ids.into_iter().collect();
        let _guard = self.acquire().await?;
        let pending: Vec<RoomId> = {
            let subscribed = self.subscribed_room_ids.read();
            room_ids
                .iter()
                .filter(|room_id| !subscribed.contains(*room_id))
                .cloned()
                .collect()
        };
        if pending.is_empty() {
            return Ok(());
        }
        debug!(room_ids = ?pending, "subscribing to rooms");
        self.subscribe_to_rooms(&pending).await?;
        self.subscribed_room_ids.write().extend(room_ids);
        Ok(())
    }

    /// Returns whether the room was subscribed.
    ///
    /// Does not wait for subscriptions in flight.
    pub fn is_subscribed_to(&self, room_id: &RoomId) -> bool {
        self.subscribed_room_ids.read().contains(room_id)
    }

    /// Snapshot of all subscribed rooms in no particular order
    pub fn subscribed_room_ids(&self) -> Vec<RoomId> {
        self.subscribed_room_ids.read().iter().cloned().collect()
    }

    async fn acquire(&self) -> Result<MutexGuard<'_, ()>, SubscriptionCancelled> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(SubscriptionCancelled),
            guard = self.lock.lock() => Ok(guard),
        }
    }

    /// Must be called with the lock held.
    async fn subscribe_to_rooms(&self, room_ids: &[RoomId]) -> Result<(), SubscriptionCancelled> {
        let res: Result<(), SyncServiceError> = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                info!(?room_ids, "room subscription cancelled");
                return Err(SubscriptionCancelled);
            }
            res = self.room_list_service.subscribe_to_rooms(room_ids, &self.settings) => res,
        };
        match res {
            Ok(()) => Ok(()),
            Err(error) if error.is_cancellation() => {
                info!(?room_ids, "room subscription cancelled by sync service");
                Err(SubscriptionCancelled)
            }
            Err(error) => {
                error!(%error, ?room_ids, "failed to subscribe to rooms");
                Ok(())
            }
        }
    }
}

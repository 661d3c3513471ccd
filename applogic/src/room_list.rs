// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{pin::pin, sync::Arc};

use msgcommon::identifiers::RoomId;
use msgcoreclient::room::{RoomListService, RoomSyncSubscriber};
use tokio::{sync::watch, task::JoinHandle};
use tokio_stream::{Stream, StreamExt, wrappers::WatchStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Subscribes the rooms visible in the room list to the sync service.
///
/// Each batch of visible rooms is forwarded to the
/// [`RoomSyncSubscriber`]. The task stops when the stream ends, or when the
/// session is cancelled.
pub struct RoomListSubscriptionTask<S> {
    subscriber: Arc<RoomSyncSubscriber<S>>,
    cancel: CancellationToken,
}

impl<S> RoomListSubscriptionTask<S>
where
    S: RoomListService + Send + Sync + 'static,
{
    pub fn new(subscriber: Arc<RoomSyncSubscriber<S>>, cancel: CancellationToken) -> Self {
        Self { subscriber, cancel }
    }

    /// Follows the visible rooms reported through a watch channel.
    pub fn spawn_watching(self, visible_rooms: watch::Receiver<Vec<RoomId>>) -> JoinHandle<()> {
        self.spawn(WatchStream::new(visible_rooms))
    }

    pub fn spawn(
        self,
        visible_rooms: impl Stream<Item = Vec<RoomId>> + Send + 'static,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(visible_rooms))
    }

    pub async fn run(self, visible_rooms: impl Stream<Item = Vec<RoomId>>) {
        let mut visible_rooms = pin!(visible_rooms);
        loop {
            let room_ids = tokio::select! {
                room_ids = visible_rooms.next() => room_ids,
                _ = self.cancel.cancelled() => {
                    info!("room list subscription stopped");
                    return;
                }
            };
            let Some(room_ids) = room_ids else {
                debug!("visible rooms stream ended");
                return;
            };
            if let Err(error) = self.subscriber.batch_subscribe(room_ids).await {
                info!(%error, "room list subscription stopped");
                return;
            }
        }
    }
}

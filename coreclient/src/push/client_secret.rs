// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{collections::HashMap, fmt};

use msgcommon::identifiers::SessionId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Secret sent along with push registrations
///
/// Incoming pushes carry the secret, which identifies the session they are
/// meant for without exposing the user id to the push gateway.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientSecret(Uuid);

impl ClientSecret {
    fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClientSecret").field(&"<redacted>").finish()
    }
}

impl fmt::Display for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One [`ClientSecret`] per session, created on first use
#[derive(Debug, Default)]
pub struct PushClientSecretStore {
    secrets: Mutex<HashMap<SessionId, ClientSecret>>,
}

impl PushClientSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn secret_for_session(&self, session_id: &SessionId) -> ClientSecret {
        *self
            .secrets
            .lock()
            .entry(session_id.clone())
            .or_insert_with(|| {
                debug!(%session_id, "created push client secret");
                ClientSecret::random()
            })
    }

    /// Resolves the session an incoming push belongs to.
    pub fn session_for_secret(&self, secret: &ClientSecret) -> Option<SessionId> {
        self.secrets
            .lock()
            .iter()
            .find(|(_, s)| *s == secret)
            .map(|(session_id, _)| session_id.clone())
    }

    pub fn reset(&self, session_id: &SessionId) {
        self.secrets.lock().remove(session_id);
    }
}

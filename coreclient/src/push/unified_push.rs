// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Arc;

use msgcommon::identifiers::SessionId;
use tracing::{info, warn};

use super::{
    ClientSecret, CurrentUserPushConfig, Distributor, PushClientSecretStore, PushError,
    PushProvider, UnifiedPushStore,
};

pub const UNIFIED_PUSH_INDEX: u32 = 1;
pub const UNIFIED_PUSH_NAME: &str = "UnifiedPush";

/// Connection to the UnifiedPush distributors installed on the device
#[allow(async_fn_in_trait, reason = "trait is only used in the workspace")]
#[trait_variant::make(Send)]
pub trait UnifiedPushBackend {
    fn distributors(&self) -> Vec<Distributor>;

    async fn register(
        &self,
        distributor: &Distributor,
        client_secret: ClientSecret,
    ) -> anyhow::Result<()>;

    async fn unregister(
        &self,
        session_id: &SessionId,
        client_secret: ClientSecret,
    ) -> anyhow::Result<()>;

    async fn current_user_push_config(&self) -> Option<CurrentUserPushConfig>;
}

/// [`PushProvider`] delivering pushes through a UnifiedPush distributor
///
/// Remembers the distributor chosen by each session in the
/// [`UnifiedPushStore`].
#[derive(Debug)]
pub struct UnifiedPushProvider<B> {
    backend: B,
    client_secrets: Arc<PushClientSecretStore>,
    store: Arc<UnifiedPushStore>,
}

impl<B> UnifiedPushProvider<B> {
    pub fn new(
        backend: B,
        client_secrets: Arc<PushClientSecretStore>,
        store: Arc<UnifiedPushStore>,
    ) -> Self {
        Self {
            backend,
            client_secrets,
            store,
        }
    }
}

impl<B: UnifiedPushBackend + Sync> PushProvider for UnifiedPushProvider<B> {
    fn index(&self) -> u32 {
        UNIFIED_PUSH_INDEX
    }

    fn name(&self) -> &str {
        UNIFIED_PUSH_NAME
    }

    fn distributors(&self) -> Vec<Distributor> {
        self.backend.distributors()
    }

    async fn register_with(
        &self,
        session_id: &SessionId,
        distributor: &Distributor,
    ) -> Result<(), PushError> {
        if !self.distributors().contains(distributor) {
            return Err(PushError::NoDistributor(distributor.value.clone()));
        }
        let client_secret = self.client_secrets.secret_for_session(session_id);
        self.backend
            .register(distributor, client_secret)
            .await
            .map_err(|source| PushError::Registration {
                distributor: distributor.value.clone(),
                source,
            })?;
        self.store
            .set_distributor_value(session_id, Some(distributor.value.clone()));
        info!(%session_id, distributor = %distributor.value, "registered with distributor");
        Ok(())
    }

    async fn current_distributor(&self, session_id: &SessionId) -> Option<Distributor> {
        let value = self.store.distributor_value(session_id)?;
        let distributor = self
            .distributors()
            .into_iter()
            .find(|distributor| distributor.value == value);
        if distributor.is_none() {
            warn!(%session_id, %value, "registered distributor is not available anymore");
        }
        distributor
    }

    async fn unregister(&self, session_id: &SessionId) -> Result<(), PushError> {
        let client_secret = self.client_secrets.secret_for_session(session_id);
        self.backend
            .unregister(session_id, client_secret)
            .await
            .map_err(|source| PushError::Unregistration {
                session_id: session_id.clone(),
                source,
            })?;
        self.store.set_distributor_value(session_id, None);
        info!(%session_id, "unregistered from distributor");
        Ok(())
    }

    async fn current_user_push_config(&self) -> Option<CurrentUserPushConfig> {
        self.backend.current_user_push_config().await
    }
}

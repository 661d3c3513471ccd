// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Registration of sessions with push providers

use msgcommon::identifiers::SessionId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub use client_secret::{ClientSecret, PushClientSecretStore};
pub use store::UnifiedPushStore;
pub use unified_push::{
    UNIFIED_PUSH_INDEX, UNIFIED_PUSH_NAME, UnifiedPushBackend, UnifiedPushProvider,
};

mod client_secret;
mod store;
pub mod troubleshoot;
mod unified_push;

/// An app on the device which delivers push messages
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Distributor {
    /// Opaque identifier of the distributor, e.g. its package name
    pub value: String,
    /// Human readable name
    pub name: String,
}

/// Push gateway configuration of the current user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUserPushConfig {
    pub url: Url,
    pub push_key: String,
}

#[derive(Debug, Error)]
pub enum PushError {
    #[error("failed to register with distributor {distributor}")]
    Registration {
        distributor: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to unregister session {session_id}")]
    Unregistration {
        session_id: SessionId,
        #[source]
        source: anyhow::Error,
    },
    #[error("distributor {0} is not available")]
    NoDistributor(String),
}

/// A way of delivering push notifications to a session
#[allow(async_fn_in_trait, reason = "trait is only used in the workspace")]
#[trait_variant::make(Send)]
pub trait PushProvider {
    /// Sort order when presenting providers, lower comes first
    fn index(&self) -> u32;

    fn name(&self) -> &str;

    fn distributors(&self) -> Vec<Distributor>;

    async fn register_with(
        &self,
        session_id: &SessionId,
        distributor: &Distributor,
    ) -> Result<(), PushError>;

    /// Distributor the session is registered with, if it is still available.
    async fn current_distributor(&self, session_id: &SessionId) -> Option<Distributor>;

    async fn unregister(&self, session_id: &SessionId) -> Result<(), PushError>;

    async fn current_user_push_config(&self) -> Option<CurrentUserPushConfig>;
}

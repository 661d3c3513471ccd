// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Logging out of a session from anywhere in the app

use msgcommon::identifiers::SessionId;
use thiserror::Error;
use tracing::info;
use url::Url;

/// Logs out the current user and performs the needed cleanup.
#[allow(async_fn_in_trait, reason = "trait is only used in the workspace")]
#[trait_variant::make(Send)]
pub trait LogoutUseCase {
    /// If `ignore_sdk_error` is set, the session is logged out locally even
    /// if the homeserver rejects the request.
    ///
    /// Returns the account management page of the identity provider if the
    /// user must finish logging out there (relying party initiated logout).
    async fn logout(&self, ignore_sdk_error: bool) -> Result<Option<Url>, LogoutError>;
}

/// Creates a [`LogoutUseCase`] bound to the given session.
pub trait LogoutUseCaseFactory {
    type UseCase: LogoutUseCase;

    fn create(&self, session_id: SessionId) -> Self::UseCase;
}

#[allow(async_fn_in_trait, reason = "trait is only used in the workspace")]
#[trait_variant::make(Send)]
pub trait AuthenticationService {
    /// Session which was logged in most recently, if any.
    async fn latest_session_id(&self) -> Option<SessionId>;
}

#[allow(async_fn_in_trait, reason = "trait is only used in the workspace")]
#[trait_variant::make(Send)]
pub trait ClientProvider {
    type Client: MatrixClient;

    /// Returns the client of a running session or restores it from storage.
    async fn get_or_restore(&self, session_id: &SessionId) -> anyhow::Result<Self::Client>;
}

#[allow(async_fn_in_trait, reason = "trait is only used in the workspace")]
#[trait_variant::make(Send)]
pub trait MatrixClient {
    async fn logout(
        &self,
        user_initiated: bool,
        ignore_sdk_error: bool,
    ) -> anyhow::Result<Option<Url>>;
}

#[derive(Debug, Error)]
pub enum LogoutError {
    #[error("no session to sign out")]
    NoSession,
    #[error("failed to restore session {session_id}")]
    Restore {
        session_id: SessionId,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to log out session {session_id}")]
    Logout {
        session_id: SessionId,
        #[source]
        source: anyhow::Error,
    },
}

/// Logs out the most recently logged in session.
#[derive(Debug, Clone)]
pub struct DefaultLogoutUseCase<A, P> {
    authentication_service: A,
    client_provider: P,
}

impl<A, P> DefaultLogoutUseCase<A, P> {
    pub fn new(authentication_service: A, client_provider: P) -> Self {
        Self {
            authentication_service,
            client_provider,
        }
    }
}

impl<A, P> LogoutUseCase for DefaultLogoutUseCase<A, P>
where
    A: AuthenticationService + Sync,
    P: ClientProvider + Sync,
    P::Client: Send + Sync,
{
    async fn logout(&self, ignore_sdk_error: bool) -> Result<Option<Url>, LogoutError> {
        let session_id = self
            .authentication_service
            .latest_session_id()
            .await
            .ok_or(LogoutError::NoSession)?;
        logout_session(&self.client_provider, session_id, ignore_sdk_error).await
    }
}

/// Logs out a fixed session.
#[derive(Debug, Clone)]
pub struct SessionLogoutUseCase<P> {
    session_id: SessionId,
    client_provider: P,
}

impl<P> LogoutUseCase for SessionLogoutUseCase<P>
where
    P: ClientProvider + Sync,
    P::Client: Send + Sync,
{
    async fn logout(&self, ignore_sdk_error: bool) -> Result<Option<Url>, LogoutError> {
        logout_session(
            &self.client_provider,
            self.session_id.clone(),
            ignore_sdk_error,
        )
        .await
    }
}

/// Creates [`SessionLogoutUseCase`]s sharing one client provider.
#[derive(Debug, Clone)]
pub struct SessionLogoutUseCaseFactory<P> {
    client_provider: P,
}

impl<P> SessionLogoutUseCaseFactory<P> {
    pub fn new(client_provider: P) -> Self {
        Self { client_provider }
    }
}

impl<P> LogoutUseCaseFactory for SessionLogoutUseCaseFactory<P>
where
    P: ClientProvider + Clone + Sync,
    P::Client: Send + Sync,
{
    type UseCase = SessionLogoutUseCase<P>;

    fn create(&self, session_id: SessionId) -> Self::UseCase {
        SessionLogoutUseCase {
            session_id,
            client_provider: self.client_provider.clone(),
        }
    }
}

async fn logout_session<P>(
    client_provider: &P,
    session_id: SessionId,
    ignore_sdk_error: bool,
) -> Result<Option<Url>, LogoutError>
where
    P: ClientProvider + Sync,
    P::Client: Send + Sync,
{
    let client = match client_provider.get_or_restore(&session_id).await {
        Ok(client) => client,
        Err(source) => return Err(LogoutError::Restore { session_id, source }),
    };
    match client.logout(true, ignore_sdk_error).await {
        Ok(url) => {
            info!(%session_id, has_url = url.is_some(), "logged out");
            Ok(url)
        }
        Err(source) => Err(LogoutError::Logout { session_id, source }),
    }
}

//! Session Bootstrapper
//!
//! Resolves the identity of this client before the list goes live.

use crate::backend::AuthBackend;
use crate::domain::{BoardError, SessionId};

/// Outcome of bootstrapping.
///
/// Once ready, it stays ready even when sign-in failed, so the UI is never
/// left waiting; the failure travels alongside.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    ready: bool,
    id: Option<SessionId>,
    failure: Option<BoardError>,
}

impl Session {
    /// Not yet bootstrapped
    pub fn pending() -> Self {
        Self::default()
    }

    fn signed_in(id: SessionId) -> Self {
        Self {
            ready: true,
            id: Some(id),
            failure: None,
        }
    }

    fn failed(failure: BoardError) -> Self {
        Self {
            ready: true,
            id: None,
            failure: Some(failure),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn id(&self) -> Option<&SessionId> {
        self.id.as_ref()
    }

    pub fn failure(&self) -> Option<&BoardError> {
        self.failure.as_ref()
    }
}

/// Establish an identity against `auth`.
///
/// An existing session wins; otherwise the token is tried, then anonymous
/// sign-in. Nothing is retried.
pub async fn bootstrap<A>(auth: &A, initial_token: Option<&str>) -> Session
where
    A: AuthBackend + ?Sized,
{
    match auth.current_session().await {
        Ok(Some(id)) => {
            log::info!("[SESSION] Restored session {}", id);
            return Session::signed_in(id);
        }
        Ok(None) => {}
        Err(e) => log::warn!("[SESSION] Could not read existing session: {}", e),
    }

    if let Some(token) = initial_token.filter(|t| !t.is_empty()) {
        match auth.sign_in_with_token(token).await {
            Ok(id) => {
                log::info!("[SESSION] Signed in with token as {}", id);
                return Session::signed_in(id);
            }
            Err(e) => log::warn!("[SESSION] Token sign-in failed, trying anonymous: {}", e),
        }
    }

    match auth.sign_in_anonymously().await {
        Ok(id) => {
            log::info!("[SESSION] Signed in anonymously as {}", id);
            Session::signed_in(id)
        }
        Err(e) => {
            log::error!("[SESSION] Authentication failed: {}", e);
            Session::failed(BoardError::Auth)
        }
    }
}

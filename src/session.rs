//! Application-wide session handle.
//!
//! A [`SessionContext`] is created once at startup and handed to every component that
//! needs to read the session or re-derive it after a sign-in. Clones share state.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use crate::error::SessionError;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub email: String,
}

pub type BoxedSessionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<Session>, SessionError>> + Send + 'a>>;

/// Where the session is read from, usually the auth server's "who am I" endpoint.
pub trait SessionSource: Send + Sync {
    fn fetch_session(&self) -> BoxedSessionFuture<'_>;
}

#[derive(Debug, Default)]
struct SessionState {
    session: Option<Session>,
    refetch_count: u64,
}

#[derive(Clone)]
pub struct SessionContext {
    source: Arc<dyn SessionSource>,
    state: Arc<RwLock<SessionState>>,
}

impl SessionContext {
    pub fn new(source: Arc<dyn SessionSource>) -> Self {
        Self {
            source,
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    /// Re-reads the session from the source. Readers observe the new session once
    /// this resolves.
    pub async fn refetch(&self) -> Result<(), SessionError> {
        let session = self.source.fetch_session().await?;
        let mut state = self
            .state
            .write()
            .map_err(|_| SessionError::StatePoisoned("storing refetched session"))?;
        tracing::debug!(
            authenticated = session.is_some(),
            refetch = state.refetch_count + 1,
            "session refetched"
        );
        state.session = session;
        state.refetch_count += 1;
        Ok(())
    }

    pub fn current(&self) -> Result<Option<Session>, SessionError> {
        Ok(self
            .state
            .read()
            .map_err(|_| SessionError::StatePoisoned("reading session"))?
            .session
            .clone())
    }

    pub fn is_authenticated(&self) -> Result<bool, SessionError> {
        Ok(self.current()?.is_some())
    }

    pub fn refetch_count(&self) -> Result<u64, SessionError> {
        Ok(self
            .state
            .read()
            .map_err(|_| SessionError::StatePoisoned("reading refetch count"))?
            .refetch_count)
    }
}

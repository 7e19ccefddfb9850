//! In-memory registry of live sessions and their runner handles.

use super::{LiveSession, LiveSessionId, LiveTradeHandle, StartLiveSessionRequest};
use crate::config::LiveTradingSettings;
use mockable::Clock;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{info, warn};

/// Errors returned by live session operations.
#[derive(Debug, Clone, Error)]
pub enum LiveSessionError {
    /// Live trading is switched off in configuration.
    #[error("live trading is disabled; set live_trading.enabled = true to enable")]
    Disabled,

    /// No session exists with the given identifier.
    #[error("live session '{0}' not found")]
    NotFound(LiveSessionId),

    /// The runner refused to stop. The session is no longer registered.
    #[error("failed to stop live session '{id}': {message}")]
    StopFailed {
        /// Session identifier.
        id: LiveSessionId,
        /// Runner error message.
        message: String,
    },

    /// Storage-layer failure.
    #[error("live session registry error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl LiveSessionError {
    /// Wraps a storage error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Result type for live session operations.
pub type LiveSessionResult<T> = Result<T, LiveSessionError>;

struct RegisteredSession {
    session: LiveSession,
    handle: Arc<dyn LiveTradeHandle>,
}

/// Thread-safe registry of running live sessions.
///
/// Clones share the same sessions.
pub struct LiveSessionRegistry<C>
where
    C: Clock + Send + Sync,
{
    enabled: bool,
    clock: Arc<C>,
    sessions: Arc<RwLock<HashMap<LiveSessionId, RegisteredSession>>>,
}

impl<C> Clone for LiveSessionRegistry<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            enabled: self.enabled,
            clock: Arc::clone(&self.clock),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

fn lock_error(err: &impl ToString) -> LiveSessionError {
    LiveSessionError::persistence(std::io::Error::other(err.to_string()))
}

impl<C> LiveSessionRegistry<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty registry.
    #[must_use]
    pub fn new(settings: &LiveTradingSettings, clock: Arc<C>) -> Self {
        Self {
            enabled: settings.enabled,
            clock,
            sessions: Arc::default(),
        }
    }

    /// Returns `true` when new sessions may be registered.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Registers a started session together with its runner handle.
    ///
    /// # Errors
    ///
    /// Returns [`LiveSessionError::Disabled`] when live trading is switched
    /// off, or [`LiveSessionError::Persistence`] when the lock is poisoned.
    pub fn register(
        &self,
        request: StartLiveSessionRequest,
        handle: Arc<dyn LiveTradeHandle>,
    ) -> LiveSessionResult<LiveSession> {
        if !self.enabled {
            return Err(LiveSessionError::Disabled);
        }

        let mut sessions = self.sessions.write().map_err(|err| lock_error(&err))?;
        let mut session = LiveSession::new(request, &*self.clock);
        while sessions.contains_key(session.id()) {
            session = session.with_fresh_id();
        }
        sessions.insert(
            session.id().clone(),
            RegisteredSession {
                session: session.clone(),
                handle,
            },
        );
        info!(
            session_id = %session.id(),
            exchange = session.exchange(),
            symbol = session.symbol(),
            "live session registered"
        );
        Ok(session)
    }

    /// Returns a session snapshot, or `None` when it is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`LiveSessionError::Persistence`] when the lock is poisoned.
    pub fn find(&self, id: &LiveSessionId) -> LiveSessionResult<Option<LiveSession>> {
        let sessions = self.sessions.read().map_err(|err| lock_error(&err))?;
        Ok(sessions.get(id).map(|entry| entry.session.clone()))
    }

    /// Lists all sessions, most recently started first.
    ///
    /// # Errors
    ///
    /// Returns [`LiveSessionError::Persistence`] when the lock is poisoned.
    pub fn list(&self) -> LiveSessionResult<Vec<LiveSession>> {
        let sessions = self.sessions.read().map_err(|err| lock_error(&err))?;
        let mut listed: Vec<LiveSession> =
            sessions.values().map(|entry| entry.session.clone()).collect();
        listed.sort_by_key(|session| Reverse(session.started_at()));
        Ok(listed)
    }

    /// Forgets a session without stopping its runner.
    ///
    /// # Errors
    ///
    /// Returns [`LiveSessionError::Persistence`] when the lock is poisoned.
    pub fn remove(&self, id: &LiveSessionId) -> LiveSessionResult<Option<LiveSession>> {
        let mut sessions = self.sessions.write().map_err(|err| lock_error(&err))?;
        Ok(sessions.remove(id).map(|entry| entry.session))
    }

    /// Stops a session's runner and forgets the session.
    ///
    /// # Errors
    ///
    /// Returns [`LiveSessionError::NotFound`] for unknown identifiers and
    /// [`LiveSessionError::StopFailed`] when the runner reports an error.
    pub async fn stop(&self, id: &LiveSessionId) -> LiveSessionResult<LiveSession> {
        let RegisteredSession { session, handle } = {
            let mut sessions = self.sessions.write().map_err(|err| lock_error(&err))?;
            match sessions.entry(id.clone()) {
                Entry::Occupied(occupied) => occupied.remove(),
                Entry::Vacant(_) => return Err(LiveSessionError::NotFound(id.clone())),
            }
        };

        if let Err(message) = handle.stop().await {
            warn!(session_id = %id, error = %message, "live session stop failed");
            return Err(LiveSessionError::StopFailed {
                id: id.clone(),
                message,
            });
        }
        info!(session_id = %id, "live session stopped");
        Ok(session)
    }
}

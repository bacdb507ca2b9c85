//! Session tracking and the administrator check.
//!
//! The gate holds one of two states and changes only on provider-driven
//! events: the initial `current_session()` query and later notifications on
//! the service's session channel. Components that need an authorization
//! decision receive a [`SessionContext`] value instead of reading shared state.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::remote::CatalogService;
use crate::types::{Identity, Session};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(session) => Some(session),
        }
    }
}

impl From<Option<Session>> for SessionState {
    fn from(session: Option<Session>) -> Self {
        session.map_or(Self::Anonymous, Self::Authenticated)
    }
}

/// The configured administrator address, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPolicy {
    admin_email: String,
}

impl AdminPolicy {
    pub fn new(admin_email: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
        }
    }

    /// Exact, case-sensitive comparison against the configured address.
    #[must_use]
    pub fn is_elevated(&self, session: Option<&Session>) -> bool {
        session
            .and_then(Session::email)
            .is_some_and(|email| email == self.admin_email)
    }
}

/// Authorization facts handed to the editor and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionContext {
    pub identity: Option<Identity>,
    pub elevated: bool,
}

impl SessionContext {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn require_identity(&self) -> Result<&Identity> {
        self.identity.as_ref().ok_or(Error::Unauthorized)
    }

    pub fn require_elevated(&self) -> Result<&Identity> {
        let identity = self.require_identity()?;
        if self.elevated {
            Ok(identity)
        } else {
            Err(Error::Forbidden)
        }
    }
}

pub struct SessionGate {
    service: Arc<dyn CatalogService>,
    policy: AdminPolicy,
    state: SessionState,
    changes: watch::Receiver<Option<Session>>,
}

impl SessionGate {
    #[must_use]
    pub fn new(service: Arc<dyn CatalogService>, policy: AdminPolicy) -> Self {
        let changes = service.subscribe_sessions();
        Self {
            service,
            policy,
            state: SessionState::Anonymous,
            changes,
        }
    }

    /// Queries the current session once. A failed query leaves the gate anonymous.
    pub async fn initialize(&mut self) -> &SessionState {
        match self.service.current_session().await {
            Ok(session) => self.state = session.into(),
            Err(e) => {
                tracing::error!("failed to restore session: {e}");
                self.state = SessionState::Anonymous;
            }
        }
        &self.state
    }

    /// Waits for the next provider notification and applies it.
    ///
    /// Returns `false` once the service has dropped its session channel.
    pub async fn sync(&mut self) -> bool {
        if self.changes.changed().await.is_err() {
            return false;
        }
        let session = self.changes.borrow_and_update().clone();
        self.apply(session);
        true
    }

    /// Applies any notification that arrived since the last check, without waiting.
    pub fn poll(&mut self) -> bool {
        if !self.changes.has_changed().unwrap_or(false) {
            return false;
        }
        let session = self.changes.borrow_and_update().clone();
        self.apply(session);
        true
    }

    fn apply(&mut self, session: Option<Session>) {
        let next = SessionState::from(session);
        if next != self.state {
            tracing::info!(
                authenticated = next.session().is_some(),
                "session changed"
            );
        }
        self.state = next;
    }

    /// Returns the provider URL that starts sign-in and redirects back to `redirect_to`.
    pub async fn start_sign_in(&self, provider: &str, redirect_to: &str) -> Result<String> {
        self.service
            .sign_in(provider, redirect_to)
            .await
            .inspect_err(|e| tracing::error!("error starting sign-in: {e}"))
    }

    pub async fn complete_sign_in(&mut self, callback: &str) -> Result<&SessionState> {
        let session = self
            .service
            .complete_sign_in(callback)
            .await
            .inspect_err(|e| tracing::error!("error completing sign-in: {e}"))?;
        self.changes.mark_unchanged();
        self.apply(Some(session));
        Ok(&self.state)
    }

    pub async fn sign_out(&mut self) -> Result<()> {
        self.service
            .sign_out()
            .await
            .inspect_err(|e| tracing::error!("error signing out: {e}"))?;
        self.changes.mark_unchanged();
        self.apply(None);
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn is_elevated(&self) -> bool {
        self.policy.is_elevated(self.state.session())
    }

    #[must_use]
    pub fn context(&self) -> SessionContext {
        SessionContext {
            identity: self.state.session().map(|s| s.user.clone()),
            elevated: self.is_elevated(),
        }
    }
}

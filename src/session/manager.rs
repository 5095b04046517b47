//! The single authority over session state.

use std::sync::RwLock;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::RequestBuilder;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{Credentials, Role, Session, SessionStore, StoredFields};
use crate::error::PortalError;
use crate::Result;

struct Inner {
    session: Session,
    /// Armed `Authorization` value; present exactly when `session` is signed in.
    authorization: Option<HeaderValue>,
}

/// Owns the in-memory session, mirrors it to a [`SessionStore`] and decides
/// which outbound requests carry the bearer token.
///
/// Share one instance per process behind an `Arc`. Every transition goes
/// through [`login`](Self::login) or [`logout`](Self::logout), which apply
/// the memory update, the durable write and the bearer arming while holding
/// the same write lock.
pub struct SessionManager {
    store: SessionStore,
    inner: RwLock<Inner>,
    changes: watch::Sender<Session>,
}

impl SessionManager {
    /// Build a manager from whatever the store holds.
    ///
    /// The store is read exactly once. A session missing any of its three
    /// fields is discarded as a whole, and the leftovers are removed.
    pub fn hydrate(store: SessionStore) -> Self {
        let session = match store.read_fields() {
            Ok(fields) => Self::restore(&store, fields),
            Err(e) => {
                warn!(error = %e, "failed to read stored session, starting signed out");
                Session::anonymous()
            }
        };

        let authorization = session.token().and_then(|t| bearer_value(t).ok());
        if session.is_authenticated() {
            info!(
                username = session.username().unwrap_or_default(),
                role = %session.role().map(Role::as_str).unwrap_or_default(),
                "restored session"
            );
        }

        let (changes, _) = watch::channel(session.clone());
        Self {
            store,
            inner: RwLock::new(Inner {
                session,
                authorization,
            }),
            changes,
        }
    }

    fn restore(store: &SessionStore, fields: StoredFields) -> Session {
        let partial = fields.is_partial();
        let any_present =
            fields.token.is_some() || fields.role.is_some() || fields.username.is_some();
        let restored = match fields {
            StoredFields {
                token: Some(token),
                role: Some(role),
                username: Some(username),
            } => Credentials::new(token, Role::parse(&role), username)
                .ok()
                .filter(|c| bearer_value(c.token()).is_ok()),
            _ => None,
        };

        match restored {
            Some(credentials) => Session::signed_in(credentials),
            None => {
                if any_present {
                    warn!(partial, "discarding invalid stored session");
                    if let Err(e) = store.clear_session() {
                        warn!(error = %e, "failed to clear incomplete stored session");
                    }
                }
                Session::anonymous()
            }
        }
    }

    /// Sign in.
    ///
    /// Fails without touching any state if a field is empty, the token is not
    /// a valid header value, or the durable write fails.
    pub fn login(
        &self,
        token: impl Into<String>,
        role: Role,
        username: impl Into<String>,
    ) -> Result<()> {
        let credentials = Credentials::new(token, role, username)?;
        let authorization = bearer_value(credentials.token())?;

        let mut inner = self.inner.write().map_err(|_| PortalError::LockPoisoned)?;

        self.store.write_session(&credentials)?;

        info!(
            username = credentials.username(),
            role = %credentials.role(),
            "signed in"
        );

        let session = Session::signed_in(credentials);
        inner.session = session.clone();
        inner.authorization = Some(authorization);
        self.changes.send_replace(session);
        Ok(())
    }

    /// Sign out. Signing out while already signed out does nothing.
    pub fn logout(&self) -> Result<()> {
        let mut inner = self.inner.write().map_err(|_| PortalError::LockPoisoned)?;

        if !inner.session.is_authenticated() {
            debug!("logout while signed out, nothing to do");
            return Ok(());
        }

        self.store.clear_session()?;

        info!(
            username = inner.session.username().unwrap_or_default(),
            "signed out"
        );

        inner.session = Session::anonymous();
        inner.authorization = None;
        self.changes.send_replace(Session::anonymous());
        Ok(())
    }

    /// Snapshot of the in-memory session. Never consults the store.
    pub fn current_session(&self) -> Session {
        self.inner
            .read()
            .map(|inner| inner.session.clone())
            .unwrap_or_default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .map(|inner| inner.session.is_authenticated())
            .unwrap_or(false)
    }

    /// Attach the armed bearer header, if any, to an outbound request.
    ///
    /// Every call site that talks to an authenticated endpoint goes through
    /// here; nothing else sets `Authorization`.
    pub fn decorate_request(&self, request: RequestBuilder) -> RequestBuilder {
        let authorization = self
            .inner
            .read()
            .ok()
            .and_then(|inner| inner.authorization.clone());

        match authorization {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        }
    }

    /// Receive the new session after every transition.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.changes.subscribe()
    }
}

fn bearer_value(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| PortalError::IncompleteSession("token"))?;
    value.set_sensitive(true);
    Ok(value)
}

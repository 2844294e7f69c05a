//! Sharing one session store between the parts of an application.
//!
//! The primary way is explicit: build a [`SessionHandle`] once at startup and
//! pass clones to whatever needs it. For code that cannot take the handle as
//! a parameter, [`SessionProvider::scope`] installs it for the duration of a
//! future and [`use_session`] retrieves it from inside.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::error::SessionError;

use super::session::CurrentSession;
use super::store::SessionStore;

tokio::task_local! {
    static CURRENT_SESSION: SessionHandle;
}

/// Shared, cheaply cloneable access to a [`SessionStore`].
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionStore>>,
}

impl SessionHandle {
    pub fn new(store: SessionStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Exclusive access to the store.
    pub async fn lock(&self) -> MutexGuard<'_, SessionStore> {
        self.inner.lock().await
    }

    /// Holds the store's lock until the backend answers, so concurrent
    /// callers wait for the sign-in request to finish.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), SessionError> {
        self.inner.lock().await.sign_in(email, password).await
    }

    pub async fn sign_out(&self) {
        self.inner.lock().await.sign_out();
    }

    pub async fn current_session(&self) -> CurrentSession {
        self.inner.lock().await.current_session()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.lock().await.is_authenticated()
    }
}

pub struct SessionProvider;

impl SessionProvider {
    /// Run `f` with `handle` reachable through [`use_session`].
    pub async fn scope<F: Future>(handle: SessionHandle, f: F) -> F::Output {
        CURRENT_SESSION.scope(handle, f).await
    }
}

/// The session handle installed by the enclosing [`SessionProvider::scope`].
///
/// Calling this anywhere else is a programming error and returns
/// [`SessionError::Configuration`].
pub fn use_session() -> Result<SessionHandle, SessionError> {
    CURRENT_SESSION.try_with(|handle| handle.clone()).map_err(|_| {
        SessionError::Configuration(
            "use_session must be used within a SessionProvider scope".to_string(),
        )
    })
}

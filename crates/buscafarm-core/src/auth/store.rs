use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::Authenticator;
use crate::error::SessionError;
use crate::models::{Employee, Pharmacy};
use crate::storage::{KeyValueStorage, StorageKey};

use super::session::{CurrentSession, Session};

/// Holds the signed-in employee's session and mirrors it to durable storage.
///
/// Two states only: authenticated (`Some(Session)`) and unauthenticated
/// (`None`). `sign_in` moves to the first when the backend accepts the
/// credentials, `sign_out` always moves to the second. Storage is written
/// right after every in-memory change; the two are not updated atomically.
pub struct SessionStore {
    api: Arc<dyn Authenticator>,
    storage: Arc<dyn KeyValueStorage>,
    session: Option<Session>,
}

impl SessionStore {
    /// Restore the session persisted in `storage`, if there is a complete one.
    ///
    /// Empty storage is the normal first-run case and yields an
    /// unauthenticated store. If any of the three keys is missing the
    /// others are ignored.
    pub fn initialize(
        api: Arc<dyn Authenticator>,
        storage: Arc<dyn KeyValueStorage>,
    ) -> Result<Self, SessionError> {
        let session = Self::load(storage.as_ref())?;
        debug!(authenticated = session.is_some(), "Session store initialized");
        Ok(Self {
            api,
            storage,
            session,
        })
    }

    fn load(storage: &dyn KeyValueStorage) -> Result<Option<Session>, SessionError> {
        let token = read_key(storage, StorageKey::Token)?;
        let pharmacy = read_key(storage, StorageKey::Pharmacy)?;
        let employee = read_key(storage, StorageKey::Employee)?;

        let (Some(token), Some(pharmacy), Some(employee)) = (token, pharmacy, employee) else {
            debug!("No complete session in storage");
            return Ok(None);
        };

        let pharmacy: Pharmacy = parse_record(StorageKey::Pharmacy, &pharmacy)?;
        let employee: Employee = parse_record(StorageKey::Employee, &employee)?;

        Ok(Session::new(token, employee, pharmacy))
    }

    /// Verify credentials with the backend and start a session.
    ///
    /// On failure nothing changes, in memory or in storage, and the error is
    /// returned as-is. There is no retry.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), SessionError> {
        let response = match self.api.authenticate_employee(email, password).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Employee sign-in failed");
                return Err(e.into());
            }
        };
        let (token, employee, pharmacy) = response.split()?;

        let employee_json =
            serde_json::to_string(&employee).map_err(|e| SessionError::Storage(e.into()))?;
        let pharmacy_json =
            serde_json::to_string(&pharmacy).map_err(|e| SessionError::Storage(e.into()))?;

        info!(employee_id = %employee.id, pharmacy_id = %pharmacy.id, "Employee signed in");
        self.session = Session::new(token, employee, pharmacy);

        if let Some(ref session) = self.session {
            self.storage
                .set(StorageKey::Token.as_str(), session.token())
                .and_then(|_| self.storage.set(StorageKey::Pharmacy.as_str(), &pharmacy_json))
                .and_then(|_| self.storage.set(StorageKey::Employee.as_str(), &employee_json))
                .map_err(SessionError::Storage)?;
        }
        Ok(())
    }

    /// End the session. Removes every persisted key even when already signed
    /// out; storage failures are logged, the in-memory state is always reset.
    pub fn sign_out(&mut self) {
        Self::clear_storage(self.storage.as_ref());
        if self.session.take().is_some() {
            info!("Employee signed out");
        }
    }

    /// Remove every persisted session key from `storage` without loading it.
    ///
    /// Works on storage `initialize` rejects, e.g. a corrupt record. Failures
    /// are logged and the remaining keys are still attempted.
    pub fn clear_storage(storage: &dyn KeyValueStorage) {
        for key in StorageKey::ALL {
            if let Err(e) = storage.remove(key.as_str()) {
                warn!(key = key.as_str(), error = %e, "Failed to remove stored session key");
            }
        }
    }

    /// Employee and pharmacy of the signed-in user, both `None` otherwise
    pub fn current_session(&self) -> CurrentSession {
        CurrentSession::from(self.session.as_ref())
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Bearer token for authenticated API calls
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

/// Read a key, treating an empty value the same as a missing one.
fn read_key(storage: &dyn KeyValueStorage, key: StorageKey) -> Result<Option<String>, SessionError> {
    let value = storage.get(key.as_str()).map_err(SessionError::Storage)?;
    Ok(value.filter(|v| !v.is_empty()))
}

fn parse_record<T: serde::de::DeserializeOwned>(key: StorageKey, raw: &str) -> Result<T, SessionError> {
    serde_json::from_str(raw).map_err(|source| SessionError::Deserialization {
        key: key.as_str(),
        source,
    })
}

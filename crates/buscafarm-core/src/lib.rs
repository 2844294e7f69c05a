//! Session handling for the BuscaFarm pharmacy back office.
//!
//! Signs employees in against the BuscaFarm API, keeps the resulting token,
//! employee and pharmacy in memory, and persists them so a restarted process
//! picks the session back up.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use api::{ApiClient, ApiError, Authenticator};
pub use auth::{use_session, CurrentSession, Session, SessionHandle, SessionProvider, SessionStore};
pub use config::Config;
pub use error::SessionError;
pub use models::{Employee, Pharmacy, RecordId};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageKey};

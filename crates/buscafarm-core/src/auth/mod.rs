//! Authentication module for the signed-in employee's session.
//!
//! This module provides:
//! - `Session`: token, employee and pharmacy of a signed-in user
//! - `SessionStore`: sign-in/sign-out and persistence through a
//!   `KeyValueStorage`
//! - `SessionHandle` / `SessionProvider`: sharing one store across an app
//!
//! Sessions never expire client-side; they end only on sign-out.

pub mod context;
pub mod session;
pub mod store;

pub use context::{use_session, SessionHandle, SessionProvider};
pub use session::{CurrentSession, Session};
pub use store::SessionStore;

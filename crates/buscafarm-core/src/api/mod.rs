//! REST API client module for the BuscaFarm backend.
//!
//! This module provides the `ApiClient` used to verify employee
//! credentials against the `sessions/employees` endpoint, and the
//! `Authenticator` seam the session store talks to.

pub mod client;
pub mod error;

pub use client::{ApiClient, Authenticator, SignInResponse, DEFAULT_API_BASE_URL};
pub use error::ApiError;

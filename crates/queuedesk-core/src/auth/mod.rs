//! Authentication module for managing the operator session.
//!
//! This module provides:
//! - `SessionStore`: the persisted bearer credential and cached profile
//! - `AuthFlow`: login/logout state machine with the admin role gate
//! - `CredentialStore`: optional OS-level password storage via keyring
//!
//! Credential validity is never tracked locally; the backend decides on
//! every request, and a 401 from any endpoint clears the session.

pub mod credentials;
pub mod flow;
pub mod session;

pub use credentials::CredentialStore;
pub use flow::{AuthFlow, AuthState, LoginError};
pub use session::SessionStore;

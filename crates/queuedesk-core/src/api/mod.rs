//! REST gateway for the hospital queue backend.
//!
//! This module provides the `ApiClient`, the single choke point through
//! which every backend call passes, and the typed endpoint wrappers built
//! on top of it.
//!
//! The backend uses bearer token authentication; the token comes from the
//! shared `SessionStore` and is cleared whenever the backend answers 401.

pub mod client;
pub mod endpoints;
pub mod error;

pub use client::{ApiClient, HttpMethod, RequestOptions};
pub use error::ApiError;

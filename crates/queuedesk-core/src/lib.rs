//! Core library for queuedesk.
//!
//! Shared by the `queuedesk` CLI. Contains the authenticated request
//! gateway, the session store, the login/logout flow, typed backend
//! endpoints and the domain models for the hospital queue backend.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

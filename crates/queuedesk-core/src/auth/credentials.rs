//! Remembered login passwords in the OS keychain.
//!
//! Entries are keyed by the normalized (trimmed, lowercased) email, the same
//! form the login flow sends to the backend.

use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "queuedesk";

pub struct CredentialStore;

impl CredentialStore {
    fn entry(email: &str) -> Result<Entry> {
        let account = email.trim().to_lowercase();
        Entry::new(SERVICE_NAME, &account).context("Failed to open keychain entry")
    }

    pub fn store(email: &str, password: &str) -> Result<()> {
        Self::entry(email)?
            .set_password(password)
            .context("Failed to save password to keychain")
    }

    pub fn get_password(email: &str) -> Result<String> {
        Self::entry(email)?
            .get_password()
            .context("Failed to read password from keychain")
    }

    /// Forget the remembered password. A missing entry is not an error.
    pub fn delete(email: &str) -> Result<()> {
        match Self::entry(email)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to remove password from keychain"),
        }
    }

    pub fn has_credentials(email: &str) -> bool {
        Self::entry(email)
            .map(|entry| entry.get_password().is_ok())
            .unwrap_or(false)
    }
}

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::models::User;

/// Slot holding the bearer credential.
const TOKEN_SLOT: &str = "token";

/// Slot holding the profile cached at login.
const PROFILE_SLOT: &str = "user";

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    profile: Option<User>,
    /// Bumped whenever the credential changes.
    generation: u64,
}

/// The one credential this process holds, plus the profile cached with it.
///
/// Shared as `Arc<SessionStore>` between the gateway (which clears it on
/// any 401) and the auth flow. The lock is never held across an await.
///
/// Slot files are written while the lock is held, so the files always match
/// the last in-memory change. These are small blocking writes made from
/// async code.
#[derive(Debug)]
pub struct SessionStore {
    dir: Option<PathBuf>,
    state: Mutex<SessionState>,
}

impl SessionStore {
    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Open a store persisted under `dir`, loading any saved slots.
    /// Unreadable slots are logged and treated as absent.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let token = load_slot::<String>(&dir, TOKEN_SLOT);
        let profile = token
            .as_ref()
            .and_then(|_| load_slot::<User>(&dir, PROFILE_SLOT));
        debug!(dir = ?dir, has_token = token.is_some(), "Session store opened");
        Self {
            dir: Some(dir),
            state: Mutex::new(SessionState {
                token,
                profile,
                generation: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist a credential, replacing any previous one.
    pub fn set_credential(&self, token: impl Into<String>) {
        let token = token.into();
        let mut state = self.lock();
        self.persist(TOKEN_SLOT, Some(&token));
        state.token = Some(token);
        state.generation += 1;
    }

    pub fn get_credential(&self) -> Option<String> {
        self.lock().token.clone()
    }

    pub fn has_credential(&self) -> bool {
        self.lock().token.is_some()
    }

    /// Read the credential and the generation it belongs to in one step.
    pub fn snapshot(&self) -> (Option<String>, u64) {
        let state = self.lock();
        (state.token.clone(), state.generation)
    }

    /// Drop the credential and the cached profile. Safe to call repeatedly.
    pub fn clear_credential(&self) {
        let mut state = self.lock();
        self.persist::<String>(TOKEN_SLOT, None);
        self.persist::<User>(PROFILE_SLOT, None);
        if state.token.take().is_some() {
            state.generation += 1;
        }
        state.profile = None;
    }

    pub fn set_profile(&self, user: User) {
        let mut state = self.lock();
        self.persist(PROFILE_SLOT, Some(&user));
        state.profile = Some(user);
    }

    pub fn profile(&self) -> Option<User> {
        self.lock().profile.clone()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Write or remove a slot file. The in-memory state is authoritative,
    /// so a failed write is only logged.
    fn persist<T: Serialize>(&self, slot: &str, value: Option<&T>) {
        let Some(ref dir) = self.dir else {
            return;
        };
        let result = match value {
            Some(value) => write_slot(dir, slot, value),
            None => remove_slot(dir, slot),
        };
        if let Err(e) = result {
            warn!(slot = slot, error = %e, "Failed to persist session slot");
        }
    }
}

fn slot_path(dir: &Path, slot: &str) -> PathBuf {
    dir.join(format!("{}.json", slot))
}

fn load_slot<T: DeserializeOwned>(dir: &Path, slot: &str) -> Option<T> {
    let path = slot_path(dir, slot);
    if !path.exists() {
        return None;
    }
    let parsed = std::fs::read_to_string(&path)
        .context("Failed to read session slot")
        .and_then(|contents| {
            serde_json::from_str(&contents).context("Failed to parse session slot")
        });
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(slot = slot, error = %e, "Ignoring unreadable session slot");
            None
        }
    }
}

fn write_slot<T: Serialize>(dir: &Path, slot: &str, value: &T) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let contents = serde_json::to_string_pretty(value)?;
    std::fs::write(slot_path(dir, slot), contents)?;
    Ok(())
}

fn remove_slot(dir: &Path, slot: &str) -> Result<()> {
    match std::fs::remove_file(slot_path(dir, slot)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

use std::sync::Mutex;

use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "satchel";

/// Keychain slot holding the session token. One slot per machine user;
/// satchel sessions are not multi-account.
const TOKEN_SLOT: &str = "session-token";

/// Durable single-slot storage for the session credential.
///
/// Owned exclusively by the `SessionManager`; nothing else reads or writes
/// the slot. No validation happens here.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Result<Option<String>>;
    fn set(&self, credential: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Credential store backed by the OS keychain.
#[derive(Default)]
pub struct KeyringStore;

impl KeyringStore {
    pub fn new() -> Self {
        Self
    }

    fn entry() -> Result<Entry> {
        Entry::new(SERVICE_NAME, TOKEN_SLOT).context("Failed to create keyring entry")
    }
}

impl CredentialStore for KeyringStore {
    fn get(&self) -> Result<Option<String>> {
        match Self::entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read token from keychain"),
        }
    }

    fn set(&self, credential: &str) -> Result<()> {
        Self::entry()?
            .set_password(credential)
            .context("Failed to store token in keychain")
    }

    fn clear(&self) -> Result<()> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}

/// In-process credential store. The token does not survive a restart;
/// used by tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.slot
            .lock()
            .map_err(|_| anyhow::anyhow!("credential slot poisoned"))
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.slot()?.clone())
    }

    fn set(&self, credential: &str) -> Result<()> {
        *self.slot()? = Some(credential.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot()? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get().unwrap(), None);

        store.set("tok-123").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("tok-123"));

        // Overwrite replaces the slot, it does not accumulate
        store.set("tok-456").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("tok-456"));
    }

    #[test]
    fn memory_store_clear_empties_slot() {
        let store = MemoryStore::new();
        store.set("tok-123").unwrap();
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);

        // Clearing an empty slot is fine
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }
}

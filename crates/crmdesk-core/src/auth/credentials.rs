use anyhow::{Context, Result};
use keyring::Entry;
use tracing::{debug, warn};

use super::session::{Session, SessionStore};

const SERVICE_NAME: &str = "crmdesk";

/// Keychain entry holding the bearer token
const TOKEN_KEY: &str = "authToken";

/// Keychain entry holding the display name
const NAME_KEY: &str = "userName";

/// Session kept in the OS keychain as two entries.
///
/// On Linux the native backend is the kernel session keyring, which does not
/// outlive the login session; use the file backend where the session must
/// survive a reboot.
pub struct KeyringSessionStore {
    service: String,
    token: Entry,
    name: Entry,
}

impl KeyringSessionStore {
    pub fn new() -> Result<Self> {
        Self::with_service(SERVICE_NAME)
    }

    /// Use a different keychain service name (one session per service)
    pub fn with_service(service: &str) -> Result<Self> {
        let token = Entry::new(service, TOKEN_KEY).context("Failed to create keyring entry")?;
        let name = Entry::new(service, NAME_KEY).context("Failed to create keyring entry")?;
        Ok(Self::from_entries(service, token, name))
    }

    fn from_entries(service: &str, token: Entry, name: Entry) -> Self {
        Self {
            service: service.to_string(),
            token,
            name,
        }
    }

    fn read(entry: &Entry, key: &str) -> Option<String> {
        match entry.get_password() {
            Ok(value) => Some(value),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(key, error = %e, "Failed to read keychain entry");
                None
            }
        }
    }

    fn remove(entry: &Entry, key: &str) -> Result<()> {
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to delete keychain entry {}", key)),
        }
    }
}

impl SessionStore for KeyringSessionStore {
    fn save(&self, credential: &str, display_name: &str) -> Result<()> {
        self.token
            .set_password(credential)
            .context("Failed to store token in keychain")?;
        if let Err(e) = self.name.set_password(display_name) {
            // Never leave a token without its user name
            if let Err(undo) = Self::remove(&self.token, TOKEN_KEY) {
                warn!(error = %undo, "Failed to roll back keychain token");
            }
            return Err(e).context("Failed to store user name in keychain");
        }
        debug!(service = %self.service, "Session saved to keychain");
        Ok(())
    }

    fn current(&self) -> Session {
        Session {
            credential: Self::read(&self.token, TOKEN_KEY),
            display_name: Self::read(&self.name, NAME_KEY),
        }
    }

    fn clear(&self) -> Result<()> {
        let token = Self::remove(&self.token, TOKEN_KEY);
        let name = Self::remove(&self.name, NAME_KEY);
        token.and(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyring::credential::CredentialBuilderApi;
    use keyring::mock::{self, MockCredential};

    fn mock_entry(key: &str) -> Entry {
        let credential = mock::default_credential_builder()
            .build(None, "crmdesk-test", key)
            .unwrap();
        Entry::new_with_credential(credential)
    }

    fn mock_store() -> KeyringSessionStore {
        KeyringSessionStore::from_entries("crmdesk-test", mock_entry(TOKEN_KEY), mock_entry(NAME_KEY))
    }

    fn fail_next(entry: &Entry) {
        entry
            .get_credential()
            .downcast_ref::<MockCredential>()
            .unwrap()
            .set_error(keyring::Error::Invalid("entry".into(), "rejected".into()));
    }

    #[test]
    fn test_save_and_clear() {
        let store = mock_store();
        assert!(store.current().is_empty());

        store.save("T", "Ana").unwrap();
        let session = store.current();
        assert_eq!(session.token(), Some("T"));
        assert_eq!(session.display_name.as_deref(), Some("Ana"));

        store.clear().unwrap();
        assert!(store.current().is_empty());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_failed_name_write_drops_token() {
        let store = mock_store();
        fail_next(&store.name);

        assert!(store.save("T", "Ana").is_err());
        assert!(store.current().is_empty());
    }

    #[test]
    fn test_clear_removes_name_when_token_delete_fails() {
        let store = mock_store();
        store.save("T", "Ana").unwrap();
        fail_next(&store.token);

        assert!(store.clear().is_err());
        assert_eq!(store.current().display_name, None);
        assert_eq!(store.current().token(), Some("T"));
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AuthError;

const DEFAULT_KEYRING_SERVICE: &str = "lemonlens-cli";
const KEYRING_USER: &str = "auth-token";
const CREDENTIALS_FILE_NAME: &str = "credentials";

/// Returns the keyring service name.
///
/// Defaults to `"lemonlens-cli"`. Override via `LEMONLENS_KEYRING_SERVICE` so
/// test runs never touch real credentials.
fn keyring_service() -> String {
    std::env::var("LEMONLENS_KEYRING_SERVICE")
        .unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string())
}

/// Where the bearer token lives: OS keychain first, `credentials` file second.
#[derive(Debug, Clone)]
pub struct TokenStore {
    service: Option<String>,
    file: PathBuf,
}

impl TokenStore {
    /// Keychain-backed store with a file fallback inside `state_dir`.
    #[must_use]
    pub fn keyring(state_dir: &Path) -> Self {
        Self {
            service: Some(keyring_service()),
            file: state_dir.join(CREDENTIALS_FILE_NAME),
        }
    }

    /// File-only store; never touches the keychain.
    #[must_use]
    pub fn file_only(state_dir: &Path) -> Self {
        Self {
            service: None,
            file: state_dir.join(CREDENTIALS_FILE_NAME),
        }
    }

    fn entry(&self) -> Option<keyring::Entry> {
        let service = self.service.as_deref()?;
        match keyring::Entry::new(service, KEYRING_USER) {
            Ok(entry) => Some(entry),
            Err(error) => {
                tracing::debug!(%error, "keyring unavailable");
                None
            }
        }
    }

    /// Store a token. Falls back to the file if the keychain refuses it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the file fallback cannot be written.
    pub fn store(&self, token: &str) -> Result<(), AuthError> {
        if let Some(entry) = self.entry() {
            match entry.set_password(token) {
                Ok(()) => {
                    // Only one tier holds the token at a time.
                    self.remove_file()?;
                    return Ok(());
                }
                Err(error) => tracing::warn!(%error, "keyring store failed; falling back to file"),
            }
        }
        write_private(&self.file, token)
    }

    /// Load a token. Priority: keyring → file.
    #[must_use]
    pub fn load(&self) -> Option<String> {
        if let Some(entry) = self.entry()
            && let Ok(token) = entry.get_password()
            && !token.is_empty()
        {
            return Some(token);
        }
        self.load_file()
    }

    /// Delete the token from both tiers.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the credentials file cannot be removed.
    pub fn delete(&self) -> Result<(), AuthError> {
        if let Some(entry) = self.entry() {
            let _ = entry.delete_credential();
        }
        self.remove_file()
    }

    /// Which tier currently holds the token, for status display.
    #[must_use]
    pub fn source(&self) -> Option<&'static str> {
        if let Some(entry) = self.entry()
            && entry.get_password().is_ok_and(|t| !t.is_empty())
        {
            return Some("keyring");
        }
        self.load_file().map(|_| "file")
    }

    fn load_file(&self) -> Option<String> {
        fs::read_to_string(&self.file)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn remove_file(&self) -> Result<(), AuthError> {
        if self.file.exists() {
            fs::remove_file(&self.file).map_err(|e| {
                AuthError::Storage(format!("failed to delete {}: {e}", self.file.display()))
            })?;
        }
        Ok(())
    }
}

/// Write `contents` to `path` with owner-only permissions on Unix.
pub(crate) fn write_private(path: &Path, contents: &str) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AuthError::Storage(format!("mkdir {}: {e}", parent.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
            }
        }
    }
    fs::write(path, contents)
        .map_err(|e| AuthError::Storage(format!("write {}: {e}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| AuthError::Storage(format!("chmod {}: {e}", path.display())))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_load_delete_cycle() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = TokenStore::file_only(tmp.path());

        assert!(store.load().is_none());
        store.store("tok_abc123").expect("store");
        assert_eq!(store.load().as_deref(), Some("tok_abc123"));
        assert_eq!(store.source(), Some("file"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(tmp.path().join(CREDENTIALS_FILE_NAME))
                .expect("metadata")
                .permissions()
                .mode()
                & 0o777;
            assert_eq!(mode, 0o600, "credentials file should be 0600");
        }

        store.delete().expect("delete");
        assert!(store.load().is_none());
        assert!(store.source().is_none());
    }

    #[test]
    fn whitespace_only_file_is_no_token() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        fs::write(tmp.path().join(CREDENTIALS_FILE_NAME), "   \n  ").expect("write");
        assert!(TokenStore::file_only(tmp.path()).load().is_none());
    }

    #[test]
    fn delete_without_file_is_ok() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        TokenStore::file_only(tmp.path()).delete().expect("delete");
    }
}

//! Session token persisted to a file between CLI invocations.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use kasuwa_client::{SessionError, SessionProvider, SessionStore};
use secrecy::{ExposeSecret, SecretString};

/// Session stored in a single file holding the bearer token.
pub struct FileSession {
    path: PathBuf,
    token: RwLock<Option<SecretString>>,
}

impl FileSession {
    /// Load the session from `path`. A missing or blank file means signed out.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let token = match fs::read_to_string(&path) {
            Ok(contents) => {
                let contents = contents.trim();
                (!contents.is_empty()).then(|| SecretString::from(contents.to_owned()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };
        Ok(Self {
            path,
            token: RwLock::new(token),
        })
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, token: &SecretString) -> io::Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        file.write_all(token.expose_secret().as_bytes())?;
        file.write_all(b"\n")
    }

    fn remove_file(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    fn set(&self, token: Option<SecretString>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }
}

impl SessionProvider for FileSession {
    fn token(&self) -> Option<SecretString> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SessionStore for FileSession {
    fn store(&self, token: SecretString) -> Result<(), SessionError> {
        self.write_file(&token).map_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "could not save session");
            SessionError::save(self.path.display().to_string(), e)
        })?;
        self.set(Some(token));
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.set(None);
        self.remove_file().map_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "could not remove session file");
            SessionError::remove(self.path.display().to_string(), e)
        })
    }
}

impl std::fmt::Debug for FileSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSession")
            .field("path", &self.path)
            .field("signed_in", &self.token().is_some())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let session = FileSession::open(dir.path().join("session")).unwrap();
        assert!(session.token().is_none());
    }

    #[test]
    fn test_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");

        let session = FileSession::open(&path).unwrap();
        session.store(SecretString::from("tok-123".to_string())).unwrap();

        let reopened = FileSession::open(&path).unwrap();
        assert_eq!(reopened.token().unwrap().expose_secret(), "tok-123");
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        let session = FileSession::open(&path).unwrap();
        session.store(SecretString::from("tok".to_string())).unwrap();

        session.clear().unwrap();
        assert!(session.token().is_none());
        assert!(!path.exists());
        session.clear().unwrap();
    }

    #[test]
    fn test_unwritable_location_fails_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("session");
        let session = FileSession::open(&path).unwrap();

        let err = session
            .store(SecretString::from("tok-lost".to_string()))
            .unwrap_err();

        assert_eq!(err.location(), path.display().to_string());
        assert!(session.token().is_none());
        assert!(FileSession::open(&path).unwrap().token().is_none());
    }

    #[test]
    fn test_failed_removal_still_signs_out_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        std::fs::create_dir(&path).unwrap();
        let session = FileSession {
            path,
            token: RwLock::new(Some(SecretString::from("tok".to_string()))),
        };

        assert!(session.clear().is_err());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_debug_hides_token() {
        let dir = tempfile::tempdir().unwrap();
        let session = FileSession::open(dir.path().join("session")).unwrap();
        session.store(SecretString::from("very-secret".to_string())).unwrap();
        assert!(!format!("{session:?}").contains("very-secret"));
    }
}

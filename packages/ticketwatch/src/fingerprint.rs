//! Content fingerprinting and last-seen state.
//!
//! The fingerprint is the system's only durable state: one hex digest
//! per run, compared as a string against the previous run's digest to
//! decide whether the paid summarization call is warranted.

use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Name of the state file inside the cache directory.
const STATE_FILE: &str = "last_content_hash.txt";

/// Hex-encoded SHA-256 digest of a page's normalized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFingerprint(String);

impl ContentFingerprint {
    /// Fingerprint normalized page text.
    ///
    /// Deterministic over the UTF-8 bytes of `text`; any single-character
    /// difference yields a different digest.
    pub fn from_text(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Wrap an already-encoded hex digest, as read back from storage.
    pub fn from_hex(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// The full hex digest.
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Leading eight hex characters, for logs and user-facing messages.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(8)]
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persistence for the last-seen fingerprint.
///
/// The store exclusively owns the persisted state; no other component
/// touches it. Synchronous on purpose: the backing state is one small
/// local file.
pub trait FingerprintStore: Send + Sync {
    /// Digest recorded by the previous run, `None` when no prior state
    /// exists (which makes the first run take the change branch).
    fn load_previous(&self) -> StoreResult<Option<ContentFingerprint>>;

    /// Record `fingerprint` as the last-seen state, replacing any prior
    /// value.
    fn save_current(&self, fingerprint: &ContentFingerprint) -> StoreResult<()>;
}

/// File-backed store holding one digest under a cache directory.
#[derive(Debug, Clone)]
pub struct FileFingerprintStore {
    path: PathBuf,
}

impl FileFingerprintStore {
    /// Store state at `cache_dir/last_content_hash.txt`.
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            path: cache_dir.as_ref().join(STATE_FILE),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FingerprintStore for FileFingerprintStore {
    fn load_previous(&self) -> StoreResult<Option<ContentFingerprint>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let digest = contents.trim();
                if digest.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(ContentFingerprint::from_hex(digest)))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Read {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn save_current(&self, fingerprint: &ContentFingerprint) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                path: self.path.clone(),
                source: e,
            })?;
        }
        fs::write(&self.path, fingerprint.as_hex()).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        })?;

        debug!(path = %self.path.display(), digest = fingerprint.short(), "fingerprint saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable_sha256_hex() {
        let fp = ContentFingerprint::from_text("hello");

        assert_eq!(
            fp.as_hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(fp, ContentFingerprint::from_text("hello"));
    }

    #[test]
    fn test_single_character_change_flips_digest() {
        let a = ContentFingerprint::from_text("tickets on sale 2026-04-01");
        let b = ContentFingerprint::from_text("tickets on sale 2026-04-02");

        assert_ne!(a, b);
    }

    #[test]
    fn test_short_is_leading_eight_chars() {
        let fp = ContentFingerprint::from_text("hello");

        assert_eq!(fp.short(), "2cf24dba");
        assert_eq!(fp.short(), &fp.as_hex()[..8]);
    }

    #[test]
    fn test_load_returns_none_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileFingerprintStore::new(dir.path());

        assert_eq!(store.load_previous().unwrap(), None);
    }

    #[test]
    fn test_save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileFingerprintStore::new(dir.path());
        let fp = ContentFingerprint::from_text("page text");

        store.save_current(&fp).unwrap();

        assert_eq!(store.load_previous().unwrap(), Some(fp));
    }

    #[test]
    fn test_save_overwrites_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileFingerprintStore::new(dir.path());
        let first = ContentFingerprint::from_text("v1");
        let second = ContentFingerprint::from_text("v2");

        store.save_current(&first).unwrap();
        store.save_current(&second).unwrap();

        assert_eq!(store.load_previous().unwrap(), Some(second));
    }

    #[test]
    fn test_save_creates_cache_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileFingerprintStore::new(dir.path().join("nested").join("cache"));

        store
            .save_current(&ContentFingerprint::from_text("x"))
            .unwrap();

        assert!(store.path().exists());
    }

    #[test]
    fn test_load_trims_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileFingerprintStore::new(dir.path());
        let fp = ContentFingerprint::from_text("page text");

        fs::write(store.path(), format!("{}\n", fp.as_hex())).unwrap();

        assert_eq!(store.load_previous().unwrap(), Some(fp));
    }
}

//! Credential file persistence and tiered token resolution.
//!
//! The store keeps a single API token in a small JSON resource file,
//! `~/.qubitflow/qfrc` by default:
//!
//! ```text
//! {
//!   "token": "your-api-token-here"
//! }
//! ```
//!
//! Reading is deliberately forgiving: a missing, unreadable, or malformed
//! file means "no token configured", which is an expected state rather than
//! an error. Writing goes through a single primitive, [`CredentialStore::save`],
//! which replaces the whole file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::session::{SessionOverride, process_session};
use super::source::TokenSource;
use super::types::{CredentialError, StoreOutcome};

/// Directory under the user's home that holds QubitFlow configuration.
const CONFIG_DIR: &str = ".qubitflow";

/// Name of the credential resource file inside the configuration directory.
const RC_FILE: &str = "qfrc";

/// On-disk shape of the credential file.
///
/// An empty `token` is the persisted sentinel for "no token stored"; it is
/// normalized to `None` on every read.
#[derive(Debug, Serialize, Deserialize)]
struct RcDocument {
  token: String,
}

/// Two-tier credential store for a QubitFlow API token.
///
/// Tokens are resolved from two independent tiers in fixed precedence order:
///
/// 1. The process-scoped session tier, set via [`enable`](Self::enable) (or,
///    for the shared process-wide tier, exported as `QUBITFLOW_TOKEN` before
///    launch).
/// 2. The JSON resource file on disk.
///
/// Every operation re-reads the file, so edits made by other processes are
/// observed; concurrent writers are last-write-wins by design, since the file
/// represents one user's single desktop-session credential.
#[derive(Debug, Clone)]
pub struct CredentialStore {
  path: PathBuf,
  session: Arc<SessionOverride>,
}

impl CredentialStore {
  /// Opens the store at the default per-user location, `~/.qubitflow/qfrc`,
  /// sharing the process-wide session tier.
  ///
  /// # Errors
  /// Returns [`CredentialError::HomeNotFound`] when the home directory cannot
  /// be determined. The credential file itself does not need to exist.
  pub fn new() -> Result<Self, CredentialError> {
    Ok(Self {
      path: default_rc_path()?,
      session: process_session(),
    })
  }

  /// Opens the store at an explicit file path, sharing the process-wide
  /// session tier.
  pub fn at_path(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      session: process_session(),
    }
  }

  /// Opens the store at an explicit file path with an injected session tier.
  ///
  /// This is the seam for tests and embedders that need isolation from the
  /// shared process-wide session.
  pub fn with_session(path: impl Into<PathBuf>, session: Arc<SessionOverride>) -> Self {
    Self {
      path: path.into(),
      session,
    }
  }

  /// Returns the path of the credential file backing this store.
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Loads the token, consulting the session tier before the file.
  ///
  /// # Returns
  /// The session token when one is set, otherwise the file token via
  /// [`read`](Self::read), otherwise `None`. No side effects.
  pub fn load(&self) -> Option<String> {
    self.session.token().or_else(|| self.read())
  }

  /// Reads the token from the credential file only.
  ///
  /// # Returns
  /// `Some(token)` when the file exists, parses as JSON, and carries a
  /// non-empty `token` field. Every failure mode (missing file, I/O error,
  /// malformed JSON, missing field) and the empty-string sentinel normalize
  /// to `None`.
  pub fn read(&self) -> Option<String> {
    let token = fs::read_to_string(&self.path)
      .ok()
      .and_then(|contents| serde_json::from_str::<RcDocument>(&contents).ok())
      .map(|document| document.token)
      .filter(|token| !token.is_empty());
    if token.is_none() {
      debug!("No stored token at '{}'", self.path.display());
    }
    token
  }

  /// Stores the token, refusing to clobber a different existing token unless
  /// `overwrite` is set.
  ///
  /// # Returns
  /// [`StoreOutcome::Written`] when the file was written, or
  /// [`StoreOutcome::SkippedConflict`] when a different token was already
  /// present and left untouched. The conflict also emits a warning, but is
  /// not an error: the caller's credential file is intact.
  ///
  /// # Errors
  /// Propagates I/O and serialization failures from the underlying
  /// [`save`](Self::save).
  pub fn store(&self, token: &str, overwrite: bool) -> Result<StoreOutcome, CredentialError> {
    if let Some(existing) = self.read()
      && existing != token
      && !overwrite
    {
      warn!(
        "A different token is already stored at '{}'; pass overwrite to replace it",
        self.path.display()
      );
      return Ok(StoreOutcome::SkippedConflict);
    }
    self.save(token)?;
    Ok(StoreOutcome::Written)
  }

  /// Deletes the stored token, but only when it matches `token` exactly.
  ///
  /// The delete is logical: the file is overwritten with an empty token
  /// rather than removed. A mismatch is a silent no-op, which protects
  /// against deleting a different credential than the caller believes is
  /// present.
  ///
  /// # Errors
  /// Propagates I/O and serialization failures from the underlying
  /// [`save`](Self::save).
  pub fn delete(&self, token: &str) -> Result<(), CredentialError> {
    if self.read().as_deref() == Some(token) {
      self.save("")?;
    }
    Ok(())
  }

  /// Unconditionally writes `token` as the entire file content, creating
  /// parent directories as needed.
  ///
  /// This is the sole write primitive; [`store`](Self::store) and
  /// [`delete`](Self::delete) both funnel through it. Use
  /// [`store`](Self::store) to avoid replacing an existing token.
  ///
  /// # Errors
  /// Returns [`CredentialError::Io`] when the directory cannot be created or
  /// the file cannot be written, and [`CredentialError::Serialize`] when the
  /// document cannot be encoded.
  pub fn save(&self, token: &str) -> Result<(), CredentialError> {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }
    let document = RcDocument {
      token: token.to_string(),
    };
    let contents = serde_json::to_string_pretty(&document)?;
    fs::write(&self.path, contents)?;
    debug!("Wrote credential file at '{}'", self.path.display());
    Ok(())
  }

  /// Sets the session token for the remainder of the process lifetime.
  ///
  /// Overwrites any previously set session token. Neither the file tier nor
  /// the real OS environment is touched; other processes are unaffected.
  pub fn enable(&self, token: &str) {
    self.session.set(token);
  }
}

impl TokenSource for CredentialStore {
  /// File-tier resolution only; the session tier is its own source.
  fn token(&self) -> Option<String> {
    self.read()
  }
}

/// Resolves the default credential file location, `~/.qubitflow/qfrc`.
///
/// # Errors
/// Returns [`CredentialError::HomeNotFound`] when the `HOME` environment
/// variable is unset.
pub fn default_rc_path() -> Result<PathBuf, CredentialError> {
  let home = std::env::var("HOME").map_err(|_| CredentialError::HomeNotFound)?;
  Ok(Path::new(&home).join(CONFIG_DIR).join(RC_FILE))
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Store backed by a fresh temp directory and a detached session tier, so
  /// tests observe neither each other nor the process environment.
  fn isolated_store(dir: &tempfile::TempDir) -> CredentialStore {
    CredentialStore::with_session(dir.path().join("qfrc"), Arc::new(SessionOverride::detached()))
  }

  #[test]
  fn test_save_then_read_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    store.save("abc123").unwrap();
    assert_eq!(store.read(), Some("abc123".to_string()));
  }

  #[test]
  fn test_save_empty_token_reads_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    store.save("").unwrap();
    assert_eq!(store.read(), None);
  }

  #[test]
  fn test_read_nonexistent_file_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    assert_eq!(store.read(), None);
  }

  #[test]
  fn test_read_malformed_json_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    fs::write(store.path(), "not json at all {").unwrap();
    assert_eq!(store.read(), None);
  }

  #[test]
  fn test_read_missing_token_field_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    fs::write(store.path(), r#"{"user": "someone"}"#).unwrap();
    assert_eq!(store.read(), None);
  }

  #[test]
  fn test_read_ignores_unrecognized_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    fs::write(store.path(), r#"{"token": "abc123", "stale": true}"#).unwrap();
    assert_eq!(store.read(), Some("abc123".to_string()));
  }

  #[test]
  fn test_save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("deeply").join("nested").join("qfrc");
    let store = CredentialStore::with_session(&nested, Arc::new(SessionOverride::detached()));

    store.save("abc123").unwrap();
    assert_eq!(store.read(), Some("abc123".to_string()));
  }

  #[test]
  fn test_store_refuses_to_overwrite_differing_token() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    assert_eq!(store.store("first", false).unwrap(), StoreOutcome::Written);
    assert_eq!(store.store("second", false).unwrap(), StoreOutcome::SkippedConflict);
    assert_eq!(store.read(), Some("first".to_string()));
  }

  #[test]
  fn test_store_with_overwrite_replaces_token() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    store.store("first", false).unwrap();
    assert_eq!(store.store("second", true).unwrap(), StoreOutcome::Written);
    assert_eq!(store.read(), Some("second".to_string()));
  }

  #[test]
  fn test_store_same_token_again_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    store.store("same", false).unwrap();
    assert_eq!(store.store("same", false).unwrap(), StoreOutcome::Written);
    assert_eq!(store.read(), Some("same".to_string()));
  }

  #[test]
  fn test_store_onto_logically_deleted_file_writes() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    store.save("old").unwrap();
    store.delete("old").unwrap();
    assert_eq!(store.store("new", false).unwrap(), StoreOutcome::Written);
    assert_eq!(store.read(), Some("new".to_string()));
  }

  #[test]
  fn test_delete_matching_token_empties_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    store.save("abc123").unwrap();
    store.delete("abc123").unwrap();
    assert_eq!(store.read(), None);
    // Logical delete: the file itself remains, holding the empty sentinel.
    assert!(store.path().exists());
  }

  #[test]
  fn test_delete_mismatched_token_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    store.save("abc123").unwrap();
    store.delete("different").unwrap();
    assert_eq!(store.read(), Some("abc123".to_string()));
  }

  #[test]
  fn test_delete_on_absent_file_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    store.delete("anything").unwrap();
    assert!(!store.path().exists());
  }

  #[test]
  fn test_load_prefers_session_over_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    store.save("file-token").unwrap();
    store.enable("session-token");
    assert_eq!(store.load(), Some("session-token".to_string()));
    // The file tier is untouched by enable.
    assert_eq!(store.read(), Some("file-token".to_string()));
  }

  #[test]
  fn test_load_falls_back_to_file_when_session_unset() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    store.save("file-token").unwrap();
    assert_eq!(store.load(), Some("file-token".to_string()));
  }

  #[test]
  fn test_load_with_no_tiers_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    assert_eq!(store.load(), None);
  }

  #[test]
  fn test_enable_wins_even_when_file_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    store.enable("session-only");
    assert_eq!(store.load(), Some("session-only".to_string()));
    assert_eq!(store.read(), None);
  }

  #[test]
  fn test_enable_overwrites_previous_session_token() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    store.enable("first");
    store.enable("second");
    assert_eq!(store.load(), Some("second".to_string()));
  }

  #[test]
  fn test_stores_sharing_a_session_observe_enable() {
    let dir = tempfile::tempdir().unwrap();
    let session = Arc::new(SessionOverride::detached());
    let store_a = CredentialStore::with_session(dir.path().join("a"), session.clone());
    let store_b = CredentialStore::with_session(dir.path().join("b"), session);

    store_a.enable("shared");
    assert_eq!(store_b.load(), Some("shared".to_string()));
  }

  #[test]
  fn test_external_edits_are_observed() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    store.save("original").unwrap();
    // Another process rewrites the file between calls.
    fs::write(store.path(), r#"{"token": "edited"}"#).unwrap();
    assert_eq!(store.read(), Some("edited".to_string()));
  }

  #[test]
  fn test_file_token_source_uses_file_tier_only() {
    let dir = tempfile::tempdir().unwrap();
    let store = isolated_store(&dir);

    store.save("file-token").unwrap();
    store.enable("session-token");
    assert_eq!(TokenSource::token(&store), Some("file-token".to_string()));
  }

  #[test]
  fn test_default_rc_path_is_under_home() {
    let path = default_rc_path().unwrap();
    assert!(path.ends_with(".qubitflow/qfrc"));
  }
}

//! Strongly typed results and errors for credential storage.
//!
//! These types are shared between the credential store and the higher-level
//! authentication factory so that callers can reason about write outcomes and
//! failure modes consistently.

use std::fmt;

/// Outcome of a conditional [`store`](crate::credentials::CredentialStore::store) operation.
///
/// Refusing to replace an existing token is an expected, recoverable state
/// rather than an error, so it is reported through this enum instead of
/// through [`CredentialError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
  /// The token was written to the credential file.
  Written,
  /// A different token was already present and `overwrite` was not set; the
  /// file was left untouched.
  SkippedConflict,
}

/// Errors that can occur while persisting credentials.
///
/// Absence of a credential is never an error; `read` and `load` return
/// `None` for every flavor of missing or unreadable file. These variants
/// cover only the write path and default-path resolution.
#[derive(Debug)]
pub enum CredentialError {
  /// The user's home directory could not be determined.
  HomeNotFound,
  /// An I/O error occurred while writing the credential file.
  Io(std::io::Error),
  /// The credential document could not be serialized to JSON.
  Serialize(serde_json::Error),
}

impl fmt::Display for CredentialError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::HomeNotFound => write!(f, "home directory could not be determined"),
      Self::Io(err) => write!(f, "I/O error: {err}"),
      Self::Serialize(err) => write!(f, "failed to serialize credential file: {err}"),
    }
  }
}

impl std::error::Error for CredentialError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Io(err) => Some(err),
      Self::Serialize(err) => Some(err),
      Self::HomeNotFound => None,
    }
  }
}

impl From<std::io::Error> for CredentialError {
  fn from(err: std::io::Error) -> Self {
    Self::Io(err)
  }
}

impl From<serde_json::Error> for CredentialError {
  fn from(err: serde_json::Error) -> Self {
    Self::Serialize(err)
  }
}

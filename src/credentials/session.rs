//! Process-scoped session token override.
//!
//! The session tier holds at most one token for the lifetime of the process.
//! It is the highest-precedence source consulted by
//! [`CredentialStore::load`](super::CredentialStore::load): a token set via
//! `enable` wins over whatever the credential file says, without ever being
//! persisted.
//!
//! The real OS environment is never mutated. The process-wide instance reads
//! the [`TOKEN_ENV_VAR`] environment variable as a fallback, so a token
//! exported before launch behaves exactly like one set through `enable`.

use std::sync::{Arc, Mutex, OnceLock};

use tracing::debug;

use super::source::TokenSource;

/// Environment variable consulted for a session token when no override has
/// been set in-process.
pub const TOKEN_ENV_VAR: &str = "QUBITFLOW_TOKEN";

/// In-process session tier for a single token.
///
/// A detached instance is purely in-memory, which keeps tests and embedders
/// isolated from the process environment. The shared instance used by
/// default-constructed stores additionally falls back to reading
/// [`TOKEN_ENV_VAR`] when no override was ever set.
#[derive(Debug, Default)]
pub struct SessionOverride {
  token: Mutex<Option<String>>,
  env_fallback: bool,
}

impl SessionOverride {
  /// Creates a purely in-memory session tier with no environment fallback.
  pub fn detached() -> Self {
    Self::default()
  }

  /// Creates a session tier that falls back to the [`TOKEN_ENV_VAR`]
  /// environment variable while no override has been set.
  pub fn with_process_env() -> Self {
    Self {
      token: Mutex::new(None),
      env_fallback: true,
    }
  }

  /// Sets the session token for the remainder of the process lifetime.
  ///
  /// Overwrites any previously set session token. The real OS environment is
  /// not touched.
  pub fn set(&self, token: &str) {
    let mut slot = self.token.lock().expect("session tier lock poisoned");
    if slot.is_some() {
      debug!("Replacing previously set session token");
    }
    *slot = Some(token.to_string());
  }

  /// Returns the current session token, if any.
  ///
  /// An empty session token behaves as unset, so resolution falls through to
  /// lower-precedence sources; this keeps the in-memory sentinel consistent
  /// with the empty-string sentinel used in the credential file.
  pub fn get(&self) -> Option<String> {
    let held = self.token.lock().expect("session tier lock poisoned").clone();
    held
      .filter(|token| !token.is_empty())
      .or_else(|| self.env_token())
  }

  fn env_token(&self) -> Option<String> {
    if !self.env_fallback {
      return None;
    }
    std::env::var(TOKEN_ENV_VAR).ok().filter(|token| !token.is_empty())
  }
}

impl TokenSource for SessionOverride {
  fn token(&self) -> Option<String> {
    self.get()
  }
}

/// Returns the session tier shared by default-constructed stores.
///
/// There is exactly one of these per process, matching the session's
/// process-lifetime semantics.
pub(crate) fn process_session() -> Arc<SessionOverride> {
  static SESSION: OnceLock<Arc<SessionOverride>> = OnceLock::new();
  SESSION.get_or_init(|| Arc::new(SessionOverride::with_process_env())).clone()
}

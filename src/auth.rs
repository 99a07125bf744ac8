//! Authentication descriptors for the QubitFlow API client.
//!
//! The API client accepts either token authentication (the common case for
//! desktop use, resolved from the credential store) or basic email/password
//! authentication. This module only constructs the descriptors; whether a
//! credential is actually valid is the remote service's concern.

use crate::credentials::CredentialStore;

/// Authorization scheme presented alongside a token.
const TOKEN_SCHEME: &str = "token";

/// Bearer-token authentication for the QubitFlow API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAuthentication {
  /// The API token, when one could be resolved. An absent token is handed to
  /// the client as-is; the service rejects unauthenticated requests.
  pub token: Option<String>,
  /// Authorization scheme, always `"token"`.
  pub scheme: String,
}

/// Email/password authentication for the QubitFlow API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuthentication {
  /// Email address registered with the QubitFlow account.
  pub email: String,
  /// Password for the account.
  pub password: String,
}

/// Either supported way of authenticating with the QubitFlow API.
///
/// Handed opaquely to the API-client constructor; this crate defines the
/// shape but not the transport usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
  /// Bearer-token authentication.
  Token(TokenAuthentication),
  /// HTTP basic authentication.
  Basic(BasicAuthentication),
}

impl From<TokenAuthentication> for Authentication {
  fn from(auth: TokenAuthentication) -> Self {
    Self::Token(auth)
  }
}

impl From<BasicAuthentication> for Authentication {
  fn from(auth: BasicAuthentication) -> Self {
    Self::Basic(auth)
  }
}

/// Sets up token authentication for the QubitFlow API.
///
/// # Arguments
/// * `token` - Explicit token to use. When `None` (or empty), the token is
///   resolved through the default credential store's
///   [`load`](CredentialStore::load), consulting the session tier and then
///   the resource file.
///
/// # Returns
/// A token descriptor carrying whatever token could be resolved, possibly
/// none at all.
pub fn token_authentication(token: Option<String>) -> TokenAuthentication {
  match CredentialStore::new() {
    Ok(store) => token_authentication_with(&store, token),
    // Without a home directory there is no store to consult; fall back to
    // the explicit token alone.
    Err(_) => descriptor(token.filter(|t| !t.is_empty())),
  }
}

/// Sets up token authentication against a caller-supplied credential store.
///
/// # Arguments
/// * `store` - Store consulted when no explicit token is given.
/// * `token` - Explicit token to use, taking precedence over the store.
pub fn token_authentication_with(store: &CredentialStore, token: Option<String>) -> TokenAuthentication {
  let token = token.filter(|t| !t.is_empty()).or_else(|| store.load());
  descriptor(token)
}

/// Sets up basic authentication for the QubitFlow API.
///
/// Pure construction: no I/O and no validation beyond accepting the two
/// strings as given.
///
/// # Arguments
/// * `email` - A valid email address.
/// * `password` - Password for the account.
pub fn basic_authentication(email: impl Into<String>, password: impl Into<String>) -> BasicAuthentication {
  BasicAuthentication {
    email: email.into(),
    password: password.into(),
  }
}

fn descriptor(token: Option<String>) -> TokenAuthentication {
  TokenAuthentication {
    token,
    scheme: TOKEN_SCHEME.to_string(),
  }
}

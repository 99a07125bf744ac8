//! Credential management for the QubitFlow API.
//!
//! This module persists a single API token across two storage tiers and
//! resolves it with a fixed precedence:
//!
//! 1. The process-scoped session tier, set via
//!    [`CredentialStore::enable`] or exported as `QUBITFLOW_TOKEN` before
//!    launch.
//! 2. The JSON resource file, `~/.qubitflow/qfrc` by default:
//!
//! ```text
//! {
//!   "token": "your-api-token-here"
//! }
//! ```
//!
//! Create an API token in the QubitFlow dashboard under *Account → API
//! tokens*. A missing or unreadable resource file simply means "no token
//! configured" and is never an error.

mod session;
mod source;
mod store;
mod types;

pub use session::{SessionOverride, TOKEN_ENV_VAR};
pub use source::TokenSource;
pub use store::{CredentialStore, default_rc_path};
pub use types::{CredentialError, StoreOutcome};

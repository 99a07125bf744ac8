//! Credential storage and authentication for the QubitFlow quantum
//! computing API.
//!
//! This crate persists a single API token in a per-user resource file
//! (`~/.qubitflow/qfrc`), layers a process-scoped session override on top of
//! it, and constructs the authentication descriptors consumed by the
//! QubitFlow API client.

pub mod auth;
pub mod credentials;

//! Token source abstractions.
//!
//! Defines the [`TokenSource`] trait so the two storage tiers (session
//! override, resource file) can plug into one resolution order without the
//! call sites knowing which tier answered.

/// A source for resolving a stored API token.
///
/// Sources are consulted in a fixed precedence order; the first one that
/// yields a token wins.
pub trait TokenSource {
  /// Retrieves the token held by this source.
  ///
  /// # Returns
  /// * `Some(token)` when this source holds a non-empty token.
  /// * `None` when the source has nothing usable, allowing lower-precedence
  ///   sources to run. Missing or unreadable backing state is reported as
  ///   `None`, never as an error.
  fn token(&self) -> Option<String>;
}

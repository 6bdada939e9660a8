//! Error types for modifier resolution.

/// Error raised while resolving a modifier.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ModifierError {
    /// No modifier registered under the requested name.
    #[error("modifier [{0}] not found")]
    NotFound(String),
}

//! Error types for nested-set configuration.

use thiserror::Error;

/// Errors raised while validating a [`Configuration`](super::Configuration).
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The logical store name is empty.
    #[error("Entity name must not be empty")]
    EmptyEntityName,

    /// A field role was mapped to an empty name.
    #[error("Field name for role {role} must not be empty")]
    EmptyFieldName {
        /// The role whose name is empty
        role: &'static str,
    },

    /// Two roles were mapped to the same store field.
    #[error("Field name {name} is used for more than one role")]
    DuplicateFieldName {
        /// The repeated field name
        name: String,
    },

    /// The configuration document could not be parsed.
    #[error("Invalid configuration document")]
    InvalidDocument {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Check if this error is about field naming.
    pub fn is_field_error(&self) -> bool {
        matches!(
            self,
            ConfigError::EmptyFieldName { .. } | ConfigError::DuplicateFieldName { .. }
        )
    }
}

impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Config(err)
    }
}

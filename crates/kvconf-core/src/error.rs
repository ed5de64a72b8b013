//! Error types for kvconf.
//!
//! Every failure a configuration lookup can surface is a variant of
//! [`ConfigError`], so callers branch on the kind instead of matching on
//! message text.
//!
//! # Example
//!
//! ```
//! use kvconf_core::{ConfigError, Result};
//!
//! fn require(key: &str, found: Option<&str>) -> Result<String> {
//!     found
//!         .map(str::to_string)
//!         .ok_or_else(|| ConfigError::not_found(key))
//! }
//!
//! let err = require("config/shared/redis/host", None).unwrap_err();
//! assert!(err.is_not_found());
//! ```

use thiserror::Error;

/// Main error type for configuration lookups.
///
/// The type is `Clone` because a single failed store read may be shared by
/// several callers waiting on the same in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The key is absent from the store and no default was supplied.
    #[error("configuration key '{key}' not found")]
    NotFound {
        /// Fully qualified key that was requested
        key: String,
    },

    /// The store could not be reached or answered with an HTTP failure.
    #[error("configuration store unreachable while reading '{key}': {reason}")]
    Unreachable {
        /// Fully qualified key that was requested
        key: String,
        /// Transport level description
        reason: String,
    },

    /// The store answered, but the payload could not be decoded.
    #[error("invalid response from configuration store for '{key}': {reason}")]
    InvalidResponse {
        /// Fully qualified key that was requested
        key: String,
        /// What could not be decoded
        reason: String,
    },

    /// The value is not a valid base-10 integer.
    #[error("configuration key '{key}' is not a valid number: '{value}'")]
    InvalidNumber {
        /// Fully qualified key that was requested
        key: String,
        /// The raw value
        value: String,
    },

    /// The value is neither `true` nor `false`.
    #[error("configuration key '{key}' is not a valid boolean: '{value}'")]
    InvalidBoolean {
        /// Fully qualified key that was requested
        key: String,
        /// The raw value
        value: String,
    },

    /// The preload orchestration itself failed.
    #[error("configuration client initialization failed: {0}")]
    InitializationFailed(String),

    /// Connection settings are unusable.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

impl ConfigError {
    // ============================================
    // Constructors
    // ============================================

    /// Creates a NotFound error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates an Unreachable error.
    pub fn unreachable(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unreachable {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates an InvalidResponse error.
    pub fn invalid_response(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates an InvalidNumber error.
    pub fn invalid_number(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates an InvalidBoolean error.
    pub fn invalid_boolean(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidBoolean {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates an InitializationFailed error.
    pub fn initialization(message: impl Into<String>) -> Self {
        Self::InitializationFailed(message.into())
    }

    /// Creates an InvalidSettings error.
    pub fn settings(message: impl Into<String>) -> Self {
        Self::InvalidSettings(message.into())
    }

    // ============================================
    // Query methods
    // ============================================

    /// Returns true if the key was absent from the store.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the store could not be reached.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }

    /// Returns true if a value failed typed parsing.
    pub fn is_malformed_value(&self) -> bool {
        matches!(
            self,
            Self::InvalidNumber { .. } | Self::InvalidBoolean { .. }
        )
    }

    /// Returns true if this is a transient error that might succeed later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }

    /// Returns the key the failure relates to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::NotFound { key }
            | Self::Unreachable { key, .. }
            | Self::InvalidResponse { key, .. }
            | Self::InvalidNumber { key, .. }
            | Self::InvalidBoolean { key, .. } => Some(key),
            Self::InitializationFailed(_) | Self::InvalidSettings(_) => None,
        }
    }
}

/// Type alias for Results with ConfigError.
pub type Result<T> = std::result::Result<T, ConfigError>;

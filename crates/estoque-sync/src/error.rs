//! # Sync Error Types
//!
//! What callers of the product service, the remote client and the auth
//! service get back when something fails.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sync Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Remote      │  │        Local            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Network        │  │  NotFound               │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Storage                │ │
//! │  │  ConfigLoad...  │  │  Api            │  │                         │ │
//! │  │  ConfigSave...  │  │  MalformedPay.. │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Remote errors trigger the local fallback. Local errors are surfaced.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use estoque_core::ValidationError;
use estoque_store::StoreError;
use thiserror::Error;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Sync error type covering every failure of this crate.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid API URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Remote Errors
    // =========================================================================
    /// The request never got a response (DNS, refused, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// No response within the configured timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The API answered with a non-2xx status.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The API answered 2xx with a body we cannot decode.
    #[error("Malformed payload (status {status}): {message}")]
    MalformedPayload { status: u16, message: String },

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// The product does not exist in the local store.
    #[error("Product not found: {id}")]
    NotFound { id: String },

    /// The local store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Input rejected before any store was touched.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (e.g. the HTTP client could not be built).
    #[error("Internal error: {0}")]
    Internal(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => SyncError::NotFound { id },
            other => SyncError::Storage(other.to_string()),
        }
    }
}

impl From<url::ParseError> for SyncError {
    fn from(err: url::ParseError) -> Self {
        SyncError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        SyncError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization (for the fallback policy)
// =============================================================================

impl SyncError {
    /// True for failures of the remote API: the ones that trigger fallback.
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            SyncError::Network(_)
                | SyncError::Timeout(_)
                | SyncError::Api { .. }
                | SyncError::MalformedPayload { .. }
        )
    }

    /// True when the API rejected the credentials (401 or 403).
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// True when the API answered 404.
    pub fn is_not_found_status(&self) -> bool {
        matches!(self, SyncError::Api { status: 404, .. })
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidConfig(_)
                | SyncError::InvalidUrl(_)
                | SyncError::ConfigLoadFailed(_)
                | SyncError::ConfigSaveFailed(_)
        )
    }

    /// The HTTP status, for errors that carry one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SyncError::Api { status, .. } | SyncError::MalformedPayload { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_failures() {
        assert!(SyncError::Network("connection refused".into()).is_remote_failure());
        assert!(SyncError::Timeout(10).is_remote_failure());
        assert!(SyncError::Api { status: 500, body: String::new() }.is_remote_failure());
        assert!(SyncError::MalformedPayload { status: 200, message: "x".into() }.is_remote_failure());

        assert!(!SyncError::NotFound { id: "1".into() }.is_remote_failure());
        assert!(!SyncError::Storage("disk full".into()).is_remote_failure());
        assert!(!SyncError::InvalidConfig("bad".into()).is_remote_failure());
    }

    #[test]
    fn test_status_predicates() {
        let unauthorized = SyncError::Api { status: 401, body: String::new() };
        let forbidden = SyncError::Api { status: 403, body: String::new() };
        let missing = SyncError::Api { status: 404, body: String::new() };

        assert!(unauthorized.is_auth_failure());
        assert!(forbidden.is_auth_failure());
        assert!(!missing.is_auth_failure());
        assert!(missing.is_not_found_status());
        assert_eq!(missing.status(), Some(404));
        assert_eq!(SyncError::Timeout(10).status(), None);
    }

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let err: SyncError = StoreError::not_found("Product", "42").into();
        assert!(matches!(err, SyncError::NotFound { ref id } if id == "42"));

        let err: SyncError = StoreError::Serialization("bad blob".into()).into();
        assert!(matches!(err, SyncError::Storage(_)));
    }

    #[test]
    fn test_error_display() {
        let err = SyncError::Api { status: 500, body: "boom".into() };
        assert_eq!(err.to_string(), "API error 500: boom");
        assert!(SyncError::InvalidUrl("x".into()).is_config_error());
    }
}

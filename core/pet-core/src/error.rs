//! Error types for pet-core operations.
//! Keep PetFfiError minimal and stable to avoid breaking widget hosts.
//!
//! Only storage and configuration problems are errors. Invalid or missing pet
//! data is never an error: the reconciliation ordering degrades it to the
//! offline or default source instead.

use std::path::PathBuf;

// ═══════════════════════════════════════════════════════════════════════════════
// FFI-Compatible Error (for Kotlin/Swift widget hosts)
// ═══════════════════════════════════════════════════════════════════════════════

/// FFI-safe error type for use across language boundaries.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PetFfiError {
    #[error("{message}")]
    General { message: String },
}

impl From<String> for PetFfiError {
    fn from(message: String) -> Self {
        PetFfiError::General { message }
    }
}

impl From<&str> for PetFfiError {
    fn from(message: &str) -> Self {
        PetFfiError::General {
            message: message.to_string(),
        }
    }
}

impl From<PetError> for PetFfiError {
    fn from(err: PetError) -> Self {
        PetFfiError::General {
            message: err.to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Internal Error (for Rust-only use)
// ═══════════════════════════════════════════════════════════════════════════════

/// All errors that can occur in pet-core operations.
#[derive(Debug, thiserror::Error)]
pub enum PetError {
    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("Configuration invalid: {0}")]
    ConfigInvalid(String),

    // ─────────────────────────────────────────────────────────────────────
    // Storage Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store lock poisoned: {0}")]
    StorePoisoned(&'static str),
}

impl PetError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        PetError::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        PetError::Json {
            context: context.into(),
            source,
        }
    }
}

/// Convenience type alias for Results using PetError.
pub type Result<T> = std::result::Result<T, PetError>;

impl From<PetError> for String {
    fn from(err: PetError) -> String {
        err.to_string()
    }
}

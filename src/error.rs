//! Error types for gov-migrate

use thiserror::Error;

/// Errors raised by the underlying key-value store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),
}

/// Errors raised while encoding or decoding a stored value
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("MessagePack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    #[error("MessagePack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value: {0}")]
    Invalid(String),
}

/// Errors raised by the parameter namespace
#[derive(Error, Debug)]
pub enum ParamError {
    #[error("Parameter key not registered in {space}: {key}")]
    UnregisteredKey { space: String, key: String },

    #[error("Parameter not set: {key}")]
    NotFound { key: String },

    #[error("Type mismatch for parameter {key}: expected {expected}, got {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid parameter {key}: {reason}")]
    Invalid { key: String, reason: String },

    #[error("Parameter codec error for {key}: {source}")]
    Codec {
        key: String,
        #[source]
        source: CodecError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors surfaced by a migration pass
///
/// Any variant aborts the pass. Writes staged before the failure are
/// discarded by the record migrator and by the upgrader.
#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Failed to decode record at key {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: CodecError,
    },

    #[error("Failed to encode record for key {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: CodecError,
    },

    #[error("Malformed key {key}: {reason}")]
    MalformedKey { key: String, reason: String },

    #[error("Missing parameter: {key}")]
    MissingParam { key: String },

    #[error("Schema version mismatch for {module}: expected {expected}, found {found}")]
    VersionMismatch {
        module: String,
        expected: u64,
        found: u64,
    },

    #[error("Verification failed: {0}")]
    Verification(String),

    #[error("Parameter error: {0}")]
    Param(#[from] ParamError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MigrationError {
    /// Build a decode error naming the offending key
    pub fn decode(key: &[u8], source: CodecError) -> Self {
        Self::Decode {
            key: crate::keys::describe_key(key),
            source,
        }
    }

    /// Build an encode error naming the target key
    pub fn encode(key: &[u8], source: CodecError) -> Self {
        Self::Encode {
            key: crate::keys::describe_key(key),
            source,
        }
    }
}

//! Codec error types.

use serde::{Deserialize, Serialize};

/// Why a runtime header could not be read.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum HeaderError {
    /// The buffer does not start with `RIVE`. Nothing was consumed.
    #[error("missing RIVE fingerprint")]
    BadFingerprint,

    /// The header ran past the end of the buffer.
    #[error("header truncated at byte {position}")]
    Truncated { position: usize },

    /// A property key in the field table does not fit in 16 bits.
    #[error("property key {key} out of range")]
    InvalidPropertyKey { key: u64 },
}
